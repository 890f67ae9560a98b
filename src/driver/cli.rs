//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::{Parser, Subcommand};

/// チーム編成サーバーと管理コマンド
#[derive(Parser, Debug, Clone)]
#[command(name = "teamforge")]
#[command(about = "Team formation server for timed events", long_about = None)]
pub struct Args {
    /// Config file path
    #[arg(short, long, default_value = "./teamforge.json")]
    pub config: String,

    /// Command to run (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Override the bind address from the config file
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Create the default admin account if none exists
    SetupAdmin,

    /// Print record counts of the data store
    CheckDb,

    /// Show how many participants are waiting in the random pool
    PoolStats {
        #[arg(long)]
        event: Option<String>,
    },

    /// Form teams from the random pool
    Allocate {
        #[arg(long)]
        event: Option<String>,

        /// Target team size (clamped to the configured maximum)
        #[arg(long)]
        team_size: Option<usize>,

        /// Print the plan without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Import event registrations from a JSON file
    ImportRegistrations {
        /// JSON array of {userId, userEmail, eventDate?, event?, name?}
        file: String,
    },
}

impl Args {
    /// サブコマンド省略時は `serve`
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Serve { bind: None })
    }
}
