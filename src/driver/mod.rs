//! # Driver Layer (Presentation)
//!
//! HTTP API と CLI を提供
//!
//! ## 特徴
//!
//! - Use Caseを呼び出してビジネスフローを起動
//! - 依存性注入（DI）を行い、全てを組み立てる
//! - ルール違反（`TeamError`）をHTTPステータスへ変換
//!
//! ## 構成要素
//!
//! - **cli**: CLI引数のパース
//! - **http**: axum のルーター・ハンドラ・共有状態
//! - **workflow**: サブコマンドのオーケストレーション

pub mod cli;
pub mod http;
pub mod workflow;

pub use cli::{Args, Command};
pub use workflow::TeamForgeWorkflow;
