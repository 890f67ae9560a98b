//! Adapter Layer
//!
//! 外部システム（JSONデータファイル、設定ファイル）との統合

pub mod config;
pub mod repositories;
