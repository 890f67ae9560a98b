//! # Data Transfer Objects
//!
//! - **commands**: Use Case への入力
//! - **team_policy**: チーム編成ルールの設定値

pub mod commands;
pub mod team_policy;
