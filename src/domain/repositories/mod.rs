//! # Domain Repositories
//!
//! Repository trait（インターフェース）定義
//!
//! ## 特徴
//!
//! - Domain層では実装を持たない（traitの定義のみ）
//! - Adapter層で具体的な実装を提供
//! - 依存性逆転の原則（DIP）を実現

pub mod admin_repository;
pub mod join_request_repository;
pub mod pool_repository;
pub mod registration_repository;
pub mod team_repository;
pub mod user_repository;
