//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **User / Member**: 参加者とチームに埋め込まれるメンバー情報
//! - **Team**: チーム（メンバー、リーダー、開催日、スロット）
//! - **EventRegistration**: イベント登録
//! - **JoinRequest**: 参加リクエスト
//! - **PoolEntry**: ランダムプールのエントリ
//! - **AdminUser**: 管理者

pub mod admin;
pub mod join_request;
pub mod pool_entry;
pub mod registration;
pub mod team;
pub mod user;
