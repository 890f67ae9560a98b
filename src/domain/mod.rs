//! # Domain Layer
//!
//! このモジュールはビジネスの核心的なルールとエンティティを定義します。
//!
//! ## 特徴
//!
//! - 外部依存を持たない（Rust標準ライブラリと最小限の依存のみ）
//! - フレームワークに依存しない
//! - データベースやHTTPについて何も知らない
//! - 純粋なビジネスロジック
//!
//! ## 構成要素
//!
//! - **entities**: ビジネスエンティティ（Team, User, PoolEntryなど）
//! - **error**: チーム編成ルール違反（TeamError）
//! - **repositories**: Repository trait（インターフェース定義のみ）
//! - **services**: Domain Service（所属ルール、スロット、プール割り当て）

pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
