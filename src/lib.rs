//! # Teamforge
//!
//! タイムスロット制イベントのチーム編成サーバー
//!
//! 参加者はチームの作成・参加・参加リクエスト、またはランダムプールへの登録を行い、
//! 管理者はプールからのチーム生成・統合・リーダー変更を行う。
//! どの操作でも「1人1チーム」「定員」「開催日の一致」を保つ。
//!
//! このプロジェクトはクリーンアーキテクチャを採用しており、以下の4層で構成されています：
//!
//! - **Domain層**: エンティティ、ルール違反エラー、配置計画などの純粋なロジック
//! - **Application層**: チーム編成のユースケース
//! - **Adapter層**: 設定ファイルとJSONデータストア
//! - **Driver層**: HTTP API、CLI、依存性注入

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Domain層（純粋なビジネスロジック）
pub mod domain;

// Application層（ユースケース）
pub mod application;

// Adapter層（Infrastructure）
pub mod adapter;

// Driver層（Presentation）
pub mod driver;
