//! # Application Layer
//!
//! チーム編成のユースケース
//!
//! ## 特徴
//!
//! - Domain層のエンティティとサービスを組み合わせて操作を実現
//! - 各ユースケースは必要なRepository traitだけに依存する
//! - 検証 → 読み出し → 変更 → 書き込みの順で処理する
//!
//! ## 構成要素
//!
//! - **dto**: コマンド（入力）とチーム編成ポリシー
//! - **use_cases**: ユースケース

pub mod dto;
pub mod use_cases;
