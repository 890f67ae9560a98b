//! # Domain Services
//!
//! エンティティ単体に属さないビジネスルール
//!
//! - **MembershipService**: 所属・定員・イベント/日付の整合性
//! - **SlotSchedule**: 時間枠と枠あたりのチーム数
//! - **PoolAllocator**: ランダムプールの割り当て計画

pub mod membership;
pub mod pool_allocator;
pub mod slot_schedule;
