//! # Placement Helpers
//!
//! ユーザーをチームへ配置した後の後始末

use anyhow::Result;
use log::debug;

use crate::domain::repositories::join_request_repository::JoinRequestRepository;
use crate::domain::repositories::pool_repository::PoolRepository;

/// 配置済みユーザーのプールエントリと保留中リクエストを削除
///
/// # Errors
///
/// 削除に失敗した場合にエラーを返す
pub(crate) async fn release_claims<P, J>(pool: &P, join_requests: &J, user_id: &str) -> Result<()>
where
    P: PoolRepository + ?Sized,
    J: JoinRequestRepository + ?Sized,
{
    let dequeued = pool.remove_user(user_id).await?;
    let withdrawn = join_requests.delete_pending_for_user(user_id).await?;

    debug!(
        "Released claims for {}: {} pool entries, {} pending requests",
        user_id, dequeued, withdrawn
    );
    Ok(())
}
