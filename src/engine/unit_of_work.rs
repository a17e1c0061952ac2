// ==========================================
// 垃圾清运车队调度 - 事务边界
// ==========================================
// 红线: 每个对外操作要么全部生效，要么不留任何写入
// - 工作闭包返回 Err → 事务随 drop 回滚
// - should_commit 为 false（如计数为 0）→ 显式回滚
// ==========================================

use crate::repository::RepositoryResult;
use rusqlite::{Connection, Transaction};
use tracing::debug;

/// 在单个事务内执行工作单元
pub fn run_in_transaction<T, F, C>(
    conn: &mut Connection,
    work: F,
    should_commit: C,
) -> RepositoryResult<T>
where
    F: FnOnce(&Transaction<'_>) -> RepositoryResult<T>,
    C: FnOnce(&T) -> bool,
{
    let tx = conn.transaction()?;
    let result = work(&tx)?;

    if should_commit(&result) {
        tx.commit()?;
    } else {
        debug!("无有效写入，事务回滚");
        tx.rollback()?;
    }
    Ok(result)
}
