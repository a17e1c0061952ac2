// ==========================================
// 垃圾清运车队调度 - 员工身份解析
// ==========================================
// 外部资质文件只给出姓名；“姓名唯一”这一假设隔离在此接口后
// ==========================================

use crate::domain::staff::QualificationRecord;
use crate::domain::types::EmployeeId;
use crate::repository::{EmployeeRepository, RepositoryResult};
use rusqlite::Connection;

/// 员工身份解析接口
pub trait EmployeeResolver {
    /// 解析不到或不唯一时返回 None
    fn resolve(&self, record: &QualificationRecord) -> RepositoryResult<Option<EmployeeId>>;
}

// ==========================================
// StoreEmployeeResolver - 按全名查库
// ==========================================
pub struct StoreEmployeeResolver<'a> {
    conn: &'a Connection,
}

impl<'a> StoreEmployeeResolver<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl EmployeeResolver for StoreEmployeeResolver<'_> {
    fn resolve(&self, record: &QualificationRecord) -> RepositoryResult<Option<EmployeeId>> {
        let matches = EmployeeRepository::new(self.conn).find_by_name(&record.full_name())?;
        match matches.as_slice() {
            [only] => Ok(Some(only.eid)),
            _ => Ok(None),
        }
    }
}
