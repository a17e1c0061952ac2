// ==========================================
// 垃圾清运车队调度 - 维保记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: (tid, mdate) 唯一；(eid, mdate) 唯一
// ==========================================

use crate::domain::schedule::Maintenance;
use crate::domain::types::{EmployeeId, TruckId};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};

// ==========================================
// MaintenanceRepository - 维保仓储
// ==========================================
pub struct MaintenanceRepository<'a> {
    conn: &'a Connection,
}

impl<'a> MaintenanceRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, maintenance: &Maintenance) -> RepositoryResult<()> {
        self.conn.execute(
            "INSERT INTO maintenance (tid, eid, mdate) VALUES (?1, ?2, ?3)",
            params![maintenance.tid, maintenance.eid, maintenance.mdate],
        )?;
        Ok(())
    }

    pub fn exists_for_truck_on(&self, tid: TruckId, date: NaiveDate) -> RepositoryResult<bool> {
        self.exists_for_truck_between(tid, date, date)
    }

    /// 车辆在 [from, to]（含两端）内是否已有维保
    pub fn exists_for_truck_between(
        &self,
        tid: TruckId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<bool> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM maintenance WHERE tid = ?1 AND mdate BETWEEN ?2 AND ?3 LIMIT 1",
                params![tid, from, to],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    pub fn exists_for_technician_on(
        &self,
        eid: EmployeeId,
        date: NaiveDate,
    ) -> RepositoryResult<bool> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM maintenance WHERE eid = ?1 AND mdate = ?2 LIMIT 1",
                params![eid, date],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    /// 严格早于 date 的最近一次维保日期
    pub fn latest_before(&self, tid: TruckId, date: NaiveDate) -> RepositoryResult<Option<NaiveDate>> {
        let latest: Option<NaiveDate> = self.conn.query_row(
            "SELECT MAX(mdate) FROM maintenance WHERE tid = ?1 AND mdate < ?2",
            params![tid, date],
            |row| row.get(0),
        )?;
        Ok(latest)
    }

    pub fn find_by_truck(&self, tid: TruckId) -> RepositoryResult<Vec<Maintenance>> {
        let mut stmt = self.conn.prepare(
            "SELECT tid, eid, mdate FROM maintenance WHERE tid = ?1 ORDER BY mdate ASC",
        )?;
        let records = stmt
            .query_map(params![tid], |row| {
                Ok(Maintenance {
                    tid: row.get(0)?,
                    eid: row.get(1)?,
                    mdate: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }
}
