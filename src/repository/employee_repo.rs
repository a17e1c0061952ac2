// ==========================================
// 垃圾清运车队调度 - 员工/资质仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 覆盖: employee / driver / technician 表
// ==========================================

use crate::domain::staff::{DriverCandidate, Employee};
use crate::domain::types::EmployeeId;
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::collections::BTreeMap;

// ==========================================
// EmployeeRepository - 员工仓储
// ==========================================
pub struct EmployeeRepository<'a> {
    conn: &'a Connection,
}

impl<'a> EmployeeRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// 按全名精确匹配（可能多条）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(
            "SELECT eid, name, hire_date FROM employee WHERE name = ?1 ORDER BY eid ASC",
        )?;
        let employees = stmt
            .query_map(params![name], map_employee)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(employees)
    }

    // ===== 司机 =====

    /// 全部司机及其可驾驶车型（按 eid 聚合）
    pub fn list_driver_candidates(&self) -> RepositoryResult<Vec<DriverCandidate>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT e.eid, e.name, e.hire_date, d.truck_type
            FROM employee e
            JOIN driver d ON d.eid = e.eid
            ORDER BY e.eid ASC, d.truck_type ASC
            "#,
        )?;
        let rows = stmt
            .query_map([], |row| Ok((map_employee(row)?, row.get::<_, String>(3)?)))?
            .collect::<SqliteResult<Vec<_>>>()?;

        let mut grouped: BTreeMap<EmployeeId, DriverCandidate> = BTreeMap::new();
        for (employee, truck_type) in rows {
            grouped
                .entry(employee.eid)
                .or_insert_with(|| DriverCandidate {
                    employee,
                    truck_types: Vec::new(),
                })
                .truck_types
                .push(truck_type);
        }
        Ok(grouped.into_values().collect())
    }

    pub fn is_driver(&self, eid: EmployeeId) -> RepositoryResult<bool> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM driver WHERE eid = ?1 LIMIT 1",
                params![eid],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    // ===== 技师 =====

    /// 具备某车型维保资质的技师 eid（eid 升序）
    pub fn technicians_for_truck_type(&self, truck_type: &str) -> RepositoryResult<Vec<EmployeeId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT eid FROM technician WHERE truck_type = ?1 ORDER BY eid ASC")?;
        let eids = stmt
            .query_map(params![truck_type], |row| row.get::<_, EmployeeId>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(eids)
    }

    pub fn has_technician_capability(
        &self,
        eid: EmployeeId,
        truck_type: &str,
    ) -> RepositoryResult<bool> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM technician WHERE eid = ?1 AND truck_type = ?2",
                params![eid, truck_type],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    pub fn insert_technician_capability(
        &self,
        eid: EmployeeId,
        truck_type: &str,
    ) -> RepositoryResult<()> {
        self.conn.execute(
            "INSERT INTO technician (eid, truck_type) VALUES (?1, ?2)",
            params![eid, truck_type],
        )?;
        Ok(())
    }
}

fn map_employee(row: &Row<'_>) -> SqliteResult<Employee> {
    Ok(Employee {
        eid: row.get(0)?,
        name: row.get(1)?,
        hire_date: row.get(2)?,
    })
}
