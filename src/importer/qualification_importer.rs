// ==========================================
// 垃圾清运车队调度 - 技师资质导入
// ==========================================
// 逐条校验并登记 technician(eid, truck_type)
// 跳过: 员工解析失败 / 员工是司机 / 车型不存在 / 资质已登记
// ==========================================

use crate::domain::staff::QualificationRecord;
use crate::importer::employee_resolver::EmployeeResolver;
use crate::repository::{EmployeeRepository, FleetRepository, RepositoryResult};
use rusqlite::Connection;
use std::fmt;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnknownEmployee,
    EmployeeIsDriver,
    UnknownTruckType,
    AlreadyQualified,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownEmployee => write!(f, "UNKNOWN_EMPLOYEE"),
            SkipReason::EmployeeIsDriver => write!(f, "EMPLOYEE_IS_DRIVER"),
            SkipReason::UnknownTruckType => write!(f, "UNKNOWN_TRUCK_TYPE"),
            SkipReason::AlreadyQualified => write!(f, "ALREADY_QUALIFIED"),
        }
    }
}

/// 导入汇总
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualificationImportReport {
    pub applied: usize,
    pub skipped: Vec<(QualificationRecord, SkipReason)>,
}

// ==========================================
// QualificationImporter - 资质导入器
// ==========================================
pub struct QualificationImporter<'a, R: EmployeeResolver> {
    conn: &'a Connection,
    resolver: R,
}

impl<'a, R: EmployeeResolver> QualificationImporter<'a, R> {
    pub fn new(conn: &'a Connection, resolver: R) -> Self {
        Self { conn, resolver }
    }

    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn apply(&self, records: &[QualificationRecord]) -> RepositoryResult<QualificationImportReport> {
        let employees = EmployeeRepository::new(self.conn);
        let fleet = FleetRepository::new(self.conn);
        let mut report = QualificationImportReport::default();

        for record in records {
            let skip = match self.resolver.resolve(record)? {
                None => Some(SkipReason::UnknownEmployee),
                Some(eid) if employees.is_driver(eid)? => Some(SkipReason::EmployeeIsDriver),
                Some(_) if !fleet.truck_type_exists(&record.truck_type)? => {
                    Some(SkipReason::UnknownTruckType)
                }
                Some(eid) if employees.has_technician_capability(eid, &record.truck_type)? => {
                    Some(SkipReason::AlreadyQualified)
                }
                Some(eid) => {
                    employees.insert_technician_capability(eid, &record.truck_type)?;
                    None
                }
            };

            match skip {
                Some(reason) => {
                    debug!(name = %record.full_name(), truck_type = %record.truck_type, %reason, "资质记录跳过");
                    report.skipped.push((record.clone(), reason));
                }
                None => report.applied += 1,
            }
        }

        info!(applied = report.applied, skipped = report.skipped.len(), "资质导入完成");
        Ok(report)
    }
}
