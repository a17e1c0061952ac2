// ==========================================
// 垃圾清运车队调度 - 维保排程引擎
// ==========================================
// 需排维保的车辆（tid 升序）:
// - D 之前最近一次维保早于 D - interval 天（或从未维保）
// - [D, D + lookahead] 内尚无维保
// 排期: 自 D+1 起逐日搜索，首个“有资质技师空闲 且 车辆当日无出车/维保”的日期
// 技师: 当日空闲者取最小 eid
// ==========================================

use crate::config::SchedulingConfig;
use crate::domain::fleet::Truck;
use crate::domain::schedule::Maintenance;
use crate::domain::types::{EmployeeId, ResourceKind};
use crate::engine::availability::AvailabilityOracle;
use crate::engine::selector::{order, CandidateSelector};
use crate::repository::{EmployeeRepository, FleetRepository, MaintenanceRepository, RepositoryResult};
use chrono::{Days, NaiveDate};
use rusqlite::Connection;
use tracing::{debug, info, instrument, warn};

// ==========================================
// MaintenanceScheduler - 维保排程引擎
// ==========================================
pub struct MaintenanceScheduler<'a> {
    conn: &'a Connection,
    config: &'a SchedulingConfig,
}

impl<'a> MaintenanceScheduler<'a> {
    pub fn new(conn: &'a Connection, config: &'a SchedulingConfig) -> Self {
        Self { conn, config }
    }

    /// 以 date 为基准为到期车辆排维保
    ///
    /// # 返回
    /// 本次新排的维保记录（逐日搜索耗尽的车辆不排，不视为错误）
    #[instrument(skip(self))]
    pub fn schedule_maintenance(&self, date: NaiveDate) -> RepositoryResult<Vec<Maintenance>> {
        let maintenance = MaintenanceRepository::new(self.conn);
        let mut scheduled = Vec::new();

        for truck in FleetRepository::new(self.conn).list_trucks()? {
            if !self.is_due(&truck, date)? {
                continue;
            }

            let qualified = EmployeeRepository::new(self.conn).technicians_for_truck_type(&truck.truck_type)?;
            if qualified.is_empty() {
                debug!(tid = truck.tid, truck_type = %truck.truck_type, "无有资质技师");
                continue;
            }

            match self.find_slot(&truck, &qualified, date)? {
                Some((day, eid)) => {
                    let record = Maintenance {
                        tid: truck.tid,
                        eid,
                        mdate: day,
                    };
                    maintenance.insert(&record)?;
                    debug!(tid = record.tid, eid = record.eid, mdate = %record.mdate, "维保已排");
                    scheduled.push(record);
                }
                None => {
                    warn!(
                        tid = truck.tid,
                        max_search_days = self.config.max_search_days,
                        "搜索窗口内无可排日期，本次不排"
                    );
                }
            }
        }

        info!(count = scheduled.len(), "维保排程完成");
        Ok(scheduled)
    }

    /// 车辆是否到期且前瞻窗口内无维保
    pub fn is_due(&self, truck: &Truck, date: NaiveDate) -> RepositoryResult<bool> {
        let maintenance = MaintenanceRepository::new(self.conn);

        if let Some(last) = maintenance.latest_before(truck.tid, date)? {
            let cutoff = shift_days(date, -self.config.maintenance_interval_days);
            if last >= cutoff {
                return Ok(false);
            }
        }

        let horizon = shift_days(date, self.config.maintenance_lookahead_days);
        Ok(!maintenance.exists_for_truck_between(truck.tid, date, horizon)?)
    }

    /// 自 date+1 起逐日搜索 (日期, 技师)
    fn find_slot(
        &self,
        truck: &Truck,
        qualified: &[EmployeeId],
        date: NaiveDate,
    ) -> RepositoryResult<Option<(NaiveDate, EmployeeId)>> {
        let oracle = AvailabilityOracle::new(self.conn, self.config);

        for offset in 1..=self.config.max_search_days {
            let day = shift_days(date, offset);
            if !oracle.is_free_on_day(ResourceKind::Truck, truck.tid, day)? {
                continue;
            }

            let technician = CandidateSelector::try_select_first(
                qualified.to_vec(),
                order::employee_by_id,
                |eid| oracle.is_free_on_day(ResourceKind::Technician, *eid, day),
            )?;
            if let Some(eid) = technician {
                return Ok(Some((day, eid)));
            }
        }
        Ok(None)
    }
}

fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}
