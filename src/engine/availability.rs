// ==========================================
// 垃圾清运车队调度 - 可用性判定
// ==========================================
// 规则:
// - 车辆/司机: 既有出车占用 [start - buffer, end + buffer] 与请求时段相交 → 不可用
// - 车辆: 请求时段所在自然日有维保 → 不可用
// - 技师: 请求日有维保任务 → 不可用（无缓冲）
// 红线: 只读，无副作用
// ==========================================

use crate::config::SchedulingConfig;
use crate::domain::fleet::travel_time;
use crate::domain::schedule::TimeWindow;
use crate::domain::types::ResourceKind;
use crate::repository::{MaintenanceRepository, RepositoryResult, TripRepository, TripSlot};
use chrono::{Days, NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use tracing::trace;

// ==========================================
// AvailabilityOracle - 可用性判定
// ==========================================
pub struct AvailabilityOracle<'a> {
    conn: &'a Connection,
    config: &'a SchedulingConfig,
}

impl<'a> AvailabilityOracle<'a> {
    pub fn new(conn: &'a Connection, config: &'a SchedulingConfig) -> Self {
        Self { conn, config }
    }

    /// 资源在请求时段内是否空闲
    pub fn is_available(
        &self,
        kind: ResourceKind,
        resource_id: i64,
        window: &TimeWindow,
    ) -> RepositoryResult<bool> {
        let available = match kind {
            ResourceKind::Truck => {
                !self.truck_has_maintenance_during(resource_id, window)?
                    && !Self::conflicts(&self.truck_windows_around(resource_id, window)?, window)
            }
            ResourceKind::Driver => {
                !Self::conflicts(&self.driver_windows_around(resource_id, window)?, window)
            }
            ResourceKind::Technician => !MaintenanceRepository::new(self.conn)
                .exists_for_technician_on(resource_id, window.start.date())?,
        };
        trace!(%kind, resource_id, start = %window.start, end = %window.end, available, "可用性判定");
        Ok(available)
    }

    /// 资源在整个自然日是否完全空闲
    ///
    /// - 车辆: 当日无出车且无维保
    /// - 司机: 当日未被排任何出车
    /// - 技师: 当日无维保任务
    pub fn is_free_on_day(
        &self,
        kind: ResourceKind,
        resource_id: i64,
        date: NaiveDate,
    ) -> RepositoryResult<bool> {
        let trips = TripRepository::new(self.conn);
        let maintenance = MaintenanceRepository::new(self.conn);
        let free = match kind {
            ResourceKind::Truck => {
                !trips.truck_has_trip_on(resource_id, date)?
                    && !maintenance.exists_for_truck_on(resource_id, date)?
            }
            ResourceKind::Driver => !trips.employees_booked_on(date)?.contains(&resource_id),
            ResourceKind::Technician => !maintenance.exists_for_technician_on(resource_id, date)?,
        };
        Ok(free)
    }

    /// 车辆在请求时段前后已有出车的占用窗口（已含缓冲）
    pub fn truck_windows_around(
        &self,
        tid: i64,
        window: &TimeWindow,
    ) -> RepositoryResult<Vec<TimeWindow>> {
        let (from, to) = Self::search_range(window);
        let slots = TripRepository::new(self.conn).truck_slots_between(tid, from, to)?;
        Ok(self.occupied_windows(&slots))
    }

    fn driver_windows_around(
        &self,
        eid: i64,
        window: &TimeWindow,
    ) -> RepositoryResult<Vec<TimeWindow>> {
        let (from, to) = Self::search_range(window);
        let slots = TripRepository::new(self.conn).employee_slots_between(eid, from, to)?;
        Ok(self.occupied_windows(&slots))
    }

    fn truck_has_maintenance_during(&self, tid: i64, window: &TimeWindow) -> RepositoryResult<bool> {
        MaintenanceRepository::new(self.conn).exists_for_truck_between(
            tid,
            window.start.date(),
            window.end.date(),
        )
    }

    /// 出车时段 → 含缓冲的占用窗口
    ///
    /// 时长无法换算（线路长度异常）的出车视为从开始起一直占用
    pub fn occupied_windows(&self, slots: &[TripSlot]) -> Vec<TimeWindow> {
        slots
            .iter()
            .map(|slot| {
                let end = travel_time(slot.route_length, self.config.average_speed_kmh)
                    .and_then(|duration| slot.start.checked_add_signed(duration))
                    .unwrap_or(NaiveDateTime::MAX);
                TimeWindow::new(slot.start, end).buffered(self.config.buffer())
            })
            .collect()
    }

    /// 请求时段与任一占用窗口相交
    pub fn conflicts(occupied: &[TimeWindow], window: &TimeWindow) -> bool {
        occupied.iter().any(|o| o.overlaps(window))
    }

    // 单趟不跨越两天以上，前后各多查一天即可覆盖缓冲跨零点的情形
    fn search_range(window: &TimeWindow) -> (NaiveDate, NaiveDate) {
        let from = window
            .start
            .date()
            .checked_sub_days(Days::new(1))
            .unwrap_or(window.start.date());
        let to = window
            .end
            .date()
            .checked_add_days(Days::new(1))
            .unwrap_or(window.end.date());
        (from, to)
    }
}
