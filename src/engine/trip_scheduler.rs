// ==========================================
// 垃圾清运车队调度 - 出车排班引擎
// ==========================================
// 单趟: 线路 + 开始时间 → 车辆 + 司机搭档 + 设施
// 批量: 车辆 + 日期 → 从 08:00 起按 rid 升序首次适配
// 红线: 所有拒绝必须输出 reason；不持有事务，由调用方决定提交/回滚
// ==========================================

use crate::config::SchedulingConfig;
use crate::domain::fleet::{Facility, Route, Truck};
use crate::domain::schedule::{TimeWindow, Trip};
use crate::domain::staff::DriverCandidate;
use crate::domain::types::{ResourceKind, RouteId, TruckId};
use crate::engine::availability::AvailabilityOracle;
use crate::engine::selector::{order, CandidateSelector};
use crate::repository::{
    EmployeeRepository, FleetRepository, MaintenanceRepository, RepositoryResult, TripRepository,
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, instrument};

// ==========================================
// 单趟排班结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum TripDecision {
    Scheduled(Trip),
    Rejected(TripRejectReason),
}

impl TripDecision {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, TripDecision::Scheduled(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripRejectReason {
    UnknownRoute,
    InvalidRouteLength,
    OutsideWorkingHours,
    RouteAlreadyScheduled,
    NoTruckAvailable,
    NoDriverPairAvailable,
    NoFacilityAvailable,
}

impl fmt::Display for TripRejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripRejectReason::UnknownRoute => write!(f, "UNKNOWN_ROUTE"),
            TripRejectReason::InvalidRouteLength => write!(f, "INVALID_ROUTE_LENGTH"),
            TripRejectReason::OutsideWorkingHours => write!(f, "OUTSIDE_WORKING_HOURS"),
            TripRejectReason::RouteAlreadyScheduled => write!(f, "ROUTE_ALREADY_SCHEDULED"),
            TripRejectReason::NoTruckAvailable => write!(f, "NO_TRUCK_AVAILABLE"),
            TripRejectReason::NoDriverPairAvailable => write!(f, "NO_DRIVER_PAIR_AVAILABLE"),
            TripRejectReason::NoFacilityAvailable => write!(f, "NO_FACILITY_AVAILABLE"),
        }
    }
}

// ==========================================
// TripScheduler - 出车排班引擎
// ==========================================
pub struct TripScheduler<'a> {
    conn: &'a Connection,
    config: &'a SchedulingConfig,
}

impl<'a> TripScheduler<'a> {
    pub fn new(conn: &'a Connection, config: &'a SchedulingConfig) -> Self {
        Self { conn, config }
    }

    /// 为线路在指定时间排一趟车
    ///
    /// 选择顺序:
    /// 1) 车辆: 可承运该线路垃圾类型、时段空闲；载重降序 → tid 升序
    /// 2) 司机搭档: 时段空闲、至少一人能驾驶所选车型；资历 → eid
    /// 3) 设施: 接收该垃圾类型的最小 fid
    #[instrument(skip(self))]
    pub fn schedule_one_trip(
        &self,
        rid: RouteId,
        time: NaiveDateTime,
    ) -> RepositoryResult<TripDecision> {
        let fleet = FleetRepository::new(self.conn);
        let trips = TripRepository::new(self.conn);

        let route = match fleet.find_route(rid)? {
            Some(route) => route,
            None => return Ok(self.reject(TripRejectReason::UnknownRoute)),
        };

        let window = match route
            .trip_duration(self.config.average_speed_kmh)
            .and_then(|duration| TimeWindow::from_start(time, duration))
        {
            Some(window) => window,
            None => return Ok(self.reject(TripRejectReason::InvalidRouteLength)),
        };
        if !window.within_working_hours(&self.config.working_hours) {
            return Ok(self.reject(TripRejectReason::OutsideWorkingHours));
        }

        if trips.exists_for_route_on(rid, time.date())? {
            return Ok(self.reject(TripRejectReason::RouteAlreadyScheduled));
        }

        let truck = match self.pick_truck(&route, &window)? {
            Some(truck) => truck,
            None => return Ok(self.reject(TripRejectReason::NoTruckAvailable)),
        };

        let (first, second) = match self.pick_driver_pair(&truck, &window)? {
            Some(pair) => pair,
            None => return Ok(self.reject(TripRejectReason::NoDriverPairAvailable)),
        };

        let facility = match self.pick_facility(&route.waste_type)? {
            Some(facility) => facility,
            None => return Ok(self.reject(TripRejectReason::NoFacilityAvailable)),
        };

        let trip = Trip::planned(rid, truck.tid, time, (first.eid(), second.eid()), facility.fid);
        trips.insert(&trip)?;

        info!(
            tid = trip.tid,
            eid1 = trip.eid1,
            eid2 = trip.eid2,
            fid = trip.fid,
            "出车已排"
        );
        Ok(TripDecision::Scheduled(trip))
    }

    /// 为一辆车在指定日期批量排车
    ///
    /// 1) 候选线路: 车型可承运、当日未排车；rid 升序
    /// 2) 司机搭档: 当日全天未排班、至少一人能驾驶该车型；整批只选一次
    /// 3) 时钟从开工时间起逐条排入，每趟后顺延 时长 + 间隔；开工/收工越界即停
    ///
    /// 车辆当日有维保则不排；线路无可用设施或长度无法换算时长则跳过该线路（时钟不动）
    ///
    /// 某条线路在收工前排不下时整批即停止，其后更短的线路也不再尝试（停止，不是跳过）
    #[instrument(skip(self))]
    pub fn schedule_many_trips(&self, tid: TruckId, date: NaiveDate) -> RepositoryResult<Vec<Trip>> {
        let fleet = FleetRepository::new(self.conn);
        let trips = TripRepository::new(self.conn);
        let oracle = AvailabilityOracle::new(self.conn, self.config);

        let truck = match fleet.find_truck(tid)? {
            Some(truck) => truck,
            None => {
                debug!("车辆不存在");
                return Ok(Vec::new());
            }
        };

        let opening = self.config.working_hours.opening(date);
        let closing = self.config.working_hours.closing(date);
        let whole_day = TimeWindow::new(opening, closing);
        if MaintenanceRepository::new(self.conn).exists_for_truck_on(tid, date)? {
            debug!("车辆当日有维保");
            return Ok(Vec::new());
        }

        let routes = self.pending_routes_for(&truck, date)?;
        if routes.is_empty() {
            debug!("无待排线路");
            return Ok(Vec::new());
        }

        let (first, second) = match self.pick_day_driver_pair(&truck, date)? {
            Some(pair) => pair,
            None => {
                debug!("无全天空闲的司机搭档");
                return Ok(Vec::new());
            }
        };

        // 车辆当日既有出车（含缓冲），新排车次不得与之相交
        let occupied = oracle.truck_windows_around(tid, &whole_day)?;

        let mut scheduled = Vec::new();
        let mut clock = opening;
        for route in routes {
            if clock >= closing {
                break;
            }

            let facility = match self.pick_facility(&route.waste_type)? {
                Some(facility) => facility,
                None => {
                    debug!(rid = route.rid, "无接收设施，跳过线路");
                    continue;
                }
            };

            let duration = match route.trip_duration(self.config.average_speed_kmh) {
                Some(duration) => duration,
                None => {
                    debug!(rid = route.rid, length = route.length, "线路长度无法换算时长，跳过线路");
                    continue;
                }
            };
            let mut window = match TimeWindow::from_start(clock, duration) {
                Some(window) => window,
                None => {
                    debug!(rid = route.rid, length = route.length, "线路时长越界，跳过线路");
                    continue;
                }
            };
            let mut fits = true;
            while let Some(busy) = occupied.iter().find(|o| o.overlaps(&window)) {
                clock = busy.end;
                match TimeWindow::from_start(clock, duration) {
                    Some(next) => window = next,
                    None => {
                        fits = false;
                        break;
                    }
                }
            }
            if !fits || clock >= closing || window.end > closing {
                debug!(rid = route.rid, start = %clock, "超出作业时段，停止排车");
                break;
            }

            let trip = Trip::planned(route.rid, tid, clock, (first.eid(), second.eid()), facility.fid);
            trips.insert(&trip)?;
            debug!(rid = trip.rid, start = %trip.ttime, fid = trip.fid, "批量排入");
            scheduled.push(trip);

            clock = match window.end.checked_add_signed(self.config.trip_gap()) {
                Some(next) => next,
                None => break,
            };
        }

        info!(count = scheduled.len(), eid1 = first.eid(), eid2 = second.eid(), "批量排车完成");
        Ok(scheduled)
    }

    // ==========================================
    // 候选选择
    // ==========================================

    fn pick_truck(&self, route: &Route, window: &TimeWindow) -> RepositoryResult<Option<Truck>> {
        let oracle = AvailabilityOracle::new(self.conn, self.config);
        let pool = FleetRepository::new(self.conn).find_trucks_carrying(&route.waste_type)?;
        CandidateSelector::try_select_first(pool, order::truck_by_capacity_then_id, |truck| {
            oracle.is_available(ResourceKind::Truck, truck.tid, window)
        })
    }

    fn pick_driver_pair(
        &self,
        truck: &Truck,
        window: &TimeWindow,
    ) -> RepositoryResult<Option<(DriverCandidate, DriverCandidate)>> {
        let oracle = AvailabilityOracle::new(self.conn, self.config);
        let mut available = Vec::new();
        for candidate in EmployeeRepository::new(self.conn).list_driver_candidates()? {
            if oracle.is_available(ResourceKind::Driver, candidate.eid(), window)? {
                available.push(candidate);
            }
        }
        Ok(Self::pair_for(available, &truck.truck_type))
    }

    fn pick_day_driver_pair(
        &self,
        truck: &Truck,
        date: NaiveDate,
    ) -> RepositoryResult<Option<(DriverCandidate, DriverCandidate)>> {
        let booked = TripRepository::new(self.conn).employees_booked_on(date)?;
        let available: Vec<DriverCandidate> = EmployeeRepository::new(self.conn)
            .list_driver_candidates()?
            .into_iter()
            .filter(|candidate| !booked.contains(&candidate.eid()))
            .collect();
        Ok(Self::pair_for(available, &truck.truck_type))
    }

    fn pair_for(
        pool: Vec<DriverCandidate>,
        truck_type: &str,
    ) -> Option<(DriverCandidate, DriverCandidate)> {
        CandidateSelector::select_pair(pool, order::driver_by_seniority_then_id, |a, b| {
            a.can_drive(truck_type) || b.can_drive(truck_type)
        })
    }

    fn pick_facility(&self, waste_type: &str) -> RepositoryResult<Option<Facility>> {
        let pool = FleetRepository::new(self.conn).find_facilities_accepting(waste_type)?;
        Ok(CandidateSelector::select_first(pool, order::facility_by_id, |_| true))
    }

    /// 车型可承运、当日尚未排车的线路（rid 升序）
    fn pending_routes_for(&self, truck: &Truck, date: NaiveDate) -> RepositoryResult<Vec<Route>> {
        let fleet = FleetRepository::new(self.conn);
        let carryable: HashSet<String> = fleet
            .waste_types_for_truck_type(&truck.truck_type)?
            .into_iter()
            .collect();
        let booked = TripRepository::new(self.conn).routes_with_trip_on(date)?;

        Ok(fleet
            .list_routes()?
            .into_iter()
            .filter(|route| carryable.contains(&route.waste_type) && !booked.contains(&route.rid))
            .collect())
    }

    fn reject(&self, reason: TripRejectReason) -> TripDecision {
        debug!(%reason, "出车未排");
        TripDecision::Rejected(reason)
    }
}
