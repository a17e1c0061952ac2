// ==========================================
// 垃圾清运车队调度 - 改派引擎
// ==========================================
// 设施停收时，将当日送往该设施的出车改派到
// 接收同一垃圾类型的其它设施（最小 fid）；无替代设施的出车保持不变
// ==========================================

use crate::domain::fleet::Facility;
use crate::domain::schedule::Trip;
use crate::domain::types::FacilityId;
use crate::engine::selector::{order, CandidateSelector};
use crate::repository::{FleetRepository, RepositoryResult, TripRepository};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// 单趟改派记录
#[derive(Debug, Clone, PartialEq)]
pub struct RerouteChange {
    pub trip: Trip,
    pub to_fid: FacilityId,
}

// ==========================================
// RerouteEngine - 改派引擎
// ==========================================
pub struct RerouteEngine<'a> {
    conn: &'a Connection,
}

impl<'a> RerouteEngine<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// 改派 date 当日送往 fid 的出车
    ///
    /// 允许部分成功：返回值仅包含实际改派的出车
    #[instrument(skip(self))]
    pub fn reroute_waste(&self, fid: FacilityId, date: NaiveDate) -> RepositoryResult<Vec<RerouteChange>> {
        let fleet = FleetRepository::new(self.conn);
        let trips = TripRepository::new(self.conn);

        // 垃圾类型 → 替代设施（同一类型只查一次）
        let mut alternates: HashMap<String, Option<Facility>> = HashMap::new();
        let mut changes = Vec::new();

        for trip in trips.find_by_facility_on(fid, date)? {
            let route = match fleet.find_route(trip.rid)? {
                Some(route) => route,
                None => continue,
            };

            let alternate = match alternates.get(&route.waste_type) {
                Some(found) => found.clone(),
                None => {
                    let pool = fleet.find_facilities_accepting(&route.waste_type)?;
                    let found =
                        CandidateSelector::select_first(pool, order::facility_by_id, |f| f.fid != fid);
                    alternates.insert(route.waste_type.clone(), found.clone());
                    found
                }
            };

            match alternate {
                Some(facility) => {
                    trips.update_facility(trip.rid, trip.ttime, facility.fid)?;
                    debug!(rid = trip.rid, ttime = %trip.ttime, to_fid = facility.fid, "出车已改派");
                    changes.push(RerouteChange {
                        trip,
                        to_fid: facility.fid,
                    });
                }
                None => {
                    debug!(rid = trip.rid, waste_type = %route.waste_type, "无替代设施，保持不变");
                }
            }
        }

        info!(count = changes.len(), "改派完成");
        Ok(changes)
    }
}
