// ==========================================
// 垃圾清运车队调度 - 出车记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 时间: ttime 以 'YYYY-MM-DD HH:MM:SS' 存储，按 date(ttime) 取自然日
// ==========================================

use crate::domain::schedule::Trip;
use crate::domain::types::{EmployeeId, FacilityId, RouteId, TruckId};
use crate::repository::error::RepositoryResult;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::collections::HashSet;

/// 已排出车的开始时间 + 线路长度（用于推算占用时段）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripSlot {
    pub start: NaiveDateTime,
    pub route_length: f64,
}

// ==========================================
// TripRepository - 出车记录仓储
// ==========================================
pub struct TripRepository<'a> {
    conn: &'a Connection,
}

impl<'a> TripRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, trip: &Trip) -> RepositoryResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO trip (rid, tid, ttime, volume, eid1, eid2, fid)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                trip.rid,
                trip.tid,
                trip.ttime,
                trip.volume,
                trip.eid1,
                trip.eid2,
                trip.fid,
            ],
        )?;
        Ok(())
    }

    /// 线路在该自然日是否已有出车
    pub fn exists_for_route_on(&self, rid: RouteId, date: NaiveDate) -> RepositoryResult<bool> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM trip WHERE rid = ?1 AND date(ttime) = ?2 LIMIT 1",
                params![rid, date],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    /// 该自然日已有出车的线路集合
    pub fn routes_with_trip_on(&self, date: NaiveDate) -> RepositoryResult<HashSet<RouteId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT rid FROM trip WHERE date(ttime) = ?1")?;
        let rids = stmt
            .query_map(params![date], |row| row.get::<_, RouteId>(0))?
            .collect::<SqliteResult<HashSet<_>>>()?;
        Ok(rids)
    }

    /// 该自然日已被排班的员工（eid1 ∪ eid2）
    pub fn employees_booked_on(&self, date: NaiveDate) -> RepositoryResult<HashSet<EmployeeId>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT eid1 FROM trip WHERE date(ttime) = ?1
            UNION
            SELECT eid2 FROM trip WHERE date(ttime) = ?1
            "#,
        )?;
        let eids = stmt
            .query_map(params![date], |row| row.get::<_, EmployeeId>(0))?
            .collect::<SqliteResult<HashSet<_>>>()?;
        Ok(eids)
    }

    pub fn truck_has_trip_on(&self, tid: TruckId, date: NaiveDate) -> RepositoryResult<bool> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM trip WHERE tid = ?1 AND date(ttime) = ?2 LIMIT 1",
                params![tid, date],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    /// 车辆在 [from, to] 自然日内的出车时段
    pub fn truck_slots_between(
        &self,
        tid: TruckId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<TripSlot>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT t.ttime, r.length
            FROM trip t
            JOIN route r ON r.rid = t.rid
            WHERE t.tid = ?1 AND date(t.ttime) BETWEEN ?2 AND ?3
            ORDER BY t.ttime ASC
            "#,
        )?;
        let slots = stmt
            .query_map(params![tid, from, to], map_slot)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(slots)
    }

    /// 员工（作为 eid1 或 eid2）在 [from, to] 自然日内的出车时段
    pub fn employee_slots_between(
        &self,
        eid: EmployeeId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<TripSlot>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT t.ttime, r.length
            FROM trip t
            JOIN route r ON r.rid = t.rid
            WHERE (t.eid1 = ?1 OR t.eid2 = ?1) AND date(t.ttime) BETWEEN ?2 AND ?3
            ORDER BY t.ttime ASC
            "#,
        )?;
        let slots = stmt
            .query_map(params![eid, from, to], map_slot)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(slots)
    }

    /// 该自然日送往指定设施的出车
    pub fn find_by_facility_on(
        &self,
        fid: FacilityId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Trip>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT rid, tid, ttime, volume, eid1, eid2, fid
            FROM trip
            WHERE fid = ?1 AND date(ttime) = ?2
            ORDER BY ttime ASC, rid ASC
            "#,
        )?;
        let trips = stmt
            .query_map(params![fid, date], map_trip)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(trips)
    }

    pub fn find_by_route_on(&self, rid: RouteId, date: NaiveDate) -> RepositoryResult<Vec<Trip>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT rid, tid, ttime, volume, eid1, eid2, fid
            FROM trip
            WHERE rid = ?1 AND date(ttime) = ?2
            ORDER BY ttime ASC
            "#,
        )?;
        let trips = stmt
            .query_map(params![rid, date], map_trip)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(trips)
    }

    pub fn find_by_truck_on(&self, tid: TruckId, date: NaiveDate) -> RepositoryResult<Vec<Trip>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT rid, tid, ttime, volume, eid1, eid2, fid
            FROM trip
            WHERE tid = ?1 AND date(ttime) = ?2
            ORDER BY ttime ASC
            "#,
        )?;
        let trips = stmt
            .query_map(params![tid, date], map_trip)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(trips)
    }

    /// 改派设施（按主键 rid + ttime）
    pub fn update_facility(
        &self,
        rid: RouteId,
        ttime: NaiveDateTime,
        fid: FacilityId,
    ) -> RepositoryResult<usize> {
        let affected = self.conn.execute(
            "UPDATE trip SET fid = ?1 WHERE rid = ?2 AND datetime(ttime) = datetime(?3)",
            params![fid, rid, ttime],
        )?;
        Ok(affected)
    }

    /// 全部出车的司机搭档 (eid1, eid2)
    pub fn list_driver_pairs(&self) -> RepositoryResult<Vec<(EmployeeId, EmployeeId)>> {
        let mut stmt = self.conn.prepare("SELECT DISTINCT eid1, eid2 FROM trip")?;
        let pairs = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(pairs)
    }
}

fn map_slot(row: &Row<'_>) -> SqliteResult<TripSlot> {
    Ok(TripSlot {
        start: row.get(0)?,
        route_length: row.get(1)?,
    })
}

fn map_trip(row: &Row<'_>) -> SqliteResult<Trip> {
    Ok(Trip {
        rid: row.get(0)?,
        tid: row.get(1)?,
        ttime: row.get(2)?,
        volume: row.get(3)?,
        eid1: row.get(4)?,
        eid2: row.get(5)?,
        fid: row.get(6)?,
    })
}
