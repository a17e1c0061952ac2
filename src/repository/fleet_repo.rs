// ==========================================
// 垃圾清运车队调度 - 车队/线路/设施仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 借用调用方连接（可为事务），读写与事务边界由引擎决定
// ==========================================

use crate::domain::fleet::{Facility, Route, Truck};
use crate::domain::types::{RouteId, TruckId};
use crate::repository::error::RepositoryResult;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};

// ==========================================
// FleetRepository - 车队主数据仓储
// ==========================================
pub struct FleetRepository<'a> {
    conn: &'a Connection,
}

impl<'a> FleetRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // ===== 线路 =====

    pub fn find_route(&self, rid: RouteId) -> RepositoryResult<Option<Route>> {
        let route = self
            .conn
            .query_row(
                "SELECT rid, waste_type, length FROM route WHERE rid = ?1",
                params![rid],
                map_route,
            )
            .optional()?;
        Ok(route)
    }

    /// 全部线路，按 rid 升序
    pub fn list_routes(&self) -> RepositoryResult<Vec<Route>> {
        let mut stmt = self
            .conn
            .prepare("SELECT rid, waste_type, length FROM route ORDER BY rid ASC")?;
        let routes = stmt
            .query_map([], map_route)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(routes)
    }

    // ===== 车辆 =====

    pub fn find_truck(&self, tid: TruckId) -> RepositoryResult<Option<Truck>> {
        let truck = self
            .conn
            .query_row(
                "SELECT tid, truck_type, capacity FROM truck WHERE tid = ?1",
                params![tid],
                map_truck,
            )
            .optional()?;
        Ok(truck)
    }

    /// 可承运指定垃圾类型的车辆（未排序）
    pub fn find_trucks_carrying(&self, waste_type: &str) -> RepositoryResult<Vec<Truck>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT DISTINCT t.tid, t.truck_type, t.capacity
            FROM truck t
            JOIN truck_type tt ON tt.truck_type = t.truck_type
            WHERE tt.waste_type = ?1
            "#,
        )?;
        let trucks = stmt
            .query_map(params![waste_type], map_truck)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(trucks)
    }

    /// 全部车辆，按 tid 升序
    pub fn list_trucks(&self) -> RepositoryResult<Vec<Truck>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tid, truck_type, capacity FROM truck ORDER BY tid ASC")?;
        let trucks = stmt
            .query_map([], map_truck)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(trucks)
    }

    // ===== 车型 =====

    /// 车型可承运的垃圾类型
    pub fn waste_types_for_truck_type(&self, truck_type: &str) -> RepositoryResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT waste_type FROM truck_type WHERE truck_type = ?1 ORDER BY waste_type ASC",
        )?;
        let types = stmt
            .query_map(params![truck_type], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(types)
    }

    pub fn truck_type_exists(&self, truck_type: &str) -> RepositoryResult<bool> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM truck_type WHERE truck_type = ?1 LIMIT 1",
                params![truck_type],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    // ===== 设施 =====

    /// 接收指定垃圾类型的设施（未排序）
    pub fn find_facilities_accepting(&self, waste_type: &str) -> RepositoryResult<Vec<Facility>> {
        let mut stmt = self
            .conn
            .prepare("SELECT fid, address, waste_type FROM facility WHERE waste_type = ?1")?;
        let facilities = stmt
            .query_map(params![waste_type], map_facility)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(facilities)
    }
}

fn map_route(row: &Row<'_>) -> SqliteResult<Route> {
    Ok(Route {
        rid: row.get(0)?,
        waste_type: row.get(1)?,
        length: row.get(2)?,
    })
}

fn map_truck(row: &Row<'_>) -> SqliteResult<Truck> {
    Ok(Truck {
        tid: row.get(0)?,
        truck_type: row.get(1)?,
        capacity: row.get(2)?,
    })
}

fn map_facility(row: &Row<'_>) -> SqliteResult<Facility> {
    Ok(Facility {
        fid: row.get(0)?,
        address: row.get(1)?,
        waste_type: row.get(2)?,
    })
}
