// ==========================================
// 垃圾清运车队调度 - 对外调度 API
// ==========================================
// 职责: 持有连接与调度参数，为每个操作开启事务并决定提交/回滚
// 红线: 对外操作不抛错；任何失败 → 回滚 + 返回空结果(false / 0 / 空集合)
// try_* 版本返回带原因的明细，供上层诊断
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, SchedulingConfig};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::schedule::{Maintenance, Trip};
use crate::domain::staff::QualificationRecord;
use crate::domain::types::{EmployeeId, FacilityId, RouteId, TruckId};
use crate::engine::{
    run_in_transaction, MaintenanceScheduler, RerouteChange, RerouteEngine, TripDecision,
    TripScheduler, WorkmateGraph,
};
use crate::importer::{
    QualificationImportReport, QualificationImporter, QualificationParser, StoreEmployeeResolver,
};
use crate::repository::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, Transaction};
use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

// ==========================================
// WasteWrangler - 调度 API
// ==========================================
pub struct WasteWrangler {
    conn: Arc<Mutex<Connection>>,
    config: SchedulingConfig,
}

impl WasteWrangler {
    /// 打开（必要时创建）数据库并加载调度参数
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建（调度参数从 config_kv 读取）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        let config = ConfigManager::from_connection(conn.clone()).load_scheduling_config()?;
        Ok(Self { conn, config })
    }

    /// 使用显式调度参数创建
    pub fn with_config(conn: Arc<Mutex<Connection>>, config: SchedulingConfig) -> Self {
        Self { conn, config }
    }

    pub fn config(&self) -> &SchedulingConfig {
        &self.config
    }

    // ==========================================
    // 出车排班
    // ==========================================

    /// 为线路 rid 在 time 排一趟车；失败返回 false 且不留写入
    pub fn schedule_trip(&self, rid: RouteId, time: NaiveDateTime) -> bool {
        match self.try_schedule_trip(rid, time) {
            Ok(decision) => decision.is_scheduled(),
            Err(e) => Self::swallow("schedule_trip", e, false),
        }
    }

    pub fn try_schedule_trip(&self, rid: RouteId, time: NaiveDateTime) -> ApiResult<TripDecision> {
        let decision = self.run(
            |tx, config| TripScheduler::new(tx, config).schedule_one_trip(rid, time),
            TripDecision::is_scheduled,
        )?;
        Ok(decision)
    }

    /// 为车辆 tid 在 date 批量排车，返回排入趟数
    pub fn schedule_trips(&self, tid: TruckId, date: NaiveDate) -> usize {
        match self.try_schedule_trips(tid, date) {
            Ok(trips) => trips.len(),
            Err(e) => Self::swallow("schedule_trips", e, 0),
        }
    }

    pub fn try_schedule_trips(&self, tid: TruckId, date: NaiveDate) -> ApiResult<Vec<Trip>> {
        let trips = self.run(
            |tx, config| TripScheduler::new(tx, config).schedule_many_trips(tid, date),
            |trips| !trips.is_empty(),
        )?;
        Ok(trips)
    }

    // ==========================================
    // 技师资质
    // ==========================================

    /// 登记技师资质，返回成功登记条数
    pub fn update_technicians(&self, records: &[QualificationRecord]) -> usize {
        match self.try_update_technicians(records) {
            Ok(report) => report.applied,
            Err(e) => Self::swallow("update_technicians", e, 0),
        }
    }

    pub fn try_update_technicians(
        &self,
        records: &[QualificationRecord],
    ) -> ApiResult<QualificationImportReport> {
        let report = self.run(
            |tx, _| QualificationImporter::new(tx, StoreEmployeeResolver::new(tx)).apply(records),
            |report| report.applied > 0,
        )?;
        Ok(report)
    }

    /// 解析资质文件内容并登记；文件格式错误时不做任何登记
    pub fn update_technicians_from_reader<R: BufRead>(&self, reader: R) -> usize {
        match QualificationParser::parse(reader) {
            Ok(records) => self.update_technicians(&records),
            Err(e) => {
                warn!(error = %e, "资质文件解析失败");
                0
            }
        }
    }

    pub fn update_technicians_from_file(&self, path: &Path) -> usize {
        match QualificationParser::parse_file(path) {
            Ok(records) => self.update_technicians(&records),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "资质文件解析失败");
                0
            }
        }
    }

    // ==========================================
    // 同事圈
    // ==========================================

    /// 员工的同事圈；员工不存在或出错时为空
    pub fn workmate_sphere(&self, eid: EmployeeId) -> HashSet<EmployeeId> {
        let result = self
            .lock()
            .and_then(|conn| WorkmateGraph::load(&conn))
            .map(|graph| graph.sphere(eid));
        match result {
            Ok(sphere) => sphere,
            Err(e) => Self::swallow("workmate_sphere", e.into(), HashSet::new()),
        }
    }

    // ==========================================
    // 维保
    // ==========================================

    /// 以 date 为基准为到期车辆排维保，返回排上的车辆数
    pub fn schedule_maintenance(&self, date: NaiveDate) -> usize {
        match self.try_schedule_maintenance(date) {
            Ok(records) => records.len(),
            Err(e) => Self::swallow("schedule_maintenance", e, 0),
        }
    }

    pub fn try_schedule_maintenance(&self, date: NaiveDate) -> ApiResult<Vec<Maintenance>> {
        let records = self.run(
            |tx, config| MaintenanceScheduler::new(tx, config).schedule_maintenance(date),
            |records| !records.is_empty(),
        )?;
        Ok(records)
    }

    // ==========================================
    // 改派
    // ==========================================

    /// 将 date 当日送往 fid 的出车改派，返回改派趟数
    pub fn reroute_waste(&self, fid: FacilityId, date: NaiveDate) -> usize {
        match self.try_reroute_waste(fid, date) {
            Ok(changes) => changes.len(),
            Err(e) => Self::swallow("reroute_waste", e, 0),
        }
    }

    pub fn try_reroute_waste(&self, fid: FacilityId, date: NaiveDate) -> ApiResult<Vec<RerouteChange>> {
        let changes = self.run(
            |tx, _| RerouteEngine::new(tx).reroute_waste(fid, date),
            |changes| !changes.is_empty(),
        )?;
        Ok(changes)
    }

    // ==========================================
    // 内部工具
    // ==========================================

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn run<T, F, C>(&self, work: F, should_commit: C) -> RepositoryResult<T>
    where
        F: FnOnce(&Transaction<'_>, &SchedulingConfig) -> RepositoryResult<T>,
        C: FnOnce(&T) -> bool,
    {
        let mut conn = self.lock()?;
        run_in_transaction(&mut conn, |tx| work(tx, &self.config), should_commit)
    }

    fn swallow<T>(operation: &str, err: ApiError, fallback: T) -> T {
        warn!(operation, error = %err, "操作失败，已回滚");
        fallback
    }
}
