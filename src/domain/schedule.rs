// ==========================================
// 垃圾清运车队调度 - 排班实体与时间窗
// ==========================================
// 对齐: schema.sql trip / maintenance 表
// 红线: 同一线路同一自然日至多一趟
// ==========================================

use crate::domain::types::{EmployeeId, FacilityId, RouteId, TruckId};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Trip - 出车记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub rid: RouteId,
    pub tid: TruckId,
    pub ttime: NaiveDateTime,
    pub volume: Option<f64>, // 收运前未知
    pub eid1: EmployeeId,
    pub eid2: EmployeeId,
    pub fid: FacilityId,
}

impl Trip {
    /// 新排出车（volume 为空）
    pub fn planned(
        rid: RouteId,
        tid: TruckId,
        ttime: NaiveDateTime,
        drivers: (EmployeeId, EmployeeId),
        fid: FacilityId,
    ) -> Self {
        Self {
            rid,
            tid,
            ttime,
            volume: None,
            eid1: drivers.0,
            eid2: drivers.1,
            fid,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.ttime.date()
    }
}

// ==========================================
// Maintenance - 维保记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maintenance {
    pub tid: TruckId,
    pub eid: EmployeeId,
    pub mdate: NaiveDate,
}

// ==========================================
// TimeWindow - 占用时间窗 [start, end)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// 结束时间超出 NaiveDateTime 可表示范围时返回 None
    pub fn from_start(start: NaiveDateTime, duration: Duration) -> Option<Self> {
        let end = start.checked_add_signed(duration)?;
        Some(Self { start, end })
    }

    /// 前后各扩 buffer（越界时贴边到 MIN / MAX）
    pub fn buffered(&self, buffer: Duration) -> Self {
        Self {
            start: self
                .start
                .checked_sub_signed(buffer)
                .unwrap_or(NaiveDateTime::MIN),
            end: self.end.checked_add_signed(buffer).unwrap_or(NaiveDateTime::MAX),
        }
    }

    /// 相交判定（端点相接不算相交）
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// 是否落在 [start, end) 内开工、且不晚于 end 收工（同一自然日）
    pub fn within_working_hours(&self, hours: &WorkingHours) -> bool {
        let day = self.start.date();
        let open = day.and_time(hours.start);
        let close = day.and_time(hours.end);
        self.start >= open && self.start < close && self.end <= close
    }
}

// ==========================================
// WorkingHours - 作业时段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WorkingHours {
    pub fn opening(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.start)
    }

    pub fn closing(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn hours() -> WorkingHours {
        WorkingHours {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_overlaps_touching_windows() {
        let a = TimeWindow::new(at(8, 0), at(10, 0));
        let b = TimeWindow::new(at(10, 0), at(11, 0));
        assert!(!a.overlaps(&b));
        assert!(a.buffered(Duration::minutes(30)).overlaps(&b));
    }

    #[test]
    fn test_working_hours_boundaries() {
        let h = hours();
        assert!(TimeWindow::new(at(8, 0), at(16, 0)).within_working_hours(&h));
        assert!(!TimeWindow::new(at(7, 59), at(9, 0)).within_working_hours(&h));
        assert!(!TimeWindow::new(at(15, 0), at(16, 30)).within_working_hours(&h));
        assert!(!TimeWindow::new(at(16, 0), at(16, 0)).within_working_hours(&h));
    }

    #[test]
    fn test_from_start_and_buffer_never_overflow() {
        assert_eq!(TimeWindow::from_start(at(8, 0), Duration::MAX), None);
        assert_eq!(
            TimeWindow::from_start(at(8, 0), Duration::hours(2)),
            Some(TimeWindow::new(at(8, 0), at(10, 0)))
        );

        let edge = TimeWindow::new(NaiveDateTime::MIN, NaiveDateTime::MAX);
        assert_eq!(edge.buffered(Duration::minutes(30)), edge);
    }
}
