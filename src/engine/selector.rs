// ==========================================
// 垃圾清运车队调度 - 候选选择器
// ==========================================
// 职责: "排序 + 过滤 + 取首个" 的通用贪心选择
// 红线: 纯函数、无 I/O；可用性等外部判定通过闭包注入
// ==========================================

use std::cmp::Ordering;

// ==========================================
// CandidateSelector - 候选选择器
// ==========================================
pub struct CandidateSelector;

impl CandidateSelector {
    /// 按 compare 排序后，返回第一个满足 accept 的候选
    ///
    /// # 返回
    /// - Some(candidate): 排名最高的合格候选
    /// - None: 过滤后为空（不是错误）
    pub fn select_first<T, C, P>(mut candidates: Vec<T>, compare: C, mut accept: P) -> Option<T>
    where
        C: FnMut(&T, &T) -> Ordering,
        P: FnMut(&T) -> bool,
    {
        candidates.sort_by(compare);
        candidates.into_iter().find(|c| accept(c))
    }

    /// select_first 的可失败版本（判定需要查库时使用）
    ///
    /// 判定一旦返回 Err 立即中止并上抛
    pub fn try_select_first<T, E, C, P>(
        mut candidates: Vec<T>,
        compare: C,
        mut accept: P,
    ) -> Result<Option<T>, E>
    where
        C: FnMut(&T, &T) -> Ordering,
        P: FnMut(&T) -> Result<bool, E>,
    {
        candidates.sort_by(compare);
        for candidate in candidates {
            if accept(&candidate)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// 搭档选择：排序后按 (i, j), i < j 的字典序枚举两两组合，返回首个满足 accept 的组合
    ///
    /// 返回的第一位排名不低于第二位；同一候选不会与自身组合
    pub fn select_pair<T, C, P>(mut candidates: Vec<T>, compare: C, mut accept: P) -> Option<(T, T)>
    where
        T: Clone,
        C: FnMut(&T, &T) -> Ordering,
        P: FnMut(&T, &T) -> bool,
    {
        candidates.sort_by(compare);
        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                if accept(&candidates[i], &candidates[j]) {
                    return Some((candidates[i].clone(), candidates[j].clone()));
                }
            }
        }
        None
    }
}

// ==========================================
// 排序规则（tie-break 链）
// ==========================================
pub mod order {
    use crate::domain::fleet::{Facility, Truck};
    use crate::domain::staff::DriverCandidate;
    use crate::domain::types::EmployeeId;
    use std::cmp::Ordering;

    /// 车辆: 载重降序，tid 升序
    pub fn truck_by_capacity_then_id(a: &Truck, b: &Truck) -> Ordering {
        b.capacity
            .total_cmp(&a.capacity)
            .then_with(|| a.tid.cmp(&b.tid))
    }

    /// 司机: 入职日期升序（资深优先），eid 升序
    pub fn driver_by_seniority_then_id(a: &DriverCandidate, b: &DriverCandidate) -> Ordering {
        a.employee
            .hire_date
            .cmp(&b.employee.hire_date)
            .then_with(|| a.eid().cmp(&b.eid()))
    }

    /// 设施: fid 升序
    pub fn facility_by_id(a: &Facility, b: &Facility) -> Ordering {
        a.fid.cmp(&b.fid)
    }

    /// 技师: eid 升序
    pub fn employee_by_id(a: &EmployeeId, b: &EmployeeId) -> Ordering {
        a.cmp(b)
    }
}
