// ==========================================
// 垃圾清运车队调度 - 员工实体
// ==========================================
// 对齐: schema.sql employee / driver / technician 表
// 资历: hire_date 越早越资深
// ==========================================

use crate::domain::types::EmployeeId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Employee - 员工
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub eid: EmployeeId,
    pub name: String,
    pub hire_date: NaiveDate,
}

// ==========================================
// DriverCandidate - 司机候选
// ==========================================
// 员工 + 其可驾驶车型集合，供司机搭档选择使用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverCandidate {
    pub employee: Employee,
    pub truck_types: Vec<String>,
}

impl DriverCandidate {
    pub fn eid(&self) -> EmployeeId {
        self.employee.eid
    }

    pub fn can_drive(&self, truck_type: &str) -> bool {
        self.truck_types.iter().any(|t| t == truck_type)
    }
}

// ==========================================
// QualificationRecord - 技师资质记录
// ==========================================
// 来源: 外部资质文件（成对行格式）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationRecord {
    pub first_name: String,
    pub last_name: String,
    pub truck_type: String,
}

impl QualificationRecord {
    pub fn new(first_name: &str, last_name: &str, truck_type: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            truck_type: truck_type.to_string(),
        }
    }

    /// 员工表中的全名口径: "<名> <姓>"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
