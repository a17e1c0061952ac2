// ==========================================
// 垃圾清运车队调度 - 同事圈
// ==========================================
// 无向图: 两名员工同车出过一趟即连一条边
// 同事圈 = 从某员工出发的连通分量（不含自身）
// ==========================================

use crate::domain::types::EmployeeId;
use crate::repository::{RepositoryResult, TripRepository};
use rusqlite::Connection;
use std::collections::{HashMap, HashSet, VecDeque};

// ==========================================
// WorkmateGraph - 同车关系图
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct WorkmateGraph {
    adjacency: HashMap<EmployeeId, Vec<EmployeeId>>,
}

impl WorkmateGraph {
    /// 从 (eid1, eid2) 搭档列表构图
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (EmployeeId, EmployeeId)>,
    {
        let mut adjacency: HashMap<EmployeeId, Vec<EmployeeId>> = HashMap::new();
        for (a, b) in pairs {
            if a == b {
                continue;
            }
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
        Self { adjacency }
    }

    /// 从出车记录物化整张图
    pub fn load(conn: &Connection) -> RepositoryResult<Self> {
        let pairs = TripRepository::new(conn).list_driver_pairs()?;
        Ok(Self::from_pairs(pairs))
    }

    /// BFS 求 eid 的同事圈（不含 eid 本人，无序）
    pub fn sphere(&self, eid: EmployeeId) -> HashSet<EmployeeId> {
        let mut visited: HashSet<EmployeeId> = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(eid);
        queue.push_back(eid);

        while let Some(current) = queue.pop_front() {
            if let Some(neighbours) = self.adjacency.get(&current) {
                for &next in neighbours {
                    if visited.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        visited.remove(&eid);
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_is_transitive() {
        let graph = WorkmateGraph::from_pairs(vec![(1, 2), (2, 3), (4, 5)]);
        assert_eq!(graph.sphere(1), HashSet::from([2, 3]));
        assert_eq!(graph.sphere(3), HashSet::from([1, 2]));
        assert_eq!(graph.sphere(5), HashSet::from([4]));
    }

    #[test]
    fn test_unknown_employee_has_empty_sphere() {
        let graph = WorkmateGraph::from_pairs(vec![(1, 2)]);
        assert!(graph.sphere(2023).is_empty());
    }

    #[test]
    fn test_cycle_excludes_self() {
        let graph = WorkmateGraph::from_pairs(vec![(1, 2), (2, 3), (3, 1)]);
        let sphere = graph.sphere(1);
        assert!(!sphere.contains(&1));
        assert_eq!(sphere.len(), 2);
    }
}
