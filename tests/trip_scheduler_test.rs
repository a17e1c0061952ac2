// ==========================================
// 单趟出车排班测试
// ==========================================
// 职责: 验证 schedule_trip 的作业时段、同日唯一、
//       车辆/司机/设施选择顺序与缓冲冲突
// ==========================================


#[cfg(test)]
mod trip_scheduler_test {
    use chrono::Duration;
    use waste_wrangler::engine::{TripDecision, TripRejectReason};
    use waste_wrangler::repository::TripRepository;

    use crate::test_helpers::*;

    fn rejected(reason: TripRejectReason) -> TripDecision {
        TripDecision::Rejected(reason)
    }

    // ==========================================
    // 选择顺序
    // ==========================================

    #[test]
    fn test_schedule_trip_picks_largest_truck_senior_pair_lowest_facility() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        let api = open_api(&db_path);

        let decision = api.try_schedule_trip(1, at(8, 0)).unwrap();
        let trip = match decision {
            TripDecision::Scheduled(trip) => trip,
            other => panic!("应排成功: {:?}", other),
        };

        // T2/T3 载重同为 20，取 tid 小者
        assert_eq!(trip.tid, 2);
        // 资历: E3(2008) → E5(2010)；E5 可驾驶 hauler
        assert_eq!((trip.eid1, trip.eid2), (3, 5));
        assert_eq!(trip.fid, 2);
        assert_eq!(trip.volume, None);
        assert_eq!(trip.ttime, at(8, 0));

        assert_eq!(count_rows(&db_path, "trip"), 1);
    }

    #[test]
    fn test_busy_resources_fall_through_to_next_candidates() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        let api = open_api(&db_path);

        assert!(api.schedule_trip(1, at(8, 0)));

        // T2 占用 07:30-10:30；E3/E5 同样被占用
        let trip = match api.try_schedule_trip(2, at(10, 15)).unwrap() {
            TripDecision::Scheduled(trip) => trip,
            other => panic!("应排成功: {:?}", other),
        };
        assert_eq!(trip.tid, 3);
        // 剩余 E4(2012) + E6(2014)，E6 可驾驶 compactor
        assert_eq!((trip.eid1, trip.eid2), (4, 6));
    }

    #[test]
    fn test_buffer_blocks_truck_until_half_hour_after_trip_end() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        let api = open_api(&db_path);

        assert!(api.schedule_trip(1, at(8, 0)));

        // 可承运 recycling 的只有 T2；10:00 结束 + 30 分钟缓冲
        assert_eq!(
            api.try_schedule_trip(3, at(10, 29)).unwrap(),
            rejected(TripRejectReason::NoTruckAvailable)
        );
        assert_eq!(count_rows(&db_path, "trip"), 1);

        let trip = match api.try_schedule_trip(3, at(10, 30)).unwrap() {
            TripDecision::Scheduled(trip) => trip,
            other => panic!("缓冲结束后应可排: {:?}", other),
        };
        assert_eq!(trip.tid, 2);
        assert_eq!(trip.fid, 1);
        assert_eq!((trip.eid1, trip.eid2), (3, 5));
    }

    #[test]
    fn test_no_driver_pair_rejects_without_insert() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        open_conn(&db_path)
            .execute("DELETE FROM driver WHERE eid IN (4, 6)", [])
            .unwrap();
        let api = open_api(&db_path);

        assert!(api.schedule_trip(1, at(8, 0)));
        assert_eq!(
            api.try_schedule_trip(2, at(8, 0)).unwrap(),
            rejected(TripRejectReason::NoDriverPairAvailable)
        );
        assert_eq!(count_rows(&db_path, "trip"), 1);
    }

    #[test]
    fn test_pair_needs_at_least_one_qualified_driver() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        // 只剩两名 compactor 司机，R3 只能由 hauler 承运
        open_conn(&db_path)
            .execute("DELETE FROM driver WHERE truck_type = 'hauler'", [])
            .unwrap();
        let api = open_api(&db_path);

        assert_eq!(
            api.try_schedule_trip(3, at(9, 0)).unwrap(),
            rejected(TripRejectReason::NoDriverPairAvailable)
        );
        assert_eq!(count_rows(&db_path, "trip"), 0);
    }

    #[test]
    fn test_truck_with_maintenance_that_day_is_skipped() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        {
            let conn = open_conn(&db_path);
            conn.execute("INSERT INTO technician (eid, truck_type) VALUES (1, 'hauler')", [])
                .unwrap();
            insert_maintenance(&conn, 2, 1, day());
        }
        let api = open_api(&db_path);

        let trip = match api.try_schedule_trip(1, at(8, 0)).unwrap() {
            TripDecision::Scheduled(trip) => trip,
            other => panic!("应排成功: {:?}", other),
        };
        assert_eq!(trip.tid, 3);
    }

    // ==========================================
    // 作业时段
    // ==========================================

    #[test]
    fn test_working_hours_window() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        let api = open_api(&db_path);

        // R2: 20km → 4 小时
        assert_eq!(
            api.try_schedule_trip(2, at(7, 59)).unwrap(),
            rejected(TripRejectReason::OutsideWorkingHours)
        );
        assert_eq!(
            api.try_schedule_trip(2, at(12, 1)).unwrap(),
            rejected(TripRejectReason::OutsideWorkingHours)
        );
        assert_eq!(
            api.try_schedule_trip(2, at(16, 0)).unwrap(),
            rejected(TripRejectReason::OutsideWorkingHours)
        );
        assert_eq!(count_rows(&db_path, "trip"), 0);

        // 恰好 16:00 结束
        assert!(api.schedule_trip(2, at(12, 0)));
    }

    #[test]
    fn test_scheduled_trips_stay_inside_working_hours() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        let api = open_api(&db_path);

        assert!(api.schedule_trip(1, at(8, 0)));
        assert!(api.schedule_trip(2, at(10, 30)));
        assert!(api.schedule_trip(3, at(15, 0)));

        let opening = at(8, 0);
        let closing = at(16, 0);
        for (rid, hours) in [(1, 2), (2, 4), (3, 1)] {
            let conn = open_conn(&db_path);
            let trips = TripRepository::new(&conn).find_by_route_on(rid, day()).unwrap();
            assert_eq!(trips.len(), 1);
            let start = trips[0].ttime;
            assert!(start >= opening && start < closing);
            assert!(start + Duration::hours(hours) <= closing);
        }
    }

    // ==========================================
    // 同日唯一 / 无效输入
    // ==========================================

    #[test]
    fn test_same_route_same_day_only_once() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        let api = open_api(&db_path);

        assert!(api.schedule_trip(1, at(8, 0)));
        assert_eq!(
            api.try_schedule_trip(1, at(13, 0)).unwrap(),
            rejected(TripRejectReason::RouteAlreadyScheduled)
        );
        assert!(!api.schedule_trip(1, at(13, 0)));

        let conn = open_conn(&db_path);
        assert_eq!(TripRepository::new(&conn).find_by_route_on(1, day()).unwrap().len(), 1);

        // 次日不受影响
        let next_day = date(2023, 5, 3).and_hms_opt(8, 0, 0).unwrap();
        assert!(api.schedule_trip(1, next_day));
    }

    #[test]
    fn test_unknown_route_rejected() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        let api = open_api(&db_path);

        assert_eq!(
            api.try_schedule_trip(99, at(9, 0)).unwrap(),
            rejected(TripRejectReason::UnknownRoute)
        );
        assert!(!api.schedule_trip(99, at(9, 0)));
        assert_eq!(count_rows(&db_path, "trip"), 0);
    }

    #[test]
    fn test_no_facility_for_waste_type_rejects_without_insert() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        open_conn(&db_path)
            .execute_batch(
                r#"
                INSERT INTO waste_type (waste_type) VALUES ('metal');
                INSERT INTO truck_type (truck_type, waste_type) VALUES ('hauler', 'metal');
                INSERT INTO route (rid, waste_type, length) VALUES (4, 'metal', 5.0);
                "#,
            )
            .unwrap();
        let api = open_api(&db_path);

        let before = snapshot_trips(&db_path);
        assert_eq!(
            api.try_schedule_trip(4, at(9, 0)).unwrap(),
            rejected(TripRejectReason::NoFacilityAvailable)
        );
        assert!(!api.schedule_trip(4, at(9, 0)));
        assert_eq!(snapshot_trips(&db_path), before);
    }

    // ==========================================
    // 异常线路长度
    // ==========================================

    #[test]
    fn test_infinite_route_length_rejected_and_api_stays_usable() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        // SQLite 将 1e999 存为 +Inf，满足 length > 0
        open_conn(&db_path)
            .execute_batch(
                "INSERT INTO route (rid, waste_type, length) VALUES (99, 'organic', 1e999), (98, 'organic', 1e300);",
            )
            .unwrap();
        let api = open_api(&db_path);

        assert_eq!(
            api.try_schedule_trip(99, at(9, 0)).unwrap(),
            rejected(TripRejectReason::InvalidRouteLength)
        );
        assert!(!api.schedule_trip(99, at(9, 0)));
        assert!(!api.schedule_trip(98, at(9, 0)));
        assert_eq!(count_rows(&db_path, "trip"), 0);

        // 同一 API 实例之后的正常调用不受影响
        assert!(api.schedule_trip(1, at(8, 0)));
    }

    #[test]
    fn test_existing_trip_with_unbounded_length_blocks_truck() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        {
            let conn = open_conn(&db_path);
            conn.execute(
                "INSERT INTO route (rid, waste_type, length) VALUES (99, 'organic', 1e999)",
                [],
            )
            .unwrap();
            insert_trip(&conn, 99, 2, at(8, 0), (4, 6), 2);
        }
        let api = open_api(&db_path);

        let trip = match api.try_schedule_trip(1, at(14, 0)).unwrap() {
            TripDecision::Scheduled(trip) => trip,
            other => panic!("应排成功: {:?}", other),
        };
        assert_eq!(trip.tid, 3);
    }

    #[test]
    fn test_store_error_returns_false() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        let api = open_api(&db_path);
        open_conn(&db_path).execute("DROP TABLE facility", []).unwrap();

        assert!(!api.schedule_trip(1, at(9, 0)));
        assert!(api.try_schedule_trip(1, at(9, 0)).is_err());
        assert_eq!(count_rows(&db_path, "trip"), 0);
    }
}
