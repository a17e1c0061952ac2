// ==========================================
// 批量出车排班测试
// ==========================================
// 职责: 验证 schedule_trips 的首次适配、整批同一司机搭档、
//       时钟推进、作业时段截止与全有或全无
// ==========================================


#[cfg(test)]
mod batch_trip_scheduler_test {
    use chrono::Duration;
    use waste_wrangler::config::SchedulingConfig;
    use waste_wrangler::domain::fleet::travel_time;
    use waste_wrangler::domain::TimeWindow;
    use waste_wrangler::repository::TripRepository;

    use crate::test_helpers::*;

    #[test]
    fn test_two_routes_fill_morning_then_midday() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        let api = open_api(&db_path);

        let trips = api.try_schedule_trips(1, day()).unwrap();
        assert_eq!(trips.len(), 2);

        // R1: 10km → 2h；R2 从 08:00 + 2h + 30min 开始
        assert_eq!((trips[0].rid, trips[0].ttime), (1, at(8, 0)));
        assert_eq!((trips[1].rid, trips[1].ttime), (2, at(10, 30)));
        for trip in &trips {
            assert_eq!(trip.tid, 1);
            assert_eq!(trip.fid, 2);
            assert_eq!(trip.volume, None);
        }

        assert_eq!(count_rows(&db_path, "trip"), 2);
    }

    #[test]
    fn test_driver_pair_fixed_for_whole_batch() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        let api = open_api(&db_path);

        let trips = api.try_schedule_trips(1, day()).unwrap();
        assert!(!trips.is_empty());
        for trip in &trips {
            assert_eq!((trip.eid1, trip.eid2), (3, 5));
        }
    }

    #[test]
    fn test_batch_never_overlaps_buffered_windows() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        open_conn(&db_path)
            .execute_batch(
                "INSERT INTO route (rid, waste_type, length) VALUES (10, 'organic', 2.5), (11, 'organic', 1.0);",
            )
            .unwrap();
        let api = open_api(&db_path);
        let config = SchedulingConfig::default();

        assert!(api.schedule_trips(1, day()) >= 2);

        let conn = open_conn(&db_path);
        let trips = TripRepository::new(&conn).find_by_truck_on(1, day()).unwrap();
        let lengths = [(1, 10.0), (2, 20.0), (10, 2.5), (11, 1.0)];
        let windows: Vec<TimeWindow> = trips
            .iter()
            .map(|trip| {
                let length = lengths.iter().find(|(rid, _)| *rid == trip.rid).unwrap().1;
                let duration = travel_time(length, config.average_speed_kmh).unwrap();
                TimeWindow::from_start(trip.ttime, duration).unwrap()
            })
            .collect();

        // 任意两趟: 一趟的实际时段不落入另一趟的缓冲占用窗口
        for (i, a) in windows.iter().enumerate() {
            for b in windows.iter().skip(i + 1) {
                assert!(!a.overlaps(&b.buffered(config.buffer())), "{:?} 与 {:?} 重叠", a, b);
            }
        }
    }

    #[test]
    fn test_stops_when_next_trip_would_end_after_closing() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        // R10 需 6 小时，15:00 开始会超出 16:00
        open_conn(&db_path)
            .execute_batch(
                "INSERT INTO route (rid, waste_type, length) VALUES (10, 'organic', 30.0), (11, 'organic', 1.0);",
            )
            .unwrap();
        let api = open_api(&db_path);

        let trips = api.try_schedule_trips(1, day()).unwrap();
        let rids: Vec<i64> = trips.iter().map(|t| t.rid).collect();
        assert_eq!(rids, vec![1, 2]);
        for trip in &trips {
            assert!(trip.ttime < at(16, 0));
        }
    }

    #[test]
    fn test_existing_truck_trip_pushes_clock() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        // T1 08:00 已有 1 小时出车（占用至 09:30），司机 E4/E6
        insert_trip(&open_conn(&db_path), 3, 1, at(8, 0), (4, 6), 1);
        let api = open_api(&db_path);

        let trips = api.try_schedule_trips(1, day()).unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!((trips[0].rid, trips[0].ttime), (1, at(9, 30)));
        assert_eq!((trips[1].rid, trips[1].ttime), (2, at(12, 0)));
        // E4/E6 当日已有出车，不参与整天搭档
        assert_eq!((trips[0].eid1, trips[0].eid2), (3, 5));
    }

    #[test]
    fn test_route_without_facility_is_skipped() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        open_conn(&db_path)
            .execute_batch(
                r#"
                INSERT INTO waste_type (waste_type) VALUES ('glass');
                INSERT INTO truck_type (truck_type, waste_type) VALUES ('compactor', 'glass');
                INSERT INTO route (rid, waste_type, length) VALUES (4, 'glass', 5.0);
                "#,
            )
            .unwrap();
        let api = open_api(&db_path);

        let trips = api.try_schedule_trips(1, day()).unwrap();
        let rids: Vec<i64> = trips.iter().map(|t| t.rid).collect();
        assert_eq!(rids, vec![1, 2]);
    }

    #[test]
    fn test_route_with_unrepresentable_length_is_skipped() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        open_conn(&db_path)
            .execute_batch(
                "INSERT INTO route (rid, waste_type, length) VALUES (0, 'organic', 1e999);",
            )
            .unwrap();
        let api = open_api(&db_path);

        let trips = api.try_schedule_trips(1, day()).unwrap();
        let starts: Vec<(i64, chrono::NaiveDateTime)> = trips.iter().map(|t| (t.rid, t.ttime)).collect();
        assert_eq!(starts, vec![(1, at(8, 0)), (2, at(10, 30))]);

        // 同一 API 实例之后的正常调用不受影响
        assert_eq!(api.schedule_trips(3, date(2023, 5, 3)), 2);
    }

    // ==========================================
    // 零结果 / 失败路径
    // ==========================================

    #[test]
    fn test_zero_result_leaves_store_unchanged() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        let api = open_api(&db_path);

        assert_eq!(api.schedule_trips(1, day()), 2);
        let before = snapshot_trips(&db_path);

        // 所有 organic 线路当日已排
        assert_eq!(api.schedule_trips(3, day()), 0);
        assert_eq!(snapshot_trips(&db_path), before);
    }

    #[test]
    fn test_unknown_truck_returns_zero() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        let api = open_api(&db_path);

        assert_eq!(api.schedule_trips(42, day()), 0);
        assert_eq!(count_rows(&db_path, "trip"), 0);
    }

    #[test]
    fn test_truck_in_maintenance_returns_zero() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        {
            let conn = open_conn(&db_path);
            conn.execute("INSERT INTO technician (eid, truck_type) VALUES (1, 'compactor')", [])
                .unwrap();
            insert_maintenance(&conn, 1, 1, day());
        }
        let api = open_api(&db_path);

        assert_eq!(api.schedule_trips(1, day()), 0);
        assert_eq!(count_rows(&db_path, "trip"), 0);
    }

    #[test]
    fn test_no_free_driver_pair_returns_zero() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        {
            let conn = open_conn(&db_path);
            insert_trip(&conn, 3, 2, at(8, 0), (3, 4), 1);
            insert_trip(&conn, 3, 2, at(9, 0) + Duration::hours(4), (5, 6), 1);
        }
        let api = open_api(&db_path);

        let before = snapshot_trips(&db_path);
        assert_eq!(api.schedule_trips(1, day()), 0);
        assert_eq!(snapshot_trips(&db_path), before);
    }

    #[test]
    fn test_store_failure_mid_batch_rolls_back_everything() {
        let (_tmp, db_path) = create_seeded_db().unwrap();
        open_conn(&db_path)
            .execute_batch(
                r#"
                CREATE TRIGGER reject_route_2 BEFORE INSERT ON trip
                WHEN NEW.rid = 2
                BEGIN
                    SELECT RAISE(ABORT, 'route 2 rejected');
                END;
                "#,
            )
            .unwrap();
        let api = open_api(&db_path);

        // R1 已写入后 R2 失败 → 整批回滚
        assert!(api.try_schedule_trips(1, day()).is_err());
        assert_eq!(api.schedule_trips(1, day()), 0);
        assert_eq!(count_rows(&db_path, "trip"), 0);
    }
}
