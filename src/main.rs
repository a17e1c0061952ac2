// ==========================================
// 垃圾清运车队调度 - 命令行入口
// ==========================================
// 用法:
//   waste-wrangler [--db <path>] <command> [args...]
//
// 命令:
//   init
//   schedule-trip <rid> <YYYY-MM-DD HH:MM>
//   schedule-trips <tid> <YYYY-MM-DD>
//   update-technicians <file>
//   workmate-sphere <eid>
//   schedule-maintenance <YYYY-MM-DD>
//   reroute-waste <fid> <YYYY-MM-DD>
// ==========================================

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use waste_wrangler::app::{get_default_db_path, AppState};
use waste_wrangler::logging;

const USAGE: &str = "用法: waste-wrangler [--db <path>] <init|schedule-trip|schedule-trips|update-technicians|workmate-sphere|schedule-maintenance|reroute-waste> [args...]";

fn main() -> Result<()> {
    logging::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let db_path = match args.iter().position(|a| a == "--db") {
        Some(idx) if idx + 1 < args.len() => {
            let path = args.remove(idx + 1);
            args.remove(idx);
            path
        }
        _ => get_default_db_path(),
    };

    let command = match args.first() {
        Some(c) => c.clone(),
        None => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    tracing::info!("{} v{}", waste_wrangler::APP_NAME, waste_wrangler::VERSION);
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path.clone())
        .with_context(|| format!("打开数据库失败: {}", db_path))?;
    let api = &state.wrangler;

    match command.as_str() {
        "init" => println!("ok"),
        "schedule-trip" => {
            let rid = parse_id(arg(&args, 1)?)?;
            let time = parse_time(arg(&args, 2)?)?;
            println!("{}", api.schedule_trip(rid, time));
        }
        "schedule-trips" => {
            let tid = parse_id(arg(&args, 1)?)?;
            let date = parse_date(arg(&args, 2)?)?;
            println!("{}", api.schedule_trips(tid, date));
        }
        "update-technicians" => {
            let path = arg(&args, 1)?;
            println!("{}", api.update_technicians_from_file(Path::new(path)));
        }
        "workmate-sphere" => {
            let eid = parse_id(arg(&args, 1)?)?;
            let mut sphere: Vec<i64> = api.workmate_sphere(eid).into_iter().collect();
            sphere.sort_unstable();
            println!("{:?}", sphere);
        }
        "schedule-maintenance" => {
            let date = parse_date(arg(&args, 1)?)?;
            println!("{}", api.schedule_maintenance(date));
        }
        "reroute-waste" => {
            let fid = parse_id(arg(&args, 1)?)?;
            let date = parse_date(arg(&args, 2)?)?;
            println!("{}", api.reroute_waste(fid, date));
        }
        other => {
            eprintln!("未知命令: {}\n{}", other, USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

fn arg(args: &[String], idx: usize) -> Result<&str> {
    args.get(idx)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow!("缺少参数 #{}\n{}", idx, USAGE))
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .with_context(|| format!("无效的编号: {:?}", raw))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("无效的日期（期望 YYYY-MM-DD）: {:?}", raw))
}

fn parse_time(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M")
        .with_context(|| format!("无效的时间（期望 YYYY-MM-DD HH:MM）: {:?}", raw))
}
