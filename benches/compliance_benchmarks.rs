//! Performance benchmarks for the fleet compliance engine.
//!
//! Covers the pure rule pipeline, monthly payroll computation and one
//! compliance request through the HTTP stack.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use axum::{body::Body, http::Request};
use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use tower::ServiceExt;

use fleet_compliance_engine::api::{AppState, create_router};
use fleet_compliance_engine::compliance::evaluate_session;
use fleet_compliance_engine::config::ConfigLoader;
use fleet_compliance_engine::models::{
    ActivityType, DriverCategory, FreightRevenue, FuelExpense, PayrollPeriod, SessionStatus,
    SessionTotals, WorkEvent, WorkSession,
};
use fleet_compliance_engine::payroll::compute_payroll;
use fleet_compliance_engine::store::SqliteStore;

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/lei_13103").expect("Failed to load config")
}

fn day_start(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, 6, 0, 0).unwrap()
}

fn session(id: &str, day: u32, worked: i64) -> WorkSession {
    WorkSession {
        id: id.to_string(),
        driver_id: "drv_bench".to_string(),
        start_time: day_start(day),
        end_time: Some(day_start(day) + Duration::minutes(worked)),
        status: SessionStatus::Completed,
        category: DriverCategory::Cargo,
        totals: SessionTotals {
            total_worked_minutes: worked,
            total_driving_minutes: worked - 60,
            total_waiting_minutes: 30,
            total_rest_minutes: 30,
        },
        overtime_minutes: (worked - 480).max(0),
    }
}

/// Alternating 50 minute driving and 10 minute stops.
fn events(session_id: &str, count: usize) -> Vec<WorkEvent> {
    let start = day_start(10);
    (0..count)
        .map(|i| {
            let from = start + Duration::minutes(i as i64 * 60);
            let (activity, length) = if i % 2 == 0 {
                (ActivityType::Driving, 50)
            } else {
                (ActivityType::Rest, 10)
            };
            WorkEvent {
                id: format!("evt_{:04}", i),
                session_id: session_id.to_string(),
                activity,
                start_time: from,
                end_time: Some(from + Duration::minutes(length)),
                duration_minutes: Some(length),
            }
        })
        .collect()
}

fn bench_evaluate_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_session");
    let now = day_start(28);

    for event_count in [4, 16, 64, 256].iter() {
        let session = session("ses_bench", 10, 720);
        let events = events("ses_bench", *event_count);
        let previous_end = Some(day_start(9) + Duration::minutes(600));

        group.throughput(Throughput::Elements(*event_count as u64));
        group.bench_with_input(
            BenchmarkId::new("events", event_count),
            event_count,
            |b, _| b.iter(|| black_box(evaluate_session(&session, &events, previous_end, now))),
        );
    }

    group.finish();
}

fn bench_compute_payroll(c: &mut Criterion) {
    let config = load_config();
    let period = PayrollPeriod::new(3, 2025).unwrap();
    let compensation = config.compensation_for_period(period).unwrap();

    let sessions: Vec<WorkSession> = (1..=22)
        .map(|day| session(&format!("ses_{:02}", day), day, 540))
        .collect();
    let revenue: Vec<FreightRevenue> = sessions
        .iter()
        .map(|s| FreightRevenue {
            id: format!("rev_{}", s.id),
            session_id: s.id.clone(),
            driver_id: s.driver_id.clone(),
            amount: Decimal::new(45_000, 2),
            recorded_at: s.start_time,
        })
        .collect();
    let fuel: Vec<FuelExpense> = (1..=8)
        .map(|i| FuelExpense {
            id: format!("fuel_{}", i),
            driver_id: "drv_bench".to_string(),
            amount: Decimal::new(62_000, 2),
            liters: None,
            incurred_at: day_start(i * 3),
        })
        .collect();
    let now = Utc.with_ymd_and_hms(2025, 4, 1, 3, 0, 0).unwrap();

    c.bench_function("compute_payroll_22_sessions", |b| {
        b.iter(|| {
            black_box(compute_payroll(
                "drv_bench",
                period,
                &sessions,
                &revenue,
                &fuel,
                compensation,
                now,
            ))
        })
    });
}

fn bench_compliance_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = SqliteStore::open_in_memory().unwrap();
    store.insert_session(&session("ses_bench", 10, 720)).unwrap();
    store.insert_events(&events("ses_bench", 24)).unwrap();
    let router = create_router(AppState::new(load_config(), Arc::new(store)));
    let body = serde_json::json!({"sessionId": "ses_bench"}).to_string();

    c.bench_function("compliance_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/compliance/evaluate")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_evaluate_session,
    bench_compute_payroll,
    bench_compliance_request,
);
criterion_main!(benches);
