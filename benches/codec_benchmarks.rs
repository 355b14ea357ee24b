//! Performance benchmarks for the shift calendar.
//!
//! Covers the calendar codec in both directions, the monthly statistics and
//! a statistics request through the HTTP router.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use shift_calendar::api::{AppState, create_router};
use shift_calendar::calculation::{YearMonth, monthly_stats, trailing_report};
use shift_calendar::config::{ConfigLoader, ScheduleConfig};
use shift_calendar::ics;
use shift_calendar::models::{Position, ShiftEntry, ShiftRecord, TimeRange, UserProfile};
use shift_calendar::session::Session;
use shift_calendar::sync::{MemoryRemote, SyncEngine};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn load_config() -> ScheduleConfig {
    ConfigLoader::load("./config/default")
        .expect("Failed to load config")
        .into_config()
}

/// Creates one shift per day starting on 2026-01-01, cycling positions and hours.
fn create_shifts(count: usize) -> Vec<ShiftRecord> {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let hours = ["08:00 - 16:00", "16:00 - 23:00", "22:00 - 06:00", "06:30 - 14:15"];

    (0..count)
        .map(|i| {
            let time: TimeRange = hours[i % hours.len()].parse().unwrap();
            let position = Position::ALL[i % Position::ALL.len()];
            ShiftRecord::single(
                format!("bench-{}", i),
                start + Duration::days(i as i64),
                ShiftEntry::new(time, position),
                "Main Street",
            )
        })
        .collect()
}

fn bench_generate(c: &mut Criterion) {
    let config = load_config();
    let stamp = NaiveDate::from_ymd_opt(2026, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let mut group = c.benchmark_group("generate");
    for count in [1usize, 30, 365] {
        let records = create_shifts(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("shifts", count), &records, |b, records| {
            b.iter(|| black_box(ics::generate_at(records, &config.calendar, stamp)))
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let config = load_config();

    let mut group = c.benchmark_group("parse");
    for count in [1usize, 30, 365] {
        let document = ics::generate(&create_shifts(count), &config.calendar);
        group.throughput(Throughput::Bytes(document.len() as u64));
        group.bench_with_input(BenchmarkId::new("shifts", count), &document, |b, document| {
            b.iter(|| black_box(ics::parse(document, &config.calendar)))
        });
    }
    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let records = create_shifts(365);
    let month = YearMonth::new(2026, 6).unwrap();
    let rate = Decimal::new(2850, 2);

    c.bench_function("monthly_stats_365", |b| {
        b.iter(|| black_box(monthly_stats(&records, month, rate)))
    });
    c.bench_function("trailing_report_365", |b| {
        b.iter(|| black_box(trailing_report(&records, month, rate)))
    });
}

fn bench_statistics_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = load_config();
    let profile = UserProfile {
        id: "bench".to_string(),
        name: "Bench User".to_string(),
        initials: String::new(),
        email: "bench@example.com".to_string(),
        company: String::new(),
        phone: String::new(),
        address: String::new(),
        hourly_rate: Decimal::new(2850, 2),
    };

    let mut session = Session::new(profile, config.clone());
    session.replace_shifts(create_shifts(365));
    let engine = SyncEngine::new(
        Arc::new(MemoryRemote::new()),
        config.calendar.clone(),
        config.sync.clone(),
    );
    let router = create_router(AppState::new(session, engine));

    c.bench_function("statistics_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .uri("/statistics?year=2026&month=6")
                        .body(Body::empty())
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
    bench_generate,
    bench_parse,
    bench_statistics,
    bench_statistics_request,
);
criterion_main!(benches);
