//! Performance benchmarks for the payroll ledger engine.
//!
//! This benchmark suite tracks:
//! - A single payroll line
//! - Pay runs of 1, 100 and 1000 employees, including journal posting
//! - Trial balance over a year of monthly entries
//! - A pay run through the HTTP router
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use payroll_ledger::api::{AppState, PayRunRequest, create_router};
use payroll_ledger::calculation::{build_payroll_line, compute_trial_balance, run_payroll};
use payroll_ledger::config::{ConfigLoader, PayrollConfig};
use payroll_ledger::models::{EmployeePay, JournalEntry, Money, PayPeriod, ResidencyStatus};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn load_config() -> PayrollConfig {
    ConfigLoader::load("./config/illustrative")
        .expect("Failed to load config")
        .into_config()
}

fn pay_period(month: u32) -> PayPeriod {
    let start_date = NaiveDate::from_ymd_opt(2026, month, 1).unwrap();
    let end_date = NaiveDate::from_ymd_opt(2026, month + 1, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2027, 1, 1).unwrap())
        .pred_opt()
        .unwrap();
    PayPeriod {
        start_date,
        end_date,
    }
}

/// Creates employees with varied salaries and a mix of residencies.
fn create_employees(count: usize) -> Vec<EmployeePay> {
    (0..count)
        .map(|i| EmployeePay {
            employee_id: format!("emp_{:05}", i),
            gross_salary: Money::from_minor_units(25_000 + (i as i64 * 7_919) % 1_000_000),
            residency: if i % 5 == 0 {
                ResidencyStatus::NonResident
            } else {
                ResidencyStatus::Resident
            },
        })
        .collect()
}

fn bench_single_line(c: &mut Criterion) {
    let config = load_config();
    let gross = Money::from_minor_units(123_456);

    c.bench_function("single_payroll_line", |b| {
        b.iter(|| build_payroll_line(black_box(gross), ResidencyStatus::Resident, &config))
    });
}

fn bench_pay_runs(c: &mut Criterion) {
    let config = load_config();
    let period = pay_period(1);

    let mut group = c.benchmark_group("pay_run");
    for count in [1usize, 100, 1000] {
        let employees = create_employees(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("employees", count), &employees, |b, employees| {
            b.iter(|| run_payroll(&period, black_box(employees), &config))
        });
    }
    group.finish();
}

fn bench_trial_balance_year(c: &mut Criterion) {
    let config = load_config();
    let employees = create_employees(100);
    let entries: Vec<JournalEntry> = (1..=12)
        .filter_map(|month| {
            run_payroll(&pay_period(month), &employees, &config)
                .unwrap()
                .journal_entry
        })
        .collect();

    c.bench_function("trial_balance_12_entries", |b| {
        b.iter(|| compute_trial_balance(black_box(&entries)))
    });
}

fn bench_http_pay_run(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(AppState::new(load_config()));
    let request = PayRunRequest {
        pay_period: pay_period(1),
        employees: create_employees(100),
    };
    let body = serde_json::to_string(&request).unwrap();

    c.bench_function("http_pay_run_100", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/payroll/run")
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
    bench_single_line,
    bench_pay_runs,
    bench_trial_balance_year,
    bench_http_pay_run,
);
criterion_main!(benches);
