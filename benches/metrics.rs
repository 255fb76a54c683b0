use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;
use trousseau::{
    ledger::{CategoryDraft, Ledger, LedgerMetrics, PaymentDraft},
    storage::{load_ledger, save_ledger, FileStore},
};

fn build_sample_ledger(payment_count: usize) -> Ledger {
    let mut ledger = Ledger::seeded();
    ledger.set_balance(1_000_000.0);

    let mut ids = Vec::new();
    for idx in 0..40 {
        let id = if idx % 4 == 0 {
            ledger.add_category(CategoryDraft::recurring(
                format!("Vendor {idx}"),
                250.0 + idx as f64,
                12,
            ))
        } else {
            ledger.add_category(CategoryDraft::fixed(
                format!("Vendor {idx}"),
                1_500.0 + idx as f64,
            ))
        };
        ids.push(id);
    }

    let start_date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    for idx in 0..payment_count {
        let date = start_date + Duration::days((idx % 365) as i64);
        let draft = PaymentDraft::new(&ids[idx % ids.len()], 10.0 + (idx % 90) as f64, date);
        ledger.add_payment(draft).expect("payment accepted");
    }

    ledger
}

fn bench_metrics(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));

    c.bench_function("metrics_10k_payments", |b| {
        b.iter(|| {
            let metrics = LedgerMetrics::for_ledger(&ledger);
            black_box(metrics);
        })
    });
}

fn bench_store_io(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let store = FileStore::new(dir.path()).expect("store");

    c.bench_function("store_save_10k", |b| {
        b.iter(|| {
            save_ledger(&store, &ledger).expect("save ledger");
        })
    });

    save_ledger(&store, &ledger).expect("seed");

    c.bench_function("store_load_10k", |b| {
        b.iter(|| {
            let loaded = load_ledger(&store);
            black_box(loaded);
        })
    });
}

criterion_group!(benches, bench_metrics, bench_store_io);
criterion_main!(benches);
