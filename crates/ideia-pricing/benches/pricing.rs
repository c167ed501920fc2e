//! Pricing engine benchmarks
//!
//! - Single breakdown from a complete configuration
//! - Guarded preview from a partial draft
//! - Batch repricing of a catalog

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ideia_common::{PriceConfigDraft, PriceConfigInput};
use ideia_pricing::{resolve, PricingEngine};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

fn vase_config() -> PriceConfigInput {
    PriceConfigInput {
        grams_consumed: dec!(120),
        cost_per_kg: dec!(80),
        print_hours: dec!(3),
        machine_hourly_cost: dec!(6),
        kwh_per_hour: dec!(0.25),
        tariff_per_kwh: dec!(0.9),
        post_process_hours: dec!(0.5),
        post_process_hourly_cost: dec!(8),
        post_process_supplies: dec!(2),
        failure_percent: dec!(10),
        packaging: dec!(4),
        tax_percent: dec!(8),
        margin_percent: dec!(40),
        discount_percent: Some(dec!(5)),
    }
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("pricing");
    group.measurement_time(Duration::from_secs(5));

    let engine = PricingEngine::new();
    let cfg = vase_config();
    group.bench_function("compute", |b| {
        b.iter(|| black_box(engine.compute(black_box(&cfg))))
    });

    let complete = PriceConfigDraft::from(&cfg);
    group.bench_function("preview_ready", |b| {
        b.iter(|| black_box(engine.preview(black_box(&complete))))
    });

    let partial = PriceConfigDraft {
        grams_consumed: None,
        ..complete.clone()
    };
    group.bench_function("preview_incomplete", |b| {
        b.iter(|| black_box(engine.preview(black_box(&partial))))
    });

    group.bench_function("resolve_defaults", |b| {
        b.iter(|| black_box(resolve(None, Some(black_box(&cfg)))))
    });

    group.finish();
}

fn bench_catalog_reprice(c: &mut Criterion) {
    let mut group = c.benchmark_group("reprice");
    let engine = PricingEngine::new();

    for size in [10usize, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        let configs: Vec<PriceConfigInput> = (0..*size)
            .map(|i| PriceConfigInput {
                grams_consumed: Decimal::from(10 + i as i64),
                ..vase_config()
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("products", size), &configs, |b, configs| {
            b.iter(|| {
                for cfg in configs {
                    black_box(engine.compute(cfg));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(pricing, bench_compute, bench_catalog_reprice);

criterion_main!(pricing);
