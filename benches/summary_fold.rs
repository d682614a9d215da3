//! 汇总折算热路径基准

use chrono::Utc;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::hint::black_box;

use meetdash::analytics::{fold_top_locations, next_avg_duration, reduce_summaries};
use meetdash::store::{AnalyticsSummary, LocationCount};

fn summary(meetup_id: usize) -> AnalyticsSummary {
    let now = Utc::now();
    AnalyticsSummary {
        meetup_id: format!("meetup-{}", meetup_id),
        business_id: "b1".to_string(),
        total_impressions: 1000 + meetup_id as u64,
        unique_viewers: 400,
        avg_view_duration_secs: 42.5,
        clicks: 120,
        shares: 30,
        bookmarks: 25,
        inquiries: 10,
        registrations: 15,
        attendees: 0,
        revenue: 0.0,
        conversion_rate: 0.0,
        direct_traffic: 500,
        search_traffic: 300,
        social_traffic: 150,
        referral_traffic: 50,
        top_locations: Vec::new(),
        last_viewed: None,
        created_at: now,
        updated_at: now,
    }
}

fn full_locations() -> Vec<LocationCount> {
    (0..10)
        .map(|i| LocationCount {
            city: format!("city-{}", i),
            country: "US".to_string(),
            count: (20 - i) as u64,
        })
        .collect()
}

fn bench_fold_top_locations(c: &mut Criterion) {
    c.bench_function("fold_top_locations_hit", |b| {
        b.iter_batched(
            full_locations,
            |mut locations| {
                fold_top_locations(&mut locations, "city-9", "US");
                black_box(locations)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("fold_top_locations_miss_at_capacity", |b| {
        b.iter_batched(
            full_locations,
            |mut locations| {
                fold_top_locations(&mut locations, "Reykjavik", "IS");
                black_box(locations)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_reduce_summaries(c: &mut Criterion) {
    let summaries: Vec<AnalyticsSummary> = (0..100).map(summary).collect();
    c.bench_function("reduce_summaries_100", |b| {
        b.iter(|| black_box(reduce_summaries(black_box(&summaries))))
    });
}

fn bench_next_avg_duration(c: &mut Criterion) {
    c.bench_function("next_avg_duration", |b| {
        b.iter(|| black_box(next_avg_duration(black_box(42.5), black_box(1000), 30, 1)))
    });
}

criterion_group!(
    benches,
    bench_fold_top_locations,
    bench_reduce_summaries,
    bench_next_avg_duration
);
criterion_main!(benches);
