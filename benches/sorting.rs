//! Сортировка админских таблиц на коллекциях типичного размера.
//!
//! Run with: `cargo bench --bench sorting`

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fake::faker::lorem::en::{Word, Words};
use fake::Fake;

use cinema_booking::models::Movie;
use cinema_booking::sorting::{sort_items, SortConfig};

fn movies(count: usize) -> Vec<Movie> {
    (0..count)
        .map(|i| {
            let words: Vec<String> = Words(1..4).fake();
            Movie {
                id: i as i64,
                title: words.join(" "),
                genre: (i % 7 != 0).then(|| Word().fake()),
                duration_minutes: Some((70..190).fake()),
                rating: (i % 5 != 0).then(|| (10..100).fake::<u32>() as f64 / 10.0),
                release_date: NaiveDate::from_ymd_opt((1970..2025).fake(), (1..13).fake(), (1..29).fake()),
            }
        })
        .collect()
}

fn bench_sort_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_items");
    for size in [100usize, 1_000, 10_000] {
        let items = movies(size);
        for key in ["title", "rating", "releaseDate"] {
            let config = SortConfig::asc(key);
            group.bench_with_input(BenchmarkId::new(key, size), &items, |b, items| {
                b.iter(|| sort_items(black_box(items), Some(&config)))
            });
        }
    }
    group.finish();
}

fn bench_toggle_desc(c: &mut Criterion) {
    let items = movies(1_000);
    let config = SortConfig::toggle(None, "title").and_then(|asc| SortConfig::toggle(Some(&asc), "title"));

    c.bench_function("sort_items/title_desc_1000", |b| {
        b.iter(|| sort_items(black_box(&items), config.as_ref()))
    });
}

criterion_group!(benches, bench_sort_keys, bench_toggle_desc);
criterion_main!(benches);
