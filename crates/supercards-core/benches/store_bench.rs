//! Benchmarks for bookmark store operations
//!
//! Run with: cargo bench -p supercards-core

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use supercards_core::{
    BookmarkStore, CardFields, CardId, CardWidget, EventBus, FavouritesListWidget,
    HeadlessCardSurface, HeadlessListSurface,
};
use tempfile::TempDir;

fn filled_store(store: &BookmarkStore, count: usize) {
    for i in 0..count {
        let fields = CardFields::mission(format!("m{}", i), "Innovation", "Try something new");
        store.add(fields.snapshot(true, Utc::now())).unwrap();
    }
}

fn bench_add_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_remove");

    for size in [0usize, 10, 100] {
        group.bench_with_input(BenchmarkId::new("memory", size), &size, |b, &size| {
            let store = BookmarkStore::in_memory();
            filled_store(&store, size);
            let snapshot = CardFields::mission("bench", "Learning", "d").snapshot(true, Utc::now());
            let id = CardId::from("bench");

            b.iter(|| {
                store.add(black_box(snapshot.clone())).unwrap();
                store.remove(black_box(&id)).unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("disk", size), &size, |b, &size| {
            let temp_dir = TempDir::new().unwrap();
            let store = BookmarkStore::open(temp_dir.path().join("bench.redb")).unwrap();
            filled_store(&store, size);
            let snapshot = CardFields::mission("bench", "Learning", "d").snapshot(true, Utc::now());
            let id = CardId::from("bench");

            b.iter(|| {
                store.add(black_box(snapshot.clone())).unwrap();
                store.remove(black_box(&id)).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_toggle_with_list(c: &mut Criterion) {
    let store = BookmarkStore::in_memory();
    let bus = EventBus::new();
    filled_store(&store, 20);

    let _list = FavouritesListWidget::attach(store.clone(), bus.clone(), HeadlessListSurface::new());
    let card = CardWidget::attach(
        CardFields::mission("bench", "Learning", "d"),
        store,
        bus,
        HeadlessCardSurface::new(),
    );

    c.bench_function("toggle_with_open_list", |b| {
        b.iter(|| card.toggle_bookmark());
    });
}

criterion_group!(benches, bench_add_remove, bench_toggle_with_list);
criterion_main!(benches);
