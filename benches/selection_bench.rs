use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use trakaido_select::cache::select_linear;
use trakaido_select::{ChaChaRandom, RandomSource, StatsStore, WeightedSelectionTree, Word, WordWeightCache};

fn pool(n: usize) -> Vec<Word> {
    (0..n)
        .map(|i| Word::with_guid(format!("s{i}"), format!("t{i}"), "bench", "g", format!("{i}")))
        .collect()
}

fn bench_tree_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_update");
    for size in [100, 1_000, 10_000] {
        let mut tree = WeightedSelectionTree::new(size);
        let mut rng = ChaChaRandom::with_seed(1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
            b.iter(|| {
                let index = rng.index(n) + 1;
                tree.update_weight(black_box(index), rng.next_f64());
            })
        });
    }
    group.finish();
}

fn bench_tree_vs_linear(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_draw");
    let stats = StatsStore::new();
    for size in [100, 1_000, 10_000] {
        let words = pool(size);
        let mut cache = WordWeightCache::default();
        cache.build_selection_tree(&words, &stats, Utc::now());
        let mut rng = ChaChaRandom::with_seed(2);

        group.bench_with_input(BenchmarkId::new("tree", size), &size, |b, _| {
            b.iter(|| black_box(cache.select_word_from_tree(&mut rng)))
        });
        group.bench_with_input(BenchmarkId::new("linear", size), &size, |b, _| {
            b.iter(|| black_box(select_linear(&words, |_| 1.0, &mut rng).cloned()))
        });
    }
    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let words = pool(5_000);
    let stats = StatsStore::new();
    let now = Utc::now();
    c.bench_function("build_selection_tree_5000", |b| {
        b.iter(|| {
            let mut cache = WordWeightCache::default();
            cache.build_selection_tree(black_box(&words), &stats, now);
            black_box(cache.stats())
        })
    });
}

criterion_group!(benches, bench_tree_update, bench_tree_vs_linear, bench_rebuild);
criterion_main!(benches);
