use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lrucache::LruCache;

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("add_new_1kb", |b| {
        let mut cache = LruCache::with_capacity(1024);
        let data = vec![b'x'; 1024];

        let mut counter = 0u64;
        b.iter(|| {
            cache.add(black_box(counter), data.clone());
            counter += 1;
            // Keep the cache from growing without bound during the run
            if cache.len() > 1000 {
                cache.remove_oldest();
            }
        });
    });

    group.finish();
}

fn bench_get_promote(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_promote_1kb", |b| {
        let mut cache = LruCache::with_capacity(1000);
        let data = vec![b'x'; 1024];

        for i in 0..1000u64 {
            cache.add(i, data.clone());
        }

        let mut counter = 0u64;
        b.iter(|| {
            black_box(cache.get(&(counter % 1000)));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("add_remove_oldest", |b| {
        let mut cache = LruCache::with_capacity(100);

        for i in 0..100u64 {
            cache.add(i, i);
        }

        let mut counter = 100u64;
        b.iter(|| {
            cache.add(counter, counter);
            black_box(cache.remove_oldest());
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_add, bench_get_promote, bench_churn);
criterion_main!(benches);
