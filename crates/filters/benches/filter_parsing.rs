//! Benchmarks for filter parameter parsing and pipeline assembly
//!
//! Run with: cargo bench --package filters

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use filters::filters::{RelatedAny, TitleContains};
use filters::{parse_ids, FilterPipeline};
use sqlx::{QueryBuilder, Sqlite};

fn bench_parse_ids(c: &mut Criterion) {
    let raw = (1..=50).map(|i| i.to_string()).collect::<Vec<_>>().join(",");

    c.bench_function("parse_ids_50", |b| {
        b.iter(|| {
            let ids = parse_ids(black_box(&raw));
            black_box(ids)
        })
    });
}

fn bench_build_movie_query(c: &mut Criterion) {
    c.bench_function("build_movie_query", |b| {
        b.iter(|| {
            let pipeline = FilterPipeline::new()
                .add_filter(TitleContains::new(black_box("matrix")))
                .add_filter(RelatedAny::genres(vec![1, 2, 3]))
                .add_filter(RelatedAny::actors(vec![4, 5]));

            let mut query =
                QueryBuilder::<Sqlite>::new("SELECT m.id FROM movies m WHERE 1=1");
            pipeline.apply(&mut query);
            black_box(query.sql().len())
        })
    });
}

criterion_group!(benches, bench_parse_ids, bench_build_movie_query);
criterion_main!(benches);
