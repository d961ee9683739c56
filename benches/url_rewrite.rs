use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use formgate::services::urls::{insert_query_var, strip_query_var};

fn insert_query_var_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_query_var");

    let cases = [
        ("bare_path", "/welcome_back"),
        ("existing_counter", "/login?__logins=3"),
        (
            "long_query",
            "/login?came_from=http%3A%2F%2Fexample.org%2Fdeep%2Fpath&a=1&b=2&c=3&d=4",
        ),
    ];

    for (name, url) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &url, |b, url| {
            b.iter(|| insert_query_var(black_box(url), black_box("__logins"), black_box("4")));
        });
    }
    group.finish();
}

fn strip_query_var_bench(c: &mut Criterion) {
    c.bench_function("strip_query_var", |b| {
        b.iter(|| {
            strip_query_var(
                black_box("__logins=2&came_from=http%3A%2F%2Fexample.org"),
                black_box("__logins"),
            )
        });
    });
}

criterion_group!(benches, insert_query_var_bench, strip_query_var_bench);
criterion_main!(benches);
