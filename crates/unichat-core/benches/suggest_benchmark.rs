//! Suggestion Filter Benchmarks
//!
//! Measures the autocomplete filter across languages and input lengths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use unichat_core::{suggestions, Language};

/// Benchmark filtering per language
fn bench_suggestions(c: &mut Criterion) {
    let mut group = c.benchmark_group("suggestions");

    for language in Language::ALL {
        let input = language.phrases()[0].chars().take(3).collect::<String>();
        group.bench_with_input(
            BenchmarkId::new("prefix_of_first_phrase", language.code()),
            &input,
            |b, input| b.iter(|| suggestions(black_box(input), language)),
        );
    }

    for input in ["d", "dr", "the", "admission requirements"].iter() {
        group.bench_with_input(BenchmarkId::new("english", input), input, |b, input| {
            b.iter(|| suggestions(black_box(input), Language::En))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_suggestions);

criterion_main!(benches);
