//! Session Store Benchmarks
//!
//! Measures performance of session store operations including:
//! - Session creation and deletion
//! - Message appends
//! - Context replacement
//! - Transcript export

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;

use unichat_core::export::transcript;
use unichat_core::session::{ContextMap, Message, SessionStore};

/// Benchmark session lifecycle
fn bench_session_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_lifecycle");

    group.bench_function("create_session", |b| {
        b.iter_with_setup(SessionStore::new, |mut store| {
            black_box(store.create_session());
            store
        })
    });

    group.bench_function("create_and_delete_session", |b| {
        b.iter_with_setup(SessionStore::new, |mut store| {
            let id = store.create_session();
            store.delete_session(&id).unwrap();
            store
        })
    });

    group.bench_function("switch_among_50_sessions", |b| {
        let mut store = SessionStore::new();
        let ids: Vec<String> = (0..50).map(|_| store.create_session()).collect();

        b.iter(|| {
            for id in &ids {
                store.switch_session(black_box(id)).unwrap();
            }
        })
    });

    group.finish();
}

/// Benchmark message operations
fn bench_message_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_operations");

    for size in [10, 100, 1000].iter() {
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::new("append_message", size), size, |b, &size| {
            let msg = "x".repeat(size);
            b.iter_with_setup(
                || {
                    let store = SessionStore::new();
                    let id = store.active_id().to_string();
                    (store, id)
                },
                |(mut store, id)| {
                    store.append_message(&id, Message::user(&msg)).unwrap();
                    store
                },
            )
        });
    }

    group.bench_function("replace_context", |b| {
        let mut store = SessionStore::new();
        let id = store.active_id().to_string();
        let context: ContextMap = json!({
            "name": "Ayşe",
            "faculty": "Engineering",
            "year": 3,
            "international": false
        })
        .as_object()
        .cloned()
        .unwrap();

        b.iter(|| store.replace_context(&id, black_box(context.clone())).unwrap())
    });

    group.finish();
}

/// Benchmark transcript export
fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    for count in [10, 100, 500].iter() {
        group.bench_with_input(BenchmarkId::new("transcript", count), count, |b, &count| {
            let messages: Vec<Message> = (0..count)
                .map(|i| {
                    if i % 2 == 0 {
                        Message::user(format!("Question {}", i))
                    } else {
                        Message::bot(format!("Answer {} with some additional content", i))
                    }
                })
                .collect();

            b.iter(|| transcript(black_box(&messages)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_session_lifecycle,
    bench_message_operations,
    bench_export,
);

criterion_main!(benches);
