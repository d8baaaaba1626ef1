//! # Client Registry Benchmarks
//!
//! | Operation | Store | Expectation |
//! |-----------|-------|-------------|
//! | create_client | memory | one transaction, four writes |
//! | find_by_legal_id | memory | single index read plus one client read |
//! | list_clients | memory | linear in registry size |
//! | create_client | file | dominated by snapshot rewrite |

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use shared_types::UserId;
use sr_01_client_registry::{
    ClientFilter, ClientInput, ClientRegistryApi, ClientRegistryService, FileBackedDocumentStore,
    InMemoryDocumentStore, RegistryConfig, StoreConfig, SystemTimeSource,
};
use std::time::Duration;
use tempfile::TempDir;
use tokio::runtime::Runtime;

type MemoryRegistry = ClientRegistryService<InMemoryDocumentStore, SystemTimeSource>;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn user() -> UserId {
    UserId::new("bench").unwrap()
}

fn seeded_registry(rt: &Runtime, size: usize) -> MemoryRegistry {
    let registry =
        ClientRegistryService::new_in_memory(RegistryConfig::default(), StoreConfig::default());
    rt.block_on(async {
        for n in 0..size {
            let input = ClientInput::new(format!("Client {n:06}"), format!("LEGAL-{n}"));
            registry.create_client(input, user()).await.unwrap();
        }
    });
    registry
}

fn bench_create(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("sr-01-create-client");
    group.measurement_time(Duration::from_secs(5));

    // Fresh registry per iteration so the fixed-width sequence never runs out.
    group.bench_function("memory", |b| {
        b.iter_batched(
            || seeded_registry(&rt, 0),
            |registry| {
                let input = ClientInput::new("Bench Client", "B-1");
                black_box(rt.block_on(registry.create_client(input, user())).unwrap())
            },
            BatchSize::SmallInput,
        )
    });

    let dir = TempDir::new().unwrap();
    let config = StoreConfig {
        data_file: dir.path().join("registry.json"),
        ..StoreConfig::default()
    };
    let registry = ClientRegistryService::new(
        FileBackedDocumentStore::open(&config).unwrap(),
        SystemTimeSource,
        RegistryConfig::default(),
    );
    let mut n = 0u64;
    group.sample_size(20);
    group.bench_function("file", |b| {
        b.iter(|| {
            n += 1;
            let input = ClientInput::new("Bench Client", format!("F-{n}"));
            black_box(rt.block_on(registry.create_client(input, user())).unwrap())
        })
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("sr-01-find-by-legal-id");

    for size in [100, 1_000, 10_000] {
        let registry = seeded_registry(&rt, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let legal_id = format!("legal {}", size / 2);
            b.iter(|| {
                black_box(
                    rt.block_on(registry.find_by_legal_id(legal_id.clone()))
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

fn bench_list(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("sr-01-list-clients");
    group.measurement_time(Duration::from_secs(5));

    for size in [100, 1_000, 10_000] {
        let registry = seeded_registry(&rt, size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("all", size), &size, |b, _| {
            b.iter(|| black_box(rt.block_on(registry.list_clients(ClientFilter::default())).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("prefix", size), &size, |b, _| {
            let filter = ClientFilter {
                active: Some(true),
                name_prefix: Some("client 00".into()),
            };
            b.iter(|| black_box(rt.block_on(registry.list_clients(filter.clone())).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_create, bench_lookup, bench_list);
criterion_main!(benches);
