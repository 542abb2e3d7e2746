//! # Bucket Discovery Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Record codec | encode / decode one record |
//! | Registry | list peers from a bucket of N records |

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bucket_discovery::test_utils::ManualTimeSource;
use bucket_discovery::{
    ClusterAddress, InMemoryObjectStore, MembershipRecord, MembershipRegistry,
    RegistryConfiguration, Timestamp,
};

const T0: u64 = 1_700_000_000_000;

fn record(i: usize) -> MembershipRecord {
    MembershipRecord::new(
        format!("node-{i:05}"),
        ClusterAddress::new(format!("10.0.{}.{}", i / 256, i % 256), 7800),
        Timestamp::from_millis(T0),
    )
    .unwrap()
}

fn bench_record_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("record-codec");
    let record = record(42);
    let encoded = record.encode();

    group.bench_function("encode", |b| b.iter(|| black_box(record.encode())));
    group.bench_function("decode", |b| {
        b.iter(|| black_box(MembershipRecord::decode(&encoded).is_ok()))
    });
    group.finish();
}

fn bench_list_peers(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry-list-peers");
    let config = RegistryConfiguration {
        key_prefix: "cluster/".into(),
        ..RegistryConfiguration::for_testing("bench")
    };
    let clock = Arc::new(ManualTimeSource::new(T0));

    for size in [10usize, 100, 1_000, 5_000] {
        let store = InMemoryObjectStore::new();
        for i in 0..size {
            let record = record(i);
            store.insert(format!("cluster/{}", record.node_id()), record.encode());
        }
        let registry = MembershipRegistry::new(&store, &config, clock.as_ref());

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(registry.list_peers().map(|peers| peers.len())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_record_codec, bench_list_peers);
criterion_main!(benches);
