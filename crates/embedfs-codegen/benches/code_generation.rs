//! Performance benchmarks for embedfs-codegen.
//!
//! Measures rendering of every output shape across pack sizes, plus
//! generator initialization.
//!
//! Run with: cargo bench --package embedfs-codegen

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use embedfs_codegen::{GenerateOptions, SourceGenerator};
use embedfs_core::OutputShape;
use embedfs_vfs::{VfsBuilder, VirtualFs};
use std::hint::black_box;

/// Creates a pack of `count` small text files spread over ten directories.
fn create_pack(count: usize) -> VirtualFs {
    let mut builder = VfsBuilder::new().mod_time(1_700_000_000);
    for i in 0..count {
        let content = format!("asset {i}\n").repeat(32);
        builder = builder.add_file(&format!("/dir{}/file{i:05}.txt", i % 10), content);
    }
    builder.build().expect("Pack should build")
}

/// Benchmarks each shape with a growing number of files.
fn bench_shapes(c: &mut Criterion) {
    let generator = SourceGenerator::new().expect("Generator should initialize");

    for shape in [
        OutputShape::Dependent,
        OutputShape::Independent,
        OutputShape::Json,
        OutputShape::FlatJson,
    ] {
        let mut group = c.benchmark_group(format!("generate_{shape}"));
        let options = GenerateOptions::new("ASSETS").with_shape(shape);

        for count in [1, 10, 100, 1000] {
            let fs = create_pack(count);
            group.throughput(Throughput::Elements(count as u64));
            group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
                b.iter(|| {
                    let result = generator.generate(black_box(&fs), &options);
                    assert!(result.is_ok());
                });
            });
        }

        group.finish();
    }
}

/// Benchmarks generator initialization overhead.
fn bench_generator_initialization(c: &mut Criterion) {
    c.bench_function("generator_initialization", |b| {
        b.iter(|| {
            let generator = SourceGenerator::new();
            assert!(generator.is_ok());
            black_box(generator)
        });
    });
}

criterion_group!(benches, bench_shapes, bench_generator_initialization);
criterion_main!(benches);
