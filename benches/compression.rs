use areacomp_rs::{Area, AreaComp, Compressor, SuffixData};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Generate repetitive text data
fn generate_repetitive_text(size: usize) -> Vec<u8> {
    let pattern = b"the quick brown fox jumps over the lazy dog ";
    pattern.repeat(size / pattern.len())
}

/// Generate source code-like data
fn generate_source_code(size: usize) -> Vec<u8> {
    let patterns = [
        "fn main() {\n",
        "    let x = 42;\n",
        "    println!(\"Hello, world!\");\n",
        "    if x > 0 {\n",
        "        return x;\n",
        "    }\n",
        "}\n",
    ];

    let mut result = Vec::new();
    let mut i = 0;
    while result.len() < size {
        result.extend_from_slice(patterns[i % patterns.len()].as_bytes());
        i += 1;
    }
    result.truncate(size);
    result
}

/// Generate low-repetition data (simulating base64)
fn generate_low_repetition(size: usize) -> Vec<u8> {
    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut seed = 12345u64;

    (0..size)
        .map(|_| {
            // Simple LCG random
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            chars[(seed % chars.len() as u64) as usize]
        })
        .collect()
}

fn bench_areas(
    c: &mut Criterion,
    group_name: &str,
    sizes: &[usize],
    generate: fn(usize) -> Vec<u8>,
) {
    let mut group = c.benchmark_group(group_name);

    for &size in sizes {
        let data = generate(size);

        for area in [Area::LengthFirst, Area::WidthFirst, Area::PotentialCompression] {
            let comp = AreaComp::new(area);
            group.bench_with_input(BenchmarkId::new(comp.name(), size), &data, |b, data| {
                b.iter(|| black_box(comp.compress(black_box(data))));
            });
        }
    }

    group.finish();
}

fn bench_repetitive(c: &mut Criterion) {
    bench_areas(c, "repetitive_text", &[1_000, 5_000, 20_000], generate_repetitive_text);
}

fn bench_source_code(c: &mut Criterion) {
    bench_areas(c, "source_code", &[1_000, 5_000, 20_000], generate_source_code);
}

fn bench_low_repetition(c: &mut Criterion) {
    bench_areas(c, "low_repetition", &[1_000, 10_000, 50_000], generate_low_repetition);
}

fn bench_suffix_sorting(c: &mut Criterion) {
    let sizes = [10_000, 100_000];
    let mut group = c.benchmark_group("suffix_sorting");

    for size in sizes.iter() {
        let data = generate_source_code(*size);

        group.bench_with_input(BenchmarkId::new("SuffixData", size), &data, |b, data| {
            b.iter(|| black_box(SuffixData::build(black_box(data))));
        });
    }

    group.finish();
}

fn bench_iteration(c: &mut Criterion) {
    let sizes = [1_000, 10_000];
    let mut group = c.benchmark_group("iteration");

    for size in sizes.iter() {
        let data = generate_repetitive_text(*size);
        let grammar = AreaComp::default().compress(&data);

        group.bench_with_input(BenchmarkId::new("Grammar", size), &grammar, |b, grammar| {
            b.iter(|| {
                let count: usize = black_box(grammar.iter().count());
                black_box(count)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_repetitive,
    bench_source_code,
    bench_low_repetition,
    bench_suffix_sorting,
    bench_iteration
);
criterion_main!(benches);
