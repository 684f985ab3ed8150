use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nitrolz::lzss::{self, Variant};
use std::fs;
use std::path::Path;

fn gen_data(size: usize, seed: u64) -> Vec<u8> {
    let mut s = seed;
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        out.push((s >> 33) as u8);
    }
    out
}

/// Compressible workload: pseudo-random blocks repeated with small edits.
fn gen_repetitive(size: usize, seed: u64) -> Vec<u8> {
    let block = gen_data(256, seed);
    let mut out: Vec<u8> = block.iter().copied().cycle().take(size).collect();
    for i in (0..out.len()).step_by(4093) {
        out[i] = out[i].wrapping_add(1);
    }
    out
}

fn write_ratio_snapshot() {
    let mut csv = String::from("variant,workload,packed_bytes,input_bytes,ratio\n");
    for (name, data) in [
        ("random", gen_data(1024 * 1024, 123)),
        ("repetitive", gen_repetitive(1024 * 1024, 123)),
        ("zeros", vec![0u8; 1024 * 1024]),
    ] {
        for variant in [Variant::Lz10, Variant::Lz11] {
            let packed = lzss::compress(&data, variant).unwrap();
            let ratio = packed.len() as f64 / data.len() as f64;
            csv.push_str(&format!(
                "{variant},{name},{},{},{ratio}\n",
                packed.len(),
                data.len()
            ));
        }
    }
    let out_dir = Path::new("target/criterion/custom_reports");
    let _ = fs::create_dir_all(out_dir);
    let _ = fs::write(out_dir.join("ratio_snapshot.csv"), csv);
}

fn bench_compress_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("compress_speed_mb_s");
    for size in [64 * 1024usize, 1024 * 1024, 8 * 1024 * 1024] {
        let data = gen_repetitive(size, 1);
        g.throughput(Throughput::Bytes(size as u64));
        for variant in [Variant::Lz10, Variant::Lz11] {
            g.bench_with_input(
                BenchmarkId::new(variant.to_string(), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let packed = lzss::compress(black_box(&data), variant).unwrap();
                        black_box(packed);
                    });
                },
            );
        }
    }
    g.finish();
}

fn bench_decompress_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("decompress_speed_vs_packed");
    for size in [64 * 1024usize, 1024 * 1024, 8 * 1024 * 1024] {
        let data = gen_repetitive(size, 2);
        for variant in [Variant::Lz10, Variant::Lz11] {
            let packed = lzss::compress(&data, variant).unwrap();
            g.throughput(Throughput::Bytes(packed.len() as u64));
            g.bench_with_input(
                BenchmarkId::new(variant.to_string(), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let out = lzss::decompress(black_box(&packed)).unwrap();
                        black_box(out);
                    });
                },
            );
        }
    }
    g.finish();
}

fn bench_verify_speed(c: &mut Criterion) {
    let mut g = c.benchmark_group("verify_speed_vs_packed");
    for size in [1024 * 1024usize, 8 * 1024 * 1024] {
        let data = gen_repetitive(size, 3);
        let packed = lzss::compress(&data, Variant::Lz11).unwrap();
        g.throughput(Throughput::Bytes(packed.len() as u64));
        g.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let report = lzss::verify(black_box(&packed)).unwrap();
                black_box(report);
            });
        });
    }
    g.finish();
}

fn bench_compression_ratio(c: &mut Criterion) {
    write_ratio_snapshot();
    let mut g = c.benchmark_group("compression_ratio_workloads");
    let workloads = [
        ("random", gen_data(1024 * 1024, 5)),
        ("repetitive", gen_repetitive(1024 * 1024, 5)),
        ("zeros", vec![0u8; 1024 * 1024]),
    ];
    for (name, data) in workloads {
        g.bench_function(name, |b| {
            b.iter(|| {
                let packed = lzss::compress(&data, Variant::Lz11).unwrap();
                let ratio = packed.len() as f64 / data.len() as f64;
                black_box(ratio);
            });
        });
    }
    g.finish();
}

criterion_group!(
    benches,
    bench_compress_speed,
    bench_decompress_speed,
    bench_verify_speed,
    bench_compression_ratio
);
criterion_main!(benches);
