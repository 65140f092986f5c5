use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const NUMS: &[f64] = &[0., -69., 123406000., 0.1234, 2.718281828459045, 1.7976931348623157e308];

fn benchmark_id(x: f64) -> BenchmarkId {
    BenchmarkId::from_parameter(ryu::Buffer::new().format(x))
}

fn charconv_general(c: &mut Criterion) {
    let mut g = c.benchmark_group("charconv_general");

    for num in NUMS {
        g.bench_with_input(benchmark_id(*num), num, |b, &num| {
            b.iter(|| {
                let mut buf = [0u8; 32];
                charconv::to_chars(&mut buf, black_box(num)).unwrap()
            });
        });
    }
    g.finish();
}

fn charconv_buffer(c: &mut Criterion) {
    let mut g = c.benchmark_group("charconv_buffer");

    for num in NUMS {
        g.bench_with_input(benchmark_id(*num), num, |b, &num| {
            b.iter(|| charconv::Buffer::new().format(black_box(num)).len());
        });
    }
    g.finish();
}

fn charconv_fixed(c: &mut Criterion) {
    let mut g = c.benchmark_group("charconv_fixed");

    for num in NUMS {
        g.bench_with_input(benchmark_id(*num), num, |b, &num| {
            b.iter(|| {
                let mut buf = [0u8; 384];
                charconv::to_chars_fmt(&mut buf, black_box(num), charconv::CharsFormat::Fixed)
                    .unwrap()
            });
        });
    }
    g.finish();
}

fn charconv_hex(c: &mut Criterion) {
    let mut g = c.benchmark_group("charconv_hex");

    for num in NUMS {
        g.bench_with_input(benchmark_id(*num), num, |b, &num| {
            b.iter(|| {
                let mut buf = [0u8; 32];
                charconv::to_chars_fmt(&mut buf, black_box(num), charconv::CharsFormat::Hex)
                    .unwrap()
            });
        });
    }
    g.finish();
}

fn ryu(c: &mut Criterion) {
    let mut g = c.benchmark_group("ryu");

    for num in NUMS {
        g.bench_with_input(benchmark_id(*num), num, |b, &num| {
            b.iter(|| ryu::Buffer::new().format(black_box(num)).len());
        });
    }
    g.finish();
}

fn std(c: &mut Criterion) {
    let mut g = c.benchmark_group("std");

    use std::io::Write;
    let mut buf = [0u8; 384];
    for num in NUMS {
        g.bench_with_input(benchmark_id(*num), num, |b, &num| {
            b.iter(|| write!(buf.as_mut_slice(), "{}", black_box(num)));
        });
    }
    g.finish();
}

criterion_group!(
    microbench,
    charconv_general,
    charconv_buffer,
    charconv_fixed,
    charconv_hex,
    ryu,
    std
);

criterion_main!(microbench);
