use criterion::{Criterion, black_box, criterion_group, criterion_main};
use swell_fft::{ButterflyTable, Complex32, ComplexGrid, FftEngine};

fn bench_butterfly_table(c: &mut Criterion) {
    c.bench_function("butterfly_table_512", |b| {
        b.iter(|| ButterflyTable::new(black_box(512)).unwrap());
    });
}

fn bench_inverse_2d(c: &mut Criterion) {
    let n = 256;
    let mut engine = FftEngine::new(n).unwrap();
    let mut spectrum = ComplexGrid::new(n);
    for y in 0..n {
        for x in 0..n {
            let v = ((x * 31 + y * 17) % 101) as f32 / 101.0;
            spectrum.set(x, y, Complex32::new(v, -v));
        }
    }
    let mut out = ComplexGrid::new(n);

    c.bench_function("inverse_2d_256", |b| {
        b.iter(|| engine.inverse_2d(black_box(&spectrum), &mut out).unwrap());
    });
}

criterion_group!(benches, bench_butterfly_table, bench_inverse_2d);
criterion_main!(benches);
