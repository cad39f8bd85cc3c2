use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use laser_enhance::models::{Frame, PixelBuffer};
use laser_enhance::utils::grayscale::{grayscale, grayscale_parallel};

fn noisy_buffer(width: usize, height: usize) -> PixelBuffer {
    let frame = Frame::from_fn(width, height, |x, y| {
        let v = ((x * 31 + y * 17) % 256) as u8;
        [v, v.wrapping_add(40), v.wrapping_mul(3), 255]
    });
    PixelBuffer::from_frame(&frame)
}

fn bench_grayscale_small(c: &mut Criterion) {
    let buffer = noisy_buffer(100, 100);
    c.bench_function("grayscale_100x100", |b| {
        b.iter_batched(
            || buffer.clone(),
            |mut buf| grayscale(black_box(&mut buf)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_grayscale_medium(c: &mut Criterion) {
    let buffer = noisy_buffer(640, 480);
    c.bench_function("grayscale_640x480", |b| {
        b.iter_batched(
            || buffer.clone(),
            |mut buf| grayscale(black_box(&mut buf)),
            BatchSize::LargeInput,
        )
    });
}

fn bench_grayscale_large(c: &mut Criterion) {
    let buffer = noisy_buffer(1920, 1080);
    c.bench_function("grayscale_1920x1080", |b| {
        b.iter_batched(
            || buffer.clone(),
            |mut buf| grayscale(black_box(&mut buf)),
            BatchSize::LargeInput,
        )
    });
}

fn bench_grayscale_parallel_medium(c: &mut Criterion) {
    let buffer = noisy_buffer(640, 480);
    c.bench_function("grayscale_parallel_640x480", |b| {
        b.iter_batched(
            || buffer.clone(),
            |mut buf| grayscale_parallel(black_box(&mut buf)),
            BatchSize::LargeInput,
        )
    });
}

fn bench_grayscale_parallel_large(c: &mut Criterion) {
    let buffer = noisy_buffer(1920, 1080);
    c.bench_function("grayscale_parallel_1920x1080", |b| {
        b.iter_batched(
            || buffer.clone(),
            |mut buf| grayscale_parallel(black_box(&mut buf)),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_grayscale_small,
    bench_grayscale_medium,
    bench_grayscale_large,
    bench_grayscale_parallel_medium,
    bench_grayscale_parallel_large
);
criterion_main!(benches);
