use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use edetect_image::{Image, ImageSize};
use edetect_imgproc::filter::{
    GaussianBlurFilter, MarrHildrethOperatorFilter, SobelOperatorFilter,
};
use edetect_imgproc::{Backend, Cpu, Filter, Parallel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn create_test_image(width: usize, height: usize) -> Image {
    let mut rng = StdRng::seed_from_u64(42);
    let data: Vec<f32> = (0..(width * height)).map(|_| rng.random()).collect();
    Image::new(ImageSize { width, height }, data).unwrap()
}

fn bench_filter<B: Backend, F: Filter>(
    c: &mut Criterion,
    group_name: &str,
    make: impl Fn(usize, B) -> F,
    backend: B,
) {
    let mut group = c.benchmark_group(group_name);

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for radius in [1, 2, 4, 8].iter() {
            group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

            let parameter_string = format!("{}x{}x{}", width, height, radius);
            let src = create_test_image(*width, *height);

            group.bench_with_input(
                BenchmarkId::new(backend.name(), &parameter_string),
                &src,
                |b, src| {
                    let mut dst = Image::from_size_val(src.size(), 0.0).unwrap();
                    let mut filter = make(*radius, backend.clone());
                    b.iter(|| black_box(filter.apply(&mut dst, src)))
                },
            );
        }
    }
    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    bench_filter(
        c,
        "Gaussian Blur",
        |r, b: Cpu| GaussianBlurFilter::new(r).unwrap().with_backend(b),
        Cpu,
    );
    bench_filter(
        c,
        "Gaussian Blur",
        |r, b: Parallel| GaussianBlurFilter::new(r).unwrap().with_backend(b),
        Parallel::new(),
    );

    bench_filter(
        c,
        "Sobel",
        |_, b: Parallel| SobelOperatorFilter::new().with_backend(b),
        Parallel::new(),
    );

    bench_filter(
        c,
        "Marr-Hildreth",
        |r, b: Cpu| MarrHildrethOperatorFilter::new(r).unwrap().with_backend(b),
        Cpu,
    );
    bench_filter(
        c,
        "Marr-Hildreth",
        |r, b: Parallel| MarrHildrethOperatorFilter::new(r).unwrap().with_backend(b),
        Parallel::new(),
    );
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
