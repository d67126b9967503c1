use criterion::{criterion_group, criterion_main, Criterion};
use numgrid::{best_offset, correlate, locate, ImageView, LocateConfig};
use std::hint::black_box;

fn make_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

fn extract_patch(
    image: &[u8],
    img_width: usize,
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = (y0 + y) * img_width;
        for x in 0..width {
            out.push(image[row + x0 + x]);
        }
    }
    out
}

fn bench_correlate(c: &mut Criterion) {
    let a_data = make_image(64, 64);
    let b_data = make_image(56, 60);
    let a = ImageView::from_slice(&a_data, 64, 64).unwrap();
    let b = ImageView::from_slice(&b_data, 56, 60).unwrap();

    c.bench_function("correlate_64x64_vs_56x60", |bench| {
        bench.iter(|| correlate(black_box(a), black_box(b)).unwrap())
    });
}

fn bench_best_offset(c: &mut Criterion) {
    let img_width = 256;
    let img_height = 256;
    let image = make_image(img_width, img_height);
    let scene = ImageView::from_slice(&image, img_width, img_height).unwrap();

    let tpl_data = extract_patch(&image, img_width, 80, 60, 48, 48);
    let tpl = ImageView::from_slice(&tpl_data, 48, 48).unwrap();

    c.bench_function("best_offset_256_tpl48", |bench| {
        bench.iter(|| best_offset(black_box(scene), black_box(tpl)).unwrap())
    });
}

fn bench_locate(c: &mut Criterion) {
    let img_width = 192;
    let img_height = 192;
    let image = make_image(img_width, img_height);
    let scene = ImageView::from_slice(&image, img_width, img_height).unwrap();

    let tpl_data = extract_patch(&image, img_width, 50, 40, 64, 64);
    let tpl = ImageView::from_slice(&tpl_data, 64, 64).unwrap();
    let cfg = LocateConfig::default();

    c.bench_function("locate_192_tpl64", |bench| {
        bench.iter(|| locate(black_box(tpl), black_box(scene), &cfg).unwrap())
    });
}

criterion_group!(benches, bench_correlate, bench_best_offset, bench_locate);
criterion_main!(benches);
