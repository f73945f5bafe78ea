use histmatch::{
    render_overlay, BoundingBox, HistogramConfig, HistogramExtractor, MatchConfig, Matcher, Pixel,
    RgbImage, TemplateScope, TemplateStore,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn make_image(width: usize, height: usize, seed: usize) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = ((x * 13) ^ (y * 7) ^ seed) & 0xFF;
        let g = ((x * y) ^ (seed * 31)) & 0xFF;
        let b = ((x + y * 3) ^ (seed * 5)) & 0xFF;
        Pixel::new(r as u8, g as u8, b as u8)
    })
    .unwrap()
}

fn build_store(count: usize) -> TemplateStore {
    let mut store = TemplateStore::new(HistogramConfig::default()).unwrap();
    for seed in 0..count {
        let img = make_image(128, 96, seed);
        let bbox = BoundingBox::new(seed % 64, seed % 48, 32, 24).unwrap();
        store
            .add_reference(&img, bbox, TemplateScope::FullImage)
            .unwrap();
    }
    store
}

fn bench_extract(c: &mut Criterion) {
    let img = make_image(640, 480, 3);
    let extractor = HistogramExtractor::new(HistogramConfig::default()).unwrap();
    c.bench_function("extract_640x480_8bins", |b| {
        b.iter(|| black_box(extractor.extract(black_box(&img))));
    });
}

fn bench_match(c: &mut Criterion) {
    let query = make_image(320, 240, 1000);
    let matcher = Matcher::new(build_store(256)).with_config(MatchConfig { parallel: false });
    let signature = matcher.store().extractor().extract(&query);

    c.bench_function("match_256_templates_sequential", |b| {
        b.iter(|| black_box(matcher.match_signature(black_box(&signature)).unwrap()));
    });

    let par_matcher = Matcher::new(build_store(256)).with_config(MatchConfig { parallel: true });
    c.bench_function("match_256_templates_parallel", |b| {
        b.iter(|| black_box(par_matcher.match_signature(black_box(&signature)).unwrap()));
    });
}

fn bench_render(c: &mut Criterion) {
    let img = make_image(640, 480, 9);
    let bbox = BoundingBox::new(100, 80, 300, 200).unwrap();
    c.bench_function("render_overlay_300x200", |b| {
        b.iter(|| black_box(render_overlay(black_box(&img), &bbox)));
    });
}

criterion_group!(benches, bench_extract, bench_match, bench_render);
criterion_main!(benches);
