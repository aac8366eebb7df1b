//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Benchmarks for frame rendering

use blinken_render::{BraillePrinter, FilterConfig, RenderPipeline, decode_jpeg};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::hint::black_box;
use std::io::Cursor;

fn frame(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    }))
}

fn bench_decode(c: &mut Criterion) {
    let mut jpeg = Vec::new();
    frame(640, 360)
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .unwrap();

    c.bench_function("decode_jpeg_640x360", |b| {
        b.iter(|| decode_jpeg(black_box(&jpeg)).unwrap());
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_pipeline");
    let image = frame(640, 360);

    for (cols, rows) in [(80u16, 24u16), (200, 60)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cols}x{rows}")),
            &image,
            |b, image| {
                let mut pipeline = RenderPipeline::new(FilterConfig::default(), cols, rows);
                b.iter(|| pipeline.render(black_box(image.clone())));
            },
        );
    }

    group.finish();
}

fn bench_braille(c: &mut Criterion) {
    let image = frame(160, 96);
    let printer = BraillePrinter::new();
    c.bench_function("braille_160x96", |b| {
        b.iter(|| printer.render(black_box(&image)));
    });
}

criterion_group!(benches, bench_decode, bench_pipeline, bench_braille);
criterion_main!(benches);
