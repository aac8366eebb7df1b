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

//! Benchmarks for frame splitting

use blinken_mjpeg::{FrameSplitter, SharedSource};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

fn source(frames: usize, frame_len: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(frames * (frame_len + 4));
    for i in 0..frames {
        data.extend_from_slice(&[0xFF, 0xD8]);
        data.extend((0..frame_len).map(|j| ((i + j) % 0xD9) as u8));
        data.extend_from_slice(&[0xFF, 0xD9]);
    }
    data
}

fn bench_split(c: &mut Criterion) {
    let data = Arc::new(source(100, 32 * 1024));
    let shared = SharedSource::new(Arc::clone(&data));

    let mut group = c.benchmark_group("split");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("100x32k", |b| {
        b.iter(|| {
            let splitter = FrameSplitter::new(shared.reader());
            black_box(splitter.map(Result::unwrap).count())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_split);
criterion_main!(benches);
