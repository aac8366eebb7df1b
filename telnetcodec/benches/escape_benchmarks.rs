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

//! Benchmarks for IAC escaping

use blinken_telnetcodec::{IacWriter, escape_iac};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tokio::io::AsyncWriteExt;

fn payload(size: usize, iac_every: usize) -> Vec<u8> {
    (0..size)
        .map(|i| if i % iac_every == 0 { 0xFF } else { (i % 251) as u8 })
        .collect()
}

fn bench_escape_iac(c: &mut Criterion) {
    let mut group = c.benchmark_group("escape_iac");

    for size in [64usize, 1024, 16 * 1024] {
        let data = payload(size, 97);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            let mut out = Vec::with_capacity(size * 2);
            b.iter(|| {
                out.clear();
                escape_iac(black_box(data), &mut out)
            });
        });
    }

    group.finish();
}

fn bench_iac_writer(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let frame = payload(24 * 1024, 4096);

    c.bench_function("iac_writer_frame", |b| {
        b.to_async(&runtime).iter(|| async {
            let mut writer = IacWriter::new(Vec::with_capacity(frame.len() + 16));
            writer.write_all(black_box(&frame)).await.unwrap();
            writer.into_inner()
        });
    });
}

criterion_group!(benches, bench_escape_iac, bench_iac_writer);
criterion_main!(benches);
