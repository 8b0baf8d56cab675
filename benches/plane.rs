// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[macro_use]
extern crate criterion;
extern crate deepbrot;
extern crate num_cpus;

use criterion::Criterion;
use deepbrot::precision::parse_real;
use deepbrot::{PlaneMapper, PlaneRenderer, Silent};

fn renderer(precision: usize) -> PlaneRenderer {
    let plane = PlaneMapper::new(
        parse_real("-2", precision).unwrap(),
        parse_real("-1.25", precision).unwrap(),
        parse_real("3", precision).unwrap(),
        32,
        24,
    )
    .unwrap();
    PlaneRenderer::new(plane, 128, None).unwrap()
}

fn plane_benchmark(c: &mut Criterion) {
    let shallow = renderer(64);
    c.bench_function("mandelbrot 32x24 at 64 bits", move |b| {
        b.iter(|| shallow.render(num_cpus::get(), &Silent).unwrap())
    });

    let deep = renderer(512);
    c.bench_function("mandelbrot 32x24 at 512 bits", move |b| {
        b.iter(|| deep.render(num_cpus::get(), &Silent).unwrap())
    });

    let single = renderer(64);
    c.bench_function("mandelbrot 32x24 single thread", move |b| {
        b.iter(|| single.render_single(&Silent))
    });
}

criterion_group!(benches, plane_benchmark);
criterion_main!(benches);
