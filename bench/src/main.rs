use std::time::Instant;

use valo::capture::CubeCapture;
use valo::math::{vec3, Spectrum};
use valo::sh::ShBasis;

const ITERATIONS: usize = 2000;

fn bench_project(capture: &CubeCapture) {
    let start = Instant::now();
    let mut sink = 0.0f32;
    for _ in 0..ITERATIONS {
        let basis = ShBasis::project(capture);
        sink += basis.coeffs[0].r;
        if sink.is_nan() {
            panic!("We only wanted to force the loop to be executed!")
        }
    }
    let elapsed_ns = start.elapsed().as_nanos();
    let elapsed_ms = (elapsed_ns as f64) * 1e-6;
    let us_per_project = (elapsed_ns as f64) * 1e-3 / (ITERATIONS as f64);
    println!(
        "Project  took {:4.1} ms total, {:0.4} us per projection",
        elapsed_ms, us_per_project
    );
}

fn bench_irradiance(basis: &ShBasis) {
    let normal = vec3(0.3, 0.5, 0.8).normalized();
    let start = Instant::now();
    let mut sink = 0.0f32;
    for _ in 0..(ITERATIONS * 1000) {
        sink += basis.irradiance(normal).g;
        if sink.is_nan() {
            panic!("We only wanted to force the loop to be executed!")
        }
    }
    let elapsed_ns = start.elapsed().as_nanos();
    let elapsed_ms = (elapsed_ns as f64) * 1e-6;
    let ns_per_eval = (elapsed_ns as f64) / ((ITERATIONS * 1000) as f64);
    println!(
        "Evaluate took {:4.1} ms total, {:0.4} ns per eval",
        elapsed_ms, ns_per_eval
    );
}

fn main() {
    let mut capture = CubeCapture::new(16);
    capture.fill(Spectrum::new(0.8, 0.6, 0.4));

    bench_project(&capture);
    bench_irradiance(&ShBasis::project(&capture));
}
