//! Single-unit step throughput at increasing particle counts.
//!
//! Run with: cargo bench -p kernel --bench scaling

use std::time::Instant;

use kernel::constants::box_size;
use kernel::{LocalKernel, Particle};

fn create_lattice(num_parts: usize) -> (Vec<Particle>, f64) {
    let size = box_size(num_parts);
    let sx = (num_parts as f64).sqrt().ceil() as usize;
    let sy = (num_parts + sx - 1) / sx;

    let mut parts = Vec::with_capacity(num_parts);
    for k in 0..num_parts {
        parts.push(Particle {
            id: (k + 1) as u64,
            x: size * (1.0 + (k % sx) as f64) / (1 + sx) as f64,
            y: size * (1.0 + (k / sx) as f64) / (1 + sy) as f64,
            vx: if k % 2 == 0 { 0.5 } else { -0.5 },
            vy: if k % 3 == 0 { 0.5 } else { -0.5 },
            ax: 0.0,
            ay: 0.0,
        });
    }
    (parts, size)
}

fn main() {
    // (particles, steps) -- fewer steps at larger counts
    let configs = [(1_000, 400), (4_000, 200), (16_000, 50), (64_000, 10)];

    println!(
        "{:>10} {:>8} {:>10} {:>12} {:>12}",
        "Particles", "Steps", "Time (s)", "steps/s", "ms/step"
    );

    for &(n, steps) in &configs {
        let (parts, size) = create_lattice(n);
        let mut k = LocalKernel::new(parts, size);

        // Warmup
        for _ in 0..3 {
            k.step();
        }

        let start = Instant::now();
        for _ in 0..steps {
            k.step();
        }
        let elapsed = start.elapsed().as_secs_f64();

        println!(
            "{:>10} {:>8} {:>10.3} {:>12.1} {:>12.3}",
            n,
            steps,
            elapsed,
            steps as f64 / elapsed,
            1000.0 * elapsed / steps as f64
        );
    }
}
