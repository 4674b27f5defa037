//! Sample-data factories for the demo scene.
//!
//! Data construction is explicit and driver-invoked; nothing here is
//! process-wide state.

use lyra_engine::coords::Vec2;
use rand::Rng;

/// `n` positions with x linspaced over `[0, span]` and y drawn from a
/// gaussian with standard deviation `amplitude`.
pub fn noisy_line(n: usize, span: f32, amplitude: f32) -> Vec<Vec2> {
    let mut rng = rand::thread_rng();
    let step = span / (n.saturating_sub(1)).max(1) as f32;

    (0..n)
        .map(|i| Vec2::new(i as f32 * step, amplitude * standard_normal(&mut rng)))
        .collect()
}

/// Standard normal sample via Box-Muller.
fn standard_normal<R: Rng>(rng: &mut R) -> f32 {
    let u1: f32 = rng.gen_range(f32::MIN_POSITIVE..1.0);
    let u2: f32 = rng.gen_range(0.0f32..1.0);
    (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos()
}
