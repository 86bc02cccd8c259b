use compute::{ComputeBackend, CpuBackend};
use nets::Tensor;
use std::sync::Arc;

pub fn cpu_backend() -> Arc<dyn ComputeBackend> {
    Arc::new(CpuBackend::new())
}

/// Deterministic pseudo-random tensor.
pub fn seeded_tensor(shape: Vec<usize>, seed: u64) -> Tensor {
    let rng = fastrand::Rng::with_seed(seed);
    let len = shape.iter().product();
    Tensor::from_vec(shape, (0..len).map(|_| rng.f32() * 4.0 - 2.0).collect())
}

pub fn max_abs_diff(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b).fold(0.0_f32, |m, (x, y)| m.max((x - y).abs()))
}
