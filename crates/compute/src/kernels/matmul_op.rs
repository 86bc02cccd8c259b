use crate::layout::{STORAGE_IN, STORAGE_IN2, STORAGE_OUT, UNIFORM_SC};
use crate::{BufferView, ComputeError};

/// Dimensions of `A[m, k] x B[k, n]`, passed in the config binding.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MatMulConfig {
    pub m: u32,
    pub k: u32,
    pub n: u32,
}

impl MatMulConfig {
    #[must_use]
    pub fn into_view(self) -> BufferView {
        BufferView::new(
            bytemuck::bytes_of(&self).to_vec().into(),
            vec![1],
            std::mem::size_of::<Self>(),
        )
    }
}

/// Multiplies `a` (`[m, k]`) by `b` (`[k, n]`).
///
/// Bindings `[a, b, output_placeholder, config]`. Any disagreement between
/// the config dimensions and the operand shapes is a dimension mismatch.
pub fn handle_matmul(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.len() < 4 {
        return Err(ComputeError::ShapeMismatch(
            "MatMul kernel expects 4 buffers",
        ));
    }
    let a_view = &binds[STORAGE_IN as usize];
    let b_view = &binds[STORAGE_IN2 as usize];
    let out_view = &binds[STORAGE_OUT as usize];
    let config_view = &binds[UNIFORM_SC as usize];

    if config_view.data.len() != std::mem::size_of::<MatMulConfig>() {
        return Err(ComputeError::ShapeMismatch(
            "MatMul config buffer has incorrect size",
        ));
    }
    let config: MatMulConfig = bytemuck::pod_read_unaligned(&config_view.data);
    let m = config.m as usize;
    let k = config.k as usize;
    let n = config.n as usize;

    if a_view.element_size_in_bytes != std::mem::size_of::<f32>()
        || b_view.element_size_in_bytes != std::mem::size_of::<f32>()
    {
        return Err(ComputeError::ShapeMismatch(
            "MatMul kernel currently only supports f32 data for matrices A and B",
        ));
    }
    if a_view.shape != [m, k] {
        return Err(ComputeError::ShapeMismatch(
            "Matrix A shape in BufferView does not match M,K from config",
        ));
    }
    if b_view.shape != [k, n] {
        return Err(ComputeError::ShapeMismatch(
            "Matrix B shape in BufferView does not match K,N from config",
        ));
    }
    if out_view.shape != [m, n] {
        return Err(ComputeError::ShapeMismatch(
            "Output shape in BufferView does not match M,N from config",
        ));
    }

    let a_data = a_view.read_f32()?;
    let b_data = b_view.read_f32()?;

    let mut output_data = vec![0.0f32; m * n];
    for i in 0..m {
        let a_row = &a_data[i * k..(i + 1) * k];
        for j in 0..n {
            let mut sum = 0.0f32;
            for (l, &a) in a_row.iter().enumerate() {
                sum += a * b_data[l * n + j];
            }
            output_data[i * n + j] = sum;
        }
    }

    let out_bytes = bytemuck::cast_slice(&output_data).to_vec();
    Ok(vec![out_bytes])
}

#[cfg(test)]
mod tests {
    use super::MatMulConfig;
    use crate::{f32_from_bytes, BufferView, ComputeBackend, ComputeError, CpuBackend, Kernel};

    #[test]
    fn multiplies_matrices() {
        let cpu = CpuBackend::new();
        let a = BufferView::from_f32(vec![2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = BufferView::from_f32(vec![3, 2], &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let out = BufferView::zeros_f32(vec![2, 2]);
        let config = MatMulConfig { m: 2, k: 3, n: 2 }.into_view();

        let result_buffers = cpu
            .dispatch(&Kernel::MatMul, &[a, b, out, config], [1, 1, 1])
            .expect("Dispatch for MatMul failed");

        assert_eq!(result_buffers.len(), 1);
        let output_values = f32_from_bytes(&result_buffers[0]);
        let expected = [58.0f32, 64.0, 139.0, 154.0];
        for (i, (got, want)) in output_values.iter().zip(expected.iter()).enumerate() {
            assert!(
                (got - want).abs() < 1e-6,
                "Mismatch for MatMul at index {i}. Got: {got}, Expected: {want}"
            );
        }
    }

    #[test]
    fn inner_dimension_mismatch_is_rejected() {
        let cpu = CpuBackend::new();
        let a = BufferView::from_f32(vec![1, 3], &[1.0, 2.0, 3.0]);
        let b = BufferView::from_f32(vec![2, 1], &[1.0, 1.0]);
        let out = BufferView::zeros_f32(vec![1, 1]);
        let config = MatMulConfig { m: 1, k: 3, n: 1 }.into_view();

        let result = cpu.dispatch(&Kernel::MatMul, &[a, b, out, config], [1, 1, 1]);
        assert!(matches!(result, Err(ComputeError::ShapeMismatch(_))));
    }

    #[test]
    fn wrong_config_size_is_rejected() {
        let cpu = CpuBackend::new();
        let a = BufferView::from_f32(vec![1, 1], &[1.0]);
        let b = BufferView::from_f32(vec![1, 1], &[1.0]);
        let out = BufferView::zeros_f32(vec![1, 1]);
        let config = BufferView::new(vec![0u8; 4].into(), vec![1], 4);

        let result = cpu.dispatch(&Kernel::MatMul, &[a, b, out, config], [1, 1, 1]);
        assert!(matches!(result, Err(ComputeError::ShapeMismatch(_))));
    }
}
