use crate::layout::STORAGE_IN;
use crate::{BufferView, ComputeError};

/// Index of the output placeholder for single-input kernels.
pub(crate) const UNARY_OUT: usize = 1;
/// Index of the config binding for single-input kernels.
pub(crate) const UNARY_CONFIG: usize = 2;

/// Maps `f` over every element of the input binding.
///
/// Bindings `[input, output_placeholder, config]`.
pub(crate) fn map_unary(
    binds: &[BufferView],
    missing: &'static str,
    f: impl Fn(f32) -> f32,
) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.len() < 3 {
        return Err(ComputeError::ShapeMismatch(missing));
    }
    let input_view = &binds[STORAGE_IN as usize];
    if binds[UNARY_OUT].shape != input_view.shape {
        return Err(ComputeError::ShapeMismatch(
            "unary output placeholder must match the input shape",
        ));
    }
    let input_values = input_view.read_f32()?;
    let output_values: Vec<f32> = input_values.into_iter().map(f).collect();
    Ok(vec![bytemuck::cast_slice(&output_values).to_vec()])
}

#[cfg(test)]
mod tests {
    use crate::{f32_from_bytes, BufferView, ComputeBackend, CpuBackend, Kernel};

    fn test_unary_op(kernel: Kernel, input: &[f32], config: f32, expected: &[f32]) {
        let cpu = CpuBackend::new();
        let binds = [
            BufferView::from_f32(vec![input.len()], input),
            BufferView::zeros_f32(vec![input.len()]),
            BufferView::from_f32(vec![1], &[config]),
        ];
        let result_buffers = cpu.dispatch(&kernel, &binds, [1, 1, 1]).unwrap();
        let result = f32_from_bytes(&result_buffers[0]);

        assert_eq!(result.len(), expected.len());
        for (got, want) in result.iter().zip(expected) {
            assert!(
                (got - want).abs() < 1e-6,
                "Mismatch for {kernel:?}. Got: {got}, Expected: {want}"
            );
        }
    }

    #[test]
    fn test_relu() {
        test_unary_op(Kernel::Relu, &[1.0, -1.0, 0.0, 5.0, -5.0], 0.0, &[1.0, 0.0, 0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_leaky_relu() {
        test_unary_op(Kernel::LeakyRelu, &[2.0, -2.0, 0.0, -100.0], 0.01, &[2.0, -0.02, 0.0, -1.0]);
    }

    #[test]
    fn test_tanh() {
        let input = [0.0f32, 1.0, -1.0, 0.5, 20.0, -20.0];
        let expected: Vec<f32> = input.iter().map(|x| x.tanh()).collect();
        test_unary_op(Kernel::Tanh, &input, 0.0, &expected);
    }

    #[test]
    fn test_sigmoid() {
        let input = [0.0f32, 2.0, -2.0];
        let expected: Vec<f32> = input.iter().map(|&x| 1.0 / (1.0 + (-x).exp())).collect();
        test_unary_op(Kernel::Sigmoid, &input, 0.0, &expected);
    }
}
