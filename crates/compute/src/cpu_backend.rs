use crate::{kernels, BufferView, ComputeBackend, ComputeError, Kernel};

#[derive(Default, Debug, Clone)]
pub struct CpuBackend;

impl CpuBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ComputeBackend for CpuBackend {
    fn dispatch(
        &self,
        shader: &Kernel,
        binds: &[BufferView],
        _workgroups: [u32; 3],
    ) -> Result<Vec<Vec<u8>>, ComputeError> {
        for buffer_view in binds {
            let expected_elements = buffer_view.shape.iter().product::<usize>();
            let expected_bytes = expected_elements * buffer_view.element_size_in_bytes;

            if buffer_view.data.len() != expected_bytes {
                return Err(ComputeError::ShapeMismatch(
                    "Buffer data length does not match product of shape dimensions and element size",
                ));
            }
        }
        if binds.len() < shader.binding_count() as usize {
            return Err(ComputeError::ShapeMismatch(
                "fewer bindings than the kernel layout requires",
            ));
        }
        tracing::trace!(kernel = shader.name(), bindings = binds.len(), "cpu dispatch");
        match shader {
            Kernel::AddBroadcast => kernels::handle_add_broadcast(binds),
            Kernel::SubBroadcast => kernels::handle_sub_broadcast(binds),
            Kernel::DivBroadcast => kernels::handle_div_broadcast(binds),
            Kernel::Relu => kernels::handle_relu(binds),
            Kernel::LeakyRelu => kernels::handle_leaky_relu(binds),
            Kernel::Tanh => kernels::handle_tanh(binds),
            Kernel::Sigmoid => kernels::handle_sigmoid(binds),
            Kernel::MatMul => kernels::handle_matmul(binds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_shape_fails() {
        let cpu = CpuBackend::new();
        let bad_buf = BufferView::new(vec![0u8; 12].into(), vec![4], 4);
        let good_buf = BufferView::new(vec![0u8; 16].into(), vec![4], 4);
        let out_buf = BufferView::new(vec![0u8; 16].into(), vec![1, 4], 4);
        let cfg = BufferView::new(vec![0u8; 4].into(), vec![1], 4);
        let result = cpu.dispatch(
            &Kernel::AddBroadcast,
            &[bad_buf, good_buf, out_buf, cfg],
            [1, 1, 1],
        );
        assert!(
            matches!(result, Err(ComputeError::ShapeMismatch(_))),
            "Expected ShapeMismatch error, got {result:?}"
        );
    }

    #[test]
    fn empty_binds_fails() {
        let cpu = CpuBackend::new();
        let result = cpu.dispatch(&Kernel::MatMul, &[], [1, 1, 1]);
        assert!(matches!(result, Err(ComputeError::ShapeMismatch(_))));
    }

    #[test]
    fn missing_config_binding_fails() {
        let cpu = CpuBackend::new();
        let input = BufferView::from_f32(vec![2], &[1.0, -1.0]);
        let out = BufferView::zeros_f32(vec![2]);
        let result = cpu.dispatch(&Kernel::Relu, &[input, out], [1, 1, 1]);
        assert!(matches!(result, Err(ComputeError::ShapeMismatch(_))));
    }

    #[test]
    fn shape_product_is_zero() {
        let cpu = CpuBackend::new();
        let element_size = std::mem::size_of::<f32>();
        let empty = BufferView::new(vec![0u8; 0].into(), vec![0, 4], element_size);
        let out_zero = BufferView::new(vec![0u8; 0].into(), vec![0, 4], element_size);
        let config = BufferView::new(vec![0u8; 4].into(), vec![1], 4);

        let result = cpu.dispatch(&Kernel::Tanh, &[empty, out_zero.clone(), config.clone()], [1, 1, 1]);
        assert!(result.is_ok(), "Expected Ok for zero-product shape with zero data, got {result:?}");

        let non_zero: Vec<u8> = bytemuck::cast_slice(&[0.0f32]).to_vec();
        let bad = BufferView::new(non_zero.into(), vec![0, 4], element_size);
        let result = cpu.dispatch(&Kernel::Tanh, &[bad, out_zero, config], [1, 1, 1]);
        assert!(
            matches!(result, Err(ComputeError::ShapeMismatch(_))),
            "Expected ShapeMismatch for zero-product shape with non-zero data, got {result:?}"
        );
    }
}
