use crate::layout::{STORAGE_IN, STORAGE_IN2, STORAGE_OUT};
use crate::{BufferView, ComputeError};

/// Applies `op(a[row, i], b[i])` for every row of `a`.
///
/// Bindings `[a, b, output_placeholder, config]` expect `a` shaped
/// `[batch, dim]`, `b` shaped `[dim]` and the output shaped like `a`.
fn broadcast_rows(
    binds: &[BufferView],
    op: impl Fn(f32, f32) -> f32,
) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.len() < 4 {
        return Err(ComputeError::ShapeMismatch(
            "broadcast kernels expect 4 buffers (a, b, output_placeholder, config)",
        ));
    }
    let a_view = &binds[STORAGE_IN as usize];
    let b_view = &binds[STORAGE_IN2 as usize];
    let output_view = &binds[STORAGE_OUT as usize];

    let [batch, dim] = a_view.shape[..] else {
        return Err(ComputeError::ShapeMismatch(
            "broadcast kernels expect a rank-2 left operand",
        ));
    };
    if b_view.shape != [dim] {
        return Err(ComputeError::ShapeMismatch(
            "broadcast row length does not match the left operand's columns",
        ));
    }
    if output_view.shape != a_view.shape {
        return Err(ComputeError::ShapeMismatch(
            "broadcast output placeholder must match the left operand's shape",
        ));
    }

    if dim == 0 {
        return Ok(vec![Vec::new()]);
    }

    let a_data = a_view.read_f32()?;
    let b_data = b_view.read_f32()?;
    let mut out_data = vec![0.0f32; batch * dim];

    for (out_row, a_row) in out_data.chunks_exact_mut(dim).zip(a_data.chunks_exact(dim)) {
        for ((o, &a), &b) in out_row.iter_mut().zip(a_row).zip(&b_data) {
            *o = op(a, b);
        }
    }

    let out_bytes = bytemuck::cast_slice(&out_data).to_vec();
    Ok(vec![out_bytes])
}

/// Adds a vector to each row of a matrix.
pub fn handle_add_broadcast(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    broadcast_rows(binds, |a, b| a + b)
}

/// Subtracts a vector from each row of a matrix.
pub fn handle_sub_broadcast(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    broadcast_rows(binds, |a, b| a - b)
}

/// Divides each row of a matrix element-wise by a vector.
pub fn handle_div_broadcast(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    broadcast_rows(binds, |a, b| a / b)
}

#[cfg(test)]
mod tests {
    use crate::{f32_from_bytes, BufferView, ComputeBackend, ComputeError, CpuBackend, Kernel};

    fn run(kernel: Kernel, a: &[f32], rows: usize, b: &[f32]) -> Result<Vec<f32>, ComputeError> {
        let cpu = CpuBackend::new();
        let cols = b.len();
        let binds = [
            BufferView::from_f32(vec![rows, cols], a),
            BufferView::from_f32(vec![cols], b),
            BufferView::zeros_f32(vec![rows, cols]),
            BufferView::from_f32(vec![1], &[0.0]),
        ];
        let out = cpu.dispatch(&kernel, &binds, [1, 1, 1])?;
        Ok(f32_from_bytes(&out[0]))
    }

    #[test]
    fn adds_bias_to_every_row() {
        let out = run(Kernel::AddBroadcast, &[1.0, 2.0, 3.0, 4.0], 2, &[10.0, 20.0]).unwrap();
        assert_eq!(out, vec![11.0, 22.0, 13.0, 24.0]);
    }

    #[test]
    fn subtracts_and_divides_per_column() {
        let centred = run(Kernel::SubBroadcast, &[1.0, 4.0, 3.0, 8.0], 2, &[1.0, 2.0]).unwrap();
        assert_eq!(centred, vec![0.0, 2.0, 2.0, 6.0]);
        let scaled = run(Kernel::DivBroadcast, &centred, 2, &[2.0, 0.5]).unwrap();
        assert_eq!(scaled, vec![0.0, 4.0, 1.0, 12.0]);
    }

    #[test]
    fn zero_width_rows_produce_empty_output() {
        let out = run(Kernel::AddBroadcast, &[], 3, &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn row_length_mismatch_is_rejected() {
        let cpu = CpuBackend::new();
        let binds = [
            BufferView::from_f32(vec![2, 2], &[1.0, 2.0, 3.0, 4.0]),
            BufferView::from_f32(vec![3], &[1.0, 2.0, 3.0]),
            BufferView::zeros_f32(vec![2, 2]),
            BufferView::from_f32(vec![1], &[0.0]),
        ];
        let result = cpu.dispatch(&Kernel::SubBroadcast, &binds, [1, 1, 1]);
        assert!(matches!(result, Err(ComputeError::ShapeMismatch(_))));
    }
}
