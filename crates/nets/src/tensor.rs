use crate::error::{NetError, Result};
use compute::{f32_from_bytes, BufferView, ComputeBackend, ComputeError, Kernel, MatMulConfig};

/// A dense row-major `f32` tensor.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    pub data: Vec<f32>,
    pub shape: Vec<usize>,
}

impl Tensor {
    /// Builds a tensor from data whose length is known to match `shape`.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` differs from the product of `shape`. Use
    /// [`Tensor::new`] for caller-supplied data.
    #[must_use]
    pub fn from_vec(shape: Vec<usize>, data: Vec<f32>) -> Self {
        assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { data, shape }
    }

    /// Checked constructor.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::ShapeMismatch`] if `data.len()` differs from the
    /// product of `shape`.
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        if shape.iter().product::<usize>() != data.len() {
            return Err(NetError::shape("tensor data", &shape, &[data.len()]));
        }
        Ok(Self { data, shape })
    }

    #[must_use]
    pub fn zeros(shape: Vec<usize>) -> Self {
        Self::full(shape, 0.0)
    }

    #[must_use]
    pub fn full(shape: Vec<usize>, value: f32) -> Self {
        let len = shape.iter().product();
        Self { data: vec![value; len], shape }
    }

    /// A rank-1 tensor.
    #[must_use]
    pub fn vector(data: Vec<f32>) -> Self {
        Self { shape: vec![data.len()], data }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns `(rows, cols)` of a rank-2 tensor.
    pub(crate) fn matrix_dims(&self, what: &'static str) -> Result<(usize, usize)> {
        match self.shape[..] {
            [rows, cols] => Ok((rows, cols)),
            _ => Err(NetError::shape(what, &[0, 0], &self.shape)),
        }
    }

    /// Row `i` of a rank-2 tensor.
    pub(crate) fn row(&self, i: usize, cols: usize) -> &[f32] {
        &self.data[i * cols..(i + 1) * cols]
    }

    fn view(&self) -> BufferView {
        BufferView::from_f32(self.shape.clone(), &self.data)
    }

    /// `self[m, k] x rhs[k, n]` on the backend.
    ///
    /// # Errors
    ///
    /// Both operands must be rank 2; a disagreement of the inner dimension is
    /// reported by the matmul kernel as [`compute::ComputeError::ShapeMismatch`].
    pub fn matmul(&self, rhs: &Tensor, backend: &dyn ComputeBackend) -> Result<Tensor> {
        let (m, k) = self.matrix_dims("matmul left operand")?;
        let (_, n) = rhs.matrix_dims("matmul right operand")?;
        let config = MatMulConfig {
            m: dim_u32(m)?,
            k: dim_u32(k)?,
            n: dim_u32(n)?,
        };
        let binds = [
            self.view(),
            rhs.view(),
            BufferView::zeros_f32(vec![m, n]),
            config.into_view(),
        ];
        run_kernel(backend, Kernel::MatMul, &binds, vec![m, n])
    }

    /// Adds `row` to every row of `self`.
    ///
    /// # Errors
    ///
    /// Fails if `self` is not rank 2 or `row` does not match its columns.
    pub fn add_row(&self, row: &Tensor, backend: &dyn ComputeBackend) -> Result<Tensor> {
        self.broadcast_row(Kernel::AddBroadcast, row, backend)
    }

    /// Subtracts `row` from every row of `self`.
    ///
    /// # Errors
    ///
    /// Fails if `self` is not rank 2 or `row` does not match its columns.
    pub fn sub_row(&self, row: &Tensor, backend: &dyn ComputeBackend) -> Result<Tensor> {
        self.broadcast_row(Kernel::SubBroadcast, row, backend)
    }

    /// Divides every row of `self` element-wise by `row`.
    ///
    /// # Errors
    ///
    /// Fails if `self` is not rank 2 or `row` does not match its columns.
    pub fn div_row(&self, row: &Tensor, backend: &dyn ComputeBackend) -> Result<Tensor> {
        self.broadcast_row(Kernel::DivBroadcast, row, backend)
    }

    fn broadcast_row(
        &self,
        kernel: Kernel,
        row: &Tensor,
        backend: &dyn ComputeBackend,
    ) -> Result<Tensor> {
        self.matrix_dims("broadcast left operand")?;
        let binds = [
            self.view(),
            row.view(),
            BufferView::zeros_f32(self.shape.clone()),
            BufferView::from_f32(vec![1], &[0.0]),
        ];
        run_kernel(backend, kernel, &binds, self.shape.clone())
    }

    /// Element-wise kernel with a single `f32` config scalar.
    pub(crate) fn map(
        &self,
        kernel: Kernel,
        scalar: f32,
        backend: &dyn ComputeBackend,
    ) -> Result<Tensor> {
        let binds = [
            self.view(),
            BufferView::zeros_f32(self.shape.clone()),
            BufferView::from_f32(vec![1], &[scalar]),
        ];
        run_kernel(backend, kernel, &binds, self.shape.clone())
    }

    /// Concatenates rank-2 tensors with equal row counts along the feature axis.
    ///
    /// # Errors
    ///
    /// Fails if any part is not rank 2 or the row counts differ.
    pub fn concat_cols(parts: &[&Tensor]) -> Result<Tensor> {
        let mut rows = None;
        let mut widths = Vec::with_capacity(parts.len());
        for part in parts {
            let (r, c) = part.matrix_dims("concatenated part")?;
            if part.len() != r * c {
                return Err(NetError::shape("concatenated part data", &[r * c], &[part.len()]));
            }
            match rows {
                Some(expected) if expected != r => {
                    return Err(NetError::shape("concatenated part", &[expected, c], &part.shape));
                }
                _ => rows = Some(r),
            }
            widths.push(c);
        }
        let rows = rows.unwrap_or(0);
        let total: usize = widths.iter().sum();
        let mut data = Vec::with_capacity(rows * total);
        for i in 0..rows {
            for (part, &cols) in parts.iter().zip(&widths) {
                data.extend_from_slice(part.row(i, cols));
            }
        }
        Ok(Tensor::from_vec(vec![rows, total], data))
    }

    /// Stacks `times` copies of a rank-1 tensor as the rows of a matrix.
    #[must_use]
    pub fn repeat_rows(&self, times: usize) -> Tensor {
        let mut data = Vec::with_capacity(self.len() * times);
        for _ in 0..times {
            data.extend_from_slice(&self.data);
        }
        Tensor::from_vec(vec![times, self.len()], data)
    }

    /// Concatenates `times` copies of a rank-1 tensor end to end.
    #[must_use]
    pub fn tile(&self, times: usize) -> Tensor {
        let mut tiled = self.repeat_rows(times);
        tiled.shape = vec![tiled.data.len()];
        tiled
    }

    /// Drops a trailing dimension of size one.
    ///
    /// # Errors
    ///
    /// Fails if the last dimension is not 1.
    pub fn squeeze_last(mut self) -> Result<Tensor> {
        if self.shape.last() != Some(&1) {
            return Err(NetError::shape("squeezed tensor", &[0, 1], &self.shape));
        }
        self.shape.pop();
        Ok(self)
    }
}

fn dim_u32(dim: usize) -> Result<u32> {
    u32::try_from(dim)
        .map_err(|_| NetError::InvalidConfig(format!("dimension {dim} exceeds u32 range")))
}

fn run_kernel(
    backend: &dyn ComputeBackend,
    kernel: Kernel,
    binds: &[BufferView],
    out_shape: Vec<usize>,
) -> Result<Tensor> {
    let buffers = backend.dispatch(&kernel, binds, [1, 1, 1])?;
    let bytes = buffers
        .first()
        .ok_or(ComputeError::ShapeMismatch("kernel returned no output buffer"))?;
    Tensor::new(out_shape, f32_from_bytes(bytes))
}
