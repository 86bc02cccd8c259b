use crate::error::{NetError, Result};
use crate::tensor::Tensor;
use compute::ComputeBackend;

/// A fully connected neural network layer.
#[derive(Clone, Debug)]
pub struct Dense {
    /// The weight matrix, shaped `[in_dim, out_dim]` so a batch `x[N, in_dim]`
    /// maps to `x . w`.
    pub w: Tensor,
    /// The bias vector, shaped `[out_dim]`.
    pub b: Tensor,
    /// The number of input dimensions.
    pub in_dim: usize,
    /// The number of output dimensions.
    pub out_dim: usize,
}

impl Dense {
    /// Creates a layer from row-major `[in_dim, out_dim]` weights and a bias.
    ///
    /// # Errors
    ///
    /// Fails if the buffer lengths disagree with the dimensions.
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, in_d: usize, out_d: usize) -> Result<Self> {
        if bias.len() != out_d {
            return Err(NetError::shape("dense bias", &[out_d], &[bias.len()]));
        }
        Ok(Self {
            w: Tensor::new(vec![in_d, out_d], weights)?,
            b: Tensor::vector(bias),
            in_dim: in_d,
            out_dim: out_d,
        })
    }

    /// Glorot-uniform weights and zero biases.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn random(in_d: usize, out_d: usize, rng: &fastrand::Rng) -> Self {
        let limit = (6.0 / (in_d + out_d) as f32).sqrt();
        let weights = (0..in_d * out_d)
            .map(|_| rng.f32() * 2.0 * limit - limit)
            .collect();
        Self {
            w: Tensor::from_vec(vec![in_d, out_d], weights),
            b: Tensor::zeros(vec![out_d]),
            in_dim: in_d,
            out_dim: out_d,
        }
    }

    /// Performs the forward pass for a batch `x[N, in_dim]`.
    ///
    /// # Errors
    ///
    /// A width other than `in_dim` is rejected by the matmul kernel.
    pub fn forward(&self, x: &Tensor, backend: &dyn ComputeBackend) -> Result<Tensor> {
        let wx = x.matmul(&self.w, backend)?;
        wx.add_row(&self.b, backend)
    }

    #[must_use]
    pub fn params(&self) -> Vec<&Tensor> {
        vec![&self.w, &self.b]
    }

    pub fn params_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.w, &mut self.b]
    }
}
