#![deny(clippy::all, clippy::pedantic)]

//! Tensor-math layer for the `nets` crate.
//!
//! Every operation is a [`Kernel`] dispatched on a [`ComputeBackend`] with a
//! slice of [`BufferView`] bindings. The binding order follows [`layout`]:
//! inputs first, then an output placeholder, then a config buffer.

use std::sync::Arc;
use thiserror::Error;

mod backend;
mod cpu_backend;
pub mod kernels;
pub mod layout;

pub use backend::ComputeBackend;
pub use cpu_backend::CpuBackend;
pub use kernels::MatMulConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    #[error("buffer shape mismatch: {0}")]
    ShapeMismatch(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    // Row-broadcast element-wise: `[batch, dim] op [dim]`
    AddBroadcast,
    SubBroadcast,
    DivBroadcast,

    // Activations
    Relu,
    LeakyRelu,
    Tanh,
    Sigmoid,

    // Linear algebra
    MatMul,
}

impl Kernel {
    #[must_use]
    pub const fn binding_count(&self) -> u32 {
        layout::binding_count(self)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Kernel::AddBroadcast => "AddBroadcast",
            Kernel::SubBroadcast => "SubBroadcast",
            Kernel::DivBroadcast => "DivBroadcast",
            Kernel::Relu => "Relu",
            Kernel::LeakyRelu => "LeakyRelu",
            Kernel::Tanh => "Tanh",
            Kernel::Sigmoid => "Sigmoid",
            Kernel::MatMul => "MatMul",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BufferView {
    pub data: Arc<[u8]>,
    pub shape: Vec<usize>, // Number of elements per dimension
    pub element_size_in_bytes: usize,
}

impl BufferView {
    #[must_use]
    pub fn new(data: Arc<[u8]>, shape: Vec<usize>, element_size_in_bytes: usize) -> Self {
        Self { data, shape, element_size_in_bytes }
    }

    /// Packs `values` as little-endian `f32` bytes.
    #[must_use]
    pub fn from_f32(shape: Vec<usize>, values: &[f32]) -> Self {
        let bytes: Arc<[u8]> = bytemuck::cast_slice(values).to_vec().into();
        Self::new(bytes, shape, std::mem::size_of::<f32>())
    }

    /// A zero-filled `f32` buffer, used as the output placeholder binding.
    #[must_use]
    pub fn zeros_f32(shape: Vec<usize>) -> Self {
        let len = shape.iter().product::<usize>();
        let bytes: Arc<[u8]> = vec![0u8; len * std::mem::size_of::<f32>()].into();
        Self::new(bytes, shape, std::mem::size_of::<f32>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the buffer back as `f32` values.
    ///
    /// # Errors
    ///
    /// Returns [`ComputeError::ShapeMismatch`] if the buffer does not hold
    /// `f32` elements.
    pub fn read_f32(&self) -> Result<Vec<f32>, ComputeError> {
        if self.element_size_in_bytes != std::mem::size_of::<f32>() {
            return Err(ComputeError::ShapeMismatch("buffer does not hold f32 data"));
        }
        Ok(f32_from_bytes(&self.data))
    }
}

/// Decodes a byte buffer returned by [`ComputeBackend::dispatch`].
///
/// Backend outputs are plain `Vec<u8>` with no alignment guarantee, so values
/// are read unaligned.
#[must_use]
pub fn f32_from_bytes(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(std::mem::size_of::<f32>())
        .map(bytemuck::pod_read_unaligned::<f32>)
        .collect()
}

/// Returns the compute backend used by default.
///
/// Only the CPU backend ships with this crate.
#[must_use]
pub fn default_backend() -> Arc<dyn ComputeBackend> {
    tracing::info!("Using CpuBackend.");
    Arc::new(CpuBackend::new())
}
