use crate::error::Result;
use crate::tensor::Tensor;
use compute::{ComputeBackend, Kernel};
use serde::Deserialize;

const DEFAULT_NEGATIVE_SLOPE: f32 = 0.01;

/// Nonlinearity applied between the layers of an [`crate::Mlp`].
///
/// Deserialised from `{"kind": "leaky_relu", "negative_slope": 0.2}`,
/// `{"kind": "tanh"}` and so on.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activation {
    LeakyRelu {
        #[serde(default = "default_negative_slope")]
        negative_slope: f32,
    },
    Relu,
    Tanh,
    Sigmoid,
}

fn default_negative_slope() -> f32 {
    DEFAULT_NEGATIVE_SLOPE
}

impl Default for Activation {
    fn default() -> Self {
        Activation::LeakyRelu { negative_slope: DEFAULT_NEGATIVE_SLOPE }
    }
}

impl Activation {
    /// Applies the nonlinearity element-wise on the backend.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    pub fn apply(&self, x: &Tensor, backend: &dyn ComputeBackend) -> Result<Tensor> {
        let (kernel, scalar) = match *self {
            Activation::LeakyRelu { negative_slope } => (Kernel::LeakyRelu, negative_slope),
            Activation::Relu => (Kernel::Relu, 0.0),
            Activation::Tanh => (Kernel::Tanh, 0.0),
            Activation::Sigmoid => (Kernel::Sigmoid, 0.0),
        };
        x.map(kernel, scalar, backend)
    }
}
