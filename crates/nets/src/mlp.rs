use crate::activation::Activation;
use crate::dense::Dense;
use crate::error::{NetError, Result};
use crate::tensor::Tensor;
use compute::ComputeBackend;

/// A multilayer perceptron: a stack of [`Dense`] layers with a shared
/// nonlinearity between them.
///
/// The nonlinearity follows every layer but the last; the last layer is
/// activated only when `activate_final` is set.
#[derive(Clone, Debug)]
pub struct Mlp {
    layers: Vec<Dense>,
    input_dim: usize,
    layer_widths: Vec<usize>,
    activate_final: bool,
    activation: Activation,
}

impl Mlp {
    /// Builds a randomly initialised block mapping `input_dim` features to
    /// `layer_widths.last()` outputs.
    ///
    /// # Errors
    ///
    /// Fails if `input_dim` is zero, `layer_widths` is empty or contains a
    /// zero width.
    pub fn new(
        input_dim: usize,
        layer_widths: &[usize],
        activate_final: bool,
        activation: Activation,
        rng: &fastrand::Rng,
    ) -> Result<Self> {
        if input_dim == 0 {
            return Err(NetError::InvalidConfig("input dimension must be positive".into()));
        }
        if layer_widths.is_empty() {
            return Err(NetError::InvalidConfig("at least one layer width is required".into()));
        }
        if layer_widths.contains(&0) {
            return Err(NetError::InvalidConfig(format!(
                "layer widths must be positive, got {layer_widths:?}"
            )));
        }

        let mut layers = Vec::with_capacity(layer_widths.len());
        let mut prev_width = input_dim;
        for &width in layer_widths {
            layers.push(Dense::random(prev_width, width, rng));
            prev_width = width;
        }
        Ok(Self {
            layers,
            input_dim,
            layer_widths: layer_widths.to_vec(),
            activate_final,
            activation,
        })
    }

    /// Assembles a block from existing layers.
    ///
    /// # Errors
    ///
    /// Fails if `layers` is empty or consecutive layers do not chain.
    pub fn from_layers(layers: Vec<Dense>, activate_final: bool, activation: Activation) -> Result<Self> {
        let first = layers
            .first()
            .ok_or_else(|| NetError::InvalidConfig("at least one layer is required".into()))?;
        let input_dim = first.in_dim;
        for pair in layers.windows(2) {
            if pair[0].out_dim != pair[1].in_dim {
                return Err(NetError::shape(
                    "chained layer input",
                    &[pair[0].out_dim],
                    &[pair[1].in_dim],
                ));
            }
        }
        let layer_widths = layers.iter().map(|l| l.out_dim).collect();
        Ok(Self {
            layers,
            input_dim,
            layer_widths,
            activate_final,
            activation,
        })
    }

    /// Evaluates the block on a batch `x[N, input_dim]`, returning
    /// `[N, output_dim]`.
    ///
    /// # Errors
    ///
    /// A width other than `input_dim` fails in the first layer's matmul.
    pub fn forward(&self, x: &Tensor, backend: &dyn ComputeBackend) -> Result<Tensor> {
        let Some((last, hidden)) = self.layers.split_last() else {
            return Err(NetError::InvalidConfig("feed-forward block has no layers".into()));
        };
        let mut h = x.clone();
        for layer in hidden {
            h = self.activation.apply(&layer.forward(&h, backend)?, backend)?;
        }
        let out = last.forward(&h, backend)?;
        if self.activate_final {
            self.activation.apply(&out, backend)
        } else {
            Ok(out)
        }
    }

    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    #[must_use]
    pub fn output_dim(&self) -> usize {
        self.layer_widths.last().copied().unwrap_or(self.input_dim)
    }

    #[must_use]
    pub fn layer_widths(&self) -> &[usize] {
        &self.layer_widths
    }

    #[must_use]
    pub fn activate_final(&self) -> bool {
        self.activate_final
    }

    #[must_use]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[must_use]
    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    #[must_use]
    pub fn params(&self) -> Vec<&Tensor> {
        self.layers.iter().flat_map(Dense::params).collect()
    }

    pub fn params_mut(&mut self) -> Vec<&mut Tensor> {
        self.layers.iter_mut().flat_map(Dense::params_mut).collect()
    }

    /// Total number of scalar weights and biases.
    #[must_use]
    pub fn num_params(&self) -> usize {
        self.params().iter().map(|p| p.len()).sum()
    }
}
