//! Per-step approximation of the scalar value function `V_t(x, y)`.

use crate::config::{NetConfig, Standardization};
use crate::error::{NetError, Result};
use crate::mlp::Mlp;
use crate::observations::Observations;
use crate::step_inputs::StepInputs;
use crate::tensor::Tensor;
use compute::ComputeBackend;

/// One [`Mlp`] per time step, each mapping the state and its observation
/// window to a scalar.
///
/// Step `t` has input width `state_dim + window(t) * obs_dim`.
#[derive(Clone, Debug)]
pub struct ValueNetwork {
    inputs: StepInputs,
    nets: Vec<Mlp>,
}

impl ValueNetwork {
    /// # Errors
    ///
    /// Returns [`NetError::InvalidConfig`] for zero dimensions, zero steps or
    /// settings that do not fit the dimensions.
    pub fn new(num_steps: usize, state_dim: usize, obs_dim: usize, config: &NetConfig) -> Result<Self> {
        let inputs = StepInputs::new(num_steps, state_dim, obs_dim, config)?;
        let mut widths = config.layers.clone();
        widths.push(1);

        let rng = config.rng();
        let nets = inputs
            .feature_widths()
            .map(|input_dim| Mlp::new(input_dim, &widths, false, config.activation, &rng))
            .collect::<Result<Vec<_>>>()?;

        let network = Self { inputs, nets };
        tracing::debug!(
            num_steps,
            state_dim,
            obs_dim,
            windows = ?network.inputs.windows,
            params = network.num_params(),
            "built value network"
        );
        Ok(network)
    }

    /// Evaluates `V_t` for a batch of states `x[N, state_dim]`, returning `[N]`.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::StepOutOfRange`] unless `t < num_steps`, and
    /// [`NetError::ShapeMismatch`] when `x` or `y` disagree with the declared
    /// dimensions.
    pub fn forward(
        &self,
        t: usize,
        x: &Tensor,
        y: Observations<'_>,
        backend: &dyn ComputeBackend,
    ) -> Result<Tensor> {
        let features = self.inputs.features(t, x, y, backend)?;
        let h = Tensor::concat_cols(&[&features.state, &features.window])?;
        tracing::trace!(step = t, batch = features.batch, width = h.shape[1], "value forward");
        self.net(t)?.forward(&h, backend)?.squeeze_last()
    }

    fn net(&self, t: usize) -> Result<&Mlp> {
        self.nets.get(t).ok_or(NetError::StepOutOfRange {
            step: t,
            num_steps: self.inputs.num_steps,
        })
    }

    #[must_use]
    pub fn num_steps(&self) -> usize {
        self.inputs.num_steps
    }

    #[must_use]
    pub fn state_dim(&self) -> usize {
        self.inputs.state_dim
    }

    #[must_use]
    pub fn obs_dim(&self) -> usize {
        self.inputs.obs_dim
    }

    /// Number of observation vectors each step consumes.
    #[must_use]
    pub fn windows(&self) -> &[usize] {
        &self.inputs.windows
    }

    #[must_use]
    pub fn standardization(&self) -> Option<&Standardization> {
        self.inputs.standardization.as_ref()
    }

    /// The per-step sub-networks, indexed by step.
    #[must_use]
    pub fn nets(&self) -> &[Mlp] {
        &self.nets
    }

    pub fn nets_mut(&mut self) -> &mut [Mlp] {
        &mut self.nets
    }

    #[must_use]
    pub fn num_params(&self) -> usize {
        self.nets.iter().map(Mlp::num_params).sum()
    }
}
