//! Per-step approximation of the drift/score function `Z_t(s, x, y)`.

use crate::config::{NetConfig, Standardization};
use crate::error::{NetError, Result};
use crate::mlp::Mlp;
use crate::observations::Observations;
use crate::step_inputs::StepInputs;
use crate::tensor::Tensor;
use compute::ComputeBackend;

/// The auxiliary scalar input of a [`DriftNetwork`].
#[derive(Clone, Copy, Debug)]
pub enum Aux<'a> {
    /// One value shared by the whole batch.
    Shared(f32),
    /// One value per batch element, shaped `[N, 1]`.
    Batched(&'a Tensor),
}

impl Aux<'_> {
    fn column(&self, batch: usize) -> Result<Tensor> {
        match *self {
            Aux::Shared(s) => Ok(Tensor::full(vec![batch, 1], s)),
            Aux::Batched(s) if s.shape == [batch, 1] && s.len() == batch => Ok(s.clone()),
            Aux::Batched(s) => Err(NetError::shape("auxiliary input", &[batch, 1], &s.shape)),
        }
    }
}

/// One [`Mlp`] per time step, each mapping the auxiliary scalar, the state and
/// its observation window to a vector of width `state_dim`.
#[derive(Clone, Debug)]
pub struct DriftNetwork {
    inputs: StepInputs,
    nets: Vec<Mlp>,
}

impl DriftNetwork {
    /// # Errors
    ///
    /// Returns [`NetError::InvalidConfig`] for zero dimensions, zero steps or
    /// settings that do not fit the dimensions.
    pub fn new(num_steps: usize, state_dim: usize, obs_dim: usize, config: &NetConfig) -> Result<Self> {
        let inputs = StepInputs::new(num_steps, state_dim, obs_dim, config)?;
        let mut widths = config.layers.clone();
        widths.push(state_dim);

        let rng = config.rng();
        let nets = inputs
            .feature_widths()
            .map(|width| Mlp::new(width + 1, &widths, false, config.activation, &rng))
            .collect::<Result<Vec<_>>>()?;

        let network = Self { inputs, nets };
        tracing::debug!(
            num_steps,
            state_dim,
            obs_dim,
            windows = ?network.inputs.windows,
            params = network.num_params(),
            "built drift network"
        );
        Ok(network)
    }

    /// Evaluates `Z_t` for a batch of states `x[N, state_dim]`, returning
    /// `[N, state_dim]`.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::StepOutOfRange`] unless `t < num_steps`, and
    /// [`NetError::ShapeMismatch`] when `s`, `x` or `y` disagree with the
    /// declared dimensions.
    pub fn forward(
        &self,
        t: usize,
        s: Aux<'_>,
        x: &Tensor,
        y: Observations<'_>,
        backend: &dyn ComputeBackend,
    ) -> Result<Tensor> {
        let features = self.inputs.features(t, x, y, backend)?;
        let s = s.column(features.batch)?;
        let h = Tensor::concat_cols(&[&s, &features.state, &features.window])?;
        tracing::trace!(step = t, batch = features.batch, width = h.shape[1], "drift forward");
        self.net(t)?.forward(&h, backend)
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

    #[must_use]
    pub fn windows(&self) -> &[usize] {
        &self.inputs.windows
    }

    #[must_use]
    pub fn standardization(&self) -> Option<&Standardization> {
        self.inputs.standardization.as_ref()
    }

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
