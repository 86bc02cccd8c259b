use crate::config::{NetConfig, Standardization};
use crate::error::{NetError, Result};
use crate::observations::Observations;
use crate::tensor::Tensor;
use compute::ComputeBackend;

/// Per-step input bookkeeping shared by the value and drift wrappers:
/// observation windows, standardization and shape checks.
#[derive(Clone, Debug)]
pub(crate) struct StepInputs {
    pub num_steps: usize,
    pub state_dim: usize,
    pub obs_dim: usize,
    pub windows: Vec<usize>,
    pub standardization: Option<Standardization>,
}

/// Standardized state and observation window for one step.
pub(crate) struct StepFeatures {
    pub batch: usize,
    pub state: Tensor,
    pub window: Tensor,
}

impl StepInputs {
    pub fn new(num_steps: usize, state_dim: usize, obs_dim: usize, config: &NetConfig) -> Result<Self> {
        if num_steps == 0 {
            return Err(NetError::InvalidConfig("number of steps must be positive".into()));
        }
        if state_dim == 0 || obs_dim == 0 {
            return Err(NetError::InvalidConfig(format!(
                "state and observation dimensions must be positive, got {state_dim} and {obs_dim}"
            )));
        }
        config.validate(state_dim, obs_dim)?;
        Ok(Self {
            num_steps,
            state_dim,
            obs_dim,
            windows: config.window_sizes(num_steps),
            standardization: config.standardization.clone(),
        })
    }

    /// Width of the state and observation features at every step.
    pub fn feature_widths(&self) -> impl Iterator<Item = usize> + '_ {
        self.windows.iter().map(|q| self.state_dim + q * self.obs_dim)
    }

    pub fn window(&self, step: usize) -> Result<usize> {
        self.windows.get(step).copied().ok_or(NetError::StepOutOfRange {
            step,
            num_steps: self.num_steps,
        })
    }

    pub fn features(
        &self,
        step: usize,
        x: &Tensor,
        y: Observations<'_>,
        backend: &dyn ComputeBackend,
    ) -> Result<StepFeatures> {
        let window = self.window(step)?;
        let batch = match x.shape[..] {
            [batch, d] if d == self.state_dim => batch,
            _ => return Err(NetError::shape("state batch", &[0, self.state_dim], &x.shape)),
        };
        if x.len() != batch * self.state_dim {
            return Err(NetError::shape("state data", &[batch * self.state_dim], &[x.len()]));
        }
        let y_window = y.window(step, window, batch, self.num_steps, self.obs_dim)?;

        let (state, window) = match &self.standardization {
            Some(standardization) => (
                standardization.standardize_state(x, backend)?,
                standardization.standardize_window(&y_window, window, backend)?,
            ),
            None => (x.clone(), y_window),
        };
        Ok(StepFeatures { batch, state, window })
    }
}
