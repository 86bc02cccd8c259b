use crate::activation::Activation;
use crate::error::{NetError, Result};
use crate::tensor::Tensor;
use compute::ComputeBackend;
use serde::Deserialize;

/// Settings shared by [`crate::ValueNetwork`] and [`crate::DriftNetwork`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NetConfig {
    /// Step `t` sees observations `t..num_steps` instead of only `t`.
    pub full_obs: bool,
    /// Hidden widths shared by every per-step network.
    pub layers: Vec<usize>,
    #[serde(default)]
    pub standardization: Option<Standardization>,
    #[serde(default)]
    pub activation: Activation,
    /// Seeds weight initialisation. Unseeded networks draw from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetConfig {
    #[must_use]
    pub fn new(full_obs: bool, layers: Vec<usize>) -> Self {
        Self {
            full_obs,
            layers,
            standardization: None,
            activation: Activation::default(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_standardization(mut self, standardization: Standardization) -> Self {
        self.standardization = Some(standardization);
        self
    }

    #[must_use]
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parses a JSON settings bundle.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Parse`] for malformed JSON or missing keys.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the settings against the state and observation dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::InvalidConfig`] for a zero hidden width or
    /// standardization constants that do not fit.
    pub fn validate(&self, state_dim: usize, obs_dim: usize) -> Result<()> {
        if self.layers.contains(&0) {
            return Err(NetError::InvalidConfig(format!(
                "hidden layer widths must be positive, got {:?}",
                self.layers
            )));
        }
        if let Activation::LeakyRelu { negative_slope } = self.activation {
            if !negative_slope.is_finite() {
                return Err(NetError::InvalidConfig(format!(
                    "leaky relu slope must be finite, got {negative_slope}"
                )));
            }
        }
        match &self.standardization {
            Some(standardization) => standardization.validate(state_dim, obs_dim),
            None => Ok(()),
        }
    }

    /// Number of observation vectors each step consumes.
    #[must_use]
    pub fn window_sizes(&self, num_steps: usize) -> Vec<usize> {
        if self.full_obs {
            (0..num_steps).map(|t| num_steps - t).collect()
        } else {
            vec![1; num_steps]
        }
    }

    pub(crate) fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

/// Precomputed input statistics: `(v - mean) / std` per channel.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Standardization {
    pub x_mean: Vec<f32>,
    pub x_std: Vec<f32>,
    pub y_mean: Vec<f32>,
    pub y_std: Vec<f32>,
}

impl Standardization {
    /// Zero mean and unit standard deviation: leaves inputs unchanged.
    #[must_use]
    pub fn identity(state_dim: usize, obs_dim: usize) -> Self {
        Self {
            x_mean: vec![0.0; state_dim],
            x_std: vec![1.0; state_dim],
            y_mean: vec![0.0; obs_dim],
            y_std: vec![1.0; obs_dim],
        }
    }

    /// # Errors
    ///
    /// Fails if a vector has the wrong length, a mean is not finite, or a
    /// standard deviation is not finite and strictly positive.
    pub fn validate(&self, state_dim: usize, obs_dim: usize) -> Result<()> {
        let channels = [
            ("x_mean", &self.x_mean, state_dim),
            ("x_std", &self.x_std, state_dim),
            ("y_mean", &self.y_mean, obs_dim),
            ("y_std", &self.y_std, obs_dim),
        ];
        for (name, values, expected) in channels {
            if values.len() != expected {
                return Err(NetError::InvalidConfig(format!(
                    "standardization {name} has length {}, expected {expected}",
                    values.len()
                )));
            }
        }
        for (name, values) in [("x_mean", &self.x_mean), ("y_mean", &self.y_mean)] {
            if let Some(bad) = values.iter().find(|m| !m.is_finite()) {
                return Err(NetError::InvalidConfig(format!(
                    "standardization {name} must be finite, got {bad}"
                )));
            }
        }
        for (name, values) in [("x_std", &self.x_std), ("y_std", &self.y_std)] {
            if let Some(bad) = values.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
                return Err(NetError::InvalidConfig(format!(
                    "standardization {name} must be finite and positive, got {bad}"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn standardize_state(&self, x: &Tensor, backend: &dyn ComputeBackend) -> Result<Tensor> {
        let mean = Tensor::vector(self.x_mean.clone());
        let std = Tensor::vector(self.x_std.clone());
        x.sub_row(&mean, backend)?.div_row(&std, backend)
    }

    /// Standardizes a flattened window of `window` observation vectors.
    pub(crate) fn standardize_window(
        &self,
        y: &Tensor,
        window: usize,
        backend: &dyn ComputeBackend,
    ) -> Result<Tensor> {
        let mean = Tensor::vector(self.y_mean.clone()).tile(window);
        let std = Tensor::vector(self.y_std.clone()).tile(window);
        y.sub_row(&mean, backend)?.div_row(&std, backend)
    }
}
