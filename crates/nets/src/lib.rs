#![deny(clippy::all, clippy::pedantic)]

//! # nets
//!
//! Per-time-step feed-forward networks approximating the value function
//! `V_t(x, y)` and the drift function `Z_t(s, x, y)` of a Doob h-transform.
//!
//! Each wrapper owns one [`Mlp`] per time step. Step `t` consumes the state
//! and a window of observations starting at `t`: the rest of the sequence
//! when `full_obs` is set, otherwise just observation `t`. Inputs are
//! optionally standardized with precomputed statistics before evaluation.
//!
//! Arithmetic runs on a [`compute::ComputeBackend`] passed to each forward call.

pub mod activation;
pub mod config;
pub mod dense;
pub mod drift;
pub mod error;
pub mod mlp;
pub mod observations;
mod step_inputs;
pub mod tensor;
pub mod value;

pub use activation::Activation;
pub use config::{NetConfig, Standardization};
pub use dense::Dense;
pub use drift::{Aux, DriftNetwork};
pub use error::{NetError, Result};
pub use mlp::Mlp;
pub use observations::Observations;
pub use tensor::Tensor;
pub use value::ValueNetwork;
