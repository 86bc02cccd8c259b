//! # doobnet
//!
//! Entry point for the `doobnet` binary and re-exports of the crates it ties
//! together:
//!
//! -   **[`compute`]:** buffers, the backend trait and the CPU kernels.
//! -   **[`nets`]:** the per-step [`nets::ValueNetwork`] and
//!     [`nets::DriftNetwork`] wrappers and their settings bundle.
//!
//! The application logic lives in [`app`].

pub mod app;

pub use compute;
pub use nets;
