use compute::ComputeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetError {
    #[error("compute backend error: {0}")]
    Compute(#[from] ComputeError),
    #[error("step index {step} out of range for {num_steps} steps")]
    StepOutOfRange { step: usize, num_steps: usize },
    #[error("observations must have rank 2 (shared) or 3 (per sample), found rank {0}")]
    ObservationRank(usize),
    #[error("{what}: expected shape {expected:?}, found {found:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("invalid network configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to parse network configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl NetError {
    pub(crate) fn shape(what: &'static str, expected: &[usize], found: &[usize]) -> Self {
        NetError::ShapeMismatch {
            what,
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NetError>;
