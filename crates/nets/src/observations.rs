use crate::error::{NetError, Result};
use crate::tensor::Tensor;

/// The observation sequence handed to a per-step network.
#[derive(Clone, Copy, Debug)]
pub enum Observations<'a> {
    /// One independent sequence per batch element, shaped `[N, T, p]`.
    PerSample(&'a Tensor),
    /// A single sequence shared by the whole batch, shaped `[T, p]`.
    Shared(&'a Tensor),
}

impl<'a> Observations<'a> {
    /// Picks the variant from the tensor's rank.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::ObservationRank`] for ranks other than 2 and 3.
    pub fn from_tensor(y: &'a Tensor) -> Result<Self> {
        match y.rank() {
            2 => Ok(Observations::Shared(y)),
            3 => Ok(Observations::PerSample(y)),
            rank => Err(NetError::ObservationRank(rank)),
        }
    }

    #[must_use]
    pub fn tensor(&self) -> &'a Tensor {
        match *self {
            Observations::PerSample(y) | Observations::Shared(y) => y,
        }
    }

    /// Flattens observations `start..start + len` into `[batch, len * obs_dim]`.
    ///
    /// The shared sequence is replicated across the batch.
    pub(crate) fn window(
        &self,
        start: usize,
        len: usize,
        batch: usize,
        num_steps: usize,
        obs_dim: usize,
    ) -> Result<Tensor> {
        let stop = start + len;
        let y = self.tensor();
        if y.len() != y.shape.iter().product::<usize>() {
            return Err(NetError::shape("observation data", &y.shape, &[y.len()]));
        }
        match *self {
            Observations::Shared(y) => {
                if y.shape != [num_steps, obs_dim] {
                    return Err(shape_error(y, &[num_steps, obs_dim]));
                }
                let flat = Tensor::vector(y.data[start * obs_dim..stop * obs_dim].to_vec());
                Ok(flat.repeat_rows(batch))
            }
            Observations::PerSample(y) => {
                if y.shape != [batch, num_steps, obs_dim] {
                    return Err(shape_error(y, &[batch, num_steps, obs_dim]));
                }
                let stride = num_steps * obs_dim;
                let mut data = Vec::with_capacity(batch * len * obs_dim);
                for sample in y.data.chunks_exact(stride) {
                    data.extend_from_slice(&sample[start * obs_dim..stop * obs_dim]);
                }
                Ok(Tensor::from_vec(vec![batch, len * obs_dim], data))
            }
        }
    }
}

fn shape_error(y: &Tensor, expected: &[usize]) -> NetError {
    if matches!(y.rank(), 2 | 3) && y.rank() == expected.len() {
        NetError::shape("observations", expected, &y.shape)
    } else if matches!(y.rank(), 2 | 3) {
        NetError::shape("observations (variant does not match rank)", expected, &y.shape)
    } else {
        NetError::ObservationRank(y.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_window_is_replicated_across_batch() {
        // T = 3, p = 2
        let y = Tensor::from_vec(vec![3, 2], vec![0.0, 1.0, 10.0, 11.0, 20.0, 21.0]);
        let w = Observations::Shared(&y).window(1, 2, 3, 3, 2).unwrap();
        assert_eq!(w.shape, vec![3, 4]);
        for row in w.data.chunks_exact(4) {
            assert_eq!(row, &[10.0, 11.0, 20.0, 21.0]);
        }
    }

    #[test]
    fn per_sample_window_selects_each_sequence() {
        // N = 2, T = 3, p = 1
        let y = Tensor::from_vec(vec![2, 3, 1], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let w = Observations::PerSample(&y).window(2, 1, 2, 3, 1).unwrap();
        assert_eq!(w.shape, vec![2, 1]);
        assert_eq!(w.data, vec![3.0, 6.0]);
    }

    #[test]
    fn per_sample_batch_must_match_states() {
        let y = Tensor::zeros(vec![4, 3, 1]);
        let err = Observations::PerSample(&y).window(0, 1, 5, 3, 1).unwrap_err();
        assert!(matches!(err, NetError::ShapeMismatch { .. }));
    }

    #[test]
    fn rank_decides_variant() {
        let shared = Tensor::zeros(vec![3, 1]);
        let per_sample = Tensor::zeros(vec![2, 3, 1]);
        let vector = Tensor::zeros(vec![3]);
        assert!(matches!(Observations::from_tensor(&shared), Ok(Observations::Shared(_))));
        assert!(matches!(Observations::from_tensor(&per_sample), Ok(Observations::PerSample(_))));
        assert!(matches!(Observations::from_tensor(&vector), Err(NetError::ObservationRank(1))));
    }

    #[test]
    fn mislabelled_rank_is_reported() {
        let y = Tensor::zeros(vec![1, 2, 3, 1]);
        let err = Observations::Shared(&y).window(0, 1, 1, 3, 1).unwrap_err();
        assert!(matches!(err, NetError::ObservationRank(4)));
    }
}
