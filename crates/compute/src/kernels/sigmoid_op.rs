use super::unary_op::map_unary;
use crate::{BufferView, ComputeError};

pub fn handle_sigmoid(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    map_unary(binds, "Sigmoid kernel expects 3 buffers", |x| {
        1.0 / (1.0 + (-x).exp())
    })
}
