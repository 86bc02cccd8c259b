use super::unary_op::{map_unary, UNARY_CONFIG};
use crate::{BufferView, ComputeError};

/// Leaky rectified linear unit.
///
/// Bindings `[input, output_placeholder, config]` where `config` holds a
/// single `f32`: the slope applied to negative inputs.
pub fn handle_leaky_relu(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.len() < 3 {
        return Err(ComputeError::ShapeMismatch(
            "LeakyRelu kernel expects 3 buffers",
        ));
    }
    let slope = match binds[UNARY_CONFIG].read_f32()?.as_slice() {
        [slope] => *slope,
        _ => {
            return Err(ComputeError::ShapeMismatch(
                "LeakyRelu config must hold exactly one f32 slope",
            ))
        }
    };
    map_unary(binds, "LeakyRelu kernel expects 3 buffers", move |x| {
        if x >= 0.0 {
            x
        } else {
            slope * x
        }
    })
}
