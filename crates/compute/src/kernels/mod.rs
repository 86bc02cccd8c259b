// This module re-exports handlers for each kernel operation.

// Row-broadcast element-wise operations
pub mod broadcast_op;
pub use broadcast_op::{handle_add_broadcast, handle_div_broadcast, handle_sub_broadcast};

// Activations
mod unary_op;
pub mod relu_op;
pub use relu_op::handle_relu;
pub mod leaky_relu_op;
pub use leaky_relu_op::handle_leaky_relu;
pub mod tanh_op;
pub use tanh_op::handle_tanh;
pub mod sigmoid_op;
pub use sigmoid_op::handle_sigmoid;

// Linear algebra
pub mod matmul_op;
pub use matmul_op::{handle_matmul, MatMulConfig};
