pub const STORAGE_IN: u32 = 0;
pub const STORAGE_IN2: u32 = 1; // binary ops
pub const STORAGE_OUT: u32 = 2; // binary ops; unary ops put their output at 1
pub const UNIFORM_SC: u32 = 3; // dims or scalars

const _: () = assert!(STORAGE_OUT == 2);

/// Return expected number of bindings for each kernel.
#[must_use]
pub const fn binding_count(kernel: &crate::Kernel) -> u32 {
    match kernel {
        crate::Kernel::AddBroadcast
        | crate::Kernel::SubBroadcast
        | crate::Kernel::DivBroadcast
        | crate::Kernel::MatMul => 4,
        crate::Kernel::Relu
        | crate::Kernel::LeakyRelu
        | crate::Kernel::Tanh
        | crate::Kernel::Sigmoid => 3,
    }
}
