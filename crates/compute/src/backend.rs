use crate::{BufferView, ComputeError, Kernel};

pub trait ComputeBackend: Send + Sync + 'static {
    /// Dispatches a kernel with the given bindings and workgroup configuration.
    ///
    /// # Arguments
    /// * `shader`: The kernel to dispatch.
    /// * `binds`: A slice of `BufferView`s laid out as described in
    ///            [`crate::layout`]: inputs, output placeholder, config.
    /// * `workgroups`: The number of workgroups to dispatch. CPU backends
    ///                 ignore it.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Vec<Vec<u8>>)` where each inner `Vec<u8>` contains the byte
    /// data of an output buffer, in the order of the output bindings.
    ///
    /// # Errors
    ///
    /// Returns `ComputeError::ShapeMismatch` if any binding is malformed or
    /// the operand dimensions disagree.
    fn dispatch(
        &self,
        shader: &Kernel,
        binds: &[BufferView],
        workgroups: [u32; 3],
    ) -> Result<Vec<Vec<u8>>, ComputeError>;
}
