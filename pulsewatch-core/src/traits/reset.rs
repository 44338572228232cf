//! Reset primitive

/// Cold restart of the running program
///
/// All in-memory state is discarded and execution starts again from
/// power-on. There is no way back from this call.
pub trait ResetControl {
    fn reset(&mut self) -> !;
}
