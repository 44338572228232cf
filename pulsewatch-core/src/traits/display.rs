//! Status display trait

use crate::monitor::DisplayView;
use crate::state::RestartReason;

/// Errors that can occur while updating the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with the display
    Communication,
    /// Display not initialized
    NotInitialized,
}

/// Renders monitor output for the user
pub trait StatusDisplay {
    /// Draw the per-tick view
    fn show(&mut self, view: &DisplayView) -> Result<(), DisplayError>;

    /// Draw the restart notice shown just before the reset
    fn show_restart(&mut self, reason: &RestartReason) -> Result<(), DisplayError>;
}
