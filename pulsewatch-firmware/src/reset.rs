//! Reset primitive

use pulsewatch_core::traits::ResetControl;

/// System reset through the Cortex-M SCB
pub struct SysReset;

impl ResetControl for SysReset {
    fn reset(&mut self) -> ! {
        defmt::flush();
        cortex_m::peripheral::SCB::sys_reset()
    }
}
