//! The contract every bus-attached device satisfies.

use crate::Bus;

/// A device attached to the shared bus.
///
/// The host clocks every device once per tick, in fixed registration
/// order, handing each one the bus. The bus is passed in, not owned, so
/// it can be shared by the CPU and every peripheral on the board.
pub trait BusDevice {
    /// Advance one host tick, observing and possibly driving the bus.
    fn clock(&mut self, bus: &mut Bus);

    /// Side-effect-free peek at an address, for tests and inspection.
    ///
    /// Returns `None` when the address is outside this device's window.
    fn debug_read(&self, addr: u16) -> Option<u16> {
        let _ = addr;
        None
    }
}
