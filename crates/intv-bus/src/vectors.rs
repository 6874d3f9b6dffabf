//! The IAB vector source.
//!
//! During an IAB phase something external to the CPU must drive the bus:
//! the reset vector on the initialization sequence, or the interrupt
//! service address at the tail of an interrupt acknowledge. On real
//! hardware the Executive ROM plays this role; here it is a tiny device
//! that remembers whether an INTAK preceded the IAB it is answering.

use crate::{Bus, BusDevice, BusPhase};

/// Address of the first instruction executed after reset.
pub const RESET_VECTOR: u16 = 0x1000;

/// Address of the interrupt service entry.
pub const INTERRUPT_VECTOR: u16 = 0x1004;

/// Drives the reset and interrupt vectors during IAB.
#[derive(Debug, Clone)]
pub struct VectorSource {
    reset: u16,
    interrupt: u16,
    /// Set on INTAK; the next IAB is an interrupt acknowledge.
    acknowledged: bool,
}

impl Default for VectorSource {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorSource {
    /// The standard Intellivision vectors.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_vectors(RESET_VECTOR, INTERRUPT_VECTOR)
    }

    /// Custom vectors, for test fixtures.
    #[must_use]
    pub const fn with_vectors(reset: u16, interrupt: u16) -> Self {
        Self {
            reset,
            interrupt,
            acknowledged: false,
        }
    }
}

impl BusDevice for VectorSource {
    fn clock(&mut self, bus: &mut Bus) {
        match (bus.phase, bus.tick()) {
            (BusPhase::Intak, 0) => self.acknowledged = true,
            (BusPhase::Iab, 1) => {
                let vector = if self.acknowledged {
                    self.interrupt
                } else {
                    self.reset
                };
                bus.set_data(vector);
            }
            (BusPhase::Iab, 3) => self.acknowledged = false,
            _ => {}
        }
    }
}
