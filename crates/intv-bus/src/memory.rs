//! Word-addressed memory devices.
//!
//! A memory device owns an address window `base .. base + len` and a flat
//! word array. It takes part in a transaction only while an address inside
//! its window is latched; everything else on the bus deselects it, so
//! out-of-range accesses are silent non-participation rather than errors.
//! Overlapping windows are a configuration mistake the bus cannot detect.
//!
//! Per-phase behavior within a micro-cycle:
//!
//! | Phase      | Tick | Reaction                                         |
//! |------------|------|--------------------------------------------------|
//! | BAR, INTAK | 3    | latch the bus word as the selected offset        |
//! | ADAR       | 1    | drive the selected word (it becomes an address)  |
//! | ADAR       | 3    | re-latch the bus word (chained addressing)       |
//! | DTB, IAB   | 1    | drive the selected word                          |
//! | DWS        | 3    | store the bus word (RAM only)                    |

use crate::{Bus, BusDevice, BusPhase};

/// In-window offset for `addr`, or `None` when the device is not addressed.
fn window(base: u16, len: usize, addr: u16) -> Option<u16> {
    let offset = addr.wrapping_sub(base);
    ((offset as usize) < len).then_some(offset)
}

/// Read-write memory over an address window.
#[derive(Debug, Clone)]
pub struct Ram {
    base: u16,
    words: Vec<u16>,
    selected: Option<u16>,
}

impl Ram {
    /// Create zeroed RAM of `len` words based at `base`.
    #[must_use]
    pub fn new(base: u16, len: usize) -> Self {
        Self {
            base,
            words: vec![0; len],
            selected: None,
        }
    }

    /// Copy `words` into the device starting at absolute address `addr`.
    ///
    /// # Panics
    ///
    /// Panics if the copy would run past the end of the window.
    pub fn load(&mut self, addr: u16, words: &[u16]) {
        let offset = addr.wrapping_sub(self.base) as usize;
        self.words[offset..offset + words.len()].copy_from_slice(words);
    }
}

impl BusDevice for Ram {
    fn clock(&mut self, bus: &mut Bus) {
        match (bus.phase, bus.tick()) {
            (BusPhase::Bar | BusPhase::Intak, 3) | (BusPhase::Adar, 3) => {
                self.selected = window(self.base, self.words.len(), bus.data());
            }
            (BusPhase::Adar | BusPhase::Dtb | BusPhase::Iab, 1) => {
                if let Some(offset) = self.selected {
                    bus.set_data(self.words[offset as usize]);
                }
            }
            (BusPhase::Dws, 3) => {
                if let Some(offset) = self.selected {
                    self.words[offset as usize] = bus.data();
                }
            }
            _ => {}
        }
    }

    fn debug_read(&self, addr: u16) -> Option<u16> {
        window(self.base, self.words.len(), addr).map(|offset| self.words[offset as usize])
    }
}

/// Read-only memory over an address window.
///
/// Latches addresses exactly like [`Ram`] but ignores DWS, so writes land
/// nowhere.
#[derive(Debug, Clone)]
pub struct Rom {
    base: u16,
    words: Vec<u16>,
    selected: Option<u16>,
}

impl Rom {
    /// Create a ROM based at `base` holding `words`.
    #[must_use]
    pub fn new(base: u16, words: Vec<u16>) -> Self {
        Self {
            base,
            words,
            selected: None,
        }
    }
}

impl BusDevice for Rom {
    fn clock(&mut self, bus: &mut Bus) {
        match (bus.phase, bus.tick()) {
            (BusPhase::Bar | BusPhase::Intak, 3) | (BusPhase::Adar, 3) => {
                self.selected = window(self.base, self.words.len(), bus.data());
            }
            (BusPhase::Adar | BusPhase::Dtb | BusPhase::Iab, 1) => {
                if let Some(offset) = self.selected {
                    bus.set_data(self.words[offset as usize]);
                }
            }
            _ => {}
        }
    }

    fn debug_read(&self, addr: u16) -> Option<u16> {
        window(self.base, self.words.len(), addr).map(|offset| self.words[offset as usize])
    }
}
