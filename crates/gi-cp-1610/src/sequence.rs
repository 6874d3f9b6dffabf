//! Bus-phase templates for the sequencer's logical steps.
//!
//! One template entry is one full micro-cycle (four host ticks) during
//! which exactly one phase is active. The sequencer walks the active
//! template an entry at a time; the step's transition rule runs when the
//! last entry completes. Keeping the templates as data means the bus
//! traffic of every instruction shape can be checked in isolation.

use intv_bus::BusPhase;
use intv_bus::BusPhase::{Adar, Bar, Dtb, Dw, Dws, Iab, Intak, Nact};

/// A logical step of instruction processing.
///
/// The template lives here; the transition rule and the data movement at
/// each phase's slot live in the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Power-on: latch the reset vector from the bus during IAB.
    Initialization,
    /// Fetch one instruction word at R7.
    InstructionFetch,
    /// One-word read at the resolved effective address.
    IndirectRead,
    /// Two chained 8-bit reads under SDBD.
    IndirectReadDouble,
    /// One-word write at the resolved effective address.
    IndirectWrite,
    /// Read through an inline address word (direct addressing).
    DirectRead,
    /// Write through an inline address word.
    DirectWrite,
    /// Fetch the two operand words of the J family.
    Jump,
    /// Fetch the displacement word, then retarget R7.
    BranchTaken,
    /// Skip the displacement word without fetching it.
    BranchNotTaken,
    /// Two idle micro-cycles while the ALU settles.
    ExecPad2,
    /// Four idle micro-cycles (doubled shifts, MOVR to R6/R7).
    ExecPad4,
    /// Acknowledge, push R7, vector through IAB.
    Interrupt,
}

impl Step {
    /// The ordered bus phases this step occupies.
    #[must_use]
    pub const fn phases(self) -> &'static [BusPhase] {
        match self {
            Self::Initialization => &[Nact, Iab, Nact, Nact, Nact],
            Self::InstructionFetch | Self::IndirectRead => &[Bar, Nact, Dtb, Nact],
            Self::IndirectReadDouble => &[Bar, Nact, Dtb, Bar, Nact, Dtb],
            Self::IndirectWrite => &[Bar, Nact, Dw, Dws, Nact],
            Self::DirectRead => &[Bar, Nact, Adar, Nact, Dtb, Nact],
            Self::DirectWrite => &[Bar, Nact, Adar, Nact, Dw, Dws, Nact],
            Self::Jump => &[Bar, Nact, Dtb, Nact, Bar, Nact, Dtb, Nact, Nact],
            Self::BranchTaken => &[Bar, Nact, Dtb, Nact, Nact],
            Self::BranchNotTaken => &[Nact, Nact, Nact],
            Self::ExecPad2 => &[Nact, Nact],
            Self::ExecPad4 => &[Nact, Nact, Nact, Nact],
            Self::Interrupt => &[Intak, Nact, Dw, Dws, Nact, Iab, Nact],
        }
    }
}
