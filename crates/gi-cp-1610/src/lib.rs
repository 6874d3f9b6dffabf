//! General Instrument CP-1610 CPU core.
//!
//! Cycle-accurate emulation driven by bus-phase templates: every logical
//! step of an instruction (fetch, address resolution, branch, jump,
//! execute padding, interrupt) is an ordered list of bus phases, each
//! occupying one four-tick micro-cycle on the shared Intellivision bus.
//! The ALU commits its side effects when the step completes, so the bus
//! traffic and the register file stay in lockstep with real hardware.
//!
//! The CP-1610's character comes from a handful of quirks the core keeps
//! bit-exact: the SDBD prefix that turns the next indirect read into two
//! chained 8-bit fetches, the auto-increment registers R4/R5/R7, the R6
//! stack discipline (pre-decrement on pull, post-increment on push), and
//! the shift family's C/O link bits.

mod cpu;
mod execute;
pub mod flags;
mod opcodes;
pub mod registers;
mod sequence;

pub use cpu::Cp1610;
pub use flags::Flags;
pub use opcodes::{Cycles, Mnemonic, Opcode, decode, external, field1, field2, operation};
pub use registers::Registers;
pub use sequence::Step;
