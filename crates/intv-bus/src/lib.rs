//! The shared 16-bit tri-state bus of the Intellivision.
//!
//! Everything on the board (the CP-1610, system RAM, the Executive ROM,
//! cartridge ROM, peripheral chips) hangs off one 16-bit bus whose
//! control lines (BDIR, BC2, BC1) select one of eight phases per
//! micro-cycle. The bus itself moves no data; it is a rendezvous. Devices
//! observe the `(phase, tick)` pair each host tick and decide when to
//! latch addresses, drive data, or accept writes.

mod bus;
mod device;
mod memory;
mod vectors;

pub use bus::{Bus, BusPhase, FLOATING};
pub use device::BusDevice;
pub use memory::{Ram, Rom};
pub use vectors::{INTERRUPT_VECTOR, RESET_VECTOR, VectorSource};
