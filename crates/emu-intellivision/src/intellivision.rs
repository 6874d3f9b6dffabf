//! Top-level Intellivision system.

use gi_cp_1610::Cp1610;
use intv_bus::{Bus, BusDevice, VectorSource};

/// The assembled machine: bus, CPU, and attached devices.
///
/// The CPU is reset at construction and begins its initialization
/// sequence on the first tick; the built-in vector source answers the
/// IAB with the reset vector. Memory and peripherals are attached before
/// clocking starts.
pub struct Intellivision {
    bus: Bus,
    cpu: Cp1610,
    devices: Vec<Box<dyn BusDevice>>,
    /// Clocked after every other device so it wins the IAB data slot
    /// (a memory device selected by the interrupt push would otherwise
    /// drive stale data over the vector).
    vectors: VectorSource,
    /// Host ticks elapsed since power-on.
    ticks: u64,
}

impl Default for Intellivision {
    fn default() -> Self {
        Self::new()
    }
}

impl Intellivision {
    /// A machine with only the vector source attached.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bus: Bus::new(),
            cpu: Cp1610::new(),
            devices: Vec::new(),
            vectors: VectorSource::new(),
            ticks: 0,
        }
    }

    /// Attach a device. Registration order is clocking order.
    pub fn attach(&mut self, device: impl BusDevice + 'static) {
        self.devices.push(Box::new(device));
    }

    /// One host tick: bus counter, then CPU, then each device, then the
    /// vector source.
    pub fn tick(&mut self) {
        self.bus.clock();
        self.cpu.clock(&mut self.bus);
        for device in &mut self.devices {
            device.clock(&mut self.bus);
        }
        self.vectors.clock(&mut self.bus);
        self.ticks += 1;
    }

    /// Run `n` micro-cycles (four host ticks each).
    pub fn run_micro_cycles(&mut self, n: u64) {
        for _ in 0..n * 4 {
            self.tick();
        }
    }

    /// Run until the next instruction boundary; returns micro-cycles
    /// consumed. Returns 0 once the CPU has halted.
    pub fn step_instruction(&mut self) -> u64 {
        if self.cpu.is_halted() {
            return 0;
        }
        let start = self.ticks;
        loop {
            self.tick();
            if self.cpu.is_instruction_complete() || self.cpu.is_halted() {
                return (self.ticks - start) / 4;
            }
            assert!(
                self.ticks - start < 4 * 64,
                "instruction did not complete within 64 micro-cycles"
            );
        }
    }

    /// Side-effect-free read: the first attached device claiming `addr`.
    #[must_use]
    pub fn debug_read(&self, addr: u16) -> Option<u16> {
        self.devices.iter().find_map(|device| device.debug_read(addr))
    }

    /// Drive the CPU's level-sensitive interrupt request line.
    pub fn set_interrupt_request(&mut self, asserted: bool) {
        self.cpu.set_interrupt_request(asserted);
    }

    /// The CPU, for register and flag inspection.
    #[must_use]
    pub fn cpu(&self) -> &Cp1610 {
        &self.cpu
    }

    /// Mutable CPU access, for test setup and hooks.
    pub fn cpu_mut(&mut self) -> &mut Cp1610 {
        &mut self.cpu
    }

    /// The shared bus.
    #[must_use]
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Host ticks elapsed since power-on.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
