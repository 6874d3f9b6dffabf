//! Shared test bench: CPU, one RAM window, and the vector source.

// Each integration test binary uses a different slice of the bench.
#![allow(dead_code)]

use gi_cp_1610::Cp1610;
use intv_bus::{Bus, BusDevice, Ram, VectorSource};

pub struct TestBench {
    pub bus: Bus,
    pub cpu: Cp1610,
    pub ram: Ram,
    pub vectors: VectorSource,
}

impl TestBench {
    /// Power on with `program` at 0x1000, before the reset sequence runs.
    pub fn power_on(program: &[u16]) -> Self {
        let mut ram = Ram::new(0x0000, 0x2000);
        ram.load(0x1000, program);
        Self {
            bus: Bus::new(),
            cpu: Cp1610::new(),
            ram,
            vectors: VectorSource::new(),
        }
    }

    /// Power on and run the five-micro-cycle initialization sequence.
    pub fn new(program: &[u16]) -> Self {
        let mut bench = Self::power_on(program);
        bench.run_micro_cycles(5);
        assert_eq!(bench.cpu.regs.pc(), 0x1000, "reset vector not latched");
        bench
    }

    /// One host tick in the canonical order: bus, CPU, RAM, vectors.
    pub fn tick(&mut self) {
        self.bus.clock();
        self.cpu.clock(&mut self.bus);
        self.ram.clock(&mut self.bus);
        self.vectors.clock(&mut self.bus);
    }

    pub fn run_micro_cycles(&mut self, n: usize) {
        for _ in 0..n * 4 {
            self.tick();
        }
    }

    /// Run one complete instruction; returns micro-cycles consumed.
    pub fn step(&mut self) -> u32 {
        for cycles in 1..=64 {
            self.run_micro_cycles(1);
            if self.cpu.is_instruction_complete() || self.cpu.is_halted() {
                return cycles;
            }
        }
        panic!("instruction did not complete within 64 micro-cycles");
    }
}
