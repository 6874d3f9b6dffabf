//! The CP-1610 sequencer.
//!
//! The CPU walks one bus-phase template at a time (see [`Step`]). Within a
//! micro-cycle it asserts the template's phase at slot 0, moves data at
//! the slot the bus contract fixes for that phase, and advances the
//! template at slot 3. When a template completes, the step's transition
//! rule runs: a completed fetch decodes, a completed address step commits
//! the ALU, a completed pad commits the register operation.

use intv_bus::{Bus, BusDevice, BusPhase};

use crate::flags::Flags;
use crate::opcodes;
use crate::registers::{PC, Registers, SP};
use crate::sequence::Step;

/// The General Instrument CP-1610.
pub struct Cp1610 {
    /// Register file. R7 is the program counter, R6 the stack pointer.
    pub regs: Registers,
    /// Condition flags.
    pub flags: Flags,

    /// Instruction register: the opcode word just fetched.
    pub(crate) instr: u16,
    /// Operand slots (jump target words, branch offset, read data).
    pub(crate) args: [u16; 2],
    /// Number of operand slots filled so far.
    arg_count: usize,
    /// Effective address for the active (or upcoming) address step.
    ea: u16,

    /// Active step and position within its phase template.
    step: Step,
    index: usize,
    /// Local time slot 0..=3, in lockstep with the bus tick counter.
    slot: u8,

    /// Double-byte-data latched for the in-flight instruction.
    pub(crate) double: bool,
    /// Whether the in-flight instruction allows a trailing interrupt.
    interruptible: bool,
    /// Level-sensitive interrupt request line.
    intrq: bool,
    /// Sticky halt; only HLT sets it.
    halted: bool,

    /// Fired with the fetch address at the start of every instruction fetch.
    fetch_hook: Option<Box<dyn FnMut(u16)>>,

    /// Diagnostic: number of unknown-opcode traces emitted.
    #[cfg(debug_assertions)]
    unknown_trace_count: u32,
}

impl Default for Cp1610 {
    fn default() -> Self {
        Self::new()
    }
}

impl Cp1610 {
    /// Create a CPU at the start of its reset sequence.
    ///
    /// The first five micro-cycles run INITIALIZATION: the reset vector
    /// arrives over the bus during IAB, and the first instruction fetch
    /// follows immediately.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            flags: Flags::new(),
            instr: 0,
            args: [0; 2],
            arg_count: 0,
            ea: 0,
            step: Step::Initialization,
            index: 0,
            slot: 3,
            double: false,
            interruptible: true,
            intrq: false,
            halted: false,
            fetch_hook: None,
            #[cfg(debug_assertions)]
            unknown_trace_count: 0,
        }
    }

    /// The opcode word currently in the instruction register.
    #[must_use]
    pub const fn instr(&self) -> u16 {
        self.instr
    }

    /// True once HLT has executed. Only power cycling clears it.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// True between instructions: the previous instruction has committed
    /// and the next fetch has not started its first micro-cycle.
    #[must_use]
    pub fn is_instruction_complete(&self) -> bool {
        self.step == Step::InstructionFetch && self.index == 0 && self.slot == 3
    }

    /// Drive the level-sensitive interrupt request line.
    ///
    /// The request is sampled at instruction boundaries, and only when I
    /// is set and the completed instruction is interruptible.
    pub fn set_interrupt_request(&mut self, asserted: bool) {
        self.intrq = asserted;
    }

    /// Register a callback fired at the start of every instruction fetch
    /// with the address being fetched.
    pub fn on_fetch(&mut self, hook: impl FnMut(u16) + 'static) {
        self.fetch_hook = Some(Box::new(hook));
    }

    // === Tick engine ===

    fn phase(&self) -> BusPhase {
        self.step.phases()[self.index]
    }

    fn step_clock(&mut self, bus: &mut Bus) {
        if self.halted {
            return;
        }
        self.slot = (self.slot + 1) & 3;

        let phase = self.phase();
        match self.slot {
            0 => {
                bus.phase = phase;
                if self.step == Step::InstructionFetch && self.index == 0 {
                    if let Some(hook) = self.fetch_hook.as_mut() {
                        hook(self.regs.pc());
                    }
                }
            }
            2 => self.data_slot(bus, phase),
            _ => {}
        }

        // The CPU holds the data lines for the whole write phase.
        if matches!(phase, BusPhase::Dw | BusPhase::Dws) {
            bus.set_data(self.write_data());
        }

        if self.slot == 3 {
            self.index += 1;
            if self.index == self.step.phases().len() {
                self.index = 0;
                self.complete_step();
            }
        }
    }

    /// Drive or sample the data lines at this phase's fixed slot.
    fn data_slot(&mut self, bus: &mut Bus, phase: BusPhase) {
        match phase {
            BusPhase::Bar => {
                let addr = self.bar_address();
                bus.set_data(addr);
            }
            BusPhase::Dtb => {
                let word = bus.data();
                if self.step == Step::InstructionFetch {
                    self.instr = word;
                } else {
                    self.args[self.arg_count] = word;
                    self.arg_count += 1;
                }
            }
            BusPhase::Iab => self.regs.set_pc(bus.data()),
            BusPhase::Intak => {
                // Push address; R6 post-increments, as for a write through it.
                let sp = self.regs.get(SP);
                bus.set_data(sp);
                self.regs.add(SP, 1);
            }
            BusPhase::Nact | BusPhase::Adar | BusPhase::Dw | BusPhase::Dws => {}
        }
    }

    /// The address asserted during the current BAR micro-cycle.
    fn bar_address(&mut self) -> u16 {
        match self.step {
            Step::InstructionFetch | Step::Jump | Step::BranchTaken => self.regs.bump_pc(),
            Step::IndirectReadDouble if self.index == 3 => self.ea.wrapping_add(1),
            Step::IndirectRead
            | Step::IndirectReadDouble
            | Step::IndirectWrite
            | Step::DirectRead
            | Step::DirectWrite => self.ea,
            _ => panic!("BAR outside an address step: {:?}[{}]", self.step, self.index),
        }
    }

    /// The word driven while DW/DWS holds.
    fn write_data(&self) -> u16 {
        match self.step {
            Step::IndirectWrite | Step::DirectWrite => self.regs.get(opcodes::field2(self.instr)),
            Step::Interrupt => self.regs.pc(),
            _ => panic!("DW outside a write step: {:?}[{}]", self.step, self.index),
        }
    }

    // === Step transitions ===

    fn begin_step(&mut self, step: Step) {
        self.step = step;
        self.index = 0;
        self.arg_count = 0;
    }

    fn complete_step(&mut self) {
        match self.step {
            Step::Initialization | Step::Interrupt => self.begin_step(Step::InstructionFetch),
            Step::InstructionFetch => self.decode(),
            Step::IndirectRead | Step::DirectRead => {
                self.commit_data_read(self.args[0]);
                self.next_instruction();
            }
            Step::IndirectReadDouble => {
                // Two 8-bit fetches assemble low byte first.
                let value = (self.args[1] & 0x00FF) << 8 | (self.args[0] & 0x00FF);
                self.commit_data_read(value);
                self.next_instruction();
            }
            Step::IndirectWrite | Step::DirectWrite => {
                // The store happened on the bus during DWS.
                self.next_instruction();
            }
            Step::Jump => {
                self.commit_jump();
                self.next_instruction();
            }
            Step::BranchTaken => {
                self.commit_branch();
                self.next_instruction();
            }
            Step::BranchNotTaken => {
                // The displacement word was never fetched; skip it.
                self.regs.add(PC, 1);
                self.next_instruction();
            }
            Step::ExecPad2 | Step::ExecPad4 => {
                self.commit_register_op();
                self.next_instruction();
            }
        }
    }

    /// Instruction boundary: service a pending interrupt or fetch.
    fn next_instruction(&mut self) {
        if self.intrq && self.flags.i && self.interruptible {
            self.begin_step(Step::Interrupt);
        } else {
            self.begin_step(Step::InstructionFetch);
        }
    }

    // === Decode ===

    fn decode(&mut self) {
        let opcode = self.instr & 0x03FF;

        // SDBD arms the double-byte flag for exactly the next instruction
        // and re-enters fetch without further decode.
        if opcode == 0x0001 {
            self.flags.d = true;
            self.interruptible = false;
            self.begin_step(Step::InstructionFetch);
            return;
        }

        // The double-byte flag is consumed here, at fetch completion; the
        // latched copy steers addressing for the in-flight instruction.
        self.double = self.flags.d;
        self.flags.d = false;

        let Some(entry) = opcodes::decode(opcode) else {
            self.trace_unknown(opcode);
            self.interruptible = true;
            self.begin_step(Step::InstructionFetch);
            return;
        };
        self.interruptible = entry.interruptible;

        if opcodes::external(opcode) {
            self.decode_external(opcode);
        } else {
            self.decode_internal(opcode);
        }
    }

    /// Internal instructions: register-only, padded with idle micro-cycles.
    fn decode_internal(&mut self, opcode: u16) {
        match opcodes::operation(opcode) {
            0 if opcodes::field1(opcode) == 0 => self.execute_control(opcode),
            0 => self.begin_step(Step::ExecPad2),
            1 => {
                let doubled = opcode & 0x0004 != 0;
                self.begin_step(if doubled { Step::ExecPad4 } else { Step::ExecPad2 });
            }
            2 if opcodes::field2(opcode) >= SP => self.begin_step(Step::ExecPad4),
            _ => self.begin_step(Step::ExecPad2),
        }
    }

    /// HLT, EIS, DIS, J, TCI, CLRC, SETC: no pad; J fetches two operands.
    fn execute_control(&mut self, opcode: u16) {
        match opcodes::field2(opcode) {
            0 => {
                self.halted = true;
            }
            1 => unreachable!("SDBD is intercepted before dispatch"),
            2 => {
                self.flags.i = true;
                self.next_instruction();
            }
            3 => {
                self.flags.i = false;
                self.next_instruction();
            }
            4 => self.begin_step(Step::Jump),
            5 => {
                // TCI: terminate current interrupt; no modeled effect.
                self.next_instruction();
            }
            6 => {
                self.flags.c = false;
                self.next_instruction();
            }
            7 => {
                self.flags.c = true;
                self.next_instruction();
            }
            _ => unreachable!(),
        }
    }

    /// External instructions: branches and the bus-addressing families.
    fn decode_external(&mut self, opcode: u16) {
        let operation = opcodes::operation(opcode);
        if operation == 0 {
            let taken = self.branch_condition(opcode);
            self.begin_step(if taken {
                Step::BranchTaken
            } else {
                Step::BranchNotTaken
            });
            return;
        }

        let f1 = opcodes::field1(opcode);
        if operation == 1 {
            // MVO family.
            if f1 == 0 {
                self.ea = self.regs.bump_pc();
                self.begin_step(Step::DirectWrite);
            } else {
                self.ea = self.resolve_write_address(f1);
                self.begin_step(Step::IndirectWrite);
            }
        } else if f1 == 0 {
            self.ea = self.regs.bump_pc();
            self.begin_step(Step::DirectRead);
        } else {
            self.ea = self.resolve_read_address(f1);
            self.begin_step(if self.double {
                Step::IndirectReadDouble
            } else {
                Step::IndirectRead
            });
        }
    }

    /// Effective address for an indirect read, applying the register
    /// quirks: R4/R5/R7 post-increment, R6 pre-decrements (stack pull).
    fn resolve_read_address(&mut self, f1: usize) -> u16 {
        let width = if self.double { 2 } else { 1 };
        match f1 {
            1..=3 => self.regs.get(f1),
            4 | 5 | 7 => {
                let addr = self.regs.get(f1);
                self.regs.add(f1, width);
                addr
            }
            6 => {
                self.regs.sub(SP, width);
                self.regs.get(SP)
            }
            _ => unreachable!("indirect read through F1={f1}"),
        }
    }

    /// Effective address for an indirect write: R4/R5/R7 post-increment,
    /// R6 post-increments too (stack push).
    fn resolve_write_address(&mut self, f1: usize) -> u16 {
        let addr = self.regs.get(f1);
        match f1 {
            1..=3 => {}
            4 | 5 | 7 => self.regs.add(f1, if self.double { 2 } else { 1 }),
            6 => self.regs.add(SP, 1),
            _ => unreachable!("indirect write through F1={f1}"),
        }
        addr
    }

    /// Unknown opcode: trace and resume fetch, registers untouched.
    fn trace_unknown(&mut self, opcode: u16) {
        let _ = opcode;
        #[cfg(debug_assertions)]
        if self.unknown_trace_count < 64 {
            eprintln!(
                "  CP1610 UNKNOWN: opcode={opcode:#06X} pc={:#06X}",
                self.regs.pc()
            );
            self.unknown_trace_count += 1;
        }
    }

    /// J-family interrupt field 0b11 is documented as unknown; record the
    /// attempt and leave I alone.
    pub(crate) fn trace_unknown_jump_flags(&mut self) {
        #[cfg(debug_assertions)]
        if self.unknown_trace_count < 64 {
            eprintln!(
                "  CP1610 J ff=11 (unknown interrupt mode) at pc={:#06X}",
                self.regs.pc()
            );
            self.unknown_trace_count += 1;
        }
    }
}

impl BusDevice for Cp1610 {
    fn clock(&mut self, bus: &mut Bus) {
        self.step_clock(bus);
    }
}
