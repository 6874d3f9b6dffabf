//! System-level tests: reset, clocking order, and interrupt sequencing.

use emu_intellivision::Intellivision;
use intv_bus::{INTERRUPT_VECTOR, RESET_VECTOR, Ram, Rom};

fn machine_with_program(program: &[u16]) -> Intellivision {
    let mut ram = Ram::new(0x0000, 0x2000);
    ram.load(0x1000, program);
    let mut machine = Intellivision::new();
    machine.attach(ram);
    machine
}

#[test]
fn reset_sequence_lands_on_the_reset_vector() {
    let mut machine = machine_with_program(&[0x0034]);
    machine.run_micro_cycles(5);
    assert_eq!(machine.cpu().regs.pc(), RESET_VECTOR);
}

#[test]
fn step_instruction_reports_micro_cycles() {
    // NOP; INCR R0.
    let mut machine = machine_with_program(&[0x0034, 0x0008]);
    machine.run_micro_cycles(5);
    assert_eq!(machine.step_instruction(), 6);
    assert_eq!(machine.step_instruction(), 6);
    assert_eq!(machine.cpu().regs.get(0), 1);
}

#[test]
fn interrupt_pushes_r7_and_vectors_through_iab() {
    // EIS; MOVR R0,R1; then the stream the interrupt cuts off.
    // The interrupt vector (0x1004) holds a NOP.
    let mut machine = machine_with_program(&[0x0002, 0x0081, 0x0034, 0x0034, 0x0034]);
    machine.run_micro_cycles(5);
    machine.cpu_mut().regs.set(6, 0x0320);

    machine.step_instruction(); // EIS
    assert!(machine.cpu().flags.i);

    machine.set_interrupt_request(true);
    // MOVR completes, then the INTERRUPT step runs before the next fetch.
    let cycles = machine.step_instruction();
    machine.set_interrupt_request(false);

    assert_eq!(cycles, 6 + 7, "MOVR plus the interrupt sequence");
    assert_eq!(machine.cpu().regs.pc(), INTERRUPT_VECTOR);
    assert_eq!(machine.cpu().regs.get(6), 0x0321, "push post-increments R6");
    assert_eq!(
        machine.debug_read(0x0320),
        Some(0x1002),
        "return address of the instruction after MOVR"
    );
}

#[test]
fn interrupts_wait_for_an_interruptible_boundary() {
    // EIS; MVO@ R0,R6 (not interruptible); NOP.
    let mut machine = machine_with_program(&[0x0002, 0x0270, 0x0034, 0x0034]);
    machine.run_micro_cycles(5);
    machine.cpu_mut().regs.set(6, 0x0320);

    machine.step_instruction(); // EIS
    machine.set_interrupt_request(true);

    // MVO@ blocks the interrupt; the NOP after it does not.
    machine.step_instruction();
    assert_eq!(machine.cpu().regs.pc(), 0x1002, "no interrupt after MVO@");
    let cycles = machine.step_instruction();
    machine.set_interrupt_request(false);

    assert_eq!(cycles, 6 + 7);
    assert_eq!(machine.cpu().regs.pc(), INTERRUPT_VECTOR);
}

#[test]
fn interrupts_are_ignored_while_i_is_clear() {
    let mut machine = machine_with_program(&[0x0034, 0x0034]);
    machine.run_micro_cycles(5);
    machine.set_interrupt_request(true);

    assert_eq!(machine.step_instruction(), 6, "plain NOP, no interrupt");
    assert_eq!(machine.cpu().regs.pc(), 0x1001);
}

#[test]
fn debug_read_dispatches_across_devices() {
    let mut machine = Intellivision::new();
    let mut ram = Ram::new(0x0200, 0x100);
    ram.load(0x0210, &[0x1111]);
    machine.attach(ram);
    machine.attach(Rom::new(0x5000, vec![0x2222; 16]));

    assert_eq!(machine.debug_read(0x0210), Some(0x1111));
    assert_eq!(machine.debug_read(0x5000), Some(0x2222));
    assert_eq!(machine.debug_read(0x4000), None);
}

#[test]
fn halt_stops_the_machine_but_not_the_clock() {
    let mut machine = machine_with_program(&[0x0000]);
    machine.run_micro_cycles(5);
    machine.step_instruction();
    assert!(machine.cpu().is_halted());
    assert_eq!(machine.step_instruction(), 0);

    let ticks = machine.ticks();
    machine.run_micro_cycles(4);
    assert_eq!(machine.ticks(), ticks + 16, "the host clock keeps counting");
}
