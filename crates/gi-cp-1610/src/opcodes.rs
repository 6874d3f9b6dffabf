//! The CP-1610 instruction table.
//!
//! A static list keyed by inclusive 10-bit opcode ranges maps every
//! documented opcode to its metadata: mnemonic, micro-cycle counts,
//! interruptibility, and the condition flags it reads and writes. The
//! executor extracts its operands structurally; this table is the
//! authoritative record of everything else.
//!
//! Structural fields shared by decode and execution:
//! - bit 9: external (bus-touching) vs internal (register-only)
//! - bits 8-6: operation class
//! - bits 5-3: F1 (addressing register or sub-class)
//! - bits 2-0: F2 (destination register or sub-select)

use std::fmt;

use crate::flags::{C, D, I, O, S, Z};

/// Symbolic instruction name.
///
/// The `Display` rendering is the assembler spelling and doubles as the
/// tracing surface (`MVI@`, `MVII`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Hlt,
    Sdbd,
    Eis,
    Dis,
    J,
    Tci,
    Clrc,
    Setc,
    Incr,
    Decr,
    Comr,
    Negr,
    Adcr,
    Gswd,
    Nop,
    Sin,
    Rswd,
    Swap,
    Sll,
    Rlc,
    Sllc,
    Slr,
    Sar,
    Rrc,
    Sarc,
    Movr,
    Addr,
    Subr,
    Cmpr,
    Andr,
    Xorr,
    B,
    Bc,
    Bov,
    Bpl,
    Beq,
    Blt,
    Ble,
    Busc,
    Nopp,
    Bnc,
    Bnov,
    Bmi,
    Bneq,
    Bge,
    Bgt,
    Besc,
    Bext,
    Mvo,
    MvoAt,
    Mvoi,
    Mvi,
    MviAt,
    Mvii,
    Add,
    AddAt,
    Addi,
    Sub,
    SubAt,
    Subi,
    Cmp,
    CmpAt,
    Cmpi,
    And,
    AndAt,
    Andi,
    Xor,
    XorAt,
    Xori,
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hlt => "HLT",
            Self::Sdbd => "SDBD",
            Self::Eis => "EIS",
            Self::Dis => "DIS",
            Self::J => "J",
            Self::Tci => "TCI",
            Self::Clrc => "CLRC",
            Self::Setc => "SETC",
            Self::Incr => "INCR",
            Self::Decr => "DECR",
            Self::Comr => "COMR",
            Self::Negr => "NEGR",
            Self::Adcr => "ADCR",
            Self::Gswd => "GSWD",
            Self::Nop => "NOP",
            Self::Sin => "SIN",
            Self::Rswd => "RSWD",
            Self::Swap => "SWAP",
            Self::Sll => "SLL",
            Self::Rlc => "RLC",
            Self::Sllc => "SLLC",
            Self::Slr => "SLR",
            Self::Sar => "SAR",
            Self::Rrc => "RRC",
            Self::Sarc => "SARC",
            Self::Movr => "MOVR",
            Self::Addr => "ADDR",
            Self::Subr => "SUBR",
            Self::Cmpr => "CMPR",
            Self::Andr => "ANDR",
            Self::Xorr => "XORR",
            Self::B => "B",
            Self::Bc => "BC",
            Self::Bov => "BOV",
            Self::Bpl => "BPL",
            Self::Beq => "BEQ",
            Self::Blt => "BLT",
            Self::Ble => "BLE",
            Self::Busc => "BUSC",
            Self::Nopp => "NOPP",
            Self::Bnc => "BNC",
            Self::Bnov => "BNOV",
            Self::Bmi => "BMI",
            Self::Bneq => "BNEQ",
            Self::Bge => "BGE",
            Self::Bgt => "BGT",
            Self::Besc => "BESC",
            Self::Bext => "BEXT",
            Self::Mvo => "MVO",
            Self::MvoAt => "MVO@",
            Self::Mvoi => "MVOI",
            Self::Mvi => "MVI",
            Self::MviAt => "MVI@",
            Self::Mvii => "MVII",
            Self::Add => "ADD",
            Self::AddAt => "ADD@",
            Self::Addi => "ADDI",
            Self::Sub => "SUB",
            Self::SubAt => "SUB@",
            Self::Subi => "SUBI",
            Self::Cmp => "CMP",
            Self::CmpAt => "CMP@",
            Self::Cmpi => "CMPI",
            Self::And => "AND",
            Self::AndAt => "AND@",
            Self::Andi => "ANDI",
            Self::Xor => "XOR",
            Self::XorAt => "XOR@",
            Self::Xori => "XORI",
        };
        f.write_str(name)
    }
}

/// Micro-cycle cost, fetch included.
///
/// `extended` is the slower variant where one exists: a taken branch, a
/// doubled shift's pad, MOVR landing in R6/R7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycles {
    pub base: u8,
    pub extended: Option<u8>,
}

/// Metadata for one opcode range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub mnemonic: Mnemonic,
    pub cycles: Cycles,
    /// May an interrupt be serviced after this instruction?
    pub interruptible: bool,
    /// Condition flags the instruction consumes.
    pub reads: u8,
    /// Condition flags the instruction produces.
    pub writes: u8,
}

const fn op(mnemonic: Mnemonic, base: u8, interruptible: bool, reads: u8, writes: u8) -> Opcode {
    Opcode {
        mnemonic,
        cycles: Cycles {
            base,
            extended: None,
        },
        interruptible,
        reads,
        writes,
    }
}

const fn op2(
    mnemonic: Mnemonic,
    base: u8,
    extended: u8,
    interruptible: bool,
    reads: u8,
    writes: u8,
) -> Opcode {
    Opcode {
        mnemonic,
        cycles: Cycles {
            base,
            extended: Some(extended),
        },
        interruptible,
        reads,
        writes,
    }
}

/// Branches cost 7 micro-cycles untaken, 9 taken.
const fn branch(mnemonic: Mnemonic, reads: u8) -> Opcode {
    op2(mnemonic, 7, 9, true, reads, 0)
}

/// The authoritative opcode list, keyed by inclusive ranges, sorted.
#[rustfmt::skip]
const TABLE: &[(u16, u16, Opcode)] = &[
    (0x0000, 0x0000, op(Mnemonic::Hlt, 4, false, 0, 0)),
    (0x0001, 0x0001, op(Mnemonic::Sdbd, 4, false, 0, D)),
    (0x0002, 0x0002, op(Mnemonic::Eis, 4, false, 0, I)),
    (0x0003, 0x0003, op(Mnemonic::Dis, 4, false, 0, I)),
    (0x0004, 0x0004, op(Mnemonic::J, 13, false, 0, I)),
    (0x0005, 0x0005, op(Mnemonic::Tci, 4, false, 0, 0)),
    (0x0006, 0x0006, op(Mnemonic::Clrc, 4, true, 0, C)),
    (0x0007, 0x0007, op(Mnemonic::Setc, 4, true, 0, C)),
    (0x0008, 0x000F, op(Mnemonic::Incr, 6, true, 0, S | Z)),
    (0x0010, 0x0017, op(Mnemonic::Decr, 6, true, 0, S | Z)),
    (0x0018, 0x001F, op(Mnemonic::Comr, 6, true, 0, S | Z)),
    (0x0020, 0x0027, op(Mnemonic::Negr, 6, true, 0, S | Z | O | C)),
    (0x0028, 0x002F, op(Mnemonic::Adcr, 6, true, C, S | Z | O | C)),
    (0x0030, 0x0033, op(Mnemonic::Gswd, 6, true, S | Z | O | C, 0)),
    (0x0034, 0x0035, op(Mnemonic::Nop, 6, true, 0, 0)),
    (0x0036, 0x0037, op(Mnemonic::Sin, 6, true, 0, 0)),
    (0x0038, 0x003F, op(Mnemonic::Rswd, 6, true, 0, S | Z | O | C)),
    (0x0040, 0x0043, op(Mnemonic::Swap, 6, false, 0, S | Z)),
    (0x0044, 0x0047, op(Mnemonic::Swap, 8, false, 0, S | Z)),
    (0x0048, 0x004B, op(Mnemonic::Sll, 6, false, 0, S | Z)),
    (0x004C, 0x004F, op(Mnemonic::Sll, 8, false, 0, S | Z)),
    (0x0050, 0x0053, op(Mnemonic::Rlc, 6, false, C, S | Z | C)),
    (0x0054, 0x0057, op(Mnemonic::Rlc, 8, false, C | O, S | Z | O | C)),
    (0x0058, 0x005B, op(Mnemonic::Sllc, 6, false, 0, S | Z | C)),
    (0x005C, 0x005F, op(Mnemonic::Sllc, 8, false, 0, S | Z | O | C)),
    (0x0060, 0x0063, op(Mnemonic::Slr, 6, false, 0, S | Z)),
    (0x0064, 0x0067, op(Mnemonic::Slr, 8, false, 0, S | Z)),
    (0x0068, 0x006B, op(Mnemonic::Sar, 6, false, 0, S | Z)),
    (0x006C, 0x006F, op(Mnemonic::Sar, 8, false, 0, S | Z)),
    (0x0070, 0x0073, op(Mnemonic::Rrc, 6, false, C, S | Z | C)),
    (0x0074, 0x0077, op(Mnemonic::Rrc, 8, false, C | O, S | Z | O | C)),
    (0x0078, 0x007B, op(Mnemonic::Sarc, 6, false, 0, S | Z | C)),
    (0x007C, 0x007F, op(Mnemonic::Sarc, 8, false, 0, S | Z | O | C)),
    (0x0080, 0x00BF, op2(Mnemonic::Movr, 6, 8, true, 0, S | Z)),
    (0x00C0, 0x00FF, op(Mnemonic::Addr, 6, true, 0, S | Z | O | C)),
    (0x0100, 0x013F, op(Mnemonic::Subr, 6, true, 0, S | Z | O | C)),
    (0x0140, 0x017F, op(Mnemonic::Cmpr, 6, true, 0, S | Z | O | C)),
    (0x0180, 0x01BF, op(Mnemonic::Andr, 6, true, 0, S | Z)),
    (0x01C0, 0x01FF, op(Mnemonic::Xorr, 6, true, 0, S | Z)),
    (0x0200, 0x0200, branch(Mnemonic::B, 0)),
    (0x0201, 0x0201, branch(Mnemonic::Bc, C)),
    (0x0202, 0x0202, branch(Mnemonic::Bov, O)),
    (0x0203, 0x0203, branch(Mnemonic::Bpl, S)),
    (0x0204, 0x0204, branch(Mnemonic::Beq, Z)),
    (0x0205, 0x0205, branch(Mnemonic::Blt, S | O)),
    (0x0206, 0x0206, branch(Mnemonic::Ble, S | Z | O)),
    (0x0207, 0x0207, branch(Mnemonic::Busc, S | C)),
    (0x0208, 0x0208, branch(Mnemonic::Nopp, 0)),
    (0x0209, 0x0209, branch(Mnemonic::Bnc, C)),
    (0x020A, 0x020A, branch(Mnemonic::Bnov, O)),
    (0x020B, 0x020B, branch(Mnemonic::Bmi, S)),
    (0x020C, 0x020C, branch(Mnemonic::Bneq, Z)),
    (0x020D, 0x020D, branch(Mnemonic::Bge, S | O)),
    (0x020E, 0x020E, branch(Mnemonic::Bgt, S | Z | O)),
    (0x020F, 0x020F, branch(Mnemonic::Besc, S | C)),
    (0x0210, 0x021F, branch(Mnemonic::Bext, 0)),
    (0x0220, 0x0220, branch(Mnemonic::B, 0)),
    (0x0221, 0x0221, branch(Mnemonic::Bc, C)),
    (0x0222, 0x0222, branch(Mnemonic::Bov, O)),
    (0x0223, 0x0223, branch(Mnemonic::Bpl, S)),
    (0x0224, 0x0224, branch(Mnemonic::Beq, Z)),
    (0x0225, 0x0225, branch(Mnemonic::Blt, S | O)),
    (0x0226, 0x0226, branch(Mnemonic::Ble, S | Z | O)),
    (0x0227, 0x0227, branch(Mnemonic::Busc, S | C)),
    (0x0228, 0x0228, branch(Mnemonic::Nopp, 0)),
    (0x0229, 0x0229, branch(Mnemonic::Bnc, C)),
    (0x022A, 0x022A, branch(Mnemonic::Bnov, O)),
    (0x022B, 0x022B, branch(Mnemonic::Bmi, S)),
    (0x022C, 0x022C, branch(Mnemonic::Bneq, Z)),
    (0x022D, 0x022D, branch(Mnemonic::Bge, S | O)),
    (0x022E, 0x022E, branch(Mnemonic::Bgt, S | Z | O)),
    (0x022F, 0x022F, branch(Mnemonic::Besc, S | C)),
    (0x0230, 0x023F, branch(Mnemonic::Bext, 0)),
    (0x0240, 0x0247, op(Mnemonic::Mvo, 11, false, 0, 0)),
    (0x0248, 0x0277, op(Mnemonic::MvoAt, 9, false, 0, 0)),
    (0x0278, 0x027F, op(Mnemonic::Mvoi, 9, false, 0, 0)),
    (0x0280, 0x0287, op(Mnemonic::Mvi, 10, true, 0, 0)),
    (0x0288, 0x02B7, op(Mnemonic::MviAt, 8, true, 0, 0)),
    (0x02B8, 0x02BF, op(Mnemonic::Mvii, 8, true, 0, 0)),
    (0x02C0, 0x02C7, op(Mnemonic::Add, 10, true, 0, S | Z | O | C)),
    (0x02C8, 0x02F7, op(Mnemonic::AddAt, 8, true, 0, S | Z | O | C)),
    (0x02F8, 0x02FF, op(Mnemonic::Addi, 8, true, 0, S | Z | O | C)),
    (0x0300, 0x0307, op(Mnemonic::Sub, 10, true, 0, S | Z | O | C)),
    (0x0308, 0x0337, op(Mnemonic::SubAt, 8, true, 0, S | Z | O | C)),
    (0x0338, 0x033F, op(Mnemonic::Subi, 8, true, 0, S | Z | O | C)),
    (0x0340, 0x0347, op(Mnemonic::Cmp, 10, true, 0, S | Z | O | C)),
    (0x0348, 0x0377, op(Mnemonic::CmpAt, 8, true, 0, S | Z | O | C)),
    (0x0378, 0x037F, op(Mnemonic::Cmpi, 8, true, 0, S | Z | O | C)),
    (0x0380, 0x0387, op(Mnemonic::And, 10, true, 0, S | Z)),
    (0x0388, 0x03B7, op(Mnemonic::AndAt, 8, true, 0, S | Z)),
    (0x03B8, 0x03BF, op(Mnemonic::Andi, 8, true, 0, S | Z)),
    (0x03C0, 0x03C7, op(Mnemonic::Xor, 10, true, 0, S | Z)),
    (0x03C8, 0x03F7, op(Mnemonic::XorAt, 8, true, 0, S | Z)),
    (0x03F8, 0x03FF, op(Mnemonic::Xori, 8, true, 0, S | Z)),
];

/// Look up the metadata for a 10-bit opcode.
///
/// The high six bits of a fetched word are ignored; the CP-1610 decodes
/// only the decle. `None` means the opcode is absent from the
/// authoritative list and executes as a traced no-op.
#[must_use]
pub fn decode(opcode: u16) -> Option<&'static Opcode> {
    let opcode = opcode & 0x03FF;
    let index = TABLE.partition_point(|&(start, _, _)| start <= opcode);
    let (start, end, ref entry) = TABLE[index.checked_sub(1)?];
    (opcode >= start && opcode <= end).then_some(entry)
}

/// True when bit 9 is set: the instruction touches the bus beyond fetch.
#[must_use]
pub const fn external(opcode: u16) -> bool {
    opcode & 0x0200 != 0
}

/// Operation class, bits 8-6.
#[must_use]
pub const fn operation(opcode: u16) -> u16 {
    (opcode >> 6) & 7
}

/// F1 field, bits 5-3: the addressing register or sub-class.
#[must_use]
pub const fn field1(opcode: u16) -> usize {
    (opcode as usize >> 3) & 7
}

/// F2 field, bits 2-0: the destination register or sub-select.
#[must_use]
pub const fn field2(opcode: u16) -> usize {
    opcode as usize & 7
}
