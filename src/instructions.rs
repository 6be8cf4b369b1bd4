use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
/// What an operand slot accepts. The empty set means the slot takes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperandKind: u8 {
const REG = 1 << 0; // r0..r7
const INT = 1 << 1; // 0..=32767
const ANY = Self::REG.bits() | Self::INT.bits();
}
}

impl OperandKind {
    pub fn describe(self) -> &'static str {
        if self == OperandKind::ANY {
            "a register or integer"
        } else if self == OperandKind::REG {
            "a register"
        } else if self == OperandKind::INT {
            "a valid integer"
        } else {
            "no operand"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u16)]
pub enum Opcode {
    Halt = 0,
    Set,
    Push,
    Pop,
    Eq,
    Gt,
    Jmp,
    Jt,
    Jf,
    Add,
    Mult,
    Mod,
    And,
    Or,
    Not,
    Rmem,
    Wmem,
    Call,
    Ret,
    Out,
    In,
    Noop,
}

impl Opcode {
    pub const COUNT: usize = 22;

    pub const ALL: [Opcode; Opcode::COUNT] = [
        Opcode::Halt,
        Opcode::Set,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Eq,
        Opcode::Gt,
        Opcode::Jmp,
        Opcode::Jt,
        Opcode::Jf,
        Opcode::Add,
        Opcode::Mult,
        Opcode::Mod,
        Opcode::And,
        Opcode::Or,
        Opcode::Not,
        Opcode::Rmem,
        Opcode::Wmem,
        Opcode::Call,
        Opcode::Ret,
        Opcode::Out,
        Opcode::In,
        Opcode::Noop,
    ];

    /// `None` for any word outside 0..=21; callers fall back to raw data.
    pub fn from_word(word: u16) -> Option<Opcode> {
        Opcode::ALL.get(word as usize).copied()
    }

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn descriptor(self) -> &'static InstrDesc {
        &TABLE[self as usize]
    }

    pub fn mnemonic(self) -> &'static str {
        self.descriptor().mnemonic
    }

    pub fn operands(self) -> &'static [OperandKind] {
        self.descriptor().operands
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub op: Opcode,
    pub mnemonic: &'static str,
    pub operands: &'static [OperandKind],
}

impl InstrDesc {
    pub fn arity(&self) -> usize {
        self.operands.len()
    }
}

const R: OperandKind = OperandKind::REG;
const A: OperandKind = OperandKind::ANY;

/// Indexed by opcode number.
pub const TABLE: [InstrDesc; Opcode::COUNT] = [
    InstrDesc { op: Opcode::Halt, mnemonic: "hlt", operands: &[] },
    InstrDesc { op: Opcode::Set, mnemonic: "set", operands: &[R, A] },
    InstrDesc { op: Opcode::Push, mnemonic: "push", operands: &[A] },
    InstrDesc { op: Opcode::Pop, mnemonic: "pop", operands: &[R] },
    InstrDesc { op: Opcode::Eq, mnemonic: "eq", operands: &[R, A, A] },
    InstrDesc { op: Opcode::Gt, mnemonic: "gt", operands: &[R, A, A] },
    InstrDesc { op: Opcode::Jmp, mnemonic: "jmp", operands: &[A] },
    InstrDesc { op: Opcode::Jt, mnemonic: "jt", operands: &[A, A] },
    InstrDesc { op: Opcode::Jf, mnemonic: "jf", operands: &[A, A] },
    InstrDesc { op: Opcode::Add, mnemonic: "add", operands: &[R, A, A] },
    InstrDesc { op: Opcode::Mult, mnemonic: "mult", operands: &[R, A, A] },
    InstrDesc { op: Opcode::Mod, mnemonic: "mod", operands: &[R, A, A] },
    InstrDesc { op: Opcode::And, mnemonic: "and", operands: &[R, A, A] },
    InstrDesc { op: Opcode::Or, mnemonic: "or", operands: &[R, A, A] },
    InstrDesc { op: Opcode::Not, mnemonic: "not", operands: &[R, A] },
    InstrDesc { op: Opcode::Rmem, mnemonic: "rmem", operands: &[R, A] },
    InstrDesc { op: Opcode::Wmem, mnemonic: "wmem", operands: &[A, A] },
    InstrDesc { op: Opcode::Call, mnemonic: "call", operands: &[A] },
    InstrDesc { op: Opcode::Ret, mnemonic: "ret", operands: &[] },
    // arity only: the decoder reads the character word without validating it
    InstrDesc { op: Opcode::Out, mnemonic: "out", operands: &[A] },
    InstrDesc { op: Opcode::In, mnemonic: "in", operands: &[R] },
    InstrDesc { op: Opcode::Noop, mnemonic: "noop", operands: &[] },
];

/// Registry lookup by raw opcode number.
pub fn lookup(code: u16) -> Option<&'static InstrDesc> {
    TABLE.get(code as usize)
}

/// Widest instruction: opcode plus three operands.
pub const MAX_WORDS: usize = 4;
