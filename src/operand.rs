//! Operand classification and per-slot validation.
//!
//! Every 16-bit word falls into exactly one domain: a plain integer in
//! `0..=MAX_INT`, one of eight registers in `REG_BASE..REG_BASE + 8`, or
//! invalid.

use serde::{Deserialize, Serialize};

use crate::error::DisasmError;
use crate::instructions::OperandKind;

pub const MAX_INT: u16 = 32767;
pub const REG_BASE: u16 = 32768;
pub const NUM_REGS: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ValueDomain {
    Register(u8),
    Integer(u16),
    Invalid,
}

pub fn classify(word: u16) -> ValueDomain {
    match word {
        0..=MAX_INT => ValueDomain::Integer(word),
        w if w - REG_BASE < NUM_REGS => ValueDomain::Register((w - REG_BASE) as u8),
        _ => ValueDomain::Invalid,
    }
}

/// An operand word that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operand {
    pub raw: u16,
    pub value: ValueDomain,
}

/// Check `word` against the slot's kind. `position` is 1-based.
pub fn validate(
    word: u16,
    kind: OperandKind,
    mnemonic: &'static str,
    position: usize,
) -> Result<Operand, DisasmError> {
    let value = classify(word);
    let ok = match value {
        ValueDomain::Register(_) => kind.contains(OperandKind::REG),
        ValueDomain::Integer(_) => kind.contains(OperandKind::INT),
        ValueDomain::Invalid => false,
    };
    if !ok {
        return Err(DisasmError::ValidationFailure {
            mnemonic,
            position,
            value: word,
            expected: kind,
        });
    }
    Ok(Operand { raw: word, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domains_partition_the_word_space() {
        let mut regs = 0u32;
        let mut ints = 0u32;
        let mut invalid = 0u32;
        for w in 0..=u16::MAX {
            match classify(w) {
                ValueDomain::Register(r) => {
                    assert!((32768..=32775).contains(&w));
                    assert_eq!(r as u16, w - 32768);
                    regs += 1;
                }
                ValueDomain::Integer(n) => {
                    assert!(w <= 32767);
                    assert_eq!(n, w);
                    ints += 1;
                }
                ValueDomain::Invalid => {
                    assert!(w >= 32776);
                    invalid += 1;
                }
            }
        }
        assert_eq!(regs, 8);
        assert_eq!(ints, 32768);
        assert_eq!(invalid, 65536 - 32768 - 8);
    }

    #[test]
    fn boundaries() {
        assert_eq!(classify(32767), ValueDomain::Integer(32767));
        assert_eq!(classify(32768), ValueDomain::Register(0));
        assert_eq!(classify(32775), ValueDomain::Register(7));
        assert_eq!(classify(32776), ValueDomain::Invalid);
        assert_eq!(classify(u16::MAX), ValueDomain::Invalid);
    }

    #[test]
    fn register_only_slot() {
        assert!(validate(32769, OperandKind::REG, "pop", 1).is_ok());
        let err = validate(5, OperandKind::REG, "pop", 1).unwrap_err();
        assert!(matches!(
            err,
            DisasmError::ValidationFailure { mnemonic: "pop", position: 1, value: 5, .. }
        ));
    }

    #[test]
    fn integer_only_slot() {
        assert!(validate(5, OperandKind::INT, "x", 1).is_ok());
        assert!(validate(32768, OperandKind::INT, "x", 1).is_err());
    }

    #[test]
    fn register_or_integer_slot_rejects_only_invalid() {
        assert_eq!(
            validate(32770, OperandKind::ANY, "jmp", 1).unwrap().value,
            ValueDomain::Register(2)
        );
        assert_eq!(validate(0, OperandKind::ANY, "jmp", 1).unwrap().value, ValueDomain::Integer(0));
        assert!(validate(40000, OperandKind::ANY, "jmp", 1).is_err());
    }

    #[test]
    fn validation_is_repeatable() {
        for w in [0u16, 32767, 32768, 32775, 32776, 65535] {
            for kind in [OperandKind::REG, OperandKind::INT, OperandKind::ANY] {
                let a = validate(w, kind, "eq", 3).ok();
                let b = validate(w, kind, "eq", 3).ok();
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn empty_kind_accepts_nothing() {
        assert!(validate(1, OperandKind::empty(), "hlt", 1).is_err());
    }
}
