use crate::instructions::OperandKind;

#[derive(thiserror::Error, Debug)]
pub enum DisasmError {
    #[error("truncated stream: lone trailing byte at byte offset {offset:#x} does not form a whole word")]
    TruncatedWord { offset: u64 },
    #[error("truncated stream: expected argument {position} of instruction {mnemonic} at {addr}, but the stream ended")]
    TruncatedOperand {
        mnemonic: &'static str,
        position: usize,
        addr: u32,
    },
    #[error("expected argument {position} of instruction {mnemonic} to be {}; offending value was {value}", .expected.describe())]
    ValidationFailure {
        mnemonic: &'static str,
        position: usize,
        value: u16,
        expected: OperandKind,
    },
    #[error("I/O error while reading the word stream: {0}")]
    Io(#[from] std::io::Error),
}

impl DisasmError {
    /// Both ways the stream can run dry in the middle of something.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            DisasmError::TruncatedWord { .. } | DisasmError::TruncatedOperand { .. }
        )
    }
}
