pub mod decoder;
pub mod disasm;
pub mod error;
pub mod instructions;
pub mod listing;
pub mod operand;
pub mod word;

pub use decoder::{Decoded, Decoder, Payload};
pub use disasm::{DisasmConfig, Formatter, Line};
pub use error::DisasmError;
pub use instructions::{lookup, InstrDesc, Opcode, OperandKind};
pub use listing::{disassemble_bytes, Disassembler, Summary};
pub use operand::{classify, validate, Operand, ValueDomain};
pub use word::{Word, WordReader, WordSource};
