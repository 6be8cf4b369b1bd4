use serde::Serialize;
use tracing::{debug, trace};

use crate::error::DisasmError;
use crate::instructions::Opcode;
use crate::operand::{classify, validate, Operand};
use crate::word::{Word, WordSource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Payload {
    Instruction { op: Opcode, operands: Vec<Operand> },
    /// A word that is not an opcode, kept as two bytes in stream order.
    Data { bytes: [u8; 2] },
}

/// One decode step: an instruction or a raw-data word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoded {
    pub addr: u32,
    pub words: Vec<Word>,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Decoded {
    pub fn width(&self) -> u32 {
        self.words.len() as u32
    }

    pub fn opcode(&self) -> Option<Opcode> {
        match self.payload {
            Payload::Instruction { op, .. } => Some(op),
            Payload::Data { .. } => None,
        }
    }

    /// Character code of an `out`: the low byte of its operand word, whatever
    /// domain that word falls in.
    pub fn out_char(&self) -> Option<u8> {
        match &self.payload {
            Payload::Instruction { op: Opcode::Out, operands } => {
                Some((operands.first()?.raw & 0xFF) as u8)
            }
            _ => None,
        }
    }
}

/// Stream-order decoder. Yields `None` once halted, either at a clean end of
/// stream or after the first error.
pub struct Decoder<S> {
    src: S,
    cursor: u32,
    halted: bool,
}

impl<S: WordSource> Decoder<S> {
    pub fn new(src: S) -> Self {
        Self {
            src,
            cursor: 0,
            halted: false,
        }
    }

    /// Words consumed so far, which is also the address of the next record.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn next_decoded(&mut self) -> Result<Option<Decoded>, DisasmError> {
        if self.halted {
            return Ok(None);
        }
        match self.step() {
            Ok(Some(d)) => Ok(Some(d)),
            Ok(None) => {
                debug!(words = self.cursor, "end of stream");
                self.halted = true;
                Ok(None)
            }
            Err(e) => {
                debug!(addr = self.cursor, error = %e, "decoding halted");
                self.halted = true;
                Err(e)
            }
        }
    }

    fn step(&mut self) -> Result<Option<Decoded>, DisasmError> {
        let addr = self.cursor;
        let Some(code) = self.src.next_word()? else {
            return Ok(None);
        };

        let Some(op) = Opcode::from_word(code) else {
            let [lo, hi] = code.to_le_bytes();
            debug!(addr, word = code, "not an opcode, emitting raw data");
            self.cursor += 1;
            return Ok(Some(Decoded {
                addr,
                words: vec![code],
                payload: Payload::Data { bytes: [lo, hi] },
            }));
        };

        if op == Opcode::Out {
            return self.step_out(addr, code).map(Some);
        }

        let desc = op.descriptor();
        let mut words = Vec::with_capacity(1 + desc.arity());
        let mut operands = Vec::with_capacity(desc.arity());
        words.push(code);
        for (i, &kind) in desc.operands.iter().enumerate() {
            let position = i + 1;
            let raw = self
                .src
                .next_word()?
                .ok_or(DisasmError::TruncatedOperand {
                    mnemonic: desc.mnemonic,
                    position,
                    addr,
                })?;
            operands.push(validate(raw, kind, desc.mnemonic, position)?);
            words.push(raw);
        }

        self.cursor += words.len() as u32;
        trace!(addr, mnemonic = desc.mnemonic, ?words, "decoded");
        Ok(Some(Decoded {
            addr,
            words,
            payload: Payload::Instruction { op, operands },
        }))
    }

    /// `out` carries a character code, so its operand word is taken as-is.
    fn step_out(&mut self, addr: u32, code: Word) -> Result<Decoded, DisasmError> {
        let raw = self.src.next_word()?.ok_or(DisasmError::TruncatedOperand {
            mnemonic: Opcode::Out.mnemonic(),
            position: 1,
            addr,
        })?;
        self.cursor += 2;
        trace!(addr, ch = raw & 0xFF, "decoded out");
        Ok(Decoded {
            addr,
            words: vec![code, raw],
            payload: Payload::Instruction {
                op: Opcode::Out,
                operands: vec![Operand { raw, value: classify(raw) }],
            },
        })
    }
}

impl<S: WordSource> Iterator for Decoder<S> {
    type Item = Result<Decoded, DisasmError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_decoded().transpose()
    }
}
