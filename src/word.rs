use std::io::{ErrorKind, Read};

use crate::error::DisasmError;

pub type Word = u16;

/// Pull-based source of little-endian words.
pub trait WordSource {
    /// `Ok(None)` only when the stream ends exactly on a word boundary.
    fn next_word(&mut self) -> Result<Option<Word>, DisasmError>;
}

pub struct WordReader<R> {
    inner: R,
    offset: u64, // bytes consumed so far
}

impl<R: Read> WordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    pub fn byte_offset(&self) -> u64 {
        self.offset
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, DisasmError> {
        let mut got = 0;
        while got < buf.len() {
            match self.inner.read(&mut buf[got..]) {
                Ok(0) => break,
                Ok(n) => got += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(got)
    }
}

impl<R: Read> WordSource for WordReader<R> {
    fn next_word(&mut self) -> Result<Option<Word>, DisasmError> {
        let mut buf = [0u8; 2];
        match self.fill(&mut buf)? {
            0 => Ok(None),
            1 => Err(DisasmError::TruncatedWord { offset: self.offset }),
            _ => {
                self.offset += 2;
                Ok(Some(u16::from_le_bytes(buf)))
            }
        }
    }
}
