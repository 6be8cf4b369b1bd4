use std::io::Write;

use tracing::debug;

use crate::decoder::{Decoded, Decoder, Payload};
use crate::disasm::{escape_char, DisasmConfig, Formatter};
use crate::error::DisasmError;
use crate::word::{WordReader, WordSource};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub instructions: usize,
    pub data_words: usize,
    pub words: u32,
}

/// Drives a [`Decoder`] into a text sink, one record at a time.
pub struct Disassembler<S, W> {
    decoder: Decoder<S>,
    fmt: Formatter,
    out: W,
    in_run: bool, // an `out` string literal is open on the current line
}

impl<S: WordSource, W: Write> Disassembler<S, W> {
    pub fn new(src: S, cfg: DisasmConfig, out: W) -> Self {
        Self {
            decoder: Decoder::new(src),
            fmt: Formatter::new(cfg),
            out,
            in_run: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Decode until the stream ends or an error halts decoding. Lines written
    /// before an error stay written, and an open string run is closed first.
    /// A decode error wins over any error from that final close and flush.
    pub fn run(&mut self) -> Result<Summary, DisasmError> {
        let mut summary = Summary::default();
        if let Err(e) = self.drive(&mut summary) {
            let _ = self.close_run();
            let _ = self.out.flush();
            return Err(e);
        }
        self.close_run()?;
        self.out.flush()?;
        summary.words = self.decoder.cursor();
        Ok(summary)
    }

    fn drive(&mut self, summary: &mut Summary) -> Result<(), DisasmError> {
        while let Some(d) = self.decoder.next_decoded()? {
            match d.payload {
                Payload::Data { .. } => summary.data_words += 1,
                Payload::Instruction { .. } => summary.instructions += 1,
            }
            self.emit(&d)?;
        }
        Ok(())
    }

    fn emit(&mut self, d: &Decoded) -> Result<(), DisasmError> {
        let ch = d.out_char().filter(|_| self.fmt.config().compress_character_runs);
        match ch {
            Some(ch) if self.in_run => {
                write!(self.out, "{}", escape_char(ch))?;
            }
            Some(ch) => {
                debug!(addr = d.addr, "opening string run");
                let prefix = self.fmt.prefix(d.addr, &d.words);
                write!(self.out, "{prefix}out\t\"{}", escape_char(ch))?;
                self.in_run = true;
            }
            None => {
                self.close_run()?;
                self.out.write_all(self.fmt.format(d).as_bytes())?;
            }
        }
        Ok(())
    }

    fn close_run(&mut self) -> Result<(), DisasmError> {
        if self.in_run {
            debug!("closing string run");
            self.out.write_all(b"\"\n")?;
            self.in_run = false;
        }
        Ok(())
    }
}

/// Disassemble an in-memory image into a listing.
pub fn disassemble_bytes(bytes: &[u8], cfg: DisasmConfig) -> Result<String, DisasmError> {
    let mut dis = Disassembler::new(WordReader::new(bytes), cfg, Vec::new());
    dis.run()?;
    Ok(String::from_utf8_lossy(&dis.into_inner()).into_owned())
}
