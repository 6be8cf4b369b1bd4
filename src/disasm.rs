use serde::{Deserialize, Serialize};

use crate::decoder::{Decoded, Payload};
use crate::instructions::{Opcode, MAX_WORDS};
use crate::operand::{Operand, ValueDomain};
use crate::word::Word;

/// Listing toggles. All default to off: decimal numerals, address column
/// shown, no raw words, one line per `out`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisasmConfig {
    pub suppress_address_column: bool,
    pub hexadecimal_numerals: bool,
    pub compress_character_runs: bool,
    pub show_raw_words: bool,
}

/// Fields of one listing line before layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub addr: u32,
    pub words: Vec<Word>,
    pub mnemonic: &'static str,
    pub operands: Vec<String>,
    pub comment: Option<String>,
}

pub struct Formatter {
    cfg: DisasmConfig,
}

impl Formatter {
    pub fn new(cfg: DisasmConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &DisasmConfig {
        &self.cfg
    }

    pub fn line(&self, d: &Decoded) -> Line {
        let (mnemonic, operands, comment) = match &d.payload {
            Payload::Instruction { op: Opcode::Out, .. } => {
                let ch = d.out_char().unwrap_or_default();
                ("out", vec![format!("'{}'", escape_char(ch))], None)
            }
            Payload::Instruction { op, operands } => (
                op.mnemonic(),
                operands.iter().map(|o| self.operand(o)).collect(),
                None,
            ),
            Payload::Data { bytes } => (
                "db",
                bytes.iter().map(|b| format!("{b:#04x}")).collect(),
                Some(format!("|{}|", bytes.iter().map(|&b| printable(b)).collect::<String>())),
            ),
        };
        Line {
            addr: d.addr,
            words: d.words.clone(),
            mnemonic,
            operands,
            comment,
        }
    }

    pub fn format(&self, d: &Decoded) -> String {
        self.render(&self.line(d))
    }

    pub fn render(&self, line: &Line) -> String {
        if self.cfg.show_raw_words {
            render_raw(self, line)
        } else {
            render_symbolic(self, line)
        }
    }

    /// Address and raw-word columns that lead every line.
    pub fn prefix(&self, addr: u32, words: &[Word]) -> String {
        let mut s = self.address(addr);
        if self.cfg.show_raw_words {
            s.push_str(&raw_column(words));
        }
        s
    }

    /// Wide enough for any `u32` cursor, so columns never shift.
    fn address(&self, addr: u32) -> String {
        match (self.cfg.suppress_address_column, self.cfg.hexadecimal_numerals) {
            (true, _) => String::new(),
            (false, true) => format!("{addr:#010x}\t"),
            (false, false) => format!("{addr:>10}\t"),
        }
    }

    fn operand(&self, o: &Operand) -> String {
        match o.value {
            ValueDomain::Register(r) => format!("r{r}"),
            ValueDomain::Integer(n) if self.cfg.hexadecimal_numerals => format!("{n:#06x}"),
            ValueDomain::Integer(n) => n.to_string(),
            // validate() never lets these through
            ValueDomain::Invalid => format!("?{}", o.raw),
        }
    }
}

fn body(line: &Line) -> String {
    let mut s = String::from(line.mnemonic);
    if !line.operands.is_empty() {
        s.push('\t');
        s.push_str(&line.operands.join(", "));
    }
    if let Some(c) = &line.comment {
        s.push_str("\t; ");
        s.push_str(c);
    }
    s.push('\n');
    s
}

fn render_symbolic(f: &Formatter, line: &Line) -> String {
    let mut s = f.address(line.addr);
    s.push_str(&body(line));
    s
}

fn render_raw(f: &Formatter, line: &Line) -> String {
    let mut s = f.prefix(line.addr, &line.words);
    s.push_str(&body(line));
    s
}

/// Fixed-width hex dump of up to `MAX_WORDS` words, blank-padded, TAB-terminated.
fn raw_column(words: &[Word]) -> String {
    let fields: Vec<String> = (0..MAX_WORDS)
        .map(|i| match words.get(i) {
            Some(w) => format!("{w:04x}"),
            None => "    ".to_string(),
        })
        .collect();
    let mut s = fields.join(" ");
    s.push('\t');
    s
}

/// Text for one `out` character. NUL prints nothing. Bytes 0x80 and up are
/// read as Latin-1 so the listing stays valid UTF-8. A `"` is left as-is,
/// even inside a compressed run.
pub fn escape_char(ch: u8) -> String {
    match ch {
        0 => String::new(),
        b'\n' => "\\n".into(),
        b'\t' => "\\t".into(),
        0x0b => "\\v".into(),
        b'\r' => "\\r".into(),
        _ => char::from(ch).to_string(),
    }
}

fn printable(b: u8) -> char {
    if b.is_ascii_graphic() || b == b' ' {
        b as char
    } else {
        '.'
    }
}
