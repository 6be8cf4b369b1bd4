use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use synacor_rs::{Decoded, Decoder, DisasmConfig, Disassembler, WordReader};

#[derive(Parser, Debug)]
#[command(author, version, about = "Synacor VM disassembler", long_about = None)]
struct Cli {
    /// Do not prefix instructions with their offset from the start of the file
    #[arg(short = 'n', long)]
    no_offset: bool,
    /// Show the offset and all integer arguments in hex instead of decimal
    #[arg(short = 'x', long)]
    hex_digits: bool,
    /// Merge consecutive `out` instructions into one string literal
    #[arg(short, long)]
    compress: bool,
    /// Show the raw words of each instruction before the mnemonic
    #[arg(short, long)]
    raw: bool,
    /// Load listing options from a JSON file; flags above are OR-ed on top
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Output format: text listing or json records
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write output to file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
    /// Input binary path
    #[arg(value_name = "BINFILE")]
    input: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn listing_config(&self) -> Result<DisasmConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_config(path)?,
            None => DisasmConfig::default(),
        };
        cfg.suppress_address_column |= self.no_offset;
        cfg.hexadecimal_numerals |= self.hex_digits;
        cfg.compress_character_runs |= self.compress;
        cfg.show_raw_words |= self.raw;
        Ok(cfg)
    }
}

fn load_config(path: &Path) -> Result<DisasmConfig> {
    let txt = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&txt).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = cli.listing_config()?;

    let file = File::open(&cli.input).with_context(|| format!("opening {}", cli.input.display()))?;
    let words = WordReader::new(BufReader::new(file));

    let sink: Box<dyn Write> = match &cli.out {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut sink = BufWriter::new(sink);

    match cli.format {
        OutputFormat::Text => {
            let mut dis = Disassembler::new(words, cfg, &mut sink);
            let summary = dis
                .run()
                .with_context(|| format!("disassembling {}", cli.input.display()))?;
            info!(
                instructions = summary.instructions,
                data_words = summary.data_words,
                words = summary.words,
                "done"
            );
        }
        OutputFormat::Json => {
            let records: Vec<Decoded> = Decoder::new(words)
                .collect::<Result<_, _>>()
                .with_context(|| format!("disassembling {}", cli.input.display()))?;
            serde_json::to_writer_pretty(&mut sink, &records)?;
            writeln!(sink)?;
            info!(records = records.len(), "done");
        }
    }
    sink.flush()?;

    Ok(())
}
