use pretty_assertions::assert_eq;
use synacor_rs::{disassemble_bytes, Decoded, Decoder, DisasmConfig, WordReader};

fn bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

// set r0, 4 ; out 'o' ; out 'k' ; out '\n' ; add r1, r0, 1 ; jt r1, 0 ; hlt
const PROGRAM: &[u16] = &[
    1, 32768, 4, //
    19, 111, //
    19, 107, //
    19, 10, //
    9, 32769, 32768, 1, //
    7, 32769, 0, //
    0,
];

#[test]
fn default_listing() {
    let text = disassemble_bytes(&bytes(PROGRAM), DisasmConfig::default()).unwrap();
    let expected = concat!(
        "         0\tset\tr0, 4\n",
        "         3\tout\t'o'\n",
        "         5\tout\t'k'\n",
        "         7\tout\t'\\n'\n",
        "         9\tadd\tr1, r0, 1\n",
        "        13\tjt\tr1, 0\n",
        "        16\thlt\n",
    );
    assert_eq!(text, expected);
}

#[test]
fn compressed_hex_listing() {
    let cfg = DisasmConfig {
        hexadecimal_numerals: true,
        compress_character_runs: true,
        ..Default::default()
    };
    let text = disassemble_bytes(&bytes(PROGRAM), cfg).unwrap();
    let expected = "\
0x00000000\tset\tr0, 0x0004
0x00000003\tout\t\"ok\\n\"
0x00000009\tadd\tr1, r0, 0x0001
0x0000000d\tjt\tr1, 0x0000
0x00000010\thlt
";
    assert_eq!(text, expected);
}

#[test]
fn raw_listing_without_offsets() {
    let cfg = DisasmConfig {
        suppress_address_column: true,
        show_raw_words: true,
        ..Default::default()
    };
    let text = disassemble_bytes(&bytes(&[9, 32769, 32768, 1, 19, 65, 0]), cfg).unwrap();
    let expected = "\
0009 8001 8000 0001\tadd\tr1, r0, 1
0013 0041          \tout\t'A'
0000               \thlt
";
    assert_eq!(text, expected);
}

#[test]
fn raw_compressed_run_shows_opening_words() {
    let cfg = DisasmConfig {
        show_raw_words: true,
        compress_character_runs: true,
        ..Default::default()
    };
    let text = disassemble_bytes(&bytes(&[19, 72, 19, 105, 21]), cfg).unwrap();
    let expected = "         0\t0013 0048          \tout\t\"Hi\"\n         4\t0015               \tnoop\n";
    assert_eq!(text, expected);
}

#[test]
fn line_widths_sum_to_stream_length() {
    let raw = bytes(PROGRAM);
    let records: Vec<Decoded> = Decoder::new(WordReader::new(&raw[..]))
        .collect::<Result<_, _>>()
        .unwrap();
    let total: u32 = records.iter().map(|d| d.width()).sum();
    assert_eq!(total as usize, PROGRAM.len());
    assert_eq!(records.len(), 7);
}

#[test]
fn records_serialize_to_json() {
    let raw = bytes(&[1, 32768, 4, 9999]);
    let records: Vec<Decoded> = Decoder::new(WordReader::new(&raw[..]))
        .collect::<Result<_, _>>()
        .unwrap();
    let json = serde_json::to_value(&records).unwrap();
    assert_eq!(json[0]["kind"], "instruction");
    assert_eq!(json[0]["op"], "set");
    assert_eq!(json[0]["words"], serde_json::json!([1, 32768, 4]));
    assert_eq!(json[0]["operands"][0]["value"]["kind"], "register");
    assert_eq!(json[1]["kind"], "data");
    assert_eq!(json[1]["addr"], 3);
    assert_eq!(json[1]["bytes"], serde_json::json!([15, 39]));
}
