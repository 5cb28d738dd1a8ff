//! Input handling: encoding auto-detection, delimiter sniffing, and CSV
//! reader construction.
//!
//! Government region tables arrive in a mix of encodings (UTF-8 with or
//! without a signature, EUC-KR/CP949, occasionally Latin-1) and either tab or
//! comma separated. Detection samples the head of the file once; the full
//! read then flows through an `encoding_rs_io` transcoding stream so the csv
//! crate always sees UTF-8.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{EUC_KR, Encoding, UTF_8, WINDOWS_1252};
use encoding_rs_io::DecodeReaderBytesBuilder;

/// Candidate encodings, tried in order. `encoding_rs` maps both the `cp949`
/// and `euc-kr` labels to the same windows-949 decoder, and Windows-1252
/// decodes any byte sequence, making it the effective catch-all.
pub const ENCODING_CANDIDATES: &[&Encoding] = &[UTF_8, EUC_KR, WINDOWS_1252];

pub const DEFAULT_DELIMITER: u8 = b'\t';

const SNIFF_BYTES: usize = 1024;
const DELIMITER_SAMPLE_CHARS: usize = 200;

/// Reads the detection sample from the head of the file.
pub fn read_sniff(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let mut sample = Vec::with_capacity(SNIFF_BYTES);
    file.take(SNIFF_BYTES as u64)
        .read_to_end(&mut sample)
        .with_context(|| format!("Reading from input file {path:?}"))?;
    Ok(sample)
}

pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| anyhow!("Unknown encoding '{label}'"))
}

/// Picks the first candidate that decodes the sample without errors. A byte
/// order mark wins outright; if nothing matches, falls back to UTF-8.
pub fn detect_encoding(sample: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(sample) {
        return encoding;
    }
    for &candidate in ENCODING_CANDIDATES {
        if decodes_cleanly(candidate, sample) {
            return candidate;
        }
    }
    UTF_8
}

fn decodes_cleanly(encoding: &'static Encoding, sample: &[u8]) -> bool {
    if encoding == UTF_8 {
        // error_len() is None when a sequence is merely cut at the sample
        // boundary, which must not disqualify the candidate.
        return match std::str::from_utf8(sample) {
            Ok(_) => true,
            Err(err) => err.error_len().is_none(),
        };
    }
    let (_, had_errors) = encoding.decode_without_bom_handling(trim_split_tail(sample));
    !had_errors
}

/// Drops up to three trailing high bytes so a multibyte character cut at the
/// sample boundary does not read as a decode error.
fn trim_split_tail(sample: &[u8]) -> &[u8] {
    let mut end = sample.len();
    while end > 0 && end + 3 > sample.len() && sample[end - 1] >= 0x80 {
        end -= 1;
    }
    &sample[..end]
}

/// Tab wins if present anywhere in the first 200 characters, then comma; tab
/// is also the default when neither appears.
pub fn detect_delimiter(sample_text: &str) -> u8 {
    let head: String = sample_text.chars().take(DELIMITER_SAMPLE_CHARS).collect();
    if head.contains('\t') {
        b'\t'
    } else if head.contains(',') {
        b','
    } else {
        DEFAULT_DELIMITER
    }
}

/// Opens a CSV reader over a transcoding stream. Rows may be ragged in the
/// source registry exports, so the reader is flexible; missing trailing
/// fields read as empty.
pub fn open_csv_reader(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<csv::Reader<Box<dyn Read>>> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let decoded = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .build(BufReader::new(file));
    let reader: Box<dyn Read> = Box::new(decoded);
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    Ok(builder.from_reader(reader))
}
