use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Generate MySQL seed scripts from 법정동 region code tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert a region code table into a batched INSERT script
    Generate(GenerateArgs),
    /// Inspect a region code table: encoding, delimiter, column roles, level counts
    Probe(ProbeArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Input region code table (tab or comma separated, header row required)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination SQL script path
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Deepest hierarchy level to include (1=시/도, 2=시/군/구, 3=읍/면/동, 4=리)
    #[arg(long = "max-level", default_value_t = 3)]
    pub max_level: u8,
    /// Deployment strategy for the generated script
    #[arg(long, value_enum, default_value = "staged-rename")]
    pub strategy: Strategy,
    /// Rows per INSERT statement
    #[arg(long = "batch-size", default_value_t = 500)]
    pub batch_size: usize,
    /// Live table name; shadow and backup names derive from it
    #[arg(long, default_value = "regions")]
    pub table: String,
    /// Field delimiter (supports ',', 'tab', ';', '|'); auto-detected if omitted
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file; auto-detected if omitted
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Input region code table to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Deepest hierarchy level to include when counting records
    #[arg(long = "max-level", default_value_t = 3)]
    pub max_level: u8,
    /// Field delimiter (supports ',', 'tab', ';', '|'); auto-detected if omitted
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file; auto-detected if omitted
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// How the generated script replaces the contents of the live table.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum Strategy {
    /// Load a shadow table, then swap it in with an atomic RENAME (zero downtime)
    StagedRename,
    /// DELETE the live table and reinsert in place (downtime possible)
    DirectReplace,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_named_forms() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter("pipe").unwrap(), b'|');
    }

    #[test]
    fn parse_delimiter_rejects_multichar_and_non_ascii() {
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("→").is_err());
    }
}
