use anyhow::Result;
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli::load_session;
use crate::config::Config;
use crate::core::lyrics::LyricsDocument;

#[derive(Args)]
pub struct ParseArgs {
    /// Lyrics file, audio file with a sidecar/embedded lyrics, or `-` for stdin
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Print the parsed lines as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: ParseArgs, config: &Config) -> Result<()> {
    let session = load_session(&args.path, config).await?;
    let mut stdout = io::stdout().lock();
    write_document(&mut stdout, session.document(), args.json)?;
    Ok(())
}

fn write_document<W: Write>(out: &mut W, document: &LyricsDocument, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, document)?;
        writeln!(out)?;
        return Ok(());
    }

    if document.is_empty() {
        writeln!(out, "No timed lyrics found")?;
        return Ok(());
    }

    for (index, line) in document.lines().iter().enumerate() {
        writeln!(out, "{:>4}  [{}] {}", index, line.time_tag(), line.text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lyrics::LyricsParser;

    #[test]
    fn test_text_listing() {
        let doc = LyricsParser::new().parse_str("[00:00.50]first\n[01:02.345]second");
        let mut out = Vec::new();
        write_document(&mut out, &doc, false).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert_eq!(output, "   0  [00:00.050] first\n   1  [01:02.345] second\n");
    }

    #[test]
    fn test_json_listing() {
        let doc = LyricsParser::new().parse_str("[00:01.000]hello");
        let mut out = Vec::new();
        write_document(&mut out, &doc, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["lines"][0]["text"], "hello");
        assert_eq!(value["lines"][0]["timestamp_seconds"], 1.0);
    }

    #[test]
    fn test_empty_listing() {
        let mut out = Vec::new();
        write_document(&mut out, &LyricsDocument::empty(), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No timed lyrics found\n");
    }
}
