use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::load_session;
use crate::config::Config;
use crate::core::session::LyricsSession;

#[derive(Args)]
pub struct LocateArgs {
    /// Lyrics file, audio file with a sidecar/embedded lyrics, or `-` for stdin
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Playback position in seconds
    #[arg(short, long, allow_hyphen_values = true)]
    time: f64,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug, PartialEq)]
struct Located {
    index: isize,
    timestamp: Option<f64>,
    text: Option<String>,
}

fn locate(session: &mut LyricsSession, time: f64) -> Located {
    let update = session.advance(time);
    let line = session.active_line();
    Located {
        index: update.as_sentinel(),
        timestamp: line.map(|l| l.timestamp_seconds),
        text: line.map(|l| l.text.clone()),
    }
}

pub async fn execute(args: LocateArgs, config: &Config) -> Result<()> {
    let mut session = load_session(&args.path, config).await?;
    let located = locate(&mut session, args.time);

    if args.json {
        println!("{}", serde_json::to_string(&located)?);
        return Ok(());
    }

    match (&located.text, located.timestamp) {
        (Some(text), Some(_)) => {
            let tag = session.active_line().map(|l| l.time_tag()).unwrap_or_default();
            println!("{}  [{}] {}", located.index, tag, text);
        }
        _ => println!("-1  (no active line)"),
    }
    Ok(())
}
