use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use movie_core::MovieLog;
use serde::Serialize;
use shared::{
    domain::Genre,
    error::Notice,
    protocol::{Intent, IntentOutcome, SortOrder, ViewSnapshot, ALL_GENRES_KEY},
};
use storage::RecordStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

/// Line-oriented movie log: reads one JSON intent per line and prints the
/// resulting view as one JSON object per line.
#[derive(Parser, Debug)]
struct Args {
    /// Settings file; `movielog.toml` in the working directory is used when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Read intents from this file instead of stdin.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Delete without asking for confirmation.
    #[arg(long)]
    yes: bool,
    /// Pretty-print each JSON reply instead of one object per line.
    #[arg(long)]
    pretty: bool,
    /// Print the selectable genres and sort orders, then exit.
    #[arg(long)]
    options: bool,
}

#[derive(Debug, Serialize)]
struct FormOption {
    key: &'static str,
    label: &'static str,
}

#[derive(Debug, Serialize)]
struct FormOptions {
    genres: Vec<FormOption>,
    genre_filters: Vec<FormOption>,
    sort_orders: Vec<FormOption>,
}

fn form_options() -> FormOptions {
    let genres: Vec<FormOption> = Genre::ALL
        .into_iter()
        .map(|genre| FormOption {
            key: genre.key(),
            label: genre.label(),
        })
        .collect();
    let mut genre_filters = vec![FormOption {
        key: ALL_GENRES_KEY,
        label: "All genres",
    }];
    genre_filters.extend(Genre::ALL.into_iter().map(|genre| FormOption {
        key: genre.key(),
        label: genre.label(),
    }));
    let sort_orders = SortOrder::OPTIONS
        .into_iter()
        .map(|order| FormOption {
            key: order.key(),
            label: order.label(),
        })
        .collect();
    FormOptions {
        genres,
        genre_filters,
        sort_orders,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Reply {
    Applied {
        outcome: IntentOutcome,
        view: ViewSnapshot,
    },
    Rejected {
        notice: Notice,
        view: ViewSnapshot,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, Default)]
struct SessionOptions {
    confirm_deletes: bool,
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.options {
        println!("{}", serde_json::to_string_pretty(&form_options())?);
        return Ok(());
    }
    let settings = load_settings(args.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut log = MovieLog::new(RecordStore::default(), settings.log_options());
    let options = SessionOptions {
        confirm_deletes: settings.confirm_deletes && !args.yes,
        pretty: args.pretty,
    };
    info!(
        sort = %log.sort_order(),
        filter = %log.genre_filter(),
        "movie log ready"
    );

    let stdout = io::stdout();
    let mut output = stdout.lock();
    match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script '{}'", path.display()))?;
            run_session(&mut log, BufReader::new(file), &mut output, options)?;
        }
        None => {
            let stdin = io::stdin();
            run_session(&mut log, stdin.lock(), &mut output, options)?;
        }
    }
    Ok(())
}

enum Line {
    Blank,
    Intent(Intent),
}

fn parse_line(line: &str) -> Result<Line> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(Line::Blank);
    }
    let intent = serde_json::from_str(trimmed)
        .with_context(|| format!("malformed intent line: {trimmed}"))?;
    Ok(Line::Intent(intent))
}

/// Drives the log until the input ends. Returns the number of intents applied.
fn run_session<R: BufRead, W: Write>(
    log: &mut MovieLog,
    input: R,
    output: &mut W,
    options: SessionOptions,
) -> Result<usize> {
    let mut lines = input.lines();
    let mut pending: Option<String> = None;
    let mut applied = 0;

    loop {
        let line = match pending.take() {
            Some(line) => line,
            None => match lines.next() {
                Some(line) => line.context("failed to read intent line")?,
                None => break,
            },
        };
        let intent = match parse_line(&line) {
            Ok(Line::Blank) => continue,
            Ok(Line::Intent(intent)) => intent,
            Err(err) => {
                warn!(error = %err, "skipping unreadable line");
                write_reply(
                    output,
                    &Reply::Skipped {
                        reason: format!("{err:#}"),
                    },
                    options.pretty,
                )?;
                continue;
            }
        };

        if let Intent::DeleteRecord { id } = &intent {
            if options.confirm_deletes {
                let title = log
                    .records()
                    .iter()
                    .find(|record| &record.id == id)
                    .map_or_else(|| id.to_string(), |record| record.title.clone());
                eprintln!("Delete \"{title}\"? [y/N]");
                let confirmed = match lines.next() {
                    Some(answer) => {
                        let answer = answer.context("failed to read confirmation")?;
                        let confirmed = parse_confirmation(&answer);
                        if confirmed.is_none() {
                            // Not an answer: handle it as the next intent.
                            pending = Some(answer);
                        }
                        confirmed.unwrap_or(false)
                    }
                    None => false,
                };
                if !confirmed {
                    write_reply(
                        output,
                        &Reply::Skipped {
                            reason: format!("deletion of {id} not confirmed"),
                        },
                        options.pretty,
                    )?;
                    continue;
                }
            }
        }

        let reply = match log.dispatch(intent) {
            Ok(outcome) => {
                applied += 1;
                Reply::Applied {
                    outcome,
                    view: log.snapshot(),
                }
            }
            Err(err) => Reply::Rejected {
                notice: Notice::from(&err),
                view: log.snapshot(),
            },
        };
        write_reply(output, &reply, options.pretty)?;
    }

    Ok(applied)
}

/// `Some` for a yes/no answer (blank means no), `None` for any other line.
fn parse_confirmation(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "" | "n" | "no" => Some(false),
        _ => None,
    }
}

fn write_reply<W: Write>(output: &mut W, reply: &Reply, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(reply)?
    } else {
        serde_json::to_string(reply)?
    };
    writeln!(output, "{rendered}").context("failed to write reply")?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
