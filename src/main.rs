use color_eyre::Result;
use tracing_subscriber::prelude::*;

use crate::config::Config;
use crate::input::{LineEvent, Prompt};
use crate::state::Session;

#[macro_use]
extern crate tracing;

pub mod builtins;
pub mod cmd;
pub mod config;
pub mod input;
pub mod parse;
pub mod state;
#[cfg(test)]
mod testutil;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let (writer, _guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(".", "clam.log"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_error::ErrorLayer::default())
        .init();

    color_eyre::install()?;

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("clam: {err}");
            Config::default()
        }
    };

    trace!(?config, "starting shell");

    let mut prompt = Prompt::new(&config)?;
    let mut session = Session::new();
    let mut last_command: Option<String> = None;

    loop {
        let line = match prompt.read_line(&config.prompt)? {
            LineEvent::Line(line) => line.trim().to_owned(),
            LineEvent::Interrupted => continue,
            LineEvent::Eof => break,
        };

        if line.is_empty() {
            continue;
        }

        // `!!` re-runs the previous line, echoing it first.
        let line = if line == "!!" {
            match &last_command {
                Some(previous) => {
                    println!("{previous}");
                    previous.clone()
                }
                None => {
                    eprintln!("clam: no command in the history");
                    continue;
                }
            }
        } else {
            line
        };

        prompt.remember(&line);

        if line == "exit" {
            break;
        }

        last_command = Some(line.clone());

        let cmd = match parse::parse_command(&line) {
            Ok(cmd) => cmd,
            Err(err) => {
                eprintln!("clam: {err}");
                continue;
            }
        };

        if cmd.is_empty() {
            continue;
        }

        if let Err(err) = cmd::job::submit(cmd, &mut session) {
            eprintln!("clam: {err}");
        }
    }

    prompt.save();

    Ok(())
}
