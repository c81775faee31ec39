use std::os::unix::io::RawFd;
use std::path::Path;

use nix::fcntl::{open, OFlag};
use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::sys::stat::Mode;
use nix::unistd::{close, dup, dup2};
use thiserror::Error;

use crate::state::Session;

use super::{dispatch, CommandError};

#[derive(Debug, Error)]
pub enum RedirectError {
    #[error("failed to open {path} for {direction}: {source}")]
    Open {
        path: String,
        direction: Direction,
        source: nix::Error,
    },
    #[error("failed to redirect {direction}: {source}")]
    Dup {
        direction: Direction,
        source: nix::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

/// Runs one pipe-free command, applying the tail redirection (if any)
/// around the dispatcher. The standard stream is restored when the guard
/// drops, on error paths included.
pub fn run(mut argv: Vec<String>, session: &mut Session) -> Result<(), CommandError> {
    let _guard = match take_redirect(&mut argv) {
        Some((direction, target)) => Some(StreamGuard::apply(direction, &target)?),
        None => None,
    };

    dispatch::run(&argv, session)
}

/// Inspects the last two arguments for a `>`/`<` operator and a target
/// filename, consuming both when present. Only one redirection is
/// recognized, at the tail, and only on a command that still has a name
/// left after stripping.
pub fn take_redirect(argv: &mut Vec<String>) -> Option<(Direction, String)> {
    if argv.len() <= 2 {
        return None;
    }

    let direction = match argv[argv.len() - 2].as_str() {
        ">" => Direction::Output,
        "<" => Direction::Input,
        _ => return None,
    };

    let target = argv.pop().unwrap_or_default();
    argv.pop();

    Some((direction, target))
}

/// Saved copy of a standard stream descriptor while a redirection is in
/// effect; dropping it puts the original stream back.
#[derive(Debug)]
pub struct StreamGuard {
    saved: RawFd,
    stream: RawFd,
}

impl StreamGuard {
    pub fn apply(direction: Direction, target: &str) -> Result<Self, RedirectError> {
        let (flags, mode, stream) = match direction {
            Direction::Output => (
                OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
                Mode::S_IRWXU,
                STDOUT_FILENO,
            ),
            Direction::Input => (OFlag::O_RDONLY, Mode::empty(), STDIN_FILENO),
        };

        let fd = open(Path::new(target), flags, mode).map_err(|source| RedirectError::Open {
            path: target.to_owned(),
            direction,
            source,
        })?;

        trace!(%direction, target, fd, "applying redirection");

        let dup_err = |source| RedirectError::Dup { direction, source };

        let saved = match dup(stream) {
            Ok(saved) => saved,
            Err(source) => {
                let _ = close(fd);
                return Err(dup_err(source));
            }
        };

        if let Err(source) = dup2(fd, stream) {
            let _ = close(fd);
            let _ = close(saved);
            return Err(dup_err(source));
        }
        let _ = close(fd);

        Ok(Self { saved, stream })
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        let _ = dup2(self.saved, self.stream);
        let _ = close(self.saved);
    }
}
