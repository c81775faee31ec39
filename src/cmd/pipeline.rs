use std::io::Write;
use std::os::unix::io::RawFd;

use nix::fcntl::OFlag;
use nix::libc::{STDIN_FILENO, STDOUT_FILENO};
use nix::unistd::{close, dup2, fork, pipe2, ForkResult, Pid};

use crate::state::Session;

use super::{reap, redirect, CommandError};

/// Runs one command line (background flag already handled): either a
/// single command handed straight to the redirection resolver, or a
/// two-stage pipeline.
pub fn run(argv: Vec<String>, session: &mut Session) -> Result<(), CommandError> {
    match split_at_pipe(argv)? {
        PipeSplit::Single(argv) => redirect::run(argv, session),
        PipeSplit::Pair { left, right } => run_pair(left, right, session),
    }
}

#[derive(Debug, PartialEq)]
pub enum PipeSplit {
    Single(Vec<String>),
    Pair {
        left: Vec<String>,
        right: Vec<String>,
    },
}

/// Splits the argument list at the `|` operator. When several are
/// present the rightmost wins; only one split is ever performed, so
/// chains of three or more stages are not supported.
pub fn split_at_pipe(argv: Vec<String>) -> Result<PipeSplit, CommandError> {
    match argv.iter().rposition(|arg| arg == "|") {
        None => Ok(PipeSplit::Single(argv)),
        Some(0) => Err(CommandError::PipeMissingLeft),
        Some(pos) if pos == argv.len() - 1 => Err(CommandError::PipeMissingRight),
        Some(pos) => {
            let right = argv[pos + 1..].to_vec();
            let mut left = argv;
            left.truncate(pos);
            Ok(PipeSplit::Pair { left, right })
        }
    }
}

fn run_pair(
    left: Vec<String>,
    right: Vec<String>,
    session: &mut Session,
) -> Result<(), CommandError> {
    // CLOEXEC keeps the pipe from leaking into unrelated children; the
    // descriptors dup2'd onto the standard streams lose the flag.
    let (read_end, write_end) = pipe2(OFlag::O_CLOEXEC).map_err(CommandError::CreatePipe)?;

    trace!(?left, ?right, read_end, write_end, "spawning pipeline");

    let _ = std::io::stdout().flush();

    let left_pid = match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => child,
        Ok(ForkResult::Child) => {
            run_stage(left, session, write_end, STDOUT_FILENO, read_end, write_end)
        }
        Err(source) => {
            let _ = close(read_end);
            let _ = close(write_end);
            return Err(CommandError::Spawn(source));
        }
    };

    let right_pid = match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => child,
        Ok(ForkResult::Child) => {
            run_stage(right, session, read_end, STDIN_FILENO, read_end, write_end)
        }
        Err(source) => {
            // The left child was already spawned; close our pipe ends so
            // it sees end-of-stream, and reap it before reporting.
            let _ = close(read_end);
            let _ = close(write_end);
            let _ = reap(left_pid);
            return Err(CommandError::Spawn(source));
        }
    };

    // The parent holds no pipe ends; a dangling write end here would
    // keep the right child's stdin open forever.
    let _ = close(read_end);
    let _ = close(write_end);

    wait_both(left_pid, right_pid, session)
}

/// One pipeline stage, running in the freshly forked child: wire the
/// assigned pipe end onto the standard stream, drop both ends, run the
/// stage through the redirection resolver, and terminate. Never returns
/// into the parent's control flow.
fn run_stage(
    argv: Vec<String>,
    session: &mut Session,
    from: RawFd,
    onto: RawFd,
    read_end: RawFd,
    write_end: RawFd,
) -> ! {
    let result = dup2(from, onto)
        .map_err(CommandError::Spawn)
        .and_then(|_| close(read_end).map_err(CommandError::Spawn))
        .and_then(|_| close(write_end).map_err(CommandError::Spawn))
        .and_then(|_| redirect::run(argv, session));

    match result {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("clam: {err}");
            std::process::exit(1);
        }
    }
}

/// Reaps both pipeline children, left first. Wait order does not imply
/// completion order; both are collected regardless of which finished
/// first, and a failed wait on the left does not leave the right
/// unreaped.
fn wait_both(left: Pid, right: Pid, session: &mut Session) -> Result<(), CommandError> {
    let left_status = reap(left);
    let right_status = reap(right);

    if let Ok(status) = &right_status {
        session.last_status = super::exit_code(status);
    }

    left_status?;
    right_status?;
    Ok(())
}
