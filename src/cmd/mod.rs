use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::Pid;
use thiserror::Error;

use crate::builtins::BuiltinError;

use self::redirect::RedirectError;

pub mod dispatch;
pub mod job;
pub mod pipeline;
pub mod redirect;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("syntax error: missing command before '|'")]
    PipeMissingLeft,
    #[error("syntax error: missing command after '|'")]
    PipeMissingRight,
    #[error("failed to create pipe: {0}")]
    CreatePipe(nix::Error),
    #[error("failed to spawn child process: {0}")]
    Spawn(nix::Error),
    #[error("failed to wait for child {pid}: {source}")]
    Wait { pid: Pid, source: nix::Error },
    #[error("argument contains an interior NUL byte")]
    NulArgument(#[from] std::ffi::NulError),
    #[error(transparent)]
    Redirect(#[from] RedirectError),
    #[error(transparent)]
    Builtin(#[from] BuiltinError),
}

/// Blocks until `pid` terminates, retrying when the wait is interrupted
/// by a signal.
pub(crate) fn reap(pid: Pid) -> Result<WaitStatus, CommandError> {
    loop {
        match waitpid(pid, None) {
            Ok(status) => {
                trace!(%pid, ?status, "reaped child");
                return Ok(status);
            }
            Err(Errno::EINTR) => continue,
            Err(source) => return Err(CommandError::Wait { pid, source }),
        }
    }
}

pub(crate) fn exit_code(status: &WaitStatus) -> i32 {
    match status {
        WaitStatus::Exited(_, code) => *code,
        WaitStatus::Signaled(_, signal, _) => 128 + *signal as i32,
        _ => 0,
    }
}
