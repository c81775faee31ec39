use std::ffi::CString;
use std::io::Write;

use itertools::Itertools;
use nix::errno::Errno;
use nix::unistd::{execvp, fork, ForkResult};

use crate::builtins::{BuiltinCommand, BuiltinCommands};
use crate::state::Session;

use super::{exit_code, reap, CommandError};

/// Exit status a child reports when the named program does not exist.
pub const NOT_FOUND: i32 = 127;
/// Exit status a child reports when the program exists but cannot be
/// executed.
pub const NOT_EXECUTABLE: i32 = 126;

/// Runs one fully resolved command: built-in dispatch first, external
/// spawn otherwise. Pipes and redirections have already been stripped
/// from `argv` by the time it gets here.
pub fn run(argv: &[String], session: &mut Session) -> Result<(), CommandError> {
    let Some(name) = argv.first() else {
        return Ok(());
    };

    if let Some(builtin) = BuiltinCommands::from_name(name) {
        trace!(name, "dispatching builtin");
        return Ok(builtin.execute(session, &argv[1..])?);
    }

    execute_external(argv, session)
}

/// Spawns a child that execs the named program with PATH-search
/// semantics, then blocks until that specific child is reaped. An exec
/// failure is confined to the child, which reports it on stderr and
/// terminates with a distinguishable status.
fn execute_external(argv: &[String], session: &mut Session) -> Result<(), CommandError> {
    let args = argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    trace!(command = %argv.iter().join(" "), "spawning external command");

    // Buffered output written so far belongs to the parent only.
    let _ = std::io::stdout().flush();

    match unsafe { fork() }.map_err(CommandError::Spawn)? {
        ForkResult::Child => {
            let errno = match execvp(&args[0], &args) {
                Ok(infallible) => match infallible {},
                Err(errno) => errno,
            };
            eprintln!("clam: {}: {}", argv[0], errno.desc());
            let code = if errno == Errno::ENOENT {
                NOT_FOUND
            } else {
                NOT_EXECUTABLE
            };
            std::process::exit(code);
        }
        ForkResult::Parent { child } => {
            let status = reap(child)?;
            session.last_status = exit_code(&status);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn external_success_records_zero_status() {
        let mut session = Session::new();
        run(&argv(&["true"]), &mut session).unwrap();
        assert_eq!(session.last_status, 0);
    }

    #[test]
    fn external_failure_records_nonzero_status() {
        let mut session = Session::new();
        run(&argv(&["false"]), &mut session).unwrap();
        assert_ne!(session.last_status, 0);
    }

    #[test]
    fn missing_program_reaps_distinguishable_status() {
        let mut session = Session::new();
        run(&argv(&["clam-no-such-program-xyz"]), &mut session).unwrap();
        assert_eq!(session.last_status, NOT_FOUND);
    }

    #[test]
    fn empty_argv_is_a_no_op() {
        let mut session = Session::new();
        run(&[], &mut session).unwrap();
        assert_eq!(session.last_status, 0);
    }

    #[test]
    fn interior_nul_is_rejected_without_spawning() {
        let mut session = Session::new();
        let err = run(&argv(&["echo", "a\0b"]), &mut session).unwrap_err();
        assert!(matches!(err, CommandError::NulArgument(_)));
    }
}
