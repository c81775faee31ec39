use std::io::Write;

use itertools::Itertools;
use nix::unistd::{fork, ForkResult};

use crate::parse::CommandLine;
use crate::state::Session;

use super::{pipeline, CommandError};

/// Submits one parsed command line. Foreground lines run the pipeline in
/// the current process and block until every child has been reaped;
/// background lines are handed to a detached child that runs the
/// pipeline to completion on its own, and control returns immediately.
pub fn submit(cmd: CommandLine, session: &mut Session) -> Result<(), CommandError> {
    trace!(
        command = %cmd.argv.iter().join(" "),
        background = cmd.background,
        "submitting command line"
    );

    if !cmd.background {
        return pipeline::run(cmd.argv, session);
    }

    let _ = std::io::stdout().flush();

    match unsafe { fork() }.map_err(CommandError::Spawn)? {
        ForkResult::Child => {
            // Fire-and-forget: failures in here are reported on stderr
            // and never observed by the controller.
            let code = match pipeline::run(cmd.argv, session) {
                Ok(()) => 0,
                Err(err) => {
                    eprintln!("clam: {err}");
                    1
                }
            };
            std::process::exit(code);
        }
        ForkResult::Parent { child } => {
            trace!(pid = %child, "background job detached");
            Ok(())
        }
    }
}
