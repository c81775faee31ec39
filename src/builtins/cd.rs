use std::env;
use std::path::PathBuf;

use nix::unistd::{chdir, getcwd};

use crate::state::Session;

use super::{BuiltinCommand, BuiltinError};

#[derive(Default)]
pub struct Cd;

impl BuiltinCommand for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn execute(&self, session: &mut Session, args: &[String]) -> Result<(), BuiltinError> {
        trace!(?args, "executing cd builtin");

        let target = match args.first().map(String::as_str) {
            None => env::var_os("HOME")
                .map(PathBuf::from)
                .ok_or(BuiltinError::HomeNotSet)?,
            Some("-") => {
                let previous = session
                    .previous_dir
                    .clone()
                    .ok_or(BuiltinError::NoPreviousDir)?;
                println!("{}", previous.display());
                previous
            }
            Some(path) => PathBuf::from(path),
        };

        let current = current_dir();

        chdir(&target).map_err(|source| BuiltinError::Chdir {
            path: target.display().to_string(),
            source,
        })?;

        if let Some(from) = current {
            session.record_cd(from);
        }

        // chdir(2) does not update PWD, so keep it in sync for the next
        // capture.
        if let Ok(now) = getcwd() {
            env::set_var("PWD", &now);
        }

        Ok(())
    }
}

/// The pre-`cd` working directory, read from `PWD` with a `getcwd`
/// fallback when the environment does not carry one.
fn current_dir() -> Option<PathBuf> {
    env::var_os("PWD")
        .map(PathBuf::from)
        .or_else(|| getcwd().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ENV_LOCK;

    fn run_cd(session: &mut Session, args: &[&str]) -> Result<(), BuiltinError> {
        let args = args.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Cd.execute(session, &args)
    }

    #[test]
    fn cd_then_cd_dash_round_trips() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let origin = getcwd().unwrap();
        let mut session = Session::new();

        run_cd(&mut session, &["/"]).unwrap();
        assert_eq!(getcwd().unwrap(), PathBuf::from("/"));
        assert_eq!(session.previous_dir.as_deref(), Some(origin.as_path()));

        run_cd(&mut session, &["-"]).unwrap();
        assert_eq!(getcwd().unwrap(), origin);
    }

    #[test]
    fn cd_dash_without_history_is_an_error() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let origin = getcwd().unwrap();
        let mut session = Session::new();

        let err = run_cd(&mut session, &["-"]).unwrap_err();
        assert!(matches!(err, BuiltinError::NoPreviousDir));
        assert_eq!(getcwd().unwrap(), origin);
    }

    #[test]
    fn cd_to_missing_directory_leaves_state_unchanged() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let origin = getcwd().unwrap();
        let mut session = Session::new();

        let err = run_cd(&mut session, &["/definitely/not/a/directory"]).unwrap_err();
        assert!(matches!(err, BuiltinError::Chdir { .. }));
        assert_eq!(getcwd().unwrap(), origin);
        assert!(session.previous_dir.is_none());
    }

    #[test]
    fn bare_cd_goes_home() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let origin = getcwd().unwrap();
        let home = env::var_os("HOME");
        env::set_var("HOME", "/");

        let mut session = Session::new();
        run_cd(&mut session, &[]).unwrap();
        assert_eq!(getcwd().unwrap(), PathBuf::from("/"));

        match home {
            Some(home) => env::set_var("HOME", home),
            None => env::remove_var("HOME"),
        }
        chdir(&origin).unwrap();
        env::set_var("PWD", &origin);
    }
}
