use enum_dispatch::enum_dispatch;
use strum::{EnumIter, IntoEnumIterator};
use thiserror::Error;

use crate::state::Session;

pub mod cd;

#[derive(Debug, Error)]
pub enum BuiltinError {
    #[error("cd: HOME is not set")]
    HomeNotSet,
    #[error("cd: no previous working directory")]
    NoPreviousDir,
    #[error("cd: {path}: {source}")]
    Chdir { path: String, source: nix::Error },
}

/// A command executed inside the shell process itself; built-ins never
/// spawn a child.
#[enum_dispatch(BuiltinCommands)]
pub trait BuiltinCommand {
    fn name(&self) -> &'static str;
    fn execute(&self, session: &mut Session, args: &[String]) -> Result<(), BuiltinError>;
}

#[enum_dispatch]
#[derive(EnumIter)]
pub enum BuiltinCommands {
    Cd(cd::Cd),
}

impl BuiltinCommands {
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|cmd| cmd.name() == name)
    }
}
