use std::path::PathBuf;

/// Per-session shell state, created once in `main` and threaded through
/// the execution chain by mutable reference.
#[derive(Debug, Default)]
pub struct Session {
    /// Working directory before the last successful `cd`; read only by
    /// `cd -` and overwritten only when a `cd` succeeds.
    pub previous_dir: Option<PathBuf>,
    /// Exit status of the last foreground child reaped by the dispatcher.
    pub last_status: i32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cd(&mut self, from: PathBuf) {
        trace!(from = %from.display(), "recording previous working directory");
        self.previous_dir = Some(from);
    }
}
