use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::config::Config;

/// One read from the line source.
#[derive(Debug, PartialEq)]
pub enum LineEvent {
    Line(String),
    /// Ctrl-C at the prompt; the current line is abandoned.
    Interrupted,
    /// Ctrl-D / end of input; the controller shuts down.
    Eof,
}

/// Line source backed by rustyline: prompt display, line editing, and
/// in-session history, optionally persisted between sessions.
pub struct Prompt {
    editor: DefaultEditor,
    history_file: Option<PathBuf>,
}

impl Prompt {
    pub fn new(config: &Config) -> rustyline::Result<Self> {
        let mut editor = DefaultEditor::new()?;

        if let Some(path) = &config.history_file {
            if let Err(err) = editor.load_history(path) {
                debug!(path = %path.display(), %err, "no history loaded");
            }
        }

        Ok(Self {
            editor,
            history_file: config.history_file.clone(),
        })
    }

    pub fn read_line(&mut self, prompt: &str) -> rustyline::Result<LineEvent> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(LineEvent::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(LineEvent::Interrupted),
            Err(ReadlineError::Eof) => Ok(LineEvent::Eof),
            Err(err) => Err(err),
        }
    }

    pub fn remember(&mut self, line: &str) {
        if let Err(err) = self.editor.add_history_entry(line) {
            debug!(%err, "failed to add history entry");
        }
    }

    /// Flushes history to disk when persistence is configured.
    pub fn save(&mut self) {
        if let Some(path) = &self.history_file {
            if let Err(err) = self.editor.save_history(path) {
                warn!(path = %path.display(), %err, "failed to save history");
            }
        }
    }
}
