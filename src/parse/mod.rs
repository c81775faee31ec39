use logos::Logos;
use thiserror::Error;

use self::token::{LexerError, Token};

pub mod token;

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("failed to tokenize command")]
    Lexer(Vec<LexerError>),
    #[error("'&' must be the last token on the line")]
    BackgroundNotLast,
}

/// One submitted command line: the flattened argument list plus the
/// background flag extracted from a trailing `&`.
///
/// Pipe and redirection operators are kept in `argv` as literal
/// one-character entries; the pipeline builder and redirection resolver
/// recognize them positionally.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandLine {
    pub argv: Vec<String>,
    pub background: bool,
}

impl CommandLine {
    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}

pub fn parse_command(line: &str) -> Result<CommandLine, CommandParseError> {
    let tokens = Token::lexer(line).collect::<Vec<_>>();

    if tokens.iter().any(|r| r.is_err()) {
        return Err(CommandParseError::Lexer(
            tokens.into_iter().filter_map(|r| r.err()).collect(),
        ));
    }

    let mut cmd = CommandLine::default();

    let count = tokens.len();
    for (i, token) in tokens.into_iter().enumerate() {
        match token.unwrap() {
            Token::Word(word) => cmd.argv.push(word.to_owned()),
            Token::Pipe => cmd.argv.push("|".to_owned()),
            Token::RedirectOut => cmd.argv.push(">".to_owned()),
            Token::RedirectIn => cmd.argv.push("<".to_owned()),
            Token::Background => {
                if i + 1 != count {
                    return Err(CommandParseError::BackgroundNotLast);
                }
                cmd.background = true;
            }
        }
    }

    Ok(cmd)
}
