use logos::Logos;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Default, Error)]
pub enum LexerError {
    #[default]
    #[error("unrecognized token")]
    UnknownToken,
}

#[derive(Debug, Clone, PartialEq, Logos)]
#[logos(skip r"[ \t\r\n\f]+", error = LexerError)]
pub enum Token<'a> {
    #[token("|")]
    Pipe,
    #[token(">")]
    RedirectOut,
    #[token("<")]
    RedirectIn,
    #[token("&")]
    Background,

    #[regex(r"[^ \t\r\n\f|<>&]+")]
    Word(&'a str),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(line: &str) -> Vec<Token> {
        Token::lexer(line).map(|t| t.unwrap()).collect()
    }

    #[test]
    fn words_and_operators() {
        assert_eq!(
            lex("cat foo.txt | wc -l"),
            vec![
                Token::Word("cat"),
                Token::Word("foo.txt"),
                Token::Pipe,
                Token::Word("wc"),
                Token::Word("-l"),
            ]
        );
    }

    #[test]
    fn operators_split_adjacent_words() {
        assert_eq!(
            lex("sort<in>out"),
            vec![
                Token::Word("sort"),
                Token::RedirectIn,
                Token::Word("in"),
                Token::RedirectOut,
                Token::Word("out"),
            ]
        );
    }

    #[test]
    fn whitespace_collapsed() {
        assert_eq!(
            lex("  ls \t  -la   &"),
            vec![Token::Word("ls"), Token::Word("-la"), Token::Background]
        );
    }

    #[test]
    fn empty_line_yields_nothing() {
        assert!(lex("   ").is_empty());
    }
}
