use std::io::Read;

use service_builder_core::types::FieldType;

use crate::error::ScanError;
use crate::scanner::Scanner;
use crate::token::{Lexeme, Token};

/// A lexer context that decides how bare words are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Top,
    Model,
    Fields,
    Pagination,
    Actions,
}

/// Context keyword table keyed by (active mode, lowercased literal).
///
/// Words not listed for the active mode are plain identifiers. Field type
/// names come from [`FieldType::from_keyword`] and only apply at a field's
/// type position.
const KEYWORDS: &[(Mode, &str, Token)] = &[
    (Mode::Top, "model", Token::Model),
    (Mode::Top, "fields", Token::Fields),
    (Mode::Top, "pagination", Token::Pagination),
    (Mode::Top, "actions", Token::Actions),
    (Mode::Model, "model", Token::Model),
    (Mode::Model, "fields", Token::Fields),
    (Mode::Model, "pagination", Token::Pagination),
    (Mode::Model, "actions", Token::Actions),
];

fn keyword(mode: Mode, text: &str) -> Option<Token> {
    KEYWORDS
        .iter()
        .find(|(m, word, _)| *m == mode && word.eq_ignore_ascii_case(text))
        .map(|(_, _, token)| *token)
}

/// The mode a context keyword opens once its `{` is scanned.
fn opened_mode(token: Token) -> Option<Mode> {
    match token {
        Token::Model => Some(Mode::Model),
        Token::Fields => Some(Mode::Fields),
        Token::Pagination => Some(Mode::Pagination),
        Token::Actions => Some(Mode::Actions),
        _ => None,
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// A mode on the stack and the brace depth that closes it.
#[derive(Debug, Clone, Copy)]
struct Frame {
    mode: Mode,
    baseline: usize,
}

/// Anything the parser can pull lexemes from.
///
/// Once end of input is reached, every further call returns another
/// `Token::Eof` lexeme.
pub trait LexemeSource {
    fn next_lexeme(&mut self) -> Result<Lexeme, ScanError>;
}

/// Mode-aware tokenizer over a [`Scanner`].
///
/// Context keywords arm a mode that is pushed when the following `{` is
/// scanned, together with the brace depth before that `{`. The `}` that
/// brings the depth back to that baseline pops the mode.
pub struct Lexer<R> {
    scanner: Scanner<R>,
    modes: Vec<Frame>,
    depth: usize,
    armed: Option<Mode>,
    expect_field_name: bool,
    done: bool,
}

impl<R: Read> Lexer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            scanner: Scanner::new(reader),
            modes: Vec::new(),
            depth: 0,
            armed: None,
            expect_field_name: true,
            done: false,
        }
    }

    /// The innermost active mode.
    pub fn mode(&self) -> Mode {
        self.modes.last().map_or(Mode::Top, |frame| frame.mode)
    }

    /// Scans and classifies the next lexeme.
    pub fn next_lexeme(&mut self) -> Result<Lexeme, ScanError> {
        let Some(ch) = self.scanner.read()? else {
            return Ok(Lexeme::new(Token::Eof, "", self.scanner.position()));
        };
        let start = self.scanner.position();

        if is_whitespace(ch) {
            let text = self.scan_run(ch, is_whitespace)?;
            return Ok(Lexeme::new(Token::Whitespace, text, start));
        }
        if is_ident_start(ch) {
            let text = self.scan_run(ch, is_ident_continue)?;
            let token = self.classify(&text);
            return Ok(Lexeme::new(token, text, start));
        }
        if ch.is_ascii_digit() {
            let text = self.scan_run(ch, |c| c.is_ascii_digit())?;
            return Ok(Lexeme::new(Token::Numeric, text, start));
        }

        let token = match ch {
            '{' => {
                self.open_brace();
                Token::LBrace
            }
            '}' => {
                self.close_brace();
                Token::RBrace
            }
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ':' => Token::Colon,
            ',' => Token::Comma,
            _ => Token::Illegal,
        };
        Ok(Lexeme::new(token, ch, start))
    }

    /// Consumes `first` and every following rune matching `pred`.
    fn scan_run(&mut self, first: char, pred: impl Fn(char) -> bool) -> Result<String, ScanError> {
        let mut text = String::from(first);
        while let Some(ch) = self.scanner.read()? {
            if !pred(ch) {
                self.scanner.unread()?;
                break;
            }
            text.push(ch);
        }
        Ok(text)
    }

    fn classify(&mut self, text: &str) -> Token {
        let mode = self.mode();
        if mode == Mode::Fields {
            let at_name = self.expect_field_name;
            self.expect_field_name = !at_name;
            return if at_name {
                Token::Ident
            } else {
                FieldType::from_keyword(text).map_or(Token::Ident, Token::from)
            };
        }

        let token = keyword(mode, text).unwrap_or(Token::Ident);
        if let Some(next) = opened_mode(token) {
            self.armed = Some(next);
        }
        token
    }

    fn open_brace(&mut self) {
        if let Some(mode) = self.armed.take() {
            tracing::trace!(?mode, baseline = self.depth, "entering lexer mode");
            self.modes.push(Frame {
                mode,
                baseline: self.depth,
            });
            if mode == Mode::Fields {
                self.expect_field_name = true;
            }
        }
        self.depth += 1;
    }

    fn close_brace(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if let Some(frame) = self.modes.last() {
            if frame.baseline == self.depth {
                tracing::trace!(mode = ?frame.mode, "leaving lexer mode");
                self.modes.pop();
            }
        }
    }
}

impl<R: Read> LexemeSource for Lexer<R> {
    fn next_lexeme(&mut self) -> Result<Lexeme, ScanError> {
        Lexer::next_lexeme(self)
    }
}

/// Yields every lexeme up to and including the first `Token::Eof`, then
/// stops. A scan error is yielded once and also ends the sequence.
impl<R: Read> Iterator for Lexer<R> {
    type Item = Result<Lexeme, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = Lexer::next_lexeme(self);
        self.done = !matches!(&item, Ok(lexeme) if lexeme.token != Token::Eof);
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Position;

    fn lex(input: &str) -> Vec<Lexeme> {
        Lexer::new(input.as_bytes())
            .map(|r| r.expect("scan error"))
            .collect()
    }

    /// Tokens with whitespace and the trailing EOF removed.
    fn tokens(input: &str) -> Vec<Token> {
        lex(input)
            .into_iter()
            .map(|l| l.token)
            .filter(|t| !matches!(t, Token::Whitespace | Token::Eof))
            .collect()
    }

    #[test]
    fn simple_model() {
        assert_eq!(
            tokens("model User { fields { name: string } }"),
            vec![
                Token::Model,
                Token::Ident,
                Token::LBrace,
                Token::Fields,
                Token::LBrace,
                Token::Ident,
                Token::Colon,
                Token::String,
                Token::RBrace,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn whitespace_is_emitted() {
        let lexemes = lex("model \n\t User");
        assert_eq!(lexemes[1].token, Token::Whitespace);
        assert_eq!(lexemes[1].text, " \n\t ");
        assert_eq!(lexemes.last().unwrap().token, Token::Eof);
    }

    #[test]
    fn type_keyword_only_in_type_position() {
        let toks = tokens("model M { fields { string: string date: DATE } }");
        assert_eq!(
            &toks[5..12],
            &[
                Token::Ident,
                Token::Colon,
                Token::String,
                Token::Ident,
                Token::Colon,
                Token::Date,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn context_keywords_are_case_insensitive() {
        assert_eq!(
            tokens("MODEL X { Fields { } PAGINATION { } Actions { } }"),
            vec![
                Token::Model,
                Token::Ident,
                Token::LBrace,
                Token::Fields,
                Token::LBrace,
                Token::RBrace,
                Token::Pagination,
                Token::LBrace,
                Token::RBrace,
                Token::Actions,
                Token::LBrace,
                Token::RBrace,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn field_types_are_plain_outside_fields() {
        assert_eq!(
            tokens("model string { pagination { int: 5 } }"),
            vec![
                Token::Model,
                Token::Ident,
                Token::LBrace,
                Token::Pagination,
                Token::LBrace,
                Token::Ident,
                Token::Colon,
                Token::Numeric,
                Token::RBrace,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn context_keywords_are_plain_inside_blocks() {
        let toks = tokens("model M { actions { rest_actions: [index, fields] } }");
        assert_eq!(
            &toks[5..12],
            &[
                Token::Ident,
                Token::Colon,
                Token::LBracket,
                Token::Ident,
                Token::Comma,
                Token::Ident,
                Token::RBracket,
            ]
        );
    }

    /// Each significant token paired with the lexer mode right after it.
    fn modes(input: &str) -> Vec<(Token, Mode)> {
        let mut lexer = Lexer::new(input.as_bytes());
        let mut seen = Vec::new();
        loop {
            let lexeme = lexer.next_lexeme().unwrap();
            if lexeme.token == Token::Eof {
                return seen;
            }
            if lexeme.token != Token::Whitespace {
                seen.push((lexeme.token, lexer.mode()));
            }
        }
    }

    #[test]
    fn modes_follow_brace_depth() {
        let seen = modes("model M { fields { a: int } pagination { } }");
        assert_eq!(seen[0], (Token::Model, Mode::Top));
        assert_eq!(seen[2], (Token::LBrace, Mode::Model));
        assert_eq!(seen[4], (Token::LBrace, Mode::Fields));
        assert_eq!(seen[8], (Token::RBrace, Mode::Model));
        assert_eq!(seen[10], (Token::LBrace, Mode::Pagination));
        assert_eq!(seen[11], (Token::RBrace, Mode::Model));
        assert_eq!(seen[12], (Token::RBrace, Mode::Top));
    }

    #[test]
    fn inner_braces_do_not_close_the_block() {
        let seen = modes("model M { pagination { { } x } fields");
        assert_eq!(
            &seen[3..],
            &[
                (Token::Pagination, Mode::Model),
                (Token::LBrace, Mode::Pagination),
                (Token::LBrace, Mode::Pagination),
                (Token::RBrace, Mode::Pagination),
                (Token::Ident, Mode::Pagination),
                (Token::RBrace, Mode::Model),
                (Token::Fields, Mode::Model),
            ]
        );
    }

    #[test]
    fn second_model_starts_at_top_level() {
        let toks = tokens("model A { } model B { fields { x: int } }");
        assert_eq!(toks[3], Token::RBrace);
        assert_eq!(toks[4], Token::Model);
        assert_eq!(toks[9], Token::Ident);
        assert_eq!(toks[11], Token::Int);
    }

    #[test]
    fn numbers_and_identifiers() {
        let lexemes: Vec<_> = lex("per_page: 20 max_per_page:100")
            .into_iter()
            .filter(|l| l.token != Token::Whitespace)
            .collect();
        assert_eq!(lexemes[0].text, "per_page");
        assert_eq!(lexemes[2].token, Token::Numeric);
        assert_eq!(lexemes[2].text, "20");
        assert_eq!(lexemes[3].text, "max_per_page");
        assert_eq!(lexemes[5].text, "100");
    }

    #[test]
    fn illegal_characters_in_every_mode() {
        for input in [
            "#",
            "model M { # }",
            "model M { fields { # } }",
            "model M { pagination { # } }",
            "model M { actions { # } }",
        ] {
            assert!(
                tokens(input).contains(&Token::Illegal),
                "no illegal token for {input:?}"
            );
        }
    }

    #[test]
    fn positions_point_at_first_rune() {
        let lexemes = lex("model User {\n  fields");
        assert_eq!(lexemes[0].position, Position::new(1, 1));
        assert_eq!(lexemes[2].position, Position::new(1, 7));
        assert_eq!(lexemes[4].position, Position::new(1, 12));
        assert_eq!(lexemes[6].text, "fields");
        assert_eq!(lexemes[6].position, Position::new(2, 3));
    }

    #[test]
    fn eof_repeats_after_end() {
        let mut lexer = Lexer::new("x".as_bytes());
        assert_eq!(lexer.next_lexeme().unwrap().token, Token::Ident);
        for _ in 0..3 {
            assert_eq!(lexer.next_lexeme().unwrap().token, Token::Eof);
        }
    }

    #[test]
    fn iterator_stops_after_eof() {
        let all: Vec<_> = Lexer::new("a b".as_bytes()).collect();
        assert_eq!(all.len(), 4);
        assert!(matches!(&all[3], Ok(l) if l.token == Token::Eof));
    }

    #[test]
    fn iterator_stops_after_scan_error() {
        let bytes: &[u8] = &[b'a', b' ', 0xFF, b'b'];
        let all: Vec<_> = Lexer::new(bytes).collect();
        assert_eq!(all.len(), 2);
        assert!(all[0].is_ok());
        assert!(all[1].is_err());
    }

    #[test]
    fn non_ascii_letters_are_illegal() {
        assert_eq!(tokens("é"), vec![Token::Illegal]);
    }

    #[test]
    fn empty_input() {
        let lexemes = lex("");
        assert_eq!(lexemes.len(), 1);
        assert_eq!(lexemes[0].token, Token::Eof);
        assert_eq!(lexemes[0].position, Position::START);
    }
}
