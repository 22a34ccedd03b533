use std::io::Read;

use service_builder_core::types::{
    Application, Field, Model, Pagination, RestfulAction, RestfulActions,
};

use crate::error::{DslError, ParseError};
use crate::handoff::Handoff;
use crate::lexer::{LexemeSource, Lexer};
use crate::token::{Lexeme, Token};

const FIELD_TYPE: &str = "field type (string, int, double, date, or datetime)";
const PAGINATION_KEY: &str = "pagination key (per_page or max_per_page)";
const ACTION_NAME: &str = "restful action (index, create, show, update, or destroy)";
const MODEL_SECTION: &str = "'fields', 'pagination', 'actions', or '}'";

/// Recursive descent parser for model definitions.
///
/// Pulls lexemes from any [`LexemeSource`] and keeps at most one lexeme of
/// pushback. Whitespace is skipped at every decision point. Parsing stops at
/// the first error; models completed before it are kept in the error.
pub struct Parser<S> {
    name: String,
    source: S,
    pending: Option<Lexeme>,
    app: Application,
}

impl<R: Read> Parser<Lexer<R>> {
    /// A parser that lexes `reader` inline on the calling thread.
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self::with_source(name, Lexer::new(reader))
    }
}

impl<S: LexemeSource> Parser<S> {
    pub fn with_source(name: impl Into<String>, source: S) -> Self {
        Self {
            name: name.into(),
            source,
            pending: None,
            app: Application::new(),
        }
    }

    /// Parses the whole input.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` naming the source and position of the first
    /// malformed construct, carrying every model completed before it.
    pub fn parse(mut self) -> Result<Application, ParseError> {
        match self.parse_application() {
            Ok(()) => Ok(self.app),
            Err(error) => Err(ParseError::new(self.name, error, self.app)),
        }
    }

    // -- Cursor helpers --

    fn scan(&mut self) -> Result<Lexeme, DslError> {
        if let Some(lexeme) = self.pending.take() {
            return Ok(lexeme);
        }
        let lexeme = self.source.next_lexeme()?;
        if lexeme.token == Token::Illegal {
            return Err(DslError::IllegalCharacter {
                found: lexeme.text,
                position: lexeme.position,
            });
        }
        Ok(lexeme)
    }

    fn scan_ignore_whitespace(&mut self) -> Result<Lexeme, DslError> {
        loop {
            let lexeme = self.scan()?;
            if lexeme.token != Token::Whitespace {
                return Ok(lexeme);
            }
        }
    }

    /// Pushes `lexeme` back so the next scan returns it again.
    fn unscan(&mut self, lexeme: Lexeme) {
        debug_assert!(self.pending.is_none(), "only one lexeme of pushback");
        self.pending = Some(lexeme);
    }

    /// Returns true if the next significant lexeme is `token`, without
    /// consuming it.
    fn at(&mut self, token: Token) -> Result<bool, DslError> {
        let lexeme = self.scan_ignore_whitespace()?;
        let found = lexeme.token == token;
        self.unscan(lexeme);
        Ok(found)
    }

    fn expect(&mut self, token: Token) -> Result<Lexeme, DslError> {
        self.expect_described(token, token.description())
    }

    fn expect_described(&mut self, token: Token, expected: &str) -> Result<Lexeme, DslError> {
        let lexeme = self.scan_ignore_whitespace()?;
        if lexeme.token == token {
            Ok(lexeme)
        } else {
            Err(unexpected(&lexeme, expected))
        }
    }

    // -- Grammar productions --

    /// application = model*
    fn parse_application(&mut self) -> Result<(), DslError> {
        loop {
            let lexeme = self.scan_ignore_whitespace()?;
            match lexeme.token {
                Token::Eof => return Ok(()),
                Token::Model => {
                    let model = self.parse_model()?;
                    tracing::debug!(
                        source = %self.name,
                        model = %model.name,
                        fields = model.fields.len(),
                        "parsed model"
                    );
                    self.app.models.push(model);
                }
                _ => return Err(unexpected(&lexeme, Token::Model.description())),
            }
        }
    }

    /// model = "model" IDENT "{" section* "}"
    fn parse_model(&mut self) -> Result<Model, DslError> {
        let name = self.expect_described(Token::Ident, "model name")?;
        self.expect(Token::LBrace)?;

        let mut model = Model::new(name.text);
        while !self.at(Token::RBrace)? {
            let lexeme = self.scan_ignore_whitespace()?;
            match lexeme.token {
                Token::Fields => self.parse_fields(&mut model)?,
                Token::Pagination => self.parse_pagination(&mut model)?,
                Token::Actions => self.parse_actions(&mut model)?,
                _ => return Err(unexpected(&lexeme, MODEL_SECTION)),
            }
        }
        self.expect(Token::RBrace)?;
        Ok(model)
    }

    /// fields = "fields" "{" (IDENT ":" TYPE)* "}"
    fn parse_fields(&mut self, model: &mut Model) -> Result<(), DslError> {
        self.expect(Token::LBrace)?;
        while !self.at(Token::RBrace)? {
            let name = self.expect_described(Token::Ident, "field name")?;
            self.expect(Token::Colon)?;
            let ty = self.scan_ignore_whitespace()?;
            let field_type = ty
                .token
                .field_type()
                .ok_or_else(|| unexpected(&ty, FIELD_TYPE))?;
            model.fields.push(Field::new(name.text, field_type));
        }
        self.expect(Token::RBrace)?;
        Ok(())
    }

    /// pagination = "pagination" "{" (KEY ":" NUMERIC)* "}"
    ///
    /// The pagination value is only created once a key/value pair parses, so
    /// an empty block leaves the model without one.
    fn parse_pagination(&mut self, model: &mut Model) -> Result<(), DslError> {
        self.expect(Token::LBrace)?;
        while !self.at(Token::RBrace)? {
            let key = self.scan_ignore_whitespace()?;
            let is_key = key.token == Token::Ident
                && matches!(key.text.as_str(), "per_page" | "max_per_page");
            if !is_key {
                return Err(unexpected(&key, PAGINATION_KEY));
            }
            self.expect(Token::Colon)?;
            let value = self.expect_described(Token::Numeric, "numeric value")?;
            let n = parse_i64(&value)?;

            let pagination = model.pagination.get_or_insert_with(Pagination::default);
            if key.text == "per_page" {
                pagination.per_page = n;
            } else {
                pagination.max_per_page = n;
            }
        }
        self.expect(Token::RBrace)?;
        Ok(())
    }

    /// actions = "actions" "{" ("rest_actions" ":" "[" names? "]")? "}"
    fn parse_actions(&mut self, model: &mut Model) -> Result<(), DslError> {
        self.expect(Token::LBrace)?;

        let lexeme = self.scan_ignore_whitespace()?;
        if lexeme.token == Token::Ident && lexeme.text == "rest_actions" {
            self.expect(Token::Colon)?;
            self.expect(Token::LBracket)?;
            let actions = model.actions.get_or_insert_with(RestfulActions::none);
            if !self.at(Token::RBracket)? {
                loop {
                    let action = self.parse_action_name()?;
                    actions.enable(action);
                    let sep = self.scan_ignore_whitespace()?;
                    match sep.token {
                        Token::Comma => continue,
                        Token::RBracket => {
                            self.unscan(sep);
                            break;
                        }
                        _ => return Err(unexpected(&sep, "',' or ']'")),
                    }
                }
            }
            self.expect(Token::RBracket)?;
        } else {
            self.unscan(lexeme);
        }

        self.expect(Token::RBrace)?;
        Ok(())
    }

    fn parse_action_name(&mut self) -> Result<RestfulAction, DslError> {
        let lexeme = self.scan_ignore_whitespace()?;
        let action = match lexeme.token {
            Token::Ident => RestfulAction::from_name(&lexeme.text),
            _ => None,
        };
        action.ok_or_else(|| unexpected(&lexeme, ACTION_NAME))
    }
}

/// Builds the error for `lexeme` appearing where `expected` was required.
fn unexpected(lexeme: &Lexeme, expected: &str) -> DslError {
    match lexeme.token {
        Token::Eof => DslError::UnexpectedEndOfInput {
            expected: expected.to_string(),
            position: lexeme.position,
        },
        _ => DslError::UnexpectedToken {
            expected: expected.to_string(),
            found: lexeme.describe(),
            position: lexeme.position,
        },
    }
}

fn parse_i64(lexeme: &Lexeme) -> Result<i64, DslError> {
    lexeme
        .text
        .parse::<i64>()
        .map_err(|_| DslError::InvalidInteger {
            text: lexeme.text.clone(),
            position: lexeme.position,
        })
}

/// Parse model definitions from a string.
///
/// # Errors
///
/// Returns a `ParseError` for the first malformed construct. The error
/// carries the models that parsed before it.
pub fn parse(name: &str, source: &str) -> Result<Application, ParseError> {
    Parser::new(name, source.as_bytes()).parse()
}

/// Parse model definitions from any reader, lexing on the calling thread.
///
/// # Errors
///
/// As [`parse`], plus read failures of `reader` as `DslError::Read`.
pub fn parse_reader<R: Read>(name: &str, reader: R) -> Result<Application, ParseError> {
    Parser::new(name, reader).parse()
}

/// Parse model definitions with lexing on a separate scanning thread.
///
/// The result is the same as [`parse_reader`] for the same input. The
/// scanning thread is cancelled and joined before this returns, whether the
/// parse succeeds or fails.
///
/// # Errors
///
/// As [`parse_reader`], plus failure to start the scanning thread.
pub fn parse_threaded<R>(name: &str, reader: R) -> Result<Application, ParseError>
where
    R: Read + Send + 'static,
{
    let handoff = Handoff::spawn(Lexer::new(reader))
        .map_err(|e| ParseError::new(name, e.into(), Application::new()))?;
    Parser::with_source(name, handoff).parse()
}
