use service_builder_core::types::FieldType;

use crate::error::Position;

/// Token kinds produced by the lexer.
///
/// Whitespace is a real token here; the parser skips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// A character that cannot start any token.
    Illegal,
    Eof,
    Whitespace,

    // -- Literals --
    Ident,
    Numeric,

    // -- Punctuation --
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,

    // -- Context keywords --
    Model,
    Fields,
    Pagination,
    Actions,

    // -- Field types, only in a field's type position --
    String,
    Int,
    Double,
    Date,
    DateTime,
}

impl Token {
    /// Returns a human-readable description of this token kind.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Illegal => "illegal character",
            Self::Eof => "end of input",
            Self::Whitespace => "whitespace",
            Self::Ident => "identifier",
            Self::Numeric => "numeric literal",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::Model => "'model'",
            Self::Fields => "'fields'",
            Self::Pagination => "'pagination'",
            Self::Actions => "'actions'",
            Self::String => "'string'",
            Self::Int => "'int'",
            Self::Double => "'double'",
            Self::Date => "'date'",
            Self::DateTime => "'datetime'",
        }
    }

    /// The field type this keyword names, if it is a type keyword.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Self::String => Some(FieldType::String),
            Self::Int => Some(FieldType::Int),
            Self::Double => Some(FieldType::Double),
            Self::Date => Some(FieldType::Date),
            Self::DateTime => Some(FieldType::DateTime),
            _ => None,
        }
    }
}

impl From<FieldType> for Token {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::String => Self::String,
            FieldType::Int => Self::Int,
            FieldType::Double => Self::Double,
            FieldType::Date => Self::Date,
            FieldType::DateTime => Self::DateTime,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A classified, positioned piece of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub text: String,
    /// Position of the first rune of `text`.
    pub position: Position,
}

impl Lexeme {
    pub fn new(token: Token, text: impl Into<String>, position: Position) -> Self {
        Self {
            token,
            text: text.into(),
            position,
        }
    }

    /// Describes this lexeme for error messages, e.g. `identifier ('User')`.
    pub fn describe(&self) -> String {
        match self.token {
            Token::Eof => self.token.description().to_string(),
            _ => format!("{} ('{}')", self.token.description(), self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_human_readable() {
        assert_eq!(Token::Model.description(), "'model'");
        assert_eq!(Token::Ident.description(), "identifier");
        assert_eq!(Token::Numeric.to_string(), "numeric literal");
    }

    #[test]
    fn type_keywords_map_to_field_types() {
        assert_eq!(Token::String.field_type(), Some(FieldType::String));
        assert_eq!(Token::DateTime.field_type(), Some(FieldType::DateTime));
        assert_eq!(Token::Ident.field_type(), None);
        assert_eq!(Token::Fields.field_type(), None);
        for ft in FieldType::ALL {
            assert_eq!(Token::from(ft).field_type(), Some(ft));
        }
    }

    #[test]
    fn describe_includes_text() {
        let lexeme = Lexeme::new(Token::Ident, "per_pages", Position::new(1, 27));
        assert_eq!(lexeme.describe(), "identifier ('per_pages')");
        let eof = Lexeme::new(Token::Eof, "", Position::new(2, 0));
        assert_eq!(eof.describe(), "end of input");
    }
}
