//! # service-builder-dsl
//!
//! Scanner, lexer, parser and printer for the service-builder model
//! definition language.
//!
//! This crate provides:
//! - A rune-at-a-time [`Scanner`](scanner::Scanner) with line/column tracking
//!   and one rune of pushback
//! - A mode-aware [`Lexer`] whose keyword set depends on the enclosing block
//! - A recursive descent [`Parser`] that produces an `Application`, either
//!   lexing inline or through a scanning thread ([`parse_threaded`])
//! - A printer that converts an `Application` back to DSL text
//! - Round-trip fidelity: `parse(print_all(app)) == app`
//!
//! # Example
//!
//! ```
//! use service_builder_dsl::{parse, print};
//!
//! let source = r#"
//! model User {
//!     fields {
//!         name: string
//!         born: date
//!     }
//!     pagination {
//!         per_page: 20
//!         max_per_page: 100
//!     }
//!     actions {
//!         rest_actions: [index, show]
//!     }
//! }
//! "#;
//!
//! let app = parse("user.sb", source).expect("parse failed");
//! assert_eq!(app.models.len(), 1);
//! assert_eq!(app.models[0].name, "User");
//!
//! let dsl_text = print(&app.models[0]);
//! assert!(dsl_text.contains("model User {"));
//! ```

pub mod error;
pub mod handoff;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod scanner;
pub mod token;

pub use error::{DslError, ParseError, Position, ScanError};
pub use handoff::Handoff;
pub use lexer::{LexemeSource, Lexer, Mode};
pub use parser::{parse, parse_reader, parse_threaded, Parser};
pub use printer::{print, print_all};
pub use token::{Lexeme, Token};
