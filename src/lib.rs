//! LeanDoc → Typst translator.
//!
//! Three pipeline stages, each a separate module: [`lexer`] classifies
//! input lines, [`parser`] turns the resulting token stream into an
//! [`ast::Tree`], and [`generator`] walks that tree into Typst source. All
//! three are pure and synchronous — no file I/O happens below the CLI
//! boundary in `src/bin/leandoc.rs`.

pub mod ast;
pub mod error;
pub mod generator;
pub mod lexer;
pub mod parser;

pub use error::{GenError, LeandocError, ParseError};
pub use generator::{generate, GenOptions, TemplateName};
pub use parser::parse_document;
