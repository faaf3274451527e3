//! Front end: lexer, parser, type system and checker.
//!
//! # Example
//!
//! ```ignore
//! use quadc_engine::parser::{Parser, TypeChecker};
//!
//! let (program, interner) = Parser::new("int main() { return 0; }")?.parse()?;
//! let checked = TypeChecker::new(&interner).check(&program)?;
//! ```

pub mod ast;
pub mod interner;
pub mod lexer;
pub mod parser;
pub mod token;

pub mod types;

pub mod checker;

pub use interner::{Interner, Symbol};
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, ParseErrorKind, Parser};
pub use token::{Span, Token};

pub use types::{Type, TypeContext, TypeId};

pub use checker::{Analysis, CheckError, CheckOutput, Coercion, SymbolTable, TypeChecker};
