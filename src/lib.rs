//! This crate reads BibTeX `.bib` files in pure, safe rust and splits
//! the person names found in them into their parts.
//!
//! One entry in such a file can look like this:
//!
//! ```tex
//! @string{aw = {Addison-Wesley}}
//!
//! @book{DBLP:books/aw/Knuth73a,
//!     author    = {Donald E. Knuth},
//!     title     = {The Art of Computer Programming, Volume {I:} Fundamental Algorithms,
//!                  2nd Edition},
//!     publisher = aw,
//!     year      = 1973,
//!     month     = "Jan" # "uary",
//! }
//! ```
//!
//! In this example, we call `book` the `kind` of the entry and `DBLP:books/aw/Knuth73a` its `ID`.
//! Then we have a sequence of fields with a `name` (like `year`) and `data` (like `1973`).
//! Field names are case-insensitive and reported in lower case. `@string` entries define
//! macros such as `aw` which are substituted wherever they appear as a value, and `#`
//! concatenates values. `@comment` and `@preamble` entries are skipped.
//!
//! The whole source is parsed at once; a malformed entry aborts the parse:
//!
//! ```rust
//! use bibtex_names::Parser;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     //let entries = Parser::new().parse_file("source.bib")?;
//!     let mut p = Parser::with_month_macros();
//!     let entries = p.parse_str(r#"@book{tolkien1937, author = {J. R. R. Tolkien}, month = sep}"#)?;
//!     for entry in entries.iter() {
//!         println!("type = {}", entry.kind);
//!         println!("id = {}", entry.id);
//!         for (name, data) in entry.fields.iter() {
//!             println!("\t{}\t= {}", name, data);
//!         }
//!         for person in entry.persons("author") {
//!             println!("\tsurname = {}", person.surname);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Name lists like “Knuth, Donald E. and Leslie Lamport” are split with
//! [`parse_persons`] into [`PersonName`] records following BibTeX's
//! conventions for forenames, von particles, surnames and suffixes.

mod errors;
mod lexer;
mod names;
mod parser;
mod source;
mod types;

pub use crate::errors::{Error, ParsingError, ParsingErrorKind};
pub use crate::lexer::TokenKind;
pub use crate::names::{parse_person, parse_persons, PersonName};
pub use crate::parser::{Parser, MONTH_MACROS};
pub use crate::source::{CharCursor, FileSource, StrSource};
pub use crate::types::BibEntry;
