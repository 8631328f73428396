use std::collections::HashMap;
use std::path;

use indexmap::IndexMap;
use log::debug;
use unicase::UniCase;

use crate::errors::{Error, ParsingError, ParsingErrorKind};
use crate::lexer::{Lexer, Token, TokenCursor, TokenKind};
use crate::source::{CharCursor, FileSource, StrSource};
use crate::types::BibEntry;

/// The standard BibTeX month abbreviations, ready to seed a [`Parser`]
pub const MONTH_MACROS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// Parser reading `.bib` sources into `BibEntry` instances.
///
/// The parser keeps its macro table between calls, so `@string`
/// definitions read from one source are available in the next.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    macros: HashMap<String, String>,
}

impl Parser {
    /// A parser without any predefined macros
    pub fn new() -> Parser {
        Parser::default()
    }

    /// A parser whose macro table starts out with `macros`.
    /// Macro names are stored lower-case, like `@string` definitions.
    pub fn with_macros<I, K, V>(macros: I) -> Parser
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut parser = Parser::new();
        for (name, value) in macros {
            parser.define_macro(name.as_ref(), value);
        }
        parser
    }

    /// A parser which knows the month abbreviations `jan` to `dec`
    pub fn with_month_macros() -> Parser {
        Parser::with_macros(MONTH_MACROS)
    }

    /// Adds or replaces a macro; the name is stored lower-case.
    pub fn define_macro(&mut self, name: &str, value: impl Into<String>) {
        self.macros.insert(name.to_ascii_lowercase(), value.into());
    }

    /// All macros known so far, keyed by lower-case name
    pub fn macros(&self) -> &HashMap<String, String> {
        &self.macros
    }

    /// Parse all entries of a string.
    pub fn parse_str(&mut self, src: &str) -> Result<Vec<BibEntry>, ParsingError> {
        let mut src = StrSource::new(src);
        self.parse_source(&mut src)
    }

    /// Parse all entries of the file at `path`.
    ///
    /// Failing to read the file is reported as [`Error::Io`], even if the
    /// part read so far would not parse.
    pub fn parse_file<P: AsRef<path::Path>>(&mut self, path: P) -> Result<Vec<BibEntry>, Error> {
        let mut src = FileSource::open(path)?;
        let tokens = Lexer::new(&mut src).tokenize();
        if let Some(err) = src.take_error() {
            return Err(Error::Io(err));
        }
        drop(src);
        Ok(self.parse_tokens(tokens)?)
    }

    /// Parse all entries of an arbitrary character source.
    pub fn parse_source<C: CharCursor + ?Sized>(
        &mut self,
        src: &mut C,
    ) -> Result<Vec<BibEntry>, ParsingError> {
        let tokens = Lexer::new(src).tokenize();
        self.parse_tokens(tokens)
    }

    fn parse_tokens(&mut self, tokens: Vec<Token>) -> Result<Vec<BibEntry>, ParsingError> {
        let mut ctx = ParseContext {
            tokens: TokenCursor::new(tokens),
            macros: &mut self.macros,
        };
        let mut entries = Vec::new();
        while !ctx.tokens.at_end() {
            if let Some(entry) = ctx.parse_entry()? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

enum EntryClass {
    Macro,
    Ignored,
    Regular,
}

fn classify(kind: &str) -> EntryClass {
    let kind = UniCase::ascii(kind);
    if kind == UniCase::ascii("string") {
        EntryClass::Macro
    } else if kind == UniCase::ascii("comment") || kind == UniCase::ascii("preamble") {
        EntryClass::Ignored
    } else {
        EntryClass::Regular
    }
}

/// State of one parse: the remaining tokens and the macro table they may extend.
struct ParseContext<'p> {
    tokens: TokenCursor,
    macros: &'p mut HashMap<String, String>,
}

impl<'p> ParseContext<'p> {
    fn error(&self, kind: ParsingErrorKind) -> ParsingError {
        ParsingError::new(kind, self.tokens.line())
    }

    /// Reads the next token, which must be of kind `expected` if given.
    fn read_token(&mut self, expected: Option<TokenKind>) -> Result<Token, ParsingError> {
        let found = match self.tokens.peek() {
            Some(token) => token.kind(),
            None => return Err(self.error(ParsingErrorKind::UnexpectedEnd { expected })),
        };
        if expected.map_or(false, |kind| kind != found) {
            return Err(self.error(ParsingErrorKind::UnexpectedToken { expected, found }));
        }
        self.tokens
            .advance()
            .ok_or_else(|| self.error(ParsingErrorKind::UnexpectedEnd { expected }))
    }

    fn require(&mut self, kind: TokenKind) -> Result<Token, ParsingError> {
        self.read_token(Some(kind))
    }

    /// Payload of a required name, string or number token
    fn require_value(&mut self, kind: TokenKind) -> Result<String, ParsingError> {
        Ok(self.require(kind)?.into_value().unwrap_or_default())
    }

    /// Consumes the next token only if it is of kind `kind`.
    fn try_read(&mut self, kind: TokenKind) -> Option<Token> {
        if self.tokens.peek().map(Token::kind) != Some(kind) {
            return None;
        }
        self.tokens.advance()
    }

    fn parse_entry(&mut self) -> Result<Option<BibEntry>, ParsingError> {
        self.require(TokenKind::At)?;
        let kind = self.require_value(TokenKind::Name)?;
        self.require(TokenKind::EntryOpen)?;

        let entry = match classify(&kind) {
            EntryClass::Macro => {
                let (name, value) = self.parse_field()?;
                debug!("defined macro '{}' at line {}", name, self.tokens.line());
                self.macros.insert(name, value);
                None
            }
            EntryClass::Ignored => {
                self.try_read(TokenKind::String);
                debug!("skipped @{} at line {}", kind, self.tokens.line());
                None
            }
            EntryClass::Regular => {
                let id = self.require_value(TokenKind::Name)?;
                let mut fields = IndexMap::new();
                if self.try_read(TokenKind::Comma).is_some() {
                    self.parse_fields(&mut fields)?;
                }
                debug!("parsed @{}{{{}}} with {} fields", kind, id, fields.len());
                Some(BibEntry { kind, id, fields })
            }
        };

        self.require(TokenKind::EntryClose)?;
        Ok(entry)
    }

    fn parse_fields(&mut self, fields: &mut IndexMap<String, String>) -> Result<(), ParsingError> {
        while matches!(self.tokens.peek(), Some(Token::Name(_))) {
            let (name, value) = self.parse_field()?;
            fields.insert(name, value);
            if self.try_read(TokenKind::Comma).is_none() {
                break;
            }
        }
        Ok(())
    }

    /// `name = value`, returning the lower-cased name
    fn parse_field(&mut self) -> Result<(String, String), ParsingError> {
        let name = self.require_value(TokenKind::Name)?;
        self.require(TokenKind::Equals)?;
        let value = self.parse_value()?;
        Ok((name.to_ascii_lowercase(), value))
    }

    fn parse_value(&mut self) -> Result<String, ParsingError> {
        let mut value = self.parse_simple_value()?;
        while self.try_read(TokenKind::Hash).is_some() {
            value.push_str(&self.parse_simple_value()?);
        }
        Ok(value)
    }

    fn parse_simple_value(&mut self) -> Result<String, ParsingError> {
        let line = self.tokens.line();
        match self.read_token(None)? {
            Token::String(text) | Token::Number(text) => Ok(text),
            // macro references are looked up exactly as written
            Token::Name(name) => match self.macros.get(&name) {
                Some(value) => Ok(value.clone()),
                None => Err(ParsingError::new(ParsingErrorKind::UnknownMacro(name), line)),
            },
            other => Err(ParsingError::new(
                ParsingErrorKind::UnexpectedToken {
                    expected: None,
                    found: other.kind(),
                },
                line,
            )),
        }
    }
}
