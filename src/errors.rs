use std::error;
use std::fmt;
use std::io;

use crate::lexer::TokenKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingErrorKind {
    /// A required token was present but of the wrong kind.
    /// `expected` is `None` where any value token (string, number or macro name) would do.
    UnexpectedToken {
        expected: Option<TokenKind>,
        found: TokenKind,
    },
    /// The input ended while a token was still required.
    UnexpectedEnd { expected: Option<TokenKind> },
    /// A macro name in value position has no definition.
    UnknownMacro(String),
}

/// Represents an error that happened during the parsing process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsingError {
    pub(crate) kind: ParsingErrorKind,
    pub(crate) line: usize,
}

impl ParsingError {
    pub(crate) fn new(kind: ParsingErrorKind, line: usize) -> ParsingError {
        ParsingError { kind, line }
    }

    pub fn kind(&self) -> &ParsingErrorKind {
        &self.kind
    }

    /// 1-based line of the token that triggered the error
    pub fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParsingErrorKind::UnexpectedToken { expected, found } => match expected {
                Some(kind) => write!(
                    f,
                    "unexpected token {found} at line {line}, expected {kind}",
                    line = self.line
                ),
                None => write!(
                    f,
                    "unexpected token {found} at line {line}, expected a value",
                    line = self.line
                ),
            },
            ParsingErrorKind::UnexpectedEnd { expected } => match expected {
                Some(kind) => write!(
                    f,
                    "unexpected end of input at line {line} while expecting {kind}",
                    line = self.line
                ),
                None => write!(f, "unexpected end of input at line {}", self.line),
            },
            ParsingErrorKind::UnknownMacro(name) => {
                write!(f, "unknown macro '{}' at line {}", name, self.line)
            }
        }
    }
}

impl error::Error for ParsingError {}

/// Failure of a file-backed parse: either the file could not be read
/// or its content is not valid BibTeX.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Parsing(ParsingError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "could not read source: {err}"),
            Self::Parsing(err) => err.fmt(f),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parsing(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ParsingError> for Error {
    fn from(err: ParsingError) -> Self {
        Self::Parsing(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ParsingError::new(
            ParsingErrorKind::UnexpectedToken {
                expected: Some(TokenKind::Equals),
                found: TokenKind::Comma,
            },
            4,
        );
        assert_eq!(err.to_string(), "unexpected token ',' at line 4, expected '='");

        let err = ParsingError::new(ParsingErrorKind::UnexpectedEnd { expected: None }, 2);
        assert_eq!(err.to_string(), "unexpected end of input at line 2");

        let err = ParsingError::new(ParsingErrorKind::UnknownMacro("jan".into()), 1);
        assert_eq!(err.to_string(), "unknown macro 'jan' at line 1");
    }

    #[test]
    fn test_io_is_not_a_parse_error() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
        assert!(error::Error::source(&err).is_some());
    }
}
