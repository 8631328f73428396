use std::fmt;

use log::debug;
use unicase::UniCase;

use crate::source::CharCursor;

/// A token is one semantic unit read from the bib file.
/// Remember, that bib file entry looks as follows:
///
/// ```tex
/// @Book{works:4,
///   author     = {Shakespeare, William},
///   year       = 1609,
/// }
/// ```
///
/// In this case, the lexer would emit the following Token instances:
/// (At, Name("Book"), EntryOpen, Name("works:4"), Comma, Newline,
/// Name("author"), Equals, String("Shakespeare, William"), Comma, Newline,
/// Name("year"), Equals, Number("1609"), Comma, Newline, EntryClose).
/// Newline tokens only serve line counting and never reach the parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    At,
    EntryOpen,
    EntryClose,
    Name(String),
    String(String),
    Number(String),
    Equals,
    Comma,
    Hash,
    Newline,
}

impl Token {
    pub(crate) fn kind(&self) -> TokenKind {
        match self {
            Self::At => TokenKind::At,
            Self::EntryOpen => TokenKind::EntryOpen,
            Self::EntryClose => TokenKind::EntryClose,
            Self::Name(_) => TokenKind::Name,
            Self::String(_) => TokenKind::String,
            Self::Number(_) => TokenKind::Number,
            Self::Equals => TokenKind::Equals,
            Self::Comma => TokenKind::Comma,
            Self::Hash => TokenKind::Hash,
            Self::Newline => TokenKind::Newline,
        }
    }

    /// Takes the payload of a name, string or number token
    pub(crate) fn into_value(self) -> Option<String> {
        match self {
            Self::Name(s) | Self::String(s) | Self::Number(s) => Some(s),
            _ => None,
        }
    }
}

/// The kind of a token, as reported in parsing errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    At,
    EntryOpen,
    EntryClose,
    Name,
    String,
    Number,
    Equals,
    Comma,
    Hash,
    Newline,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::At => "'@'",
                Self::EntryOpen => "'{' or '('",
                Self::EntryClose => "'}' or ')'",
                Self::Name => "name",
                Self::String => "string",
                Self::Number => "number",
                Self::Equals => "'='",
                Self::Comma => "','",
                Self::Hash => "'#'",
                Self::Newline => "end of line",
            }
        )
    }
}

/// Characters allowed in entry types, keys, field names and macro names
fn is_name_char(chr: char) -> bool {
    chr.is_ascii_alphanumeric()
        || matches!(
            chr,
            '!' | '$' | '&' | '*' | '+' | '-' | '.' | '/' | ':' | ';' | '<' | '>' | '?' | '['
                | ']' | '^' | '_' | '`' | '|'
        )
}

fn is_number(run: &str) -> bool {
    run.chars().any(|c| c.is_ascii_digit()) && run.parse::<f64>().is_ok()
}

fn is_blank(chr: char) -> bool {
    matches!(chr, ' ' | '\t' | '\r')
}

/// Turns a character source into the full token sequence.
///
/// Lexing never fails: junk between entries is skipped and an input that
/// ends early simply produces a truncated token sequence, which the parser
/// reports.
pub(crate) struct Lexer<'s, C: CharCursor + ?Sized> {
    src: &'s mut C,
    tokens: Vec<Token>,
}

impl<'s, C: CharCursor + ?Sized> Lexer<'s, C> {
    pub(crate) fn new(src: &'s mut C) -> Self {
        Lexer {
            src,
            tokens: Vec::new(),
        }
    }

    pub(crate) fn tokenize(mut self) -> Vec<Token> {
        while let Some(chr) = self.src.peek() {
            match chr {
                '@' => {
                    self.src.advance();
                    self.tokens.push(Token::At);
                    self.lex_entry();
                }
                '\n' => {
                    self.src.advance();
                    self.tokens.push(Token::Newline);
                }
                '%' => self.skip_comment(),
                _ => self.src.advance(),
            }
        }
        debug!(
            "lexed {} tokens over {} lines",
            self.tokens.len(),
            self.src.line()
        );
        self.tokens
    }

    fn lex_entry(&mut self) {
        let kind = self.read_run();

        // anything but blanks before the opener leaves the entry unopened
        let closer = loop {
            match self.src.peek() {
                Some('{') => break '}',
                Some('(') => break ')',
                Some('\n') => self.tokens.push(Token::Newline),
                Some(c) if is_blank(c) => {}
                _ => return,
            }
            self.src.advance();
        };
        self.src.advance();
        self.tokens.push(Token::EntryOpen);

        if UniCase::ascii(kind.as_str()) == UniCase::ascii("comment") {
            let opener = if closer == ')' { '(' } else { '{' };
            let (_, newlines) = self.read_string(opener);
            self.push_newlines(newlines);
            self.tokens.push(Token::EntryClose);
            return;
        }

        while let Some(chr) = self.src.peek() {
            match chr {
                c if c == closer => {
                    self.src.advance();
                    self.tokens.push(Token::EntryClose);
                    return;
                }
                '\n' => {
                    self.src.advance();
                    self.tokens.push(Token::Newline);
                }
                '%' => self.skip_comment(),
                '{' | '"' => {
                    self.src.advance();
                    let (text, newlines) = self.read_string(chr);
                    self.tokens.push(Token::String(text));
                    self.push_newlines(newlines);
                }
                '=' => self.single(Token::Equals),
                '#' => self.single(Token::Hash),
                ',' => self.single(Token::Comma),
                c if is_blank(c) => self.src.advance(),
                _ => {
                    if self.read_run().is_empty() {
                        self.src.advance();
                    }
                }
            }
        }
    }

    fn single(&mut self, token: Token) {
        self.src.advance();
        self.tokens.push(token);
    }

    fn push_newlines(&mut self, count: usize) {
        self.tokens.extend(std::iter::repeat(Token::Newline).take(count));
    }

    // a line comment ends with (and consumes) its line break
    fn skip_comment(&mut self) {
        while let Some(chr) = self.src.peek() {
            self.src.advance();
            if chr == '\n' {
                break;
            }
        }
        self.tokens.push(Token::Newline);
    }

    /// Reads a run of name characters and emits it as name or number.
    /// Returns the run, which is empty if nothing was consumed.
    fn read_run(&mut self) -> String {
        let mut run = String::new();
        while let Some(chr) = self.src.peek() {
            if !is_name_char(chr) {
                break;
            }
            run.push(chr);
            self.src.advance();
        }
        if !run.is_empty() {
            let token = if is_number(&run) {
                Token::Number(run.clone())
            } else {
                Token::Name(run.clone())
            };
            self.tokens.push(token);
        }
        run
    }

    /// Reads a delimited string whose opening `delimiter` was already consumed.
    /// Returns its content and the number of line breaks inside.
    ///
    /// A `"`-delimited string ends at the next unescaped `"`; a backslash
    /// takes the following character literally. `{` and `(` strings nest
    /// and end at the matching closing character, which is not part of the
    /// content. The end of input terminates any string.
    fn read_string(&mut self, delimiter: char) -> (String, usize) {
        let mut text = String::new();
        let mut newlines = 0;

        if delimiter == '"' {
            let mut escaped = false;
            while let Some(chr) = self.src.peek() {
                self.src.advance();
                if chr == '\n' {
                    newlines += 1;
                }
                if escaped {
                    text.push(chr);
                    escaped = false;
                } else if chr == '\\' {
                    escaped = true;
                } else if chr == '"' {
                    break;
                } else {
                    text.push(chr);
                }
            }
            return (text, newlines);
        }

        let closer = if delimiter == '(' { ')' } else { '}' };
        let mut level = 1usize;
        while let Some(chr) = self.src.peek() {
            self.src.advance();
            if chr == '\n' {
                newlines += 1;
            }
            if chr == delimiter {
                level += 1;
            } else if chr == closer {
                level -= 1;
                if level == 0 {
                    break;
                }
            }
            text.push(chr);
        }
        (text, newlines)
    }
}

/// Cursor over a lexed token sequence which hides newline tokens
/// and counts them instead.
#[derive(Debug, Clone)]
pub(crate) struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
    lineno: usize,
}

impl TokenCursor {
    pub(crate) fn new(tokens: Vec<Token>) -> TokenCursor {
        let mut cursor = TokenCursor {
            tokens,
            pos: 0,
            lineno: 1,
        };
        cursor.skip_newlines();
        cursor
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Takes the current token and moves on to the next non-newline token.
    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        self.skip_newlines();
        Some(token)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn line(&self) -> usize {
        self.lineno
    }

    /// Moves back to the first token and line 1.
    #[cfg(test)]
    pub(crate) fn rewind(&mut self) {
        self.pos = 0;
        self.lineno = 1;
        self.skip_newlines();
    }

    fn skip_newlines(&mut self) {
        while let Some(Token::Newline) = self.tokens.get(self.pos) {
            self.pos += 1;
            self.lineno += 1;
        }
    }
}
