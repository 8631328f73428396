use std::fs;
use std::io;
use std::io::BufRead;
use std::path;

/// A source of characters the lexer reads one at a time.
///
/// The line number starts at 1 and moves to the next line once the cursor
/// advances past a `\n` onto a following character. Advancing past the
/// final character of the input leaves the line number untouched.
pub trait CharCursor {
    /// The current character, or `None` at the end of input
    fn peek(&self) -> Option<char>;

    /// Move to the next character. Does nothing at the end of input.
    fn advance(&mut self);

    fn at_end(&self) -> bool {
        self.peek().is_none()
    }

    /// 1-based line of the current character
    fn line(&self) -> usize;
}

/// In-memory character source
#[derive(Debug, Clone)]
pub struct StrSource {
    chars: Vec<char>,
    pos: usize,
    lineno: usize,
}

impl StrSource {
    pub fn new(src: &str) -> StrSource {
        StrSource {
            chars: src.chars().collect(),
            pos: 0,
            lineno: 1,
        }
    }

    /// Move back to the first character and line 1.
    pub fn rewind(&mut self) {
        self.pos = 0;
        self.lineno = 1;
    }
}

impl CharCursor for StrSource {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        let Some(passed) = self.peek() else {
            return;
        };
        self.pos += 1;
        if passed == '\n' && !self.at_end() {
            self.lineno += 1;
        }
    }

    fn line(&self) -> usize {
        self.lineno
    }
}

/// Character source reading a file line by line.
///
/// The file handle is released as soon as the last line has been read or
/// the source is dropped. A read failure (including invalid UTF-8) ends the
/// input and is kept until [`FileSource::take_error`] collects it.
#[derive(Debug)]
pub struct FileSource {
    reader: Option<io::BufReader<fs::File>>,
    buf: Vec<char>,
    pos: usize,
    lineno: usize,
    error: Option<io::Error>,
}

impl FileSource {
    pub fn open<P: AsRef<path::Path>>(path: P) -> Result<FileSource, io::Error> {
        let fd = fs::File::open(path)?;
        let mut source = FileSource {
            reader: Some(io::BufReader::new(fd)),
            buf: Vec::new(),
            pos: 0,
            lineno: 1,
            error: None,
        };
        source.refill();
        Ok(source)
    }

    /// Returns the read error that ended the input early, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    // loads the next line into `buf`, or drops the reader at EOF
    fn refill(&mut self) {
        self.buf.clear();
        self.pos = 0;
        let Some(reader) = self.reader.as_mut() else {
            return;
        };
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => self.reader = None,
            Ok(_) => self.buf.extend(line.chars()),
            Err(err) => {
                self.error = Some(err);
                self.reader = None;
            }
        }
    }
}

impl CharCursor for FileSource {
    fn peek(&self) -> Option<char> {
        self.buf.get(self.pos).copied()
    }

    fn advance(&mut self) {
        let Some(passed) = self.peek() else {
            return;
        };
        self.pos += 1;
        if self.pos >= self.buf.len() {
            self.refill();
        }
        if passed == '\n' && !self.at_end() {
            self.lineno += 1;
        }
    }

    fn line(&self) -> usize {
        self.lineno
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::error;
    use std::io::Write;

    /// Writes `content` into a fresh file below the temp directory.
    pub(crate) fn fixture(name: &str, content: &[u8]) -> Result<path::PathBuf, io::Error> {
        let path = std::env::temp_dir().join(format!(
            "bibtex-names-{}-{}",
            std::process::id(),
            name
        ));
        let mut fd = fs::File::create(&path)?;
        fd.write_all(content)?;
        Ok(path)
    }

    fn lines_of<C: CharCursor>(src: &mut C) -> Vec<(char, usize)> {
        let mut seen = Vec::new();
        while let Some(chr) = src.peek() {
            seen.push((chr, src.line()));
            src.advance();
        }
        seen
    }

    #[test]
    fn test_line_counting() {
        let mut src = StrSource::new("A\n\nB\n");
        assert_eq!(
            lines_of(&mut src),
            vec![('A', 1), ('\n', 1), ('\n', 2), ('B', 3), ('\n', 3)]
        );
        assert!(src.at_end());
        assert_eq!(src.line(), 3);
        src.advance();
        assert_eq!(src.line(), 3);
    }

    #[test]
    fn test_rewind() {
        let mut src = StrSource::new("x\ny");
        src.advance();
        src.advance();
        assert_eq!(src.peek(), Some('y'));
        assert_eq!(src.line(), 2);
        src.rewind();
        assert_eq!(src.peek(), Some('x'));
        assert_eq!(src.line(), 1);
    }

    #[test]
    fn test_empty() {
        let src = StrSource::new("");
        assert!(src.at_end());
        assert_eq!(src.peek(), None);
        assert_eq!(src.line(), 1);
    }

    #[test]
    fn test_file_matches_string() -> Result<(), Box<dyn error::Error>> {
        let text = "A\n\nB\n% ünïcode\n@misc{x}";
        let path = fixture("cursor.bib", text.as_bytes())?;
        let mut file = FileSource::open(&path)?;
        let mut string = StrSource::new(text);
        assert_eq!(lines_of(&mut file), lines_of(&mut string));
        assert!(file.take_error().is_none());
        assert!(file.reader.is_none());
        fs::remove_file(path)?;
        Ok(())
    }

    #[test]
    fn test_file_invalid_utf8() -> Result<(), Box<dyn error::Error>> {
        let path = fixture("invalid.bib", b"ok\n\xff\xfe\n")?;
        let mut file = FileSource::open(&path)?;
        let seen: String = lines_of(&mut file).into_iter().map(|(c, _)| c).collect();
        assert_eq!(seen, "ok\n");
        assert!(file.take_error().is_some());
        fs::remove_file(path)?;
        Ok(())
    }

    #[test]
    fn test_file_missing() {
        let err = FileSource::open("/nonexistent/definitely/missing.bib").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
