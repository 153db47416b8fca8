//! JavaScript minifier
//!
//! Single-pass transformer that copies input to output while deleting the
//! characters insignificant to JavaScript: comments are removed, tabs and
//! other control bytes become spaces, carriage returns become linefeeds,
//! and most spaces and linefeeds are dropped. String, template, and
//! regular-expression literals are copied through byte for byte.
//!
//! The algorithm is Douglas Crockford's JSMin: a two-character window over
//! the significant token stream, with a one-byte lookahead buffer on the
//! raw stream, driven by three composable actions.

use crate::stream::Stream;
use log::debug;
use thiserror::Error;

/// Error from minification.
///
/// The unterminated-literal conditions abort the run where the reference
/// implementation would abort the process; the diagnostic wording is kept,
/// with the input line appended.
#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("unterminated comment (line {line})")]
    UnterminatedComment { line: usize },

    #[error("unterminated string literal (line {line})")]
    UnterminatedString { line: usize },

    #[error("unterminated set in Regular Expression literal (line {line})")]
    UnterminatedClass { line: usize },

    #[error("unterminated Regular Expression literal (line {line})")]
    UnterminatedRegExp { line: usize },

    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
}

/// Test whether omitting a separator next to `c` could merge two tokens.
///
/// True for letters, digits, underscore, dollar sign, backslash, and any
/// byte above 126 (non-ASCII text is treated as identifier continuation).
fn is_word_char(c: Option<u8>) -> bool {
    match c {
        Some(c) => c.is_ascii_alphanumeric() || c == b'_' || c == b'$' || c == b'\\' || c > 126,
        None => false,
    }
}

/// JavaScript minifier over a pair of byte streams.
///
/// Pulls bytes from `input` one at a time and writes the minified form to
/// `output`. A `Minifier` performs exactly one run; it neither opens nor
/// closes the streams it borrows.
pub struct Minifier<'a> {
    input: &'a mut dyn Stream,
    output: &'a mut dyn Stream,

    /// Current character; `None` once the input is exhausted.
    a: Option<u8>,
    /// Lookahead character from the comment-free token stream.
    b: Option<u8>,
    /// One-slot raw peek buffer; populated by `peek`, drained by `get`.
    lookahead: Option<u8>,

    /// 1-based input line, for diagnostics.
    line: usize,
    bytes_read: usize,
    bytes_written: usize,
}

impl<'a> Minifier<'a> {
    /// Create a minifier over already-open input and output streams.
    pub fn new(input: &'a mut dyn Stream, output: &'a mut dyn Stream) -> Self {
        Minifier {
            input,
            output,
            a: None,
            b: None,
            lookahead: None,
            line: 1,
            bytes_read: 0,
            bytes_written: 0,
        }
    }

    /// Minify the whole input.
    ///
    /// Runs the elision loop to end of input, or to the first unterminated
    /// literal or write failure. Consumes the minifier: a run cannot be
    /// resumed or repeated.
    pub fn minify(mut self) -> Result<(), MinifyError> {
        self.a = Some(b'\n');
        self.fill()?;
        while self.a.is_some() {
            match self.a {
                Some(b' ') => {
                    if is_word_char(self.b) {
                        self.emit()?;
                    } else {
                        self.shift()?;
                    }
                }
                Some(b'\n') => match self.b {
                    Some(b'{' | b'[' | b'(' | b'+' | b'-') => self.emit()?,
                    Some(b' ') => self.fill()?,
                    _ => {
                        if is_word_char(self.b) {
                            self.emit()?;
                        } else {
                            self.shift()?;
                        }
                    }
                },
                _ => match self.b {
                    Some(b' ') => {
                        if is_word_char(self.a) {
                            self.emit()?;
                        } else {
                            self.fill()?;
                        }
                    }
                    Some(b'\n') => match self.a {
                        Some(b'}' | b']' | b')' | b'+' | b'-' | b'"' | b'\'' | b'`') => {
                            self.emit()?
                        }
                        _ => {
                            if is_word_char(self.a) {
                                self.emit()?;
                            } else {
                                self.fill()?;
                            }
                        }
                    },
                    _ => self.emit()?,
                },
            }
        }
        debug!(
            "minified {} input bytes to {} output bytes",
            self.bytes_read, self.bytes_written
        );
        Ok(())
    }

    /// Next normalized character.
    ///
    /// Drains the lookahead slot if populated, otherwise reads the input
    /// stream. Control characters other than linefeed are folded away:
    /// carriage return becomes a linefeed, everything else below space
    /// becomes a space.
    fn get(&mut self) -> Option<u8> {
        let c = match self.lookahead.take() {
            Some(c) => Some(c),
            None => {
                let c = self.input.getc();
                if let Some(c) = c {
                    self.bytes_read += 1;
                    if c == b'\n' {
                        self.line += 1;
                    }
                }
                c
            }
        };
        match c {
            None => None,
            Some(b'\r') => Some(b'\n'),
            Some(c) if c >= b' ' || c == b'\n' => Some(c),
            Some(_) => Some(b' '),
        }
    }

    /// Next character without consuming it.
    fn peek(&mut self) -> Option<u8> {
        let c = self.get();
        self.lookahead = c;
        c
    }

    /// Next character from the significant token stream.
    ///
    /// Like `get`, but a `/` is checked against the following character:
    /// a line comment is consumed through its terminator, a block comment
    /// collapses to a single space, and any other `/` passes through for
    /// the action layer to classify.
    fn next(&mut self) -> Result<Option<u8>, MinifyError> {
        let c = self.get();
        if c != Some(b'/') {
            return Ok(c);
        }
        match self.peek() {
            Some(b'/') => loop {
                match self.get() {
                    None => return Ok(None),
                    Some(c) if c <= b'\n' => return Ok(Some(c)),
                    Some(_) => {}
                }
            },
            Some(b'*') => {
                self.get();
                loop {
                    match self.get() {
                        Some(b'*') => {
                            if self.peek() == Some(b'/') {
                                self.get();
                                return Ok(Some(b' '));
                            }
                        }
                        None => {
                            return Err(MinifyError::UnterminatedComment { line: self.line });
                        }
                        Some(_) => {}
                    }
                }
            }
            // Not a comment opener; the peeked byte stays buffered
            _ => Ok(c),
        }
    }

    fn put(&mut self, c: Option<u8>) -> Result<(), MinifyError> {
        if let Some(c) = c {
            self.output.putc(c)?;
            self.bytes_written += 1;
        }
        Ok(())
    }

    /// Action 1: output `a`, then advance the window.
    fn emit(&mut self) -> Result<(), MinifyError> {
        self.put(self.a)?;
        self.shift()
    }

    /// Action 2: drop `a`, copy `b` into it, then refill `b`.
    ///
    /// If the new `a` opens a string or template literal, the literal body
    /// is copied through verbatim here; the closing quote ends up in `a`
    /// and is written by a later `emit`.
    fn shift(&mut self) -> Result<(), MinifyError> {
        self.a = self.b;
        if matches!(self.a, Some(b'\'' | b'"' | b'`')) {
            self.copy_string_literal()?;
        }
        self.fill()
    }

    /// Action 3: refill `b` from the significant token stream.
    ///
    /// A `/` following one of `( , = : [ ! & | ? { } ; \n` is taken as the
    /// start of a regular-expression literal and copied through verbatim;
    /// anywhere else it is a division operator and flows through the
    /// ordinary window.
    fn fill(&mut self) -> Result<(), MinifyError> {
        self.b = self.next()?;
        if self.b == Some(b'/')
            && matches!(
                self.a,
                Some(
                    b'(' | b','
                        | b'='
                        | b':'
                        | b'['
                        | b'!'
                        | b'&'
                        | b'|'
                        | b'?'
                        | b'{'
                        | b'}'
                        | b';'
                        | b'\n'
                )
            )
        {
            self.copy_regex_literal()?;
            self.b = self.next()?;
        }
        Ok(())
    }

    /// Copy a quoted literal body to the output unmodified.
    ///
    /// On entry `a` holds the opening quote and `b` still holds the same
    /// byte, which serves as the closing delimiter to match. A backslash
    /// passes the following byte through without inspecting it.
    fn copy_string_literal(&mut self) -> Result<(), MinifyError> {
        loop {
            self.put(self.a)?;
            self.a = self.get();
            if self.a == self.b {
                break;
            }
            if self.a == Some(b'\\') {
                self.put(self.a)?;
                self.a = self.get();
            }
            if self.a.is_none() {
                return Err(MinifyError::UnterminatedString { line: self.line });
            }
        }
        Ok(())
    }

    /// Copy a regular-expression literal body to the output unmodified.
    ///
    /// Writes the pending `a` and the opening `/` first. A `[` starts a
    /// character class with its own verbatim span; outside a class, a bare
    /// `/` closes the literal and is left in `a` for a later `emit`.
    fn copy_regex_literal(&mut self) -> Result<(), MinifyError> {
        self.put(self.a)?;
        self.put(self.b)?;
        loop {
            self.a = self.get();
            if self.a == Some(b'[') {
                self.copy_regex_class()?;
            } else if self.a == Some(b'/') {
                break;
            } else if self.a == Some(b'\\') {
                self.put(self.a)?;
                self.a = self.get();
            }
            if self.a.is_none() {
                return Err(MinifyError::UnterminatedRegExp { line: self.line });
            }
            self.put(self.a)?;
        }
        Ok(())
    }

    /// Copy a `[...]` character class inside a regex literal.
    ///
    /// Leaves the closing `]` in `a`; the caller writes it.
    fn copy_regex_class(&mut self) -> Result<(), MinifyError> {
        loop {
            self.put(self.a)?;
            self.a = self.get();
            if self.a == Some(b']') {
                break;
            }
            if self.a == Some(b'\\') {
                self.put(self.a)?;
                self.a = self.get();
            }
            if self.a.is_none() {
                return Err(MinifyError::UnterminatedClass { line: self.line });
            }
        }
        Ok(())
    }
}
