//! JSMin - A Rust port of Douglas Crockford's JavaScript minifier
//!
//! JSMin removes the characters that are insignificant to JavaScript:
//! comments and most whitespace. String, template, and regular-expression
//! literals pass through untouched, and a space or linefeed is kept
//! wherever dropping it would merge two tokens. It is a streaming,
//! single-pass filter with two characters of lookahead; it never builds
//! a syntax tree.
//!
//! # Example
//! ```
//! use jsmin::{MemoryStream, Minifier};
//!
//! let mut input = MemoryStream::reader(b"var x = 1;  // one\n");
//! let mut output = MemoryStream::writer(64);
//! Minifier::new(&mut input, &mut output).minify().unwrap();
//! assert_eq!(output.into_bytes(), b"\nvar x=1;");
//! ```

// Minifier engine
pub mod minify;

// Stream abstraction
pub mod stream;

// Re-export main types
pub use minify::{Minifier, MinifyError};
pub use stream::{FileStream, MemoryStream, Mode, StdStream, Stream};
