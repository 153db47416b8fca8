//! Stream I/O
//!
//! A minimal byte-stream capability used by the minifier: read one byte,
//! write one byte, write a formatted line. Three backings are provided
//! which share the same read/write behavior and differ only in how they
//! are opened and torn down.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Direction a stream is opened in.
///
/// Mirrors stdio mode strings: a stream opened for reading rejects
/// writes, and a stream opened for writing reports end-of-input on reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

/// A one-byte-at-a-time I/O capability.
///
/// `getc` folds read errors into end-of-input: the minifier does not
/// distinguish an I/O failure from exhaustion. `printf` exists for
/// annotation lines written ahead of the minified body; the minifier
/// itself only uses `getc` and `putc`.
pub trait Stream {
    /// Read the next byte, or `None` at end of input.
    fn getc(&mut self) -> Option<u8>;

    /// Write one byte.
    fn putc(&mut self, c: u8) -> io::Result<()>;

    /// Write formatted text, e.g. `// <comment>` lines.
    fn printf(&mut self, args: fmt::Arguments<'_>) -> io::Result<()>;
}

fn read_byte<R: Read>(reader: &mut R) -> Option<u8> {
    let mut buf = [0u8; 1];
    match reader.read(&mut buf) {
        Ok(1) => Some(buf[0]),
        // 0 bytes is end of input; read errors end the stream as well
        _ => None,
    }
}

fn not_writable() -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, "stream is not open for writing")
}

/// Stream over the process standard input or output.
///
/// The standard descriptors are owned by the process, so this stream
/// never closes what it wraps.
pub struct StdStream {
    backing: StdBacking,
}

enum StdBacking {
    Input(io::StdinLock<'static>),
    Output(io::StdoutLock<'static>),
}

impl StdStream {
    /// Stream reading from standard input.
    pub fn input() -> Self {
        StdStream {
            backing: StdBacking::Input(io::stdin().lock()),
        }
    }

    /// Stream writing to standard output.
    pub fn output() -> Self {
        StdStream {
            backing: StdBacking::Output(io::stdout().lock()),
        }
    }
}

impl Stream for StdStream {
    fn getc(&mut self) -> Option<u8> {
        match &mut self.backing {
            StdBacking::Input(stdin) => read_byte(stdin),
            StdBacking::Output(_) => None,
        }
    }

    fn putc(&mut self, c: u8) -> io::Result<()> {
        match &mut self.backing {
            StdBacking::Output(stdout) => stdout.write_all(&[c]),
            StdBacking::Input(_) => Err(not_writable()),
        }
    }

    fn printf(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        match &mut self.backing {
            StdBacking::Output(stdout) => stdout.write_fmt(args),
            StdBacking::Input(_) => Err(not_writable()),
        }
    }
}

/// Stream over a named file.
///
/// Opens the file itself and therefore owns it: the handle is closed
/// (and any buffered output flushed) when the stream is dropped.
pub struct FileStream {
    backing: FileBacking,
}

enum FileBacking {
    Read(BufReader<File>),
    Write(BufWriter<File>),
}

impl FileStream {
    /// Open `path` in the given mode.
    pub fn open<P: AsRef<Path>>(path: P, mode: Mode) -> io::Result<Self> {
        let backing = match mode {
            Mode::Read => FileBacking::Read(BufReader::new(File::open(path)?)),
            Mode::Write => FileBacking::Write(BufWriter::new(File::create(path)?)),
        };
        Ok(FileStream { backing })
    }
}

impl Stream for FileStream {
    fn getc(&mut self) -> Option<u8> {
        match &mut self.backing {
            FileBacking::Read(reader) => read_byte(reader),
            FileBacking::Write(_) => None,
        }
    }

    fn putc(&mut self, c: u8) -> io::Result<()> {
        match &mut self.backing {
            FileBacking::Write(writer) => writer.write_all(&[c]),
            FileBacking::Read(_) => Err(not_writable()),
        }
    }

    fn printf(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        match &mut self.backing {
            FileBacking::Write(writer) => writer.write_fmt(args),
            FileBacking::Read(_) => Err(not_writable()),
        }
    }
}

/// Stream over a fixed memory region.
///
/// A reader iterates over a snapshot of the given bytes; a writer fills
/// a region of fixed capacity and fails once it is full.
pub struct MemoryStream {
    buf: Vec<u8>,
    pos: usize,
    cap: usize,
    mode: Mode,
}

impl MemoryStream {
    /// Reader over a copy of `bytes`.
    pub fn reader(bytes: &[u8]) -> Self {
        MemoryStream {
            buf: bytes.to_vec(),
            pos: 0,
            cap: bytes.len(),
            mode: Mode::Read,
        }
    }

    /// Writer into a fresh region of `capacity` bytes.
    pub fn writer(capacity: usize) -> Self {
        MemoryStream {
            buf: Vec::with_capacity(capacity),
            pos: 0,
            cap: capacity,
            mode: Mode::Write,
        }
    }

    /// Number of bytes written so far (or available, for a reader).
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the stream, returning the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Stream for MemoryStream {
    fn getc(&mut self) -> Option<u8> {
        if self.mode != Mode::Read {
            return None;
        }
        let c = self.buf.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn putc(&mut self, c: u8) -> io::Result<()> {
        if self.mode != Mode::Write {
            return Err(not_writable());
        }
        if self.buf.len() >= self.cap {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "memory stream is full",
            ));
        }
        self.buf.push(c);
        Ok(())
    }

    fn printf(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let text = fmt::format(args);
        for c in text.bytes() {
            self.putc(c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reader() {
        let mut stream = MemoryStream::reader(b"ab");

        assert_eq!(stream.getc(), Some(b'a'));
        assert_eq!(stream.getc(), Some(b'b'));
        assert_eq!(stream.getc(), None);
        // Reading past the end stays at end
        assert_eq!(stream.getc(), None);
    }

    #[test]
    fn test_memory_writer() {
        let mut stream = MemoryStream::writer(16);

        stream.putc(b'x').unwrap();
        stream.putc(b'y').unwrap();
        assert_eq!(stream.into_bytes(), b"xy");
    }

    #[test]
    fn test_memory_writer_capacity() {
        let mut stream = MemoryStream::writer(2);

        stream.putc(b'1').unwrap();
        stream.putc(b'2').unwrap();
        let err = stream.putc(b'3').unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_memory_printf() {
        let mut stream = MemoryStream::writer(64);

        stream.printf(format_args!("// {}\n", "banner")).unwrap();
        assert_eq!(stream.into_bytes(), b"// banner\n");
    }

    #[test]
    fn test_memory_direction() {
        let mut reader = MemoryStream::reader(b"a");
        assert_eq!(
            reader.putc(b'x').unwrap_err().kind(),
            io::ErrorKind::Unsupported
        );

        let mut writer = MemoryStream::writer(4);
        assert_eq!(writer.getc(), None);
    }

    #[test]
    fn test_file_stream_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.js");

        {
            let mut stream = FileStream::open(&path, Mode::Write).unwrap();
            stream.printf(format_args!("// {}\n", "header")).unwrap();
            stream.putc(b'a').unwrap();
            // Dropping the stream flushes and closes the file
        }

        let mut stream = FileStream::open(&path, Mode::Read).unwrap();
        let mut bytes = Vec::new();
        while let Some(c) = stream.getc() {
            bytes.push(c);
        }
        assert_eq!(bytes, b"// header\na");
    }

    #[test]
    fn test_file_stream_direction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dir.js");

        let mut writer = FileStream::open(&path, Mode::Write).unwrap();
        assert_eq!(writer.getc(), None);
        drop(writer);

        let mut reader = FileStream::open(&path, Mode::Read).unwrap();
        assert_eq!(
            reader.putc(b'x').unwrap_err().kind(),
            io::ErrorKind::Unsupported
        );
    }
}
