//! io/source.rs
//! Normalized input and output endpoints.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// Where a scene file comes from.
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Where a scene file goes.
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
    Stdout,
}

/// Normalize an input source into a boxed reader.
pub fn open_input(src: InputSource) -> io::Result<Box<dyn Read + Send>> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(p) => Box::new(File::open(p)?),
        InputSource::Memory(b) => Box::new(io::Cursor::new(b)),
    };
    Ok(reader)
}

/// Normalize an output sink into a boxed writer.
pub fn open_output(sink: OutputSink) -> io::Result<Box<dyn Write + Send>> {
    let writer: Box<dyn Write + Send> = match sink {
        OutputSink::Writer(w) => w,
        OutputSink::File(p) => Box::new(File::create(p)?),
        OutputSink::Stdout => Box::new(io::stdout()),
    };
    Ok(writer)
}
