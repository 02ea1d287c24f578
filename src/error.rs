// A tiny error type so we don't rely on anyhow/thiserror.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String),   // Creating the window failed
    WindowUpdate(String), // Updating the window buffer failed
    ExportEncode(String), // Encoding the painting as PNG failed
    ExportWrite(String),  // Writing the encoded PNG to disk failed
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::ExportEncode(s) => write!(f, "Export encode error: {s}"),
            Error::ExportWrite(s) => write!(f, "Export write error: {s}"),
        }
    }
}

impl std::error::Error for Error {}
