//! Error types for export operations

use std::fmt;

/// Errors that can surface from an export or queue operation.
///
/// Per-node conversion trouble never shows up here: converters degrade to an
/// empty result and the assembler skips the node. These variants cover the
/// operation-level conditions only.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// The page snapshot could not be parsed at all
    Parse(String),
    /// No message nodes were found in the document
    NoMessages,
    /// The session store could not be read or written
    Store(String),
    /// The clipboard write was denied or no clipboard is available
    Clipboard(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ExportError::NoMessages => write!(f, "No message nodes found in document"),
            ExportError::Store(msg) => write!(f, "Session store error: {msg}"),
            ExportError::Clipboard(msg) => write!(f, "Clipboard error: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}
