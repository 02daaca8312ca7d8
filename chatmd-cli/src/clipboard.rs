//! System clipboard access via external tools.
//!
//! No clipboard daemon is linked in; the flush shells out to whichever
//! platform tool is installed, trying them in priority order. A tool that is
//! missing or exits nonzero just hands over to the next one.

use chatmd_export::queue::ClipboardSink;
use chatmd_export::ExportError;
use std::io::Write;
use std::process::{Command, Stdio};

struct Tool {
    program: &'static str,
    args: &'static [&'static str],
}

const TOOLS: &[Tool] = &[
    Tool {
        program: "wl-copy",
        args: &[],
    },
    Tool {
        program: "xclip",
        args: &["-selection", "clipboard"],
    },
    Tool {
        program: "xsel",
        args: &["--clipboard", "--input"],
    },
    Tool {
        program: "pbcopy",
        args: &[],
    },
];

/// Clipboard sink backed by the platform tool chain.
pub struct ToolClipboard;

impl ToolClipboard {
    pub fn new() -> Self {
        ToolClipboard
    }
}

impl Default for ToolClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for ToolClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError> {
        for tool in TOOLS {
            match try_tool(tool, text) {
                Ok(true) => {
                    tracing::debug!(tool = tool.program, "clipboard write accepted");
                    return Ok(());
                }
                Ok(false) | Err(_) => continue,
            }
        }
        Err(ExportError::Clipboard(
            "no clipboard tool accepted the write (tried wl-copy, xclip, xsel, pbcopy)"
                .to_string(),
        ))
    }
}

fn try_tool(tool: &Tool, text: &str) -> std::io::Result<bool> {
    let mut child = match Command::new(tool.program)
        .args(tool.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        // not installed
        Err(_) => return Ok(false),
    };
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    Ok(child.wait()?.success())
}

/// Sink that prints instead of copying, for piping a flush into a file.
pub struct StdoutSink;

impl ClipboardSink for StdoutSink {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError> {
        println!("{text}");
        Ok(())
    }
}
