//! System clipboard access.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::Write;

pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> std::io::Result<()>;
}

/// Sets the clipboard through the terminal with an OSC 52 escape sequence.
///
/// Works over SSH and inside multiplexers that forward OSC 52. The terminal
/// gives no acknowledgement, so success only means the sequence was written.
#[derive(Debug, Default, Clone, Copy)]
pub struct Osc52Clipboard;

impl Osc52Clipboard {
    pub fn sequence(text: &str) -> String {
        format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
    }
}

impl Clipboard for Osc52Clipboard {
    fn copy(&self, text: &str) -> std::io::Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(Self::sequence(text).as_bytes())?;
        stdout.flush()
    }
}
