//! Incremental terminal output for conversation snapshots.

use std::io::Write;
use std::sync::Mutex;

use crux_ai::conversation::Observer;
use crux_ai::{Message, Role};

/// Turns successive snapshots into the text not yet printed.
///
/// Snapshots only ever grow the last message or append new ones, so the
/// unprinted part of an assistant message is always a suffix.
#[derive(Debug, Default)]
pub struct DeltaPrinter {
    /// Snapshot length when the current assistant message was first seen.
    message_index: usize,
    printed: usize,
}

impl DeltaPrinter {
    pub fn render(&mut self, snapshot: &[Message]) -> Option<String> {
        let last = snapshot.last()?;
        if last.role != Role::Assistant {
            self.printed = 0;
            return None;
        }

        let mut out = String::new();
        if snapshot.len() != self.message_index {
            if self.printed > 0 {
                out.push('\n');
            }
            self.message_index = snapshot.len();
            self.printed = 0;
        }

        let fresh = last.content.get(self.printed..).unwrap_or_default();
        out.push_str(fresh);
        self.printed = last.content.len();

        (!out.is_empty()).then_some(out)
    }

    /// Forget the current message, e.g. after the conversation is cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Observer that writes new assistant text to stdout as it arrives.
pub fn stdout_observer() -> Observer {
    let printer = Mutex::new(DeltaPrinter::default());
    Box::new(move |snapshot: &[Message]| {
        let Ok(mut printer) = printer.lock() else {
            return;
        };
        if snapshot.is_empty() {
            printer.reset();
            return;
        }
        if let Some(text) = printer.render(snapshot) {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        }
    })
}
