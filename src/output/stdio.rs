//! Terminal sink for report lines.
//!
//! Ordinary lines go to stdout, failures to stderr. Colors are applied with
//! yansi unless disabled; the rendered text is identical either way.

use std::io::{self, Write};

use yansi::Paint;

use crate::actions::{ActionEvent, ActionSink};
use crate::duplicates::{DedupeEvent, EventSink, MemberRole};

/// Writes events to the terminal as they arrive.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioSink {
    color: bool,
}

impl StdioSink {
    /// Create a sink; `color` enables ANSI styling.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn write(&self, line: &str, styled: String, is_error: bool) {
        let text = if self.color { styled } else { line.to_string() };
        let result = if is_error {
            writeln!(io::stderr().lock(), "{text}")
        } else {
            writeln!(io::stdout().lock(), "{text}")
        };
        if let Err(e) = result {
            log_write_error(&e);
        }
    }
}

/// A closed pipe (e.g. `| head`) is expected; anything else is logged.
fn log_write_error(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::BrokenPipe {
        return false;
    }
    log::debug!("Failed to write report line: {err}");
    true
}

impl EventSink for StdioSink {
    fn emit(&self, event: &DedupeEvent) {
        let line = event.to_string();
        let styled = match event {
            DedupeEvent::GroupHeader { .. } => line.bold().to_string(),
            DedupeEvent::Member {
                role: MemberRole::Keep,
                ..
            } => line.green().to_string(),
            DedupeEvent::Member {
                role: MemberRole::Duplicate,
                ..
            } => line.yellow().to_string(),
            DedupeEvent::DryRunDelete { .. } => line.cyan().to_string(),
            DedupeEvent::Deleted { .. } => line.magenta().to_string(),
            DedupeEvent::HashFailed { .. } | DedupeEvent::DeleteFailed { .. } => {
                line.red().to_string()
            }
            DedupeEvent::Summary { .. } => line.bold().to_string(),
        };
        self.write(&line, styled, event.is_error());
    }
}

impl ActionSink for StdioSink {
    fn emit(&self, event: &ActionEvent) {
        let line = event.to_string();
        let styled = match event {
            ActionEvent::DryRunMove { .. }
            | ActionEvent::DryRunRename { .. }
            | ActionEvent::DryRunRemoveDir { .. } => line.cyan().to_string(),
            ActionEvent::MoveFailed { .. } | ActionEvent::RenameFailed { .. } => {
                line.red().to_string()
            }
            ActionEvent::MoveSummary { .. } | ActionEvent::RenameSummary { .. } => {
                line.bold().to_string()
            }
            ActionEvent::RemovedDir { .. } => line.magenta().to_string(),
        };
        self.write(&line, styled, event.is_error());
    }
}
