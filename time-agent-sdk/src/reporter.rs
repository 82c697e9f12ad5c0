//! Console trace of one query's event stream.
//!
//! Each event is classified by its parts: generated code and code execution
//! results are debug activity, other text is echoed, and a final event with
//! neither carries the answer.

use crate::events::{Event, Part};
use futures_util::{Stream, StreamExt, pin_mut};
use std::fmt::Display;
use std::io::{self, Write};

pub const NO_FINAL_RESPONSE: &str = "No final text response captured.";

const SEPARATOR_WIDTH: usize = 30;

/// Writes the trace of each query to `out` and extracts its final answer.
pub struct EventReporter<W: Write> {
    out: W,
}

impl<W: Write> EventReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Consumes `events` in order and returns the final answer, or
    /// [`NO_FINAL_RESPONSE`] if no final event carried text.
    ///
    /// A failure in the stream ends the query: the error is written to the
    /// trace and the answer captured so far is returned.
    pub async fn report<S, E>(&mut self, query: &str, events: S) -> String
    where
        S: Stream<Item = Result<Event, E>>,
        E: Display,
    {
        let mut final_text = NO_FINAL_RESPONSE.to_string();

        if let Err(e) = self.consume(query, events, &mut final_text).await {
            tracing::error!("Agent run failed for query {:?}: {}", query, e);
            let _ = writeln!(self.out, "ERROR during agent run: {}", e);
        }
        let _ = writeln!(self.out, "{}", "-".repeat(SEPARATOR_WIDTH));
        let _ = self.out.flush();

        final_text
    }

    async fn consume<S, E>(&mut self, query: &str, events: S, final_text: &mut String) -> Result<(), String>
    where
        S: Stream<Item = Result<Event, E>>,
        E: Display,
    {
        writeln!(self.out, "\n--- Running Query: {} ---", query).map_err(|e| e.to_string())?;

        pin_mut!(events);
        while let Some(item) = events.next().await {
            let event = item.map_err(|e| e.to_string())?;
            self.report_event(&event, final_text)
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    fn report_event(&mut self, event: &Event, final_text: &mut String) -> io::Result<()> {
        writeln!(self.out, "Event ID: {}, Author: {}", event.id, event.author)?;
        tracing::debug!("Event {} from {} (final={})", event.id, event.author, event.is_final_response());

        let mut has_specific_part = false;
        for part in event.parts() {
            match part {
                Part::ExecutableCode { language, code } => {
                    writeln!(
                        self.out,
                        "  Debug: Agent generated code:\n```{}\n{}\n```",
                        language, code
                    )?;
                    has_specific_part = true;
                }
                Part::CodeExecutionResult { outcome, output } => {
                    writeln!(
                        self.out,
                        "  Debug: Code Execution Result: {} - Output:\n{}",
                        outcome, output
                    )?;
                    has_specific_part = true;
                }
                Part::Text { text } if !text.trim().is_empty() => {
                    writeln!(self.out, "  Text: '{}'", text.trim())?;
                }
                _ => {}
            }
        }

        if has_specific_part || !event.is_final_response() {
            return Ok(());
        }

        match event.parts().first() {
            Some(Part::Text { text }) if !text.trim().is_empty() => {
                *final_text = text.trim().to_string();
                writeln!(self.out, "==> Final Agent Response: {}", final_text)?;
            }
            _ => {
                writeln!(
                    self.out,
                    "==> Final Agent Response: [No text content in final event]"
                )?;
            }
        }
        Ok(())
    }
}
