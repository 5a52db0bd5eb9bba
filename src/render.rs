//! Terminal rendering of the conversation.
//!
//! Role only picks the label and colour; message text is printed exactly as
//! it was received so verse keeps its line breaks.

use std::io::{self, Write};

use colored::*;

use crate::chat::{ChatMessage, ChatRole};
use crate::error::{KellyError, Severity};
use crate::session::Transcript;

const RULE_WIDTH: usize = 50;

pub fn label(role: ChatRole) -> ColoredString {
    match role {
        ChatRole::User => "You:".bright_cyan().bold(),
        ChatRole::Assistant => "Kelly:".bright_magenta().bold(),
    }
}

pub fn rule() -> ColoredString {
    "─".repeat(RULE_WIDTH).bright_black()
}

pub fn write_message<W: Write>(out: &mut W, message: &ChatMessage) -> io::Result<()> {
    writeln!(out, "{}", label(message.role))?;
    writeln!(out, "{}", message.content)
}

pub fn write_transcript<W: Write>(out: &mut W, transcript: &Transcript) -> io::Result<()> {
    if transcript.is_empty() {
        return writeln!(out, "{}", "(no messages yet)".bright_black());
    }
    for message in transcript {
        write_message(out, message)?;
        writeln!(out, "{}", rule())?;
    }
    Ok(())
}

pub fn write_notice<W: Write>(out: &mut W, err: &KellyError) -> io::Result<()> {
    match err.severity() {
        Severity::Warning => writeln!(out, "{} {}", "Warning:".bright_yellow(), err),
        Severity::Error if err.from_provider() => writeln!(
            out,
            "{} An error occurred with the Groq API: {}",
            "Error:".bright_red(),
            err
        ),
        Severity::Error => writeln!(out, "{} {}", "Error:".bright_red(), err),
    }
}

/// Prints a reply to `out`, or its single notice to `err_out`.
pub fn write_outcome<O: Write, E: Write>(
    out: &mut O,
    err_out: &mut E,
    outcome: &Result<String, KellyError>,
) -> io::Result<()> {
    match outcome {
        Ok(reply) => writeln!(out, "{reply}"),
        Err(e) => write_notice(err_out, e),
    }
}

pub fn render_message(message: &ChatMessage) -> io::Result<()> {
    write_message(&mut io::stdout().lock(), message)
}

pub fn render_transcript(transcript: &Transcript) -> io::Result<()> {
    write_transcript(&mut io::stdout().lock(), transcript)
}

pub fn render_notice(err: &KellyError) -> io::Result<()> {
    write_notice(&mut io::stderr().lock(), err)
}
