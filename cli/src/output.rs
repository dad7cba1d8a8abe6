//! Output formatting: human-readable lines or JSON.

use owo_colors::{OwoColorize, Stream};
use serde_json::Value;
use waker_common::ControlResponse;

/// Prints control responses and wake progress in the selected format.
pub struct Printer {
    json: bool,
}

impl Printer {
    #[must_use]
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print a final response: to stdout on success, stderr on failure.
    pub fn response(&self, response: &ControlResponse) {
        let line = if self.json {
            to_json(response)
        } else {
            render_human(response)
        };
        if response.is_success() || self.json {
            println!("{line}");
        } else {
            eprintln!("{line}");
        }
    }

    /// Print an in-progress note. Suppressed in JSON mode.
    pub fn progress(&self, message: &str) {
        if !self.json {
            println!(
                "  {} {message}",
                "…".if_supports_color(Stream::Stdout, |t| t.cyan())
            );
        }
    }

    /// Print a warning to stderr. Suppressed in JSON mode.
    pub fn warn(&self, message: &str) {
        if !self.json {
            eprintln!(
                "  {} {message}",
                "⚠".if_supports_color(Stream::Stderr, |t| t.yellow())
            );
        }
    }
}

/// One-line JSON including the HTTP status as `statusCode`.
#[must_use]
pub fn to_json(response: &ControlResponse) -> String {
    let mut value = serde_json::to_value(response).unwrap_or(Value::Null);
    if let Value::Object(fields) = &mut value {
        fields.insert("statusCode".into(), response.status_code.into());
    }
    value.to_string()
}

/// Plain summary of a response, without colour codes when unsupported.
#[must_use]
pub fn render_human(response: &ControlResponse) -> String {
    if !response.is_success() {
        let error = response.error.as_deref().unwrap_or("request failed");
        return format!(
            "  {} HTTP {}: {error}",
            "✗".if_supports_color(Stream::Stderr, |t| t.red()),
            response.status_code
        );
    }

    let state = response
        .status
        .as_ref()
        .map_or_else(|| "unknown".to_string(), ToString::to_string);
    let mut line = format!(
        "  {} {}",
        "✓".if_supports_color(Stream::Stdout, |t| t.green()),
        state.if_supports_color(Stream::Stdout, |t| t.bold())
    );
    if let Some(address) = response.public_ip() {
        line.push_str(&format!(" at {address}"));
    }
    if let Some(message) = &response.message {
        line.push_str(&format!(" ({message})"));
    }
    if let Some(seconds) = response.estimated_seconds {
        line.push_str(&format!(", ready in ~{seconds}s"));
    }
    line
}
