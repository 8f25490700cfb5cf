//! Terminal rendering of replies, errors and restored history.

use std::fmt::Write as _;

use sidechat_ai::{Citation, Presenter, Role, Turn, Usage};

/// Prints replies to stdout and errors to stderr.
pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn on_response(&self, text: &str, citations: &[Citation]) {
        println!("{}", render_reply(text, citations));
    }

    fn on_error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    fn on_history_restored(&self, turns: &[Turn]) {
        let rendered = render_history(turns);
        if !rendered.is_empty() {
            println!("{rendered}");
        }
    }
}

pub fn render_reply(text: &str, citations: &[Citation]) -> String {
    let mut out = text.to_string();
    if !citations.is_empty() {
        out.push_str("\n\nSources:");
        for (i, citation) in citations.iter().enumerate() {
            let _ = write!(out, "\n  {}. {} <{}>", i + 1, citation.title, citation.uri);
        }
    }
    out
}

/// User and model text only; function turns are internal.
pub fn render_history(turns: &[Turn]) -> String {
    let mut lines = Vec::new();
    for turn in turns {
        let speaker = match turn.role {
            Role::User => "you",
            Role::Model => "sidechat",
            Role::Function => continue,
        };
        let mut pieces = Vec::new();
        for part in &turn.parts {
            if let Some(inline) = part.as_inline_data() {
                pieces.push(format!("[image: {}]", inline.mime_type));
            } else if let Some(text) = part.as_text() {
                if !text.is_empty() {
                    pieces.push(text.to_string());
                }
            }
        }
        if !pieces.is_empty() {
            lines.push(format!("{speaker}: {}", pieces.join(" ")));
        }
    }
    lines.join("\n")
}

pub fn render_usage(usage: &Usage) -> String {
    format!(
        "model calls: {}, tool calls: {}, tokens: {} in / {} out ({} total)",
        usage.model_calls,
        usage.tool_calls,
        usage.input_tokens,
        usage.output_tokens,
        usage.total_tokens()
    )
}
