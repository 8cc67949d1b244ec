//! Text rendering of search results as themed cards.
//!
//! Rendering is pure: every function returns a `String`, and the caller
//! decides where it goes. Colors are applied only when the [`Renderer`] was
//! built with color enabled.

use clap::ValueEnum;
use crossterm::style::{Color, Stylize};
use serde_json::{json, Value};

use crate::coerce::format_number;
use crate::models::Candidate;
use crate::orchestrator::SearchState;
use crate::rank::SortKey;
use crate::style;
use crate::theme::theme_for_candidate;

/// Whether to emit ANSI colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => atty::is(atty::Stream::Stdout),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

const WRAP_WIDTH: usize = 72;

/// `"N yr"` / `"N yrs"`, or `"-"` when absent.
pub fn fmt_years(years: Option<f64>) -> String {
    match years {
        Some(n) if n.is_finite() => {
            let unit = if n == 1.0 { "yr" } else { "yrs" };
            format!("{} {}", format_number(n), unit)
        }
        _ => "-".to_string(),
    }
}

fn fmt_count(n: Option<u64>) -> String {
    n.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())
}

fn fmt_number(n: Option<f64>) -> String {
    n.map(format_number).unwrap_or_else(|| "-".to_string())
}

/// Greedy word wrap.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    max_languages: usize,
    bio_lines: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            color: false,
            max_languages: 6,
            bio_lines: 3,
        }
    }
}

impl Renderer {
    pub fn new(color: bool, max_languages: usize, bio_lines: usize) -> Self {
        Self {
            color,
            max_languages,
            bio_lines,
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_bold(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// One candidate card.
    pub fn card(&self, candidate: &Candidate) -> String {
        let theme = theme_for_candidate(candidate);
        let accent = theme.accent().color();
        let muted = style::rgb(style::MUTED_FG);
        let edge = self.paint(style::CARD_EDGE, accent);

        let mut out = String::new();
        let rule: String = std::iter::repeat(style::CARD_RULE).take(40).collect();
        out.push_str(&self.paint(&format!("{}{} {}", style::CARD_CORNER, rule, theme), accent));
        out.push('\n');

        let mut line = |text: String| {
            out.push_str(&edge);
            out.push(' ');
            out.push_str(&text);
            out.push('\n');
        };

        line(self.paint_bold(candidate.display_name(), accent));

        let mut handle = format!("@{}", candidate.login.as_deref().unwrap_or(""));
        if let Some(location) = candidate.location.as_deref().filter(|l| !l.is_empty()) {
            handle.push_str(" · ");
            handle.push_str(location);
        }
        line(self.paint(&handle, muted));

        let pills = [
            ("Followers", fmt_count(candidate.followers)),
            ("Repos", fmt_count(candidate.public_repos)),
            ("Experience", fmt_years(candidate.years_experience)),
            ("Top %", fmt_number(candidate.top_percentage)),
        ];
        let pills: Vec<String> = pills
            .iter()
            .map(|(label, value)| format!("{} {}", self.paint(label, muted), value))
            .collect();
        line(pills.join("   "));

        if let Some(bio) = candidate.bio.as_deref() {
            let wrapped = wrap(bio, WRAP_WIDTH);
            let clamped = wrapped.len() > self.bio_lines;
            for (i, text) in wrapped.iter().take(self.bio_lines).enumerate() {
                if clamped && i + 1 == self.bio_lines {
                    line(format!("{}…", text));
                } else {
                    line(text.clone());
                }
            }
        }

        if let Some(languages) = candidate.languages_used.as_ref().filter(|l| !l.is_empty()) {
            let tags: Vec<String> = languages
                .iter()
                .take(self.max_languages)
                .map(|lang| format!("[{}]", lang))
                .collect();
            line(tags.join(" "));
        }

        if let Some(url) = candidate.profile_url.as_deref() {
            line(format!("{} {}", self.paint("GitHub", muted), url));
        }
        if let Some(url) = candidate.linkedin.as_deref().filter(|u| !u.is_empty()) {
            line(format!("{} {}", self.paint("LinkedIn", muted), url));
        }
        if let Some(handle) = candidate.twitter.as_deref().filter(|h| !h.is_empty()) {
            line(format!(
                "{} https://twitter.com/{}",
                self.paint("Twitter", muted),
                handle
            ));
        }

        out.push_str(&self.paint(&format!("{}{}", style::CARD_FOOT, rule), accent));
        out.push('\n');
        out
    }

    /// `"Showing N of M"`, or the empty-state hint.
    pub fn summary(&self, state: &SearchState) -> String {
        let text = if state.results().is_empty() {
            "No results yet. Try a search.".to_string()
        } else {
            format!("Showing {} of {}", state.results().len(), state.count())
        };
        self.paint(&text, style::rgb(style::MUTED_FG))
    }

    pub fn banner(&self, message: &str) -> String {
        self.paint_bold(&format!("! {}", message), style::rgb(style::ERROR_FG))
    }

    pub fn loading(&self) -> String {
        self.paint("Searching…", style::rgb(style::MUTED_FG))
    }

    /// Banner (if any), summary, then the ranked cards.
    ///
    /// An error banner is shown alongside whatever results are still held.
    pub fn session(&self, state: &SearchState, sort: SortKey) -> String {
        let mut out = String::new();
        if let Some(message) = state.error() {
            out.push_str(&self.banner(message));
            out.push('\n');
        }
        if state.is_loading() {
            out.push_str(&self.loading());
            out.push('\n');
            return out;
        }
        out.push_str(&self.summary(state));
        out.push('\n');
        for candidate in state.ranked(sort) {
            out.push('\n');
            out.push_str(&self.card(candidate));
        }
        out
    }
}

/// Machine-readable view of the session, results in display order.
pub fn session_json(state: &SearchState, sort: SortKey) -> Value {
    let results: Vec<Value> = state
        .ranked(sort)
        .into_iter()
        .map(|c| {
            let mut value = serde_json::to_value(c).unwrap_or(Value::Null);
            if let Value::Object(map) = &mut value {
                map.insert(
                    "theme".to_string(),
                    json!(theme_for_candidate(c).name()),
                );
            }
            value
        })
        .collect();

    json!({
        "count": state.count(),
        "shown": results.len(),
        "sort": sort.to_string(),
        "error": state.error(),
        "results": results,
    })
}
