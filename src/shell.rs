//! Interactive search session.
//!
//! Reads one command per line, keeps the form state for both query modes
//! across submits, and re-renders the ranked results after each change.
//! Submits are awaited before the next line is read, so at most one request
//! is ever in flight from the shell.

use anyhow::Result;
use clap::ValueEnum;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::client::SourcingService;
use crate::orchestrator::Orchestrator;
use crate::query::{QueryForm, QueryMode};
use crate::rank::SortKey;
use crate::render::Renderer;

pub const HELP: &str = "\
commands:
  mode structured|plain   switch query mode (fields are kept)
  query <filter>          structured filter query
  min <n> | max <n>       experience bounds in years (empty clears)
  limit <n>               result limit (empty clears)
  text <description>      plain-text query
  sort followers|repos|experience
  show                    print the form
  search                  submit (an empty line does the same)
  results                 render the last results again
  help                    this text
  quit                    leave";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mode(QueryMode),
    Query(String),
    Min(String),
    Max(String),
    Limit(String),
    Text(String),
    Sort(SortKey),
    Show,
    Search,
    Results,
    Help,
    Quit,
}

/// Parse a line. The error is a message for the operator.
pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "" | "search" | "go" => Ok(Command::Search),
        "mode" => QueryMode::from_str(rest, true)
            .map(Command::Mode)
            .map_err(|_| format!("unknown mode '{}': use structured or plain", rest)),
        "sort" => SortKey::from_str(rest, true)
            .map(Command::Sort)
            .map_err(|_| format!("unknown sort '{}': use followers, repos or experience", rest)),
        "query" | "q" => Ok(Command::Query(rest.to_string())),
        "min" => Ok(Command::Min(rest.to_string())),
        "max" => Ok(Command::Max(rest.to_string())),
        "limit" => Ok(Command::Limit(rest.to_string())),
        "text" | "t" => Ok(Command::Text(rest.to_string())),
        "show" => Ok(Command::Show),
        "results" | "r" => Ok(Command::Results),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q!" => Ok(Command::Quit),
        other => Err(format!("unknown command '{}' (try 'help')", other)),
    }
}

fn field_text(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

pub struct Shell<S> {
    form: QueryForm,
    orchestrator: Orchestrator<S>,
    sort: SortKey,
    renderer: Renderer,
    prompt: bool,
}

impl<S: SourcingService> Shell<S> {
    pub fn new(form: QueryForm, service: S, sort: SortKey, renderer: Renderer) -> Self {
        Self {
            form,
            orchestrator: Orchestrator::new(service),
            sort,
            renderer,
            prompt: false,
        }
    }

    /// Print a prompt before each line (for terminals).
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn form(&self) -> &QueryForm {
        &self.form
    }

    pub fn orchestrator(&self) -> &Orchestrator<S> {
        &self.orchestrator
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    fn describe_form(&self) -> String {
        let s = self.form.structured();
        let mark = |mode: QueryMode| if self.form.mode() == mode { "*" } else { " " };
        format!(
            "{} structured  query: {}\n               min: {}  max: {}  limit: {}\n{} plain       text: {}\n  sort: {}",
            mark(QueryMode::Structured),
            s.query,
            field_text(s.min_experience.as_str()),
            field_text(s.max_experience.as_str()),
            field_text(s.limit.as_str()),
            mark(QueryMode::Plain),
            self.form.plain().text,
            self.sort,
        )
    }

    fn numeric_edit(name: &str, accepted: bool, raw: &str, current: &str) -> String {
        if accepted {
            format!("{}: {}", name, field_text(current))
        } else {
            format!(
                "{}: '{}' is not a number, keeping {}",
                name,
                raw,
                field_text(current)
            )
        }
    }

    /// Apply one command and return the text to print. `None` means quit.
    pub async fn handle(&mut self, command: Command) -> Option<String> {
        let out = match command {
            Command::Mode(mode) => {
                self.form.set_mode(mode);
                format!("mode: {}", mode)
            }
            Command::Query(query) => {
                self.form.set_query(query);
                format!("query: {}", self.form.structured().query)
            }
            Command::Text(text) => {
                self.form.set_text(text);
                format!("text: {}", self.form.plain().text)
            }
            Command::Min(raw) => {
                let accepted = self.form.set_min_experience(&raw);
                Self::numeric_edit(
                    "min",
                    accepted,
                    &raw,
                    self.form.structured().min_experience.as_str(),
                )
            }
            Command::Max(raw) => {
                let accepted = self.form.set_max_experience(&raw);
                Self::numeric_edit(
                    "max",
                    accepted,
                    &raw,
                    self.form.structured().max_experience.as_str(),
                )
            }
            Command::Limit(raw) => {
                let accepted = self.form.set_limit(&raw);
                Self::numeric_edit("limit", accepted, &raw, self.form.structured().limit.as_str())
            }
            Command::Sort(key) => {
                self.sort = key;
                self.renderer.session(self.orchestrator.state(), self.sort)
            }
            Command::Show => self.describe_form(),
            Command::Search => {
                let payload = self.form.payload();
                if !self.orchestrator.submit(&payload).await {
                    self.renderer.loading()
                } else {
                    self.renderer.session(self.orchestrator.state(), self.sort)
                }
            }
            Command::Results => self.renderer.session(self.orchestrator.state(), self.sort),
            Command::Help => HELP.to_string(),
            Command::Quit => return None,
        };
        Some(out)
    }

    /// Drive the session until `quit` or end of input.
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        loop {
            if self.prompt {
                let label = format!("scout [{}]> ", self.form.mode());
                writer.write_all(label.as_bytes()).await?;
                writer.flush().await?;
            }

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let text = match parse_command(&line) {
                Ok(Command::Search) => {
                    if self.prompt {
                        let note = format!(
                            "{} (POST {})\n",
                            self.renderer.loading(),
                            self.form.payload().endpoint()
                        );
                        writer.write_all(note.as_bytes()).await?;
                        writer.flush().await?;
                    }
                    self.handle(Command::Search).await
                }
                Ok(command) => self.handle(command).await,
                Err(message) => Some(message),
            };

            match text {
                Some(text) => {
                    writer.write_all(text.as_bytes()).await?;
                    if !text.ends_with('\n') {
                        writer.write_all(b"\n").await?;
                    }
                    writer.flush().await?;
                }
                None => break,
            }
        }
        Ok(())
    }
}
