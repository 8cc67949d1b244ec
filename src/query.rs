//! Query mode and form state.
//!
//! The operator works with two independent field sets, one per
//! [`QueryMode`]. Switching modes never clears the inactive set, so toggling
//! back restores whatever was typed there.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coerce::NumericInput;
use crate::models::{PlainQuery, RequestPayload, StructuredQuery};

/// Which request variant a submit builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Filter-syntax query plus experience bounds and a limit (`POST /search`).
    #[default]
    Structured,
    /// Free-form description (`POST /search-plain`).
    Plain,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Structured => f.write_str("structured"),
            QueryMode::Plain => f.write_str("plain"),
        }
    }
}

/// Fields of the structured form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredFields {
    pub query: String,
    pub min_experience: NumericInput,
    pub max_experience: NumericInput,
    pub limit: NumericInput,
}

/// Fields of the plain-text form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainFields {
    pub text: String,
}

/// Build the outgoing request for `mode` from the matching field set.
///
/// Numeric structured fields go through [`NumericInput::to_number`], so an
/// empty or invalid field is sent as `null`. Plain text is passed through
/// unchanged; an empty string is a valid request.
pub fn build_request_payload(
    mode: QueryMode,
    structured: &StructuredFields,
    plain: &PlainFields,
) -> RequestPayload {
    match mode {
        QueryMode::Structured => RequestPayload::Structured(StructuredQuery {
            query: structured.query.clone(),
            min_experience: structured.min_experience.to_number(),
            max_experience: structured.max_experience.to_number(),
            limit: structured.limit.to_number(),
        }),
        QueryMode::Plain => RequestPayload::Plain(PlainQuery {
            text: plain.text.clone(),
        }),
    }
}

/// Session form state: the active mode and both field sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryForm {
    mode: QueryMode,
    structured: StructuredFields,
    plain: PlainFields,
}

impl QueryForm {
    pub fn new(structured: StructuredFields, plain: PlainFields) -> Self {
        Self {
            mode: QueryMode::Structured,
            structured,
            plain,
        }
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn structured(&self) -> &StructuredFields {
        &self.structured
    }

    pub fn plain(&self) -> &PlainFields {
        &self.plain
    }

    pub fn set_mode(&mut self, mode: QueryMode) {
        self.mode = mode;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.structured.query = query.into();
    }

    /// Returns `false` if the edit was rejected (see [`NumericInput::edit`]).
    pub fn set_min_experience(&mut self, raw: &str) -> bool {
        self.structured.min_experience.edit(raw)
    }

    pub fn set_max_experience(&mut self, raw: &str) -> bool {
        self.structured.max_experience.edit(raw)
    }

    pub fn set_limit(&mut self, raw: &str) -> bool {
        self.structured.limit.edit(raw)
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.plain.text = text.into();
    }

    /// Request payload for the active mode.
    pub fn payload(&self) -> RequestPayload {
        build_request_payload(self.mode, &self.structured, &self.plain)
    }
}
