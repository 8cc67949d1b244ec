//! Core data models exchanged with the Sourcing Service.
//!
//! [`Candidate`] decoding is lenient field by field: a value of the wrong
//! JSON type decodes as absent instead of failing the whole response, so one
//! odd record never blanks out a result list.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// One prospective contact returned by the Sourcing Service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, deserialize_with = "lenient_string")]
    pub login: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub followers: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub public_repos: Option<u64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub years_experience: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub top_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub languages_used: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub profile_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub linkedin: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub twitter: Option<String>,
}

impl Candidate {
    /// Identity used for theming: `login`, else `name`, else `""`.
    pub fn identity(&self) -> &str {
        self.login
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("")
    }

    /// Card title: `name` when present and non-empty, otherwise `login`.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.login.as_deref().unwrap_or(""),
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.and_then(|v| v.as_str().map(str::to_owned)))
}

/// A non-negative whole number, whether the JSON spells it `10` or `10.0`.
pub(crate) fn whole_number(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && n.fract() == 0.0 && *n >= 0.0 && *n <= u64::MAX as f64)
            .map(|n| n as u64)
    })
}

fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(whole_number))
}

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.and_then(|v| v.as_f64()).filter(|n| n.is_finite()))
}

fn lenient_strings<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

/// A normalized Sourcing Service response.
///
/// `count` is the total the service reports and may exceed `results.len()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResponse {
    pub count: u64,
    pub results: Vec<Candidate>,
}

/// Request body for `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredQuery {
    pub query: String,
    pub min_experience: Option<Number>,
    pub max_experience: Option<Number>,
    pub limit: Option<Number>,
}

/// Request body for `POST /search-plain`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlainQuery {
    pub text: String,
}

/// The two request shapes a submit can carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestPayload {
    Structured(StructuredQuery),
    Plain(PlainQuery),
}

impl RequestPayload {
    /// Service path for this payload.
    pub fn endpoint(&self) -> &'static str {
        match self {
            RequestPayload::Structured(_) => "/search",
            RequestPayload::Plain(_) => "/search-plain",
        }
    }
}
