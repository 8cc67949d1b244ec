//! Client-side display ordering of a result set.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::models::Candidate;

/// Field a result list is ordered by, descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// `followers`
    #[default]
    Followers,
    /// `public_repos`
    Repos,
    /// `years_experience`
    Experience,
}

impl SortKey {
    /// Comparison value for `candidate`; absent fields count as 0.
    pub fn value_of(self, candidate: &Candidate) -> f64 {
        match self {
            SortKey::Followers => candidate.followers.map(|n| n as f64),
            SortKey::Repos => candidate.public_repos.map(|n| n as f64),
            SortKey::Experience => candidate.years_experience,
        }
        .unwrap_or(0.0)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Followers => f.write_str("followers"),
            SortKey::Repos => f.write_str("repos"),
            SortKey::Experience => f.write_str("experience"),
        }
    }
}

/// Order `results` by `key`, highest first, without touching the input.
pub fn rank(results: &[Candidate], key: SortKey) -> Vec<&Candidate> {
    let mut view: Vec<&Candidate> = results.iter().collect();
    view.sort_by(|a, b| {
        key.value_of(b)
            .partial_cmp(&key.value_of(a))
            .unwrap_or(Ordering::Equal)
    });
    view
}
