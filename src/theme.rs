//! Deterministic per-candidate accent themes.
//!
//! A candidate's identity string is hashed by summing its UTF-16 code units;
//! the sum modulo the number of tokens picks the theme. The hash depends on
//! nothing but the identity itself, so a card keeps its color across
//! re-sorts, re-renders and process runs.

use serde::Serialize;
use std::fmt;

use crate::models::Candidate;
use crate::style::{Accent, ACCENTS};

/// Named visual accent assigned to a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeToken {
    Indigo,
    Emerald,
    Amber,
    Rose,
    Sky,
    Violet,
    Teal,
    Orange,
}

impl ThemeToken {
    /// Every token, in assignment order.
    pub const ALL: [ThemeToken; 8] = [
        ThemeToken::Indigo,
        ThemeToken::Emerald,
        ThemeToken::Amber,
        ThemeToken::Rose,
        ThemeToken::Sky,
        ThemeToken::Violet,
        ThemeToken::Teal,
        ThemeToken::Orange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ThemeToken::Indigo => "indigo",
            ThemeToken::Emerald => "emerald",
            ThemeToken::Amber => "amber",
            ThemeToken::Rose => "rose",
            ThemeToken::Sky => "sky",
            ThemeToken::Violet => "violet",
            ThemeToken::Teal => "teal",
            ThemeToken::Orange => "orange",
        }
    }

    /// Position in [`ThemeToken::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Palette entry for this token.
    pub fn accent(self) -> &'static Accent {
        &ACCENTS[self.index()]
    }
}

impl fmt::Display for ThemeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Theme for an identity string. `""` always maps to the first token.
pub fn theme_for(identity: &str) -> ThemeToken {
    let sum: u64 = identity.encode_utf16().map(u64::from).sum();
    ThemeToken::ALL[(sum % ThemeToken::ALL.len() as u64) as usize]
}

/// Theme for a candidate, keyed on [`Candidate::identity`].
pub fn theme_for_candidate(candidate: &Candidate) -> ThemeToken {
    theme_for(candidate.identity())
}
