//! # Candidate Scout
//!
//! A terminal client for a remote candidate-sourcing service.
//!
//! The operator fills in either a structured filter query or a free-text
//! description, submits it to the Sourcing Service over HTTP, and gets back
//! ranked candidate cards, each tinted with a theme derived from the
//! candidate's identity.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ QueryForm  │──▶│ Orchestrator │──▶│ Sourcing Service │
//! │ (+coerce)  │   │ SearchState  │◀──│  POST /search    │
//! └────────────┘   └──────┬───────┘   │  POST /search-plain
//!                         │           └──────────────────┘
//!                         ▼
//!                  ┌─────────────┐   ┌───────────┐
//!                  │ rank (sort) │──▶│ render +  │
//!                  └─────────────┘   │ theme     │
//!                                    └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! scout search "type:user rust location:Berlin" --min-exp 3 --limit 10
//! scout ask "senior Rust engineers in Berlin" --sort experience
//! scout shell
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`coerce`] | Numeric field coercion |
//! | [`query`] | Query modes, form state, request payloads |
//! | [`client`] | Sourcing Service transport |
//! | [`orchestrator`] | Request lifecycle and response normalization |
//! | [`rank`] | Client-side result ordering |
//! | [`theme`] | Deterministic per-candidate themes |
//! | [`render`] | Card and summary rendering |
//! | [`shell`] | Interactive session |
//! | [`config`] | TOML configuration |
//! | [`models`] | Wire data types |

pub mod client;
pub mod coerce;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod query;
pub mod rank;
pub mod render;
pub mod shell;
pub mod style;
pub mod theme;
