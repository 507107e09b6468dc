#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Free-text question answering over a loaded [`Dataset`].
//!
//! Questions are matched against a fixed, ordered rule table (help, summary,
//! totals, rankings, comparisons, entity lookups and so on). The first rule
//! that accepts the lower-cased, trimmed question produces the answer; no
//! rules are combined. When no records are loaded every question gets the
//! same "no data" reply.

mod context;
mod format;
mod rules;

pub use context::QueryContext;
pub use format::{format_count, percent};
pub use rules::{DEFAULT_RANK_COUNT, RULES, Rule, rank_count};

use aadhaar_insights_record_models::Dataset;
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

/// Reply when nothing has been loaded.
pub const NO_DATA_MESSAGE: &str = "No data uploaded yet. Please upload CSV files to get started.";

/// Greeting shown when an interactive session starts.
pub const GREETING: &str = "Hi! I can help you understand your Aadhaar data. Try asking about enrollments, demographics, states, or trends.";

/// Which rule produced an answer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RuleKind {
    NoData,
    Help,
    Summary,
    Totals,
    AgeBreakdown,
    TopStates,
    BottomStates,
    Compare,
    Average,
    Trend,
    ListStates,
    ListDistricts,
    DateMatch,
    DistrictMatch,
    StateMatch,
    Distribution,
    RecordCounts,
    Fallback,
}

/// An answer together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub rule: RuleKind,
    pub text: String,
}

/// Resolves a question against the dataset.
#[must_use]
pub fn resolve(dataset: &Dataset, question: &str) -> Resolution {
    if dataset.is_empty() {
        return Resolution {
            rule: RuleKind::NoData,
            text: NO_DATA_MESSAGE.to_string(),
        };
    }

    let q = question.trim().to_lowercase();
    let ctx = QueryContext::new(dataset);

    let resolution = RULES
        .iter()
        .find(|rule| rule.matches(&ctx, &q))
        .map_or_else(
            || Resolution {
                rule: RuleKind::Fallback,
                text: rules::fallback(&ctx),
            },
            |rule| Resolution {
                rule: rule.kind,
                text: rule.respond(&ctx, &q),
            },
        );

    log::debug!("resolve: {q:?} answered by {}", resolution.rule);
    resolution
}

/// Answer text for a question.
#[must_use]
pub fn answer(dataset: &Dataset, question: &str) -> String {
    resolve(dataset, question).text
}
