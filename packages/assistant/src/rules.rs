//! The ordered rule table. The first rule whose predicate accepts the
//! question produces the answer.

use std::fmt::Write as _;
use std::sync::LazyLock;

use aadhaar_insights_analytics_models::{StateAggregate, VerticalTotals};
use aadhaar_insights_record_models::Vertical;
use regex::Regex;

use crate::RuleKind;
use crate::context::QueryContext;
use crate::format::{format_count, percent, rounded_average};

/// Ranking size when the question carries no number.
pub const DEFAULT_RANK_COUNT: usize = 5;

const STATE_PREVIEW: usize = 8;
const DISTRICT_PREVIEW: usize = 15;
const STATE_DISTRICT_PREVIEW: usize = 4;

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

type Predicate = fn(&QueryContext<'_>, &str) -> bool;
type Responder = fn(&QueryContext<'_>, &str) -> String;

/// A single question pattern and the answer it produces.
pub struct Rule {
    pub kind: RuleKind,
    matches: Predicate,
    respond: Responder,
}

impl Rule {
    /// Whether this rule accepts the (lower-cased, trimmed) question.
    #[must_use]
    pub fn matches(&self, ctx: &QueryContext<'_>, question: &str) -> bool {
        (self.matches)(ctx, question)
    }

    /// Builds the answer text.
    #[must_use]
    pub fn respond(&self, ctx: &QueryContext<'_>, question: &str) -> String {
        (self.respond)(ctx, question)
    }
}

fn any(question: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| question.contains(n))
}

/// Rules in priority order, highest first.
pub static RULES: &[Rule] = &[
    Rule {
        kind: RuleKind::Help,
        matches: |_, q| q.contains("help") || q == "?",
        respond: |_, _| help(),
    },
    Rule {
        kind: RuleKind::Summary,
        matches: |_, q| any(q, &["summary", "overview", "all data"]) || q == "show all",
        respond: |ctx, _| summary(ctx),
    },
    Rule {
        kind: RuleKind::Totals,
        matches: |_, q| any(q, &["total", "how many", "count"]),
        respond: totals,
    },
    Rule {
        kind: RuleKind::AgeBreakdown,
        matches: |_, q| any(q, &["age", "breakdown", "children", "adult"]),
        respond: |ctx, _| age_breakdown(ctx),
    },
    Rule {
        kind: RuleKind::TopStates,
        matches: |_, q| any(q, &["top", "best", "highest"]) && !any(q, &["bottom", "lowest"]),
        respond: |ctx, q| ranking("Top", &ctx.ranked(), rank_count(q)),
    },
    Rule {
        kind: RuleKind::BottomStates,
        matches: |_, q| any(q, &["bottom", "lowest", "least", "worst"]),
        respond: |ctx, q| ranking("Bottom", &ctx.ascending(), rank_count(q)),
    },
    Rule {
        kind: RuleKind::Compare,
        matches: |_, q| q.contains("compare"),
        respond: compare,
    },
    Rule {
        kind: RuleKind::Average,
        matches: |_, q| any(q, &["average", "avg", "mean"]),
        respond: |ctx, _| averages(ctx),
    },
    Rule {
        kind: RuleKind::Trend,
        matches: |_, q| any(q, &["trend", "growth", "time", "date range"]),
        respond: |ctx, _| trend(ctx),
    },
    Rule {
        kind: RuleKind::ListStates,
        matches: |_, q| q.contains("list") && q.contains("state"),
        respond: |ctx, _| {
            format!(
                "All {} States:\n\n{}",
                ctx.all_states.len(),
                ctx.all_states.join(", ")
            )
        },
    },
    Rule {
        kind: RuleKind::ListDistricts,
        matches: |_, q| q.contains("list") && q.contains("district"),
        respond: |ctx, _| list_districts(ctx),
    },
    Rule {
        kind: RuleKind::DateMatch,
        matches: |ctx, q| ctx.date_in(q).is_some(),
        respond: date_match,
    },
    Rule {
        kind: RuleKind::DistrictMatch,
        matches: |ctx, q| ctx.district_in(q).is_some(),
        respond: district_match,
    },
    Rule {
        kind: RuleKind::StateMatch,
        matches: |ctx, q| !ctx.states_in(q).is_empty(),
        respond: state_match,
    },
    Rule {
        kind: RuleKind::Distribution,
        matches: |_, q| any(q, &["percentage", "percent", "share", "distribution"]),
        respond: |ctx, _| distribution(ctx),
    },
    Rule {
        kind: RuleKind::RecordCounts,
        matches: |_, q| any(q, &["record", "row", "data point"]),
        respond: |ctx, _| record_counts(ctx),
    },
];

/// First integer in the question, [`DEFAULT_RANK_COUNT`] when there is none.
///
/// Numbers too large for `usize` saturate, which lists every state.
#[must_use]
pub fn rank_count(question: &str) -> usize {
    NUMBER_RE
        .find(question)
        .map_or(DEFAULT_RANK_COUNT, |m| m.as_str().parse().unwrap_or(usize::MAX))
}

/// Bullet lines for the three verticals plus their combined total.
fn vertical_lines(totals: &VerticalTotals) -> String {
    format!(
        "• Enrollments: {}\n• Demographics: {}\n• Biometrics: {}\n• Total: {}",
        format_count(totals.enrollment),
        format_count(totals.demographic),
        format_count(totals.biometric),
        format_count(totals.total()),
    )
}

fn help() -> String {
    "I can help with:\n\n\
     • Totals - \"total enrollments\"\n\
     • Rankings - \"top 5 states\"\n\
     • State info - \"tell me about Maharashtra\"\n\
     • Age data - \"age breakdown\"\n\
     • Summary - \"show summary\"\n\
     • Compare - \"compare Gujarat and Rajasthan\""
        .to_string()
}

fn summary(ctx: &QueryContext<'_>) -> String {
    let ages = ctx.ages();
    let date_line = match (ctx.all_dates.first(), ctx.all_dates.last()) {
        (Some(first), Some(last)) => format!("• {first} to {last}"),
        _ => String::new(),
    };
    format!(
        "Data Summary\n\n\
         Coverage:\n\
         • {} States\n\
         • {} Districts\n\
         • {} Pincodes\n\
         {date_line}\n\n\
         Totals:\n\
         • Enrollments: {}\n\
         • Demographics: {}\n\
         • Biometrics: {}\n\
         • Grand Total: {}\n\n\
         Age Groups (Enrollment):\n\
         • 0-5 yrs: {}\n\
         • 5-17 yrs: {}\n\
         • 18+ yrs: {}",
        ctx.all_states.len(),
        ctx.all_districts.len(),
        ctx.all_pincodes.len(),
        format_count(ctx.totals.enrollment),
        format_count(ctx.totals.demographic),
        format_count(ctx.totals.biometric),
        format_count(ctx.totals.total()),
        format_count(ages.enrollment_0_5),
        format_count(ages.enrollment_5_17),
        format_count(ages.enrollment_18_plus),
    )
}

fn totals(ctx: &QueryContext<'_>, q: &str) -> String {
    let coverage = format!(
        "Across {} states and {} districts",
        ctx.all_states.len(),
        ctx.all_districts.len()
    );

    for (needle, vertical) in [
        ("enrollment", Vertical::Enrollment),
        ("demographic", Vertical::Demographic),
        ("biometric", Vertical::Biometric),
    ] {
        if q.contains(needle) {
            return format!(
                "Total {}: {}\n{coverage}",
                vertical.plural(),
                format_count(ctx.totals.get(vertical))
            );
        }
    }

    if q.contains("state") {
        let mut text = format!(
            "{} States in data:\n{}",
            ctx.all_states.len(),
            ctx.all_states
                .iter()
                .take(STATE_PREVIEW)
                .copied()
                .collect::<Vec<_>>()
                .join(", ")
        );
        if ctx.all_states.len() > STATE_PREVIEW {
            let _ = write!(text, " +{} more", ctx.all_states.len() - STATE_PREVIEW);
        }
        return text;
    }

    if q.contains("district") {
        return format!(
            "{} Districts across {} states",
            ctx.all_districts.len(),
            ctx.all_states.len()
        );
    }

    format!(
        "Total Records:\n\
         • Enrollments: {}\n\
         • Demographics: {}\n\
         • Biometrics: {}\n\
         • Grand Total: {}",
        format_count(ctx.totals.enrollment),
        format_count(ctx.totals.demographic),
        format_count(ctx.totals.biometric),
        format_count(ctx.totals.total()),
    )
}

fn age_breakdown(ctx: &QueryContext<'_>) -> String {
    let ages = ctx.ages();
    let whole = ctx.totals.enrollment;
    let share = |value: u64| format!("{} ({}%)", format_count(value), percent(value, whole));
    format!(
        "Age Breakdown\n\n\
         Enrollments:\n\
         • Children (0-5): {}\n\
         • Youth (5-17): {}\n\
         • Adults (18+): {}\n\n\
         Demographics:\n\
         • Youth (5-17): {}\n\
         • Adults (17+): {}\n\n\
         Biometrics:\n\
         • Youth (5-17): {}\n\
         • Adults (17+): {}",
        share(ages.enrollment_0_5),
        share(ages.enrollment_5_17),
        share(ages.enrollment_18_plus),
        format_count(ages.demographic_5_17),
        format_count(ages.demographic_17_plus),
        format_count(ages.biometric_5_17),
        format_count(ages.biometric_17_plus),
    )
}

fn ranking(title: &str, states: &[&StateAggregate], count: usize) -> String {
    let shown = &states[..count.min(states.len())];
    let list = shown
        .iter()
        .enumerate()
        .map(|(idx, s)| format!("{}. {}: {}", idx + 1, s.state, format_count(s.total())))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{title} {} States:\n\n{list}", shown.len())
}

fn compare(ctx: &QueryContext<'_>, q: &str) -> String {
    let found = ctx.states_in(q);
    if found.len() < 2 {
        return "Mention two state names to compare.\nExample: Compare Maharashtra and Gujarat"
            .to_string();
    }
    let blocks = found
        .iter()
        .take(2)
        .map(|state| format!("{state}:\n{}", vertical_lines(&ctx.state_totals(state))))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Comparison:\n\n{blocks}")
}

fn averages(ctx: &QueryContext<'_>) -> String {
    let count = ctx.states.len();
    let enrollment = rounded_average(ctx.totals.enrollment, count);
    let demographic = rounded_average(ctx.totals.demographic, count);
    let biometric = rounded_average(ctx.totals.biometric, count);
    format!(
        "Averages per State:\n\n\
         • Enrollments: {}\n\
         • Demographics: {}\n\
         • Biometrics: {}\n\
         • Total: {}",
        format_count(enrollment),
        format_count(demographic),
        format_count(biometric),
        format_count(
            enrollment
                .saturating_add(demographic)
                .saturating_add(biometric)
        ),
    )
}

fn trend(ctx: &QueryContext<'_>) -> String {
    let (Some(first), Some(last)) = (ctx.all_dates.first(), ctx.all_dates.last()) else {
        return not_enough_dates();
    };
    if ctx.all_dates.len() < 2 {
        return not_enough_dates();
    }
    format!(
        "Trend Analysis\n\n\
         Date Range: {first} to {last}\n\
         Total Days: {}\n\n\
         First ({first}): {}\n\
         Latest ({last}): {}",
        ctx.all_dates.len(),
        format_count(ctx.date_totals(first).total()),
        format_count(ctx.date_totals(last).total()),
    )
}

fn not_enough_dates() -> String {
    "Not enough date data for trends. Upload data with multiple dates.".to_string()
}

fn list_districts(ctx: &QueryContext<'_>) -> String {
    let total = ctx.all_districts.len();
    let mut text = format!(
        "Districts ({total} total):\n\n{}",
        ctx.all_districts
            .iter()
            .take(DISTRICT_PREVIEW)
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    );
    if total > DISTRICT_PREVIEW {
        let _ = write!(text, "\n\n...and {} more", total - DISTRICT_PREVIEW);
    }
    text
}

fn date_match(ctx: &QueryContext<'_>, q: &str) -> String {
    let Some(date) = ctx.date_in(q) else {
        return fallback(ctx);
    };
    format!(
        "Data for {date}:\n\n{}",
        vertical_lines(&ctx.date_totals(date))
    )
}

fn district_match(ctx: &QueryContext<'_>, q: &str) -> String {
    let Some(district) = ctx.district_in(q) else {
        return fallback(ctx);
    };
    let heading = ctx.parent_state(district).map_or_else(
        || district.to_string(),
        |state| format!("{district} ({state})"),
    );
    format!(
        "{heading}\n\n{}",
        vertical_lines(&ctx.district_totals(district))
    )
}

fn state_match(ctx: &QueryContext<'_>, q: &str) -> String {
    let Some(state) = ctx.states_in(q).into_iter().next() else {
        return fallback(ctx);
    };
    let rank = ctx
        .rank_of(state)
        .map_or_else(|| "(Unranked)".to_string(), |r| format!("(Rank #{r})"));
    let totals = ctx.state_totals(state);
    let districts = ctx.districts_of(state);

    let mut preview = districts
        .iter()
        .take(STATE_DISTRICT_PREVIEW)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if districts.len() > STATE_DISTRICT_PREVIEW {
        let _ = write!(preview, " +{} more", districts.len() - STATE_DISTRICT_PREVIEW);
    }

    format!(
        "{state} {rank}\n\n\
         Statistics:\n\
         {}\n\n\
         Districts: {}\n\
         {preview}",
        vertical_lines(&totals),
        districts.len(),
    )
}

fn distribution(ctx: &QueryContext<'_>) -> String {
    let grand = ctx.totals.total();
    let line = |label: &str, value: u64| {
        format!(
            "• {label}: {}% ({})",
            percent(value, grand),
            format_count(value)
        )
    };
    format!(
        "Distribution:\n\n{}\n{}\n{}",
        line("Enrollments", ctx.totals.enrollment),
        line("Demographics", ctx.totals.demographic),
        line("Biometrics", ctx.totals.biometric),
    )
}

fn record_counts(ctx: &QueryContext<'_>) -> String {
    let dataset = ctx.dataset();
    let lines = Vertical::ALL
        .into_iter()
        .map(|v| format!("• {}: {}", v.title(), format_count(dataset.count(v) as u64)))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Data Records:\n\n{lines}\n• Total: {}",
        format_count(dataset.len() as u64)
    )
}

/// Answer when no rule matches.
#[must_use]
pub fn fallback(ctx: &QueryContext<'_>) -> String {
    format!(
        "I have data for {} states and {} districts.\n\n\
         Try asking:\n\
         • \"Show summary\"\n\
         • \"Top 5 states\"\n\
         • \"Tell me about [state name]\"\n\
         • \"Age breakdown\"\n\
         • Type \"help\" for more options",
        ctx.all_states.len(),
        ctx.all_districts.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_count_parsing() {
        assert_eq!(rank_count("top states"), 5);
        assert_eq!(rank_count("top 3 states"), 3);
        assert_eq!(rank_count("top 0"), 0);
        assert_eq!(rank_count("top 99999999999999999999999999"), usize::MAX);
    }

    #[test]
    fn rule_kinds_are_unique() {
        for (idx, rule) in RULES.iter().enumerate() {
            assert!(RULES[idx + 1..].iter().all(|r| r.kind != rule.kind));
        }
    }

    #[test]
    fn help_text_lists_capabilities() {
        let text = help();
        assert!(text.starts_with("I can help with:\n\n"));
        assert!(text.ends_with("• Compare - \"compare Gujarat and Rajasthan\""));
    }
}
