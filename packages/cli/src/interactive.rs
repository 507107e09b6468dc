//! Menu-driven mode used when no subcommand is given.

use aadhaar_insights_analytics::AnalyticsConfig;
use aadhaar_insights_assistant::{GREETING, answer};
use aadhaar_insights_cli_utils::{IndicatifProgress, MultiProgress, prompt_line, prompt_paths};
use aadhaar_insights_ingest::{ProgressCallback as _, RecordStore, load_any, load_files};
use aadhaar_insights_record_models::{Dataset, Vertical};
use dialoguer::Select;

use crate::{Commands, run_command};

/// Top-level actions in the interactive menu.
enum Action {
    LoadFiles,
    Summary,
    Quality,
    TopStates,
    Trends,
    Anomalies,
    Forecast,
    Predictions,
    Insights,
    Activity,
    Chat,
    Clear,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::LoadFiles,
        Self::Summary,
        Self::Quality,
        Self::TopStates,
        Self::Trends,
        Self::Anomalies,
        Self::Forecast,
        Self::Predictions,
        Self::Insights,
        Self::Activity,
        Self::Chat,
        Self::Clear,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::LoadFiles => "Load CSV files",
            Self::Summary => "Show summary",
            Self::Quality => "Data quality",
            Self::TopStates => "Top 10 states",
            Self::Trends => "Monthly trends",
            Self::Anomalies => "Detect anomalies",
            Self::Forecast => "Forecast",
            Self::Predictions => "State predictions",
            Self::Insights => "Insights",
            Self::Activity => "Recent activity",
            Self::Chat => "Ask questions",
            Self::Clear => "Clear loaded data",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the menu loop until the user quits.
///
/// # Errors
///
/// * If a terminal prompt fails
/// * If rendering a result fails
pub fn run(
    multi: &MultiProgress,
    store: &mut RecordStore,
    config: &AnalyticsConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Aadhaar Insights");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let command = match Action::ALL[idx] {
            Action::LoadFiles => {
                load_interactive(multi, store)?;
                continue;
            }
            Action::Activity => {
                let mut any = false;
                for message in store.activity() {
                    println!("• {message}");
                    any = true;
                }
                if !any {
                    println!("No files loaded yet.");
                }
                continue;
            }
            Action::Clear => {
                store.clear();
                println!("Cleared all loaded records.");
                continue;
            }
            Action::Quit => return Ok(()),
            Action::Summary => Commands::Summary,
            Action::Quality => Commands::Quality,
            Action::TopStates => Commands::States {
                limit: Some(10),
                ascending: false,
            },
            Action::Trends => Commands::Trends { daily: false },
            Action::Anomalies => Commands::Anomalies,
            Action::Forecast => Commands::Forecast,
            Action::Predictions => Commands::Predictions,
            Action::Insights => Commands::Insights,
            Action::Chat => Commands::Chat,
        };

        run_command(command, store.dataset(), config, false)?;
        println!();
    }
}

fn load_interactive(
    multi: &MultiProgress,
    store: &mut RecordStore,
) -> Result<(), Box<dyn std::error::Error>> {
    const KINDS: &[&str] = &["Detect from headers", "Enrollment", "Demographic", "Biometric"];

    let kind = Select::new()
        .with_prompt("What kind of data?")
        .items(KINDS)
        .default(0)
        .interact()?;
    let paths = prompt_paths("CSV file paths (space-separated)")?;
    if paths.is_empty() {
        return Ok(());
    }

    if kind == 0 {
        for path in &paths {
            match load_any(store, path) {
                Ok((vertical, count)) => {
                    println!("Loaded {count} {vertical} records from {}", path.display());
                }
                Err(e) => println!("Failed to load {}: {e}", path.display()),
            }
        }
        return Ok(());
    }

    let vertical = Vertical::ALL[kind - 1];
    let progress = IndicatifProgress::files_bar(multi, "Loading CSV files");
    let report = load_files(store, vertical, &paths, progress.as_ref());
    progress.finish(format!(
        "Loaded {} records from {} of {} files",
        report.records(),
        report.succeeded(),
        report.outcomes.len()
    ));
    Ok(())
}

/// Question-and-answer loop. An empty line, `exit` or `quit` ends it.
///
/// # Errors
///
/// * If a terminal prompt fails
pub fn chat(dataset: &Dataset) -> Result<(), Box<dyn std::error::Error>> {
    println!("{GREETING}");
    loop {
        let question = prompt_line("You")?;
        let trimmed = question.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("exit")
            || trimmed.eq_ignore_ascii_case("quit")
        {
            return Ok(());
        }
        println!();
        println!("{}", answer(dataset, trimmed));
        println!();
    }
}
