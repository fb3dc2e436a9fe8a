//! Colored text rendering of controller state.
//!
//! Every function reads a snapshot and returns display lines; display values
//! come from the presentation adapters and are never stored back.

use bottrainer_application::{BatchRun, HistoryView, Tab};
use bottrainer_core::RequestState;
use bottrainer_core::model::{ComparisonReport, ConversationTurn, EvaluationReport, SessionConfig, TurnRole};
use bottrainer_core::present::{self, Band, MetricBands, Side};
use bottrainer_core::schema::{self, IntentDataset};
use colored::{ColoredString, Colorize};

use crate::command::HELP;
use crate::schema_view::SchemaView;

fn paint(band: Band, text: String) -> ColoredString {
    match band {
        Band::Good => text.green(),
        Band::Moderate => text.yellow(),
        Band::Poor => text.red(),
    }
}

fn percent(value: f64) -> ColoredString {
    paint(present::band(value), present::format_percent(value, 1))
}

pub fn failure(message: &str) -> Vec<String> {
    vec![format!("Error: {message}").red().to_string()]
}

pub fn notice(message: &str) -> Vec<String> {
    vec![message.bright_black().to_string()]
}

fn lifecycle<T>(
    state: &RequestState<T>,
    label: &str,
    ready: impl FnOnce(&T) -> Vec<String>,
) -> Vec<String> {
    match state {
        RequestState::Idle => notice(&format!("No {label} results yet.")),
        RequestState::Running => notice(&format!("Running {label}...")),
        RequestState::Ready(value) => ready(value),
        RequestState::Failed(message) => failure(message),
    }
}

// ============================================================================
// Single query
// ============================================================================

pub fn turn(turn: &ConversationTurn, show_raw: bool) -> Vec<String> {
    if turn.role == TurnRole::User {
        return vec![format!("> {}", turn.text).green().to_string()];
    }
    if let Some(message) = turn.error_message() {
        return vec![
            turn.text.red().bold().to_string(),
            format!("  {message}").red().to_string(),
        ];
    }

    let intent = turn.intent.as_deref().unwrap_or_default();
    let confidence = turn.confidence.unwrap_or_default();
    let mut lines = vec![format!(
        "{} {} ({})",
        "Intent:".bright_blue(),
        present::humanize_intent(intent).bold(),
        percent(confidence)
    )];
    match turn.entities.as_ref().filter(|entities| !entities.is_empty()) {
        Some(entities) => {
            lines.push("Entities:".bright_blue().to_string());
            for (key, value) in entities {
                lines.push(format!("  {} {}", format!("{key}:").bright_black(), value));
            }
        }
        None => lines.push("No entities".bright_black().to_string()),
    }
    if show_raw {
        lines.push(format!("Raw: {}", turn.text).bright_black().to_string());
    }
    lines
}

pub fn transcript(turns: &[ConversationTurn], show_raw: bool) -> Vec<String> {
    if turns.is_empty() {
        return notice("No messages yet. Type something to classify it.");
    }
    turns.iter().flat_map(|t| turn(t, show_raw)).collect()
}

// ============================================================================
// Batch / evaluation / comparison
// ============================================================================

pub fn batch(state: &RequestState<BatchRun>) -> Vec<String> {
    lifecycle(state, "batch test", |run| {
        let (matched, total) = present::match_summary(&run.results, &run.target_intent);
        let mut lines = vec![format!(
            "{} {} ({matched}/{total} matched)",
            "Batch test:".bright_magenta().bold(),
            present::humanize_intent(&run.target_intent)
        )];
        let flags = present::match_flags(&run.results, &run.target_intent);
        for (result, matched) in run.results.iter().zip(flags) {
            let mark = if matched { "✓".green() } else { "✗".red() };
            lines.push(format!(
                "  {mark} {}  → {} ({})",
                result.text,
                result.predicted_intent,
                present::format_percent(result.confidence, 1)
            ));
        }
        lines
    })
}

pub fn evaluation(state: &RequestState<EvaluationReport>) -> Vec<String> {
    lifecycle(state, "evaluation", |report| {
        let mut lines = vec![format!(
            "{} {}",
            "Overall accuracy:".bright_magenta().bold(),
            percent(report.overall_accuracy)
        )];
        lines.push(
            format!(
                "  {:<18} {:>9} {:>9} {:>9} {:>8}",
                "intent", "precision", "recall", "f1", "support"
            )
            .bright_black()
            .to_string(),
        );
        for (intent, metrics) in &report.per_intent {
            let bands = MetricBands::of(metrics);
            let cell = |band: Band, value: f64| paint(band, format!("{:>9}", present::format_percent(value, 1)));
            lines.push(format!(
                "  {:<18} {} {} {} {:>8}",
                present::humanize_intent(intent),
                cell(bands.precision, metrics.precision),
                cell(bands.recall, metrics.recall),
                cell(bands.f1, metrics.f1),
                metrics.support
            ));
        }
        lines
    })
}

pub fn comparison(state: &RequestState<ComparisonReport>) -> Vec<String> {
    lifecycle(state, "comparison", |report| {
        let mut lines = vec!["Model comparison".bright_magenta().bold().to_string()];
        for score in [&report.model_a, &report.model_b] {
            let m = &score.metrics;
            lines.push(format!(
                "  {:<8} accuracy {}  precision {}  recall {}  f1 {}  composite {}",
                score.label.bold(),
                percent(m.accuracy),
                percent(m.precision),
                percent(m.recall),
                percent(m.f1),
                present::format_percent(present::composite_score(m), 1)
            ));
        }
        let verdict = match present::winner(report) {
            Some(Side::ModelA) => format!("Winner: {}", report.model_a.label).green(),
            Some(Side::ModelB) => format!("Winner: {}", report.model_b.label).green(),
            None => "Tie: no winner".yellow(),
        };
        lines.push(format!("  {verdict}"));
        lines
    })
}

// ============================================================================
// History / schema / status
// ============================================================================

pub fn history(view: &HistoryView) -> Vec<String> {
    let mut lines = vec![format!("{} ({} entries)", "History".bright_magenta().bold(), view.entries.len())];
    if view.busy {
        lines.extend(notice("Refreshing..."));
    }
    if let Some(message) = &view.last_error {
        lines.push(format!("Could not refresh history: {message}").yellow().to_string());
    }
    if view.entries.is_empty() && !view.busy {
        lines.extend(notice("No history yet."));
    }
    for entry in &view.entries {
        let when = entry
            .recorded_at()
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| entry.timestamp.clone());
        let confidence = entry
            .confidence
            .map(|c| percent(c).to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "  {}  {}  {} ({})  {}",
            when.bright_black(),
            entry.input,
            present::humanize_intent(&entry.intent).bold(),
            confidence,
            entry.model.bright_black()
        ));
    }
    lines
}

pub fn schema(view: &SchemaView, remote: &RequestState<IntentDataset>) -> Vec<String> {
    let mut lines = vec!["Intent schema".bright_magenta().bold().to_string()];
    for definition in schema::all() {
        let expanded = view.is_expanded(definition.name);
        let marker = if expanded { "▾" } else { "▸" };
        lines.push(format!(
            "  {marker} {}  {}",
            present::humanize_intent(definition.name).bold(),
            definition.description.bright_black()
        ));
        if expanded {
            lines.push(format!("      examples: {}", definition.examples.join(" | ")));
            if !definition.entities.is_empty() {
                lines.push(format!("      entities: {}", definition.entities.join(", ")));
            }
        }
    }
    if let Some(dataset) = remote.ready() {
        let unknown = dataset.unknown_to_catalog();
        if !unknown.is_empty() {
            lines.push(format!("  Backend also serves: {}", unknown.join(", ")).yellow().to_string());
        }
    }
    lines
}

pub fn status(config: &SessionConfig, base_url: &str, active: Tab) -> Vec<String> {
    let connection = if config.connected {
        "connected".green()
    } else {
        "disconnected".red()
    };
    vec![
        format!("{} {base_url} ({connection})", "Backend:".bright_blue()),
        format!(
            "{} {} / {}",
            "Model:".bright_blue(),
            config.model_kind,
            config.effective_model_name()
        ),
        format!(
            "{} {}",
            "Raw output:".bright_blue(),
            if config.show_raw_prompt { "on" } else { "off" }
        ),
        format!("{} {active}", "Tab:".bright_blue()),
    ]
}

pub fn help() -> Vec<String> {
    HELP.iter()
        .map(|(usage, description)| format!("  {:<28} {}", usage.bright_cyan(), description))
        .collect()
}
