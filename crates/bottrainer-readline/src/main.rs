use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio::time::timeout;

use bottrainer_application::controller::{batch_test, comparison, evaluation};
use bottrainer_application::{AnalyzeOptions, Console, SessionConfigStore, Tab, Trigger, clamp_input};
use bottrainer_core::RequestState;
use bottrainer_interaction::config::default_log_dir;
use bottrainer_interaction::{ConsoleSettings, HttpIntentBackend, IntentBackend, TransportClient};

mod command;
mod helper;
mod logging;
mod render;
mod schema_view;

use command::{Command, SchemaAction};
use helper::CliHelper;
use schema_view::SchemaView;

#[derive(Parser)]
#[command(name = "bottrainer")]
#[command(about = "Interactive console for the BotTrainer intent-classification service", long_about = None)]
struct Cli {
    /// Backend base URL. Overrides BOTTRAINER_BASE_URL and the settings file.
    #[arg(long)]
    base_url: Option<String>,

    /// Settings file [default: <config dir>/bottrainer/console.toml]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for log files [default: <data dir>/bottrainer/logs]
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

/// Rendered blocks produced by background requests, printed in arrival order.
type Output = mpsc::Sender<Vec<String>>;

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Loads settings with CLI > environment > file > default precedence.
///
/// A settings file that cannot be read is reported and replaced by defaults.
fn load_settings(cli: &Cli) -> ConsoleSettings {
    let loaded = match &cli.config {
        Some(path) => ConsoleSettings::load_from(path).map(|mut settings| {
            settings.apply_env();
            settings
        }),
        None => ConsoleSettings::load(),
    };
    let mut settings = loaded.unwrap_or_else(|err| {
        eprintln!("{}", format!("{err}. Using default settings.").yellow());
        let mut settings = ConsoleSettings::default();
        settings.apply_env();
        settings
    });
    settings.override_base_url(cli.base_url.clone());
    settings
}

/// Renders `controller` once the triggered request settles.
///
/// Nothing is printed if the controller was remounted in the meantime.
fn watch<C>(
    trigger: Trigger,
    controller: &Arc<C>,
    output: &Output,
    view: impl FnOnce(&C) -> Vec<String> + Send + 'static,
) where
    C: Send + Sync + 'static,
{
    match trigger {
        Trigger::Busy => print_lines(&render::notice("Still working on the previous request.")),
        Trigger::BlankInput => {}
        started @ Trigger::Started(_) => {
            let controller = Arc::downgrade(controller);
            let output = output.clone();
            tokio::spawn(async move {
                started.settled().await;
                if let Some(controller) = controller.upgrade() {
                    let _ = output.send(view(controller.as_ref())).await;
                }
            });
        }
    }
}

/// Current view of a tab.
fn show(console: &Console, schema_view: &SchemaView, tab: Tab) -> Vec<String> {
    match tab {
        Tab::Query => render::transcript(
            &console.query().transcript(),
            console.session().snapshot().show_raw_prompt,
        ),
        Tab::Batch => render::batch(&console.batch().state()),
        Tab::Evaluation => render::evaluation(&console.evaluation().state()),
        Tab::Schema => render::schema(schema_view, &console.intents().state()),
        Tab::Comparison => render::comparison(&console.comparison().state()),
        Tab::History => render::history(&console.history().view()),
    }
}

struct Repl {
    console: Console,
    schema_view: SchemaView,
    base_url: String,
    output: Output,
}

impl Repl {
    /// Executes one command. Returns `false` when the session should end.
    fn dispatch(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::Help => print_lines(&render::help()),
            Command::Status => {
                let config = self.console.session().snapshot();
                print_lines(&render::status(&config, &self.base_url, self.console.active()));
            }
            Command::Query(text) => {
                let session = Arc::clone(self.console.session());
                let query = self.console.query();
                let trigger = query.submit_text(text);
                watch(trigger, query, &self.output, move |query| {
                    let show_raw = session.snapshot().show_raw_prompt;
                    query
                        .transcript()
                        .last()
                        .map(|turn| render::turn(turn, show_raw))
                        .unwrap_or_default()
                });
            }
            Command::Tab(tab) => {
                let trigger = self.console.select(tab);
                print_lines(&show(&self.console, &self.schema_view, tab));
                match (tab, trigger) {
                    (Tab::History, Some(trigger)) => {
                        watch(trigger, self.console.history(), &self.output, |history| {
                            render::history(&history.view())
                        })
                    }
                    (Tab::Schema, Some(trigger)) => {
                        watch(trigger, self.console.intents(), &self.output, |intents| {
                            match intents.state() {
                                RequestState::Failed(message) => render::notice(&format!(
                                    "Backend intent dataset unavailable: {message}"
                                )),
                                RequestState::Ready(dataset) => render::notice(&format!(
                                    "Backend serves {} intents.",
                                    dataset.intents.len()
                                )),
                                _ => Vec::new(),
                            }
                        })
                    }
                    _ => {}
                }
            }
            Command::Model(kind) => {
                self.console.session().set_model_kind(kind);
                print_lines(&render::notice(&format!(
                    "Model: {kind} / {}",
                    self.console.session().snapshot().model_name
                )));
            }
            Command::Name(name) => self.console.session().set_model_name(name),
            Command::Raw(enabled) => self.console.session().set_show_raw_prompt(enabled),
            Command::Batch { intent, samples } => {
                let samples = clamp_input(samples, 1, batch_test::MAX_SAMPLES);
                let controller = self.console.batch();
                match controller.run(&intent, i64::from(samples)) {
                    Ok(trigger) => {
                        print_lines(&render::notice(&format!(
                            "Generating and testing {samples} samples for '{intent}'..."
                        )));
                        watch(trigger, controller, &self.output, |batch| {
                            render::batch(&batch.state())
                        });
                    }
                    Err(err) => print_lines(&render::failure(&err.to_string())),
                }
            }
            Command::Eval { samples } => {
                let samples = clamp_input(samples, 1, evaluation::MAX_SAMPLES_PER_INTENT);
                let controller = self.console.evaluation();
                match controller.run(i64::from(samples)) {
                    Ok(trigger) => {
                        print_lines(&render::notice(&format!(
                            "Evaluating with {samples} samples per intent..."
                        )));
                        watch(trigger, controller, &self.output, |evaluation| {
                            render::evaluation(&evaluation.state())
                        });
                    }
                    Err(err) => print_lines(&render::failure(&err.to_string())),
                }
            }
            Command::Compare { intents, samples } => {
                let intents = clamp_input(intents, 1, comparison::MAX_INTENTS);
                let samples = clamp_input(samples, 1, comparison::MAX_SAMPLES_PER_INTENT);
                let controller = self.console.comparison();
                match controller.run(i64::from(intents), i64::from(samples)) {
                    Ok(trigger) => {
                        print_lines(&render::notice(&format!(
                            "Comparing models on {intents} intents x {samples} samples..."
                        )));
                        watch(trigger, controller, &self.output, |comparison| {
                            render::comparison(&comparison.state())
                        });
                    }
                    Err(err) => print_lines(&render::failure(&err.to_string())),
                }
            }
            Command::History { clear } => {
                let history = self.console.history();
                let trigger = if clear { history.clear() } else { history.refresh() };
                watch(trigger, history, &self.output, |history| {
                    render::history(&history.view())
                });
            }
            Command::Schema(action) => {
                match action {
                    SchemaAction::Show => {}
                    SchemaAction::ExpandAll => self.schema_view.expand_all(),
                    SchemaAction::CollapseAll => self.schema_view.collapse_all(),
                    SchemaAction::Toggle(name) => {
                        if self.schema_view.toggle(&name).is_none() {
                            print_lines(&render::failure(&format!("Unknown intent '{name}'")));
                            return true;
                        }
                    }
                }
                print_lines(&render::schema(&self.schema_view, &self.console.intents().state()));
            }
            Command::Dismiss => {
                match self.console.active() {
                    Tab::Batch => self.console.batch().dismiss(),
                    Tab::Evaluation => self.console.evaluation().dismiss(),
                    Tab::Comparison => self.console.comparison().dismiss(),
                    Tab::Schema => self.console.intents().dismiss(),
                    Tab::Query | Tab::History => {}
                }
                print_lines(&show(&self.console, &self.schema_view, self.console.active()));
            }
            Command::Reset => {
                let tab = self.console.active();
                self.console.remount(tab);
                print_lines(&render::notice(&format!("The {tab} tab was reset.")));
            }
        }
        true
    }
}

/// The main entry point for the BotTrainer console.
///
/// Loads settings and logging, starts the config bootstrap in the background,
/// then runs a rustyline REPL whose commands drive the tab controllers.
/// Results of background requests are printed as they settle.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli);

    // ===== Logging =====
    let log_dir = cli
        .log_dir
        .clone()
        .or_else(default_log_dir)
        .unwrap_or_else(|| std::env::temp_dir().join("bottrainer-logs"));
    let _log_guard = match logging::init(&log_dir, &settings.log_level) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("{}", format!("Logging disabled: {err:#}").yellow());
            None
        }
    };
    tracing::info!(base_url = %settings.base_url, "console starting");

    // ===== Backend and session =====
    let backend: Arc<dyn IntentBackend> = Arc::new(HttpIntentBackend::new(TransportClient::new(
        settings.base_url.clone(),
    )));
    let session = Arc::new(SessionConfigStore::new());
    let options = AnalyzeOptions {
        api_key: settings.api_key.clone(),
        temperature: settings.temperature,
    };

    let (output_tx, mut output_rx) = mpsc::channel::<Vec<String>>(32);
    let printer = tokio::spawn(async move {
        while let Some(lines) = output_rx.recv().await {
            print_lines(&lines);
        }
    });

    // Bootstrap never blocks the prompt; its outcome is printed when it lands.
    let bootstrap = session.spawn_bootstrap(Arc::clone(&backend));
    {
        let session = Arc::clone(&session);
        let output = output_tx.clone();
        tokio::spawn(async move {
            if bootstrap.await.is_err() {
                return;
            }
            let config = session.snapshot();
            let line = if config.connected {
                format!(
                    "Connected. Model: {} / {}",
                    config.model_kind, config.model_name
                )
                .bright_green()
                .to_string()
            } else {
                "Backend unreachable, using default model settings."
                    .yellow()
                    .to_string()
            };
            let _ = output.send(vec![line]).await;
        });
    }

    let mut repl = Repl {
        console: Console::new(Arc::clone(&backend), session, options),
        schema_view: SchemaView::default(),
        base_url: settings.base_url.clone(),
        output: output_tx,
    };

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!("{}", "=== BotTrainer Console ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Backend: {}", settings.base_url).bright_black()
    );
    println!(
        "{}",
        "Type text to classify it, '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let prompt = format!("[{}] >> ", repl.console.active());
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match Command::parse(trimmed) {
                    Ok(command) => {
                        if !repl.dispatch(command) {
                            println!("{}", "Goodbye!".bright_green());
                            break;
                        }
                    }
                    Err(message) => println!("{}", message.yellow()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    tracing::info!("console shutting down");
    drop(repl);
    // In-flight requests are not cancelled; give already-settled output a moment to flush.
    let _ = timeout(Duration::from_millis(200), printer).await;

    Ok(())
}
