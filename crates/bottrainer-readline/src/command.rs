//! REPL command parsing.

use std::str::FromStr;

use bottrainer_application::Tab;
use bottrainer_core::model::ModelKind;

/// Slash commands offered for completion, in help order.
pub const COMMANDS: &[&str] = &[
    "/tab", "/model", "/name", "/raw", "/status", "/batch", "/eval", "/compare", "/history",
    "/schema", "/dismiss", "/reset", "/help",
];

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaAction {
    Show,
    Toggle(String),
    ExpandAll,
    CollapseAll,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Query(String),
    Tab(Tab),
    Model(ModelKind),
    Name(String),
    Raw(bool),
    Status,
    Batch { intent: String, samples: i64 },
    Eval { samples: i64 },
    Compare { intents: i64, samples: i64 },
    History { clear: bool },
    Schema(SchemaAction),
    Dismiss,
    Reset,
    Help,
    Quit,
}

impl Command {
    /// Parses one non-empty input line. Anything not starting with `/` is a query.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line == "quit" || line == "exit" {
            return Ok(Self::Quit);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Self::Query(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match (name, args.as_slice()) {
            ("tab", [tab]) => Tab::from_str(tab)
                .map(Self::Tab)
                .map_err(|_| format!("Unknown tab '{tab}'")),
            ("model", [kind]) => ModelKind::from_str(kind)
                .map(Self::Model)
                .map_err(|_| format!("Unknown model kind '{kind}' (use primary or alternate)")),
            ("name", []) => Ok(Self::Name(String::new())),
            ("name", _) => Ok(Self::Name(args.join(" "))),
            ("raw", ["on"]) => Ok(Self::Raw(true)),
            ("raw", ["off"]) => Ok(Self::Raw(false)),
            ("status", []) => Ok(Self::Status),
            ("batch", [intent, samples]) => Ok(Self::Batch {
                intent: intent.to_string(),
                samples: number(samples)?,
            }),
            ("eval", [samples]) => Ok(Self::Eval {
                samples: number(samples)?,
            }),
            ("compare", [intents, samples]) => Ok(Self::Compare {
                intents: number(intents)?,
                samples: number(samples)?,
            }),
            ("history", []) => Ok(Self::History { clear: false }),
            ("history", ["clear"]) => Ok(Self::History { clear: true }),
            ("schema", []) => Ok(Self::Schema(SchemaAction::Show)),
            ("schema", ["all"]) => Ok(Self::Schema(SchemaAction::ExpandAll)),
            ("schema", ["none"]) => Ok(Self::Schema(SchemaAction::CollapseAll)),
            ("schema", [intent]) => Ok(Self::Schema(SchemaAction::Toggle(intent.to_string()))),
            ("dismiss", []) => Ok(Self::Dismiss),
            ("reset", []) => Ok(Self::Reset),
            ("help", []) => Ok(Self::Help),
            _ => Err(format!("Unknown command '/{rest}'. Type /help for usage.")),
        }
    }
}

fn number(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>()
        .map_err(|_| format!("'{raw}' is not a whole number"))
}

pub const HELP: &[(&str, &str)] = &[
    ("<text>", "classify text with the current model"),
    ("/tab <name>", "show query, batch, evaluation, schema, comparison or history"),
    ("/model <primary|alternate>", "switch model kind (resets the model name)"),
    ("/name <model>", "set the model name"),
    ("/raw <on|off>", "show raw analysis output"),
    ("/status", "show session configuration"),
    ("/batch <intent> <n>", "batch test one intent with n samples (1-50)"),
    ("/eval <n>", "evaluate all intents with n samples each (1-100)"),
    ("/compare <intents> <n>", "compare models (1-10 intents, 1-50 samples)"),
    ("/history [clear]", "refresh or clear the prediction history"),
    ("/schema [intent|all|none]", "browse the intent schema"),
    ("/dismiss", "clear the current tab's result or error"),
    ("/reset", "start the current tab over"),
    ("quit", "exit"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_query() {
        assert_eq!(
            Command::parse("  where is my order? ").unwrap(),
            Command::Query("where is my order?".into())
        );
    }

    #[test]
    fn parses_run_commands() {
        assert_eq!(
            Command::parse("/batch greeting 10").unwrap(),
            Command::Batch {
                intent: "greeting".into(),
                samples: 10
            }
        );
        assert_eq!(
            Command::parse("/compare 3 -2").unwrap(),
            Command::Compare {
                intents: 3,
                samples: -2
            }
        );
        assert!(Command::parse("/eval many").is_err());
    }

    #[test]
    fn parses_session_commands() {
        assert_eq!(
            Command::parse("/model alternate").unwrap(),
            Command::Model(ModelKind::Alternate)
        );
        assert_eq!(
            Command::parse("/model gemma").unwrap(),
            Command::Model(ModelKind::Primary)
        );
        assert_eq!(Command::parse("/raw on").unwrap(), Command::Raw(true));
        assert_eq!(Command::parse("/name").unwrap(), Command::Name(String::new()));
        assert_eq!(Command::parse("/tab eval").unwrap(), Command::Tab(Tab::Evaluation));
        assert!(Command::parse("/model qwen").is_err());
    }

    #[test]
    fn parses_schema_and_history() {
        assert_eq!(
            Command::parse("/schema all").unwrap(),
            Command::Schema(SchemaAction::ExpandAll)
        );
        assert_eq!(
            Command::parse("/schema booking").unwrap(),
            Command::Schema(SchemaAction::Toggle("booking".into()))
        );
        assert_eq!(
            Command::parse("/history clear").unwrap(),
            Command::History { clear: true }
        );
        assert_eq!(Command::parse("exit").unwrap(), Command::Quit);
        assert!(Command::parse("/frobnicate").is_err());
    }
}
