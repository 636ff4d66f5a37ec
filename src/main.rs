#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use comment_insights::core::alerts::model::{AlertCondition, AlertTarget, ConditionType, Operator};
use comment_insights::core::config::{ConfigManager, Settings};
use comment_insights::core::coordinator::Coordinator;
use comment_insights::core::ranking::display_categories;
use comment_insights::core::source::FileSource;

#[derive(Parser, Debug)]
#[command(name = "comment-insights", version, about = "Evaluate comment-analysis alerts and rank top comments")]
struct Cli {
    /// Directory holding settings.json
    #[arg(long, global = true, default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate alerts and rank comments for an analysis export
    Evaluate {
        /// Statistics JSON from the analysis backend
        #[arg(long)]
        statistics: Option<PathBuf>,
        /// Analysed comments JSON from the analysis backend
        #[arg(long)]
        comments: Option<PathBuf>,
        /// Override the configured top-comment count
        #[arg(long)]
        max_count: Option<usize>,
    },
    /// Manage alert conditions
    Alert {
        #[command(subcommand)]
        action: AlertAction,
    },
}

#[derive(Subcommand, Debug)]
enum AlertAction {
    /// List configured conditions
    List,
    /// Add a condition
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, value_enum, default_value_t = KindArg::Percentage)]
        kind: KindArg,
        #[arg(long, value_enum, default_value_t = TargetArg::Sentiment)]
        target: TargetArg,
        #[arg(long)]
        value: Option<String>,
        #[arg(long, value_enum, default_value_t = OperatorArg::Gte)]
        operator: OperatorArg,
        #[arg(long, default_value_t = 30.0)]
        threshold: f64,
    },
    /// Remove a condition by id
    Remove { id: String },
    /// Enable or disable a condition by id
    Toggle { id: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Count,
    Percentage,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TargetArg {
    Sentiment,
    Category,
    Importance,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OperatorArg {
    Gte,
    Lte,
    Eq,
}

impl From<KindArg> for ConditionType {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Count => Self::Count,
            KindArg::Percentage => Self::Percentage,
        }
    }
}

impl From<TargetArg> for AlertTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Sentiment => Self::Sentiment,
            TargetArg::Category => Self::Category,
            TargetArg::Importance => Self::Importance,
        }
    }
}

impl From<OperatorArg> for Operator {
    fn from(arg: OperatorArg) -> Self {
        match arg {
            OperatorArg::Gte => Self::Gte,
            OperatorArg::Lte => Self::Lte,
            OperatorArg::Eq => Self::Eq,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let manager = ConfigManager::new(cli.config_dir);
    let mut settings = manager.load();

    match cli.command {
        Commands::Evaluate {
            statistics,
            comments,
            max_count,
        } => {
            if statistics.is_none() && comments.is_none() {
                bail!("provide --statistics and/or --comments");
            }
            if let Some(count) = max_count {
                settings.top_comment_count = count;
            }

            let source = FileSource::new(statistics, comments);
            let mut output = Coordinator::new(&settings)
                .refresh(&source)
                .context("failed to evaluate analysis export")?;
            output.top_comments = output.top_comments.into_display_text();

            log::info!(
                "Categories: {}",
                display_categories(&output.top_comments, &settings.other_category).join(", ")
            );
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Alert { action } => match action {
            AlertAction::List => {
                for condition in &settings.alert_settings.conditions {
                    let state = if condition.enabled { "on " } else { "off" };
                    println!("[{}] {}  {}: {}", state, condition.id, condition.name, condition.describe());
                }
            }
            AlertAction::Add {
                name,
                kind,
                target,
                value,
                operator,
                threshold,
            } => {
                let target: AlertTarget = target.into();
                let target_value =
                    value.or_else(|| target.options().first().map(|v| (*v).to_string()));
                let id = settings.add_condition(AlertCondition {
                    id: String::new(),
                    name,
                    condition_type: kind.into(),
                    target,
                    target_value,
                    operator: operator.into(),
                    threshold,
                    enabled: true,
                })?;
                save(&manager, &settings)?;
                println!("{}", id);
            }
            AlertAction::Remove { id } => {
                if !settings.remove_condition(&id) {
                    bail!("no condition with id {}", id);
                }
                save(&manager, &settings)?;
            }
            AlertAction::Toggle { id } => {
                let enabled = settings.toggle_condition(&id)?;
                save(&manager, &settings)?;
                println!("{} {}", id, if enabled { "enabled" } else { "disabled" });
            }
        },
    }

    Ok(())
}

fn save(manager: &ConfigManager, settings: &Settings) -> Result<()> {
    manager
        .save(settings)
        .with_context(|| format!("failed to write {:?}", manager.path()))
}
