use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::alerts::engine::AlertEngine;
use super::alerts::model::{default_severity, AlertResult, Severity, SeverityPolicy};
use super::config::Settings;
use super::error::Result;
use super::model::{AnalyzedComment, StatisticsSnapshot, TopCommentsResult};
use super::ranking;
use super::source::AnalysisSource;

/// A triggered alert annotated with its presentation severity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredAlert {
    #[serde(flatten)]
    pub result: AlertResult,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoordinatorOutput {
    pub alerts: Vec<TriggeredAlert>,
    pub top_comments: TopCommentsResult,
}

/// Runs both engines over one analysis result with the current settings.
pub struct Coordinator {
    engine: AlertEngine,
    top_comment_count: usize,
    severity: SeverityPolicy,
}

impl Coordinator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            engine: AlertEngine::new(settings.alert_settings.clone()),
            top_comment_count: settings.top_comment_count,
            severity: default_severity,
        }
    }

    pub fn with_severity_policy(mut self, policy: SeverityPolicy) -> Self {
        self.severity = policy;
        self
    }

    pub fn update_settings(&mut self, settings: &Settings) {
        self.engine.update_config(settings.alert_settings.clone());
        self.top_comment_count = settings.top_comment_count;
    }

    pub fn evaluate(
        &self,
        snapshot: Option<&StatisticsSnapshot>,
        comments: &[AnalyzedComment],
    ) -> CoordinatorOutput {
        let alerts = self
            .engine
            .triggered(snapshot)
            .into_iter()
            .map(|result| TriggeredAlert {
                severity: (self.severity)(&result.condition),
                result,
            })
            .collect();

        CoordinatorOutput {
            alerts,
            top_comments: ranking::rank(comments, self.top_comment_count),
        }
    }

    /// Pull the latest analysis from `source` and evaluate it.
    pub fn refresh(&self, source: &dyn AnalysisSource) -> Result<CoordinatorOutput> {
        let run = source.fetch_analysis(self.top_comment_count)?;
        let output = self.evaluate(run.snapshot.as_ref(), &run.comments);

        log::info!(
            "Refreshed: {} alerts triggered, {} top comments",
            output.alerts.len(),
            output.top_comments.overall_top_comments.len()
        );
        Ok(output)
    }
}

/// Everything one evaluation depends on. Replaced wholesale on every change.
#[derive(Debug, Clone, Default)]
pub struct RefreshInput {
    pub snapshot: Option<Arc<StatisticsSnapshot>>,
    pub comments: Arc<Vec<AnalyzedComment>>,
    pub settings: Settings,
}

fn evaluate_input(input: &RefreshInput, severity: SeverityPolicy) -> CoordinatorOutput {
    Coordinator::new(&input.settings)
        .with_severity_policy(severity)
        .evaluate(input.snapshot.as_deref(), &input.comments)
}

/// Re-evaluate whenever `input` changes and publish the result.
///
/// Only the newest input is ever evaluated; intermediate values sent while an
/// evaluation runs are skipped. Every alert is graded with `severity`. The task
/// ends when the input sender is dropped.
pub fn spawn_refresh_loop(
    mut input: watch::Receiver<RefreshInput>,
    severity: SeverityPolicy,
) -> (watch::Receiver<CoordinatorOutput>, JoinHandle<()>) {
    let initial = evaluate_input(&input.borrow_and_update(), severity);
    let (tx, rx) = watch::channel(initial);

    let handle = tokio::spawn(async move {
        while input.changed().await.is_ok() {
            let output = {
                let current = input.borrow_and_update();
                evaluate_input(&current, severity)
            };
            if tx.send(output).is_err() {
                break;
            }
        }
        log::debug!("Refresh loop stopped");
    });

    (rx, handle)
}
