// Alert engine - evaluates every enabled condition against a snapshot and
// renders result messages.

use serde::{Deserialize, Serialize};

use super::evaluator::resolve;
use super::model::{AlertCondition, AlertResult};
use crate::core::model::StatisticsSnapshot;

/// Alert engine configuration - persisted in settings.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertEngineConfig {
    /// User-authored conditions, in display order
    pub conditions: Vec<AlertCondition>,
}

impl AlertEngineConfig {
    /// Config holding only the starter condition.
    pub fn with_template(name: &str) -> Self {
        Self {
            conditions: vec![AlertCondition {
                id: "default".to_string(),
                name: name.to_string(),
                ..AlertCondition::template()
            }],
        }
    }

    pub fn enabled_count(&self) -> usize {
        self.conditions.iter().filter(|c| c.enabled).count()
    }
}

/// Holds the current conditions and evaluates them on demand.
pub struct AlertEngine {
    config: AlertEngineConfig,
}

impl AlertEngine {
    pub fn new(config: AlertEngineConfig) -> Self {
        Self { config }
    }

    /// Replace the condition set; the next evaluation uses it.
    pub fn update_config(&mut self, config: AlertEngineConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &AlertEngineConfig {
        &self.config
    }

    pub fn evaluate(&self, snapshot: Option<&StatisticsSnapshot>) -> Vec<AlertResult> {
        evaluate_all(&self.config.conditions, snapshot)
    }

    pub fn triggered(&self, snapshot: Option<&StatisticsSnapshot>) -> Vec<AlertResult> {
        triggered_alerts(&self.config.conditions, snapshot)
    }
}

/// Evaluate every enabled condition, preserving input order.
/// Returns an empty list when there is no snapshot or no conditions.
pub fn evaluate_all(
    conditions: &[AlertCondition],
    snapshot: Option<&StatisticsSnapshot>,
) -> Vec<AlertResult> {
    let Some(snapshot) = snapshot else {
        log::debug!("No statistics snapshot; skipping {} alert conditions", conditions.len());
        return Vec::new();
    };
    if conditions.is_empty() {
        return Vec::new();
    }

    let results: Vec<AlertResult> = conditions
        .iter()
        .filter(|condition| condition.enabled)
        .map(|condition| {
            let current_value = resolve(condition, snapshot);
            let triggered = condition.operator.compare(current_value, condition.threshold);
            AlertResult {
                condition: condition.clone(),
                current_value,
                triggered,
                message: format_message(condition, current_value),
            }
        })
        .collect();

    log::debug!(
        "Evaluated {} of {} alert conditions, {} triggered",
        results.len(),
        conditions.len(),
        results.iter().filter(|r| r.triggered).count()
    );

    results
}

/// The subset of `evaluate_all` whose conditions fired.
pub fn triggered_alerts(
    conditions: &[AlertCondition],
    snapshot: Option<&StatisticsSnapshot>,
) -> Vec<AlertResult> {
    evaluate_all(conditions, snapshot)
        .into_iter()
        .filter(|result| result.triggered)
        .collect()
}

/// `<targetValue> が <current><unit> (閾値: <threshold><unit>)`
pub fn format_message(condition: &AlertCondition, current_value: f64) -> String {
    let unit = condition.condition_type.unit();
    format!(
        "{} が {}{} (閾値: {}{})",
        condition.target_label(),
        current_value,
        unit,
        condition.threshold,
        unit
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alerts::model::{AlertTarget, ConditionType, Operator};
    use crate::core::model::{CategoryStatistic, SentimentStatistics};

    fn make_snapshot() -> StatisticsSnapshot {
        StatisticsSnapshot {
            total_comments: 30,
            overall_sentiment: SentimentStatistics {
                positive: 12,
                neutral: 8,
                negative: 10,
                positive_percentage: 40.0,
                neutral_percentage: 26.7,
                negative_percentage: 33.3,
            },
            category_statistics: vec![CategoryStatistic {
                category: "講義内容".to_string(),
                count: 12,
                percentage: 40.0,
            }],
            ..StatisticsSnapshot::default()
        }
    }

    fn make_condition(id: &str, target: AlertTarget, value: &str, threshold: f64) -> AlertCondition {
        AlertCondition {
            id: id.to_string(),
            name: format!("rule {}", id),
            condition_type: ConditionType::Count,
            target,
            target_value: Some(value.to_string()),
            operator: Operator::Gte,
            threshold,
            enabled: true,
        }
    }

    #[test]
    fn test_category_count_scenario() {
        let conditions = vec![make_condition("1", AlertTarget::Category, "講義内容", 10.0)];
        let snapshot = make_snapshot();

        let results = evaluate_all(&conditions, Some(&snapshot));
        assert_eq!(results.len(), 1);
        assert!(results[0].triggered);
        assert_eq!(results[0].current_value, 12.0);
        assert!(results[0].message.contains("12件"));
        assert!(results[0].message.contains("10件"));
        assert_eq!(results[0].message, "講義内容 が 12件 (閾値: 10件)");
    }

    #[test]
    fn test_percentage_message_uses_percent_unit() {
        let mut condition = make_condition("1", AlertTarget::Sentiment, "ネガティブ", 30.0);
        condition.condition_type = ConditionType::Percentage;

        let results = evaluate_all(&[condition], Some(&make_snapshot()));
        assert_eq!(results[0].message, "ネガティブ が 33.3% (閾値: 30%)");
    }

    #[test]
    fn test_disabled_conditions_are_skipped() {
        let mut disabled = make_condition("1", AlertTarget::Category, "講義内容", 0.0);
        disabled.enabled = false;
        let enabled = make_condition("2", AlertTarget::Category, "運営", 0.0);

        let results = evaluate_all(&[disabled, enabled], Some(&make_snapshot()));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].condition.id, "2");
    }

    #[test]
    fn test_missing_snapshot_or_conditions_is_empty() {
        let conditions = vec![make_condition("1", AlertTarget::Category, "講義内容", 0.0)];
        assert!(evaluate_all(&conditions, None).is_empty());
        assert!(evaluate_all(&[], Some(&make_snapshot())).is_empty());
    }

    #[test]
    fn test_order_preserved_and_triggered_filter() {
        let conditions = vec![
            make_condition("a", AlertTarget::Category, "講義内容", 20.0),
            make_condition("b", AlertTarget::Sentiment, "ネガティブ", 5.0),
            make_condition("c", AlertTarget::Category, "講義内容", 1.0),
        ];
        let snapshot = make_snapshot();

        let ids: Vec<String> = evaluate_all(&conditions, Some(&snapshot))
            .into_iter()
            .map(|r| r.condition.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let fired: Vec<String> = triggered_alerts(&conditions, Some(&snapshot))
            .into_iter()
            .map(|r| r.condition.id)
            .collect();
        assert_eq!(fired, vec!["b", "c"]);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let conditions = vec![
            make_condition("a", AlertTarget::Category, "講義内容", 20.0),
            make_condition("b", AlertTarget::Sentiment, "ネガティブ", 5.0),
        ];
        let snapshot = make_snapshot();
        assert_eq!(
            evaluate_all(&conditions, Some(&snapshot)),
            evaluate_all(&conditions, Some(&snapshot))
        );
    }

    #[test]
    fn test_engine_update_config() {
        let mut engine = AlertEngine::new(AlertEngineConfig::default());
        assert!(engine.triggered(Some(&make_snapshot())).is_empty());

        engine.update_config(AlertEngineConfig {
            conditions: vec![make_condition("1", AlertTarget::Category, "講義内容", 10.0)],
        });
        assert_eq!(engine.triggered(Some(&make_snapshot())).len(), 1);
        assert_eq!(engine.config().enabled_count(), 1);
    }

    #[test]
    fn test_template_config_fires_on_negative_share() {
        let engine = AlertEngine::new(AlertEngineConfig::with_template("ネガティブコメント多数"));
        let fired = engine.triggered(Some(&make_snapshot()));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].current_value, 33.3);
    }
}
