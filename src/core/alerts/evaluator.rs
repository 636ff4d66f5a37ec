// Condition evaluation: resolves a condition's current value from a snapshot
// and compares it against the threshold.
//
// Missing data never errors. Unknown sentiments, absent categories and missing
// importance aggregates all resolve to zero.

use super::model::{AlertCondition, AlertTarget, ConditionType};
use crate::core::model::{Level, Sentiment, StatisticsSnapshot};

/// Resolve the current value a condition is compared against.
///
/// A condition without a target value never matches anything and resolves to zero.
pub fn resolve(condition: &AlertCondition, snapshot: &StatisticsSnapshot) -> f64 {
    let Some(label) = condition.target_value.as_deref() else {
        return 0.0;
    };

    match condition.target {
        AlertTarget::Sentiment => resolve_sentiment(condition.condition_type, label, snapshot),
        AlertTarget::Category => resolve_category(condition.condition_type, label, snapshot),
        AlertTarget::Importance => resolve_importance(condition.condition_type, label, snapshot),
    }
}

/// Whether the condition's resolved value satisfies its operator and threshold.
pub fn is_triggered(condition: &AlertCondition, snapshot: &StatisticsSnapshot) -> bool {
    condition
        .operator
        .compare(resolve(condition, snapshot), condition.threshold)
}

fn resolve_sentiment(kind: ConditionType, label: &str, snapshot: &StatisticsSnapshot) -> f64 {
    let Some(sentiment) = Sentiment::parse(label) else {
        return 0.0;
    };
    let stats = &snapshot.overall_sentiment;
    match kind {
        ConditionType::Percentage => stats.percentage(sentiment),
        ConditionType::Count => stats.count(sentiment) as f64,
    }
}

fn resolve_category(kind: ConditionType, label: &str, snapshot: &StatisticsSnapshot) -> f64 {
    match snapshot.category(label) {
        Some(stat) => match kind {
            ConditionType::Percentage => stat.percentage,
            ConditionType::Count => stat.count as f64,
        },
        None => 0.0,
    }
}

// Backends that predate importance aggregates leave the list empty, which
// resolves to zero.
fn resolve_importance(kind: ConditionType, label: &str, snapshot: &StatisticsSnapshot) -> f64 {
    let stat = label
        .parse::<Level>()
        .ok()
        .and_then(|level| snapshot.importance(level));
    match stat {
        Some(stat) => match kind {
            ConditionType::Percentage => stat.percentage,
            ConditionType::Count => stat.count as f64,
        },
        None => 0.0,
    }
}
