// Alert model types for user-authored conditions and their results.
//
// Field names mirror the UI's JSON (camelCase, `type`, `targetValue`).

use serde::{Deserialize, Serialize};

use crate::core::error::{InsightError, Result};
use crate::core::model::{Level, Sentiment};

/// Unit of the threshold and of the resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    Count,
    Percentage,
}

impl ConditionType {
    /// Suffix appended to values of this type in messages.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Count => "件",
            Self::Percentage => "%",
        }
    }
}

/// Which statistic family a condition reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertTarget {
    Sentiment,
    Category,
    Importance,
}

impl AlertTarget {
    pub fn all() -> &'static [AlertTarget] {
        &[Self::Sentiment, Self::Category, Self::Importance]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sentiment => "感情",
            Self::Category => "カテゴリ",
            Self::Importance => "重要度",
        }
    }

    /// Target values offered when authoring a condition for this target.
    pub fn options(&self) -> Vec<&'static str> {
        match self {
            Self::Sentiment => Sentiment::all().iter().map(Sentiment::label).collect(),
            Self::Category => vec!["講義内容", "講義資料", "運営", "その他"],
            Self::Importance => Level::all().iter().map(Level::label).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Gte,
    Lte,
    Eq,
}

impl Operator {
    /// Apply the comparison. `Eq` is exact floating-point equality, so a
    /// percentage produced by division may never match a round threshold.
    #[allow(clippy::float_cmp)]
    pub fn compare(&self, current: f64, threshold: f64) -> bool {
        match self {
            Self::Gte => current >= threshold,
            Self::Lte => current <= threshold,
            Self::Eq => current == threshold,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gte => "以上",
            Self::Lte => "以下",
            Self::Eq => "等しい",
        }
    }
}

/// A user-authored alert rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCondition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    pub target: AlertTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<String>,
    pub operator: Operator,
    pub threshold: f64,
    pub enabled: bool,
}

impl AlertCondition {
    /// Starting point for a new condition: negative sentiment at 30% or more.
    pub fn template() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            condition_type: ConditionType::Percentage,
            target: AlertTarget::Sentiment,
            target_value: Some(Sentiment::Negative.label().to_string()),
            operator: Operator::Gte,
            threshold: 30.0,
            enabled: true,
        }
    }

    pub fn target_label(&self) -> &str {
        self.target_value.as_deref().unwrap_or("")
    }

    /// One-line summary, e.g. `講義内容 が 10件 以上`.
    pub fn describe(&self) -> String {
        format!(
            "{} が {}{} {}",
            self.target_label(),
            self.threshold,
            self.condition_type.unit(),
            self.operator.display_name()
        )
    }

    /// Check a condition before it is stored.
    ///
    /// Evaluation never calls this; an invalid condition still evaluates,
    /// resolving to zero.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(InsightError::InvalidCondition("name is empty".to_string()));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(InsightError::InvalidCondition(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }

        let value = self.target_value.as_deref().map(str::trim).unwrap_or("");
        match self.target {
            AlertTarget::Sentiment => {
                if Sentiment::parse(value).is_none() {
                    return Err(InsightError::InvalidCondition(format!(
                        "unknown sentiment '{}'",
                        value
                    )));
                }
            }
            AlertTarget::Category => {
                if value.is_empty() {
                    return Err(InsightError::InvalidCondition(
                        "category target requires a category name".to_string(),
                    ));
                }
            }
            AlertTarget::Importance => {
                value.parse::<Level>()?;
            }
        }
        Ok(())
    }
}

/// Outcome of evaluating one condition against a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertResult {
    pub condition: AlertCondition,
    pub current_value: f64,
    pub triggered: bool,
    pub message: String,
}

/// Presentation severity of a triggered alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "高",
            Self::Medium => "中",
        }
    }
}

/// Maps a condition to a severity. Kept outside the engine so the UI can swap it.
pub type SeverityPolicy = fn(&AlertCondition) -> Severity;

/// Negative-sentiment conditions are high severity; everything else is medium.
pub fn default_severity(condition: &AlertCondition) -> Severity {
    let is_negative = condition
        .target_value
        .as_deref()
        .and_then(Sentiment::parse)
        == Some(Sentiment::Negative);

    match condition.target {
        AlertTarget::Sentiment if is_negative => Severity::High,
        AlertTarget::Sentiment | AlertTarget::Category | AlertTarget::Importance => {
            Severity::Medium
        }
    }
}
