// Snapshot and comment types exchanged with the analysis backend.
//
// Field names follow the backend's JSON (snake_case). The snapshot is validated
// once in `StatisticsSnapshot::from_json`; everything downstream works on these
// fully typed values.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{InsightError, Result};

pub type CategoryName = String;

/// Sentiment labels produced by the analysis backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "ポジティブ", alias = "positive")]
    Positive,
    #[serde(rename = "中立", alias = "neutral")]
    Neutral,
    #[serde(rename = "ネガティブ", alias = "negative")]
    Negative,
}

impl Sentiment {
    pub fn all() -> &'static [Sentiment] {
        &[Self::Positive, Self::Neutral, Self::Negative]
    }

    /// Display label used by the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Positive => "ポジティブ",
            Self::Neutral => "中立",
            Self::Negative => "ネガティブ",
        }
    }

    /// Accepts both the UI labels and the backend's English labels.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "ポジティブ" => Some(Self::Positive),
            "中立" => Some(Self::Neutral),
            "ネガティブ" => Some(Self::Negative),
            other => match other.to_ascii_lowercase().as_str() {
                "positive" => Some(Self::Positive),
                "neutral" => Some(Self::Neutral),
                "negative" => Some(Self::Negative),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordinal importance/commonality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "高", alias = "high")]
    High,
    #[serde(rename = "中", alias = "medium")]
    Medium,
    #[serde(rename = "低", alias = "low")]
    Low,
}

impl Level {
    pub fn all() -> &'static [Level] {
        &[Self::High, Self::Medium, Self::Low]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "高",
            Self::Medium => "中",
            Self::Low => "低",
        }
    }

    /// Ranking weight: high=3, medium=2, low=1.
    pub fn weight(&self) -> u32 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

impl FromStr for Level {
    type Err = InsightError;

    fn from_str(label: &str) -> Result<Self> {
        match label.trim() {
            "高" => Ok(Self::High),
            "中" => Ok(Self::Medium),
            "低" => Ok(Self::Low),
            other => match other.to_ascii_lowercase().as_str() {
                "high" => Ok(Self::High),
                "medium" => Ok(Self::Medium),
                "low" => Ok(Self::Low),
                _ => Err(InsightError::InvalidLabel(label.to_string())),
            },
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Overall sentiment counts and percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentStatistics {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    pub positive_percentage: f64,
    pub neutral_percentage: f64,
    pub negative_percentage: f64,
}

impl SentimentStatistics {
    pub fn count(&self, sentiment: Sentiment) -> u64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    pub fn percentage(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive_percentage,
            Sentiment::Neutral => self.neutral_percentage,
            Sentiment::Negative => self.negative_percentage,
        }
    }

    fn from_counts(positive: u64, neutral: u64, negative: u64, total: u64) -> Self {
        Self {
            positive,
            neutral,
            negative,
            positive_percentage: percentage_of(positive, total),
            neutral_percentage: percentage_of(neutral, total),
            negative_percentage: percentage_of(negative, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStatistic {
    pub category: CategoryName,
    pub count: u64,
    pub percentage: f64,
}

/// Sentiment breakdown within a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySentimentStatistic {
    pub category: CategoryName,
    #[serde(flatten)]
    pub sentiment: SentimentStatistics,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceStatistic {
    pub importance: Level,
    pub count: u64,
    pub percentage: f64,
}

/// Immutable aggregate view of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub overall_sentiment: SentimentStatistics,
    #[serde(default)]
    pub category_statistics: Vec<CategoryStatistic>,
    #[serde(default)]
    pub category_sentiment_statistics: Vec<CategorySentimentStatistic>,
    /// Optional importance aggregates; empty when the backend does not supply them.
    #[serde(default)]
    pub importance_statistics: Vec<ImportanceStatistic>,
}

impl StatisticsSnapshot {
    /// Parse and validate a snapshot received from the backend.
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(InsightError::InvalidSnapshot)
    }

    pub fn category(&self, name: &str) -> Option<&CategoryStatistic> {
        self.category_statistics
            .iter()
            .find(|stat| stat.category == name)
    }

    pub fn importance(&self, level: Level) -> Option<&ImportanceStatistic> {
        self.importance_statistics
            .iter()
            .find(|stat| stat.importance == level)
    }

    /// Aggregate a snapshot from analysed comments.
    ///
    /// Percentages are rounded to one decimal place. Categories keep their
    /// first-seen order. Comments with an unrecognised sentiment count towards
    /// the totals but not towards any sentiment bucket.
    pub fn from_comments(comments: &[AnalyzedComment]) -> Self {
        let total = comments.len() as u64;

        let mut overall = [0_u64; 3];
        let mut category_order: Vec<CategoryName> = Vec::new();
        let mut per_category: HashMap<CategoryName, [u64; 4]> = HashMap::new();
        let mut importance_counts: HashMap<Level, u64> = HashMap::new();

        for comment in comments {
            let sentiment_slot = Sentiment::parse(&comment.sentiment).map(sentiment_index);

            if let Some(slot) = sentiment_slot {
                overall[slot] += 1;
            }

            let entry = per_category
                .entry(comment.category.clone())
                .or_insert_with(|| {
                    category_order.push(comment.category.clone());
                    [0; 4]
                });
            entry[3] += 1;
            if let Some(slot) = sentiment_slot {
                entry[slot] += 1;
            }

            if let Ok(level) = comment.importance.parse::<Level>() {
                *importance_counts.entry(level).or_insert(0) += 1;
            }
        }

        let category_statistics = category_order
            .iter()
            .map(|category| {
                let count = per_category.get(category).map(|c| c[3]).unwrap_or(0);
                CategoryStatistic {
                    category: category.clone(),
                    count,
                    percentage: percentage_of(count, total),
                }
            })
            .collect();

        let category_sentiment_statistics = category_order
            .iter()
            .map(|category| {
                let [positive, neutral, negative, category_total] =
                    per_category.get(category).copied().unwrap_or([0; 4]);
                CategorySentimentStatistic {
                    category: category.clone(),
                    sentiment: SentimentStatistics::from_counts(
                        positive,
                        neutral,
                        negative,
                        category_total,
                    ),
                    total: category_total,
                }
            })
            .collect();

        let importance_statistics = Level::all()
            .iter()
            .filter_map(|level| {
                importance_counts.get(level).map(|&count| ImportanceStatistic {
                    importance: *level,
                    count,
                    percentage: percentage_of(count, total),
                })
            })
            .collect();

        Self {
            total_comments: total,
            overall_sentiment: SentimentStatistics::from_counts(
                overall[0], overall[1], overall[2], total,
            ),
            category_statistics,
            category_sentiment_statistics,
            importance_statistics,
        }
    }
}

fn sentiment_index(sentiment: Sentiment) -> usize {
    match sentiment {
        Sentiment::Positive => 0,
        Sentiment::Neutral => 1,
        Sentiment::Negative => 2,
    }
}

fn percentage_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

/// One comment as returned by the analysis backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedComment {
    pub id: String,
    pub comment: String,
    pub category: CategoryName,
    pub sentiment: String,
    pub importance: String,
    pub commonality: String,
}

impl AnalyzedComment {
    /// Parse the comment list returned by the backend.
    pub fn list_from_json(payload: &str) -> Result<Vec<Self>> {
        serde_json::from_str(payload).map_err(InsightError::InvalidComments)
    }

    /// Text to show for this comment.
    pub fn display_text(&self) -> String {
        display_text(&self.comment)
    }
}

/// Unwrap comment text that arrived as a serialized JSON object.
///
/// The first of `comment`, `text` or `content` found in the object is used;
/// anything else is returned unchanged.
pub fn display_text(raw: &str) -> String {
    let trimmed = raw.trim_start();
    if !trimmed.starts_with('{') {
        return raw.to_string();
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(fields)) => ["comment", "text", "content"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(|v| v.as_str()))
            .map_or_else(|| raw.to_string(), str::to_string),
        _ => raw.to_string(),
    }
}

/// A ranked comment with its derived score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopComment {
    pub id: String,
    pub comment: String,
    pub category: CategoryName,
    pub sentiment: String,
    pub importance: String,
    pub commonality: String,
    pub score: u32,
}

impl TopComment {
    pub fn display_text(&self) -> String {
        display_text(&self.comment)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopCommentsResult {
    pub max_count: usize,
    pub overall_top_comments: Vec<TopComment>,
    /// Keyed by category in order of first appearance; serialized as a JSON object.
    #[serde(serialize_with = "serialize_ordered_map")]
    pub category_top_comments: Vec<(CategoryName, Vec<TopComment>)>,
}

fn serialize_ordered_map<S>(
    entries: &[(CategoryName, Vec<TopComment>)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_map(entries.iter().map(|(category, comments)| (category, comments)))
}

impl TopCommentsResult {
    /// Replace every comment's text with its display form.
    pub fn into_display_text(mut self) -> Self {
        let lists = std::iter::once(&mut self.overall_top_comments)
            .chain(self.category_top_comments.iter_mut().map(|(_, list)| list));
        for list in lists {
            for top in list.iter_mut() {
                top.comment = top.display_text();
            }
        }
        self
    }

    pub fn category(&self, name: &str) -> Option<&[TopComment]> {
        self.category_top_comments
            .iter()
            .find(|(category, _)| category == name)
            .map(|(_, comments)| comments.as_slice())
    }
}
