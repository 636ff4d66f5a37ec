// Top-comment ranking, overall and per category.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::model::{AnalyzedComment, CategoryName, CategorySentimentStatistic, TopComment, TopCommentsResult};
use super::scoring;

/// Category that always sorts last in display order.
pub const OTHER_CATEGORY: &str = "その他";

impl TopComment {
    pub fn scored(comment: &AnalyzedComment) -> Self {
        Self {
            id: comment.id.clone(),
            comment: comment.comment.clone(),
            category: comment.category.clone(),
            sentiment: comment.sentiment.clone(),
            importance: comment.importance.clone(),
            commonality: comment.commonality.clone(),
            score: scoring::score(&comment.importance, &comment.commonality),
        }
    }
}

/// Rank comments by score, keeping input order among equal scores.
///
/// `max_count` is honoured as given; zero yields empty lists.
pub fn rank(comments: &[AnalyzedComment], max_count: usize) -> TopCommentsResult {
    let scored: Vec<TopComment> = comments.iter().map(TopComment::scored).collect();

    let mut order: Vec<CategoryName> = Vec::new();
    let mut groups: HashMap<CategoryName, Vec<TopComment>> = HashMap::new();
    for comment in &scored {
        groups
            .entry(comment.category.clone())
            .or_insert_with(|| {
                order.push(comment.category.clone());
                Vec::new()
            })
            .push(comment.clone());
    }

    let category_top_comments = order
        .into_iter()
        .map(|category| {
            let members = groups.remove(&category).unwrap_or_default();
            (category, top_n(members, max_count))
        })
        .collect();

    let result = TopCommentsResult {
        max_count,
        overall_top_comments: top_n(scored, max_count),
        category_top_comments,
    };

    log::debug!(
        "Ranked {} comments into {} categories (max {})",
        comments.len(),
        result.category_top_comments.len(),
        max_count
    );

    result
}

// `sort_by` is stable, so ties keep their input order.
fn top_n(mut comments: Vec<TopComment>, max_count: usize) -> Vec<TopComment> {
    comments.sort_by(|a, b| b.score.cmp(&a.score));
    comments.truncate(max_count);
    comments
}

/// Display order for category keys: `other` last, the rest lexicographic.
pub fn compare_categories(a: &str, b: &str, other: &str) -> Ordering {
    match (a == other, b == other) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

/// Category keys of a ranking result in display order.
pub fn display_categories<'a>(result: &'a TopCommentsResult, other: &str) -> Vec<&'a str> {
    let mut keys: Vec<&str> = result
        .category_top_comments
        .iter()
        .map(|(category, _)| category.as_str())
        .collect();
    keys.sort_by(|a, b| compare_categories(a, b, other));
    keys
}

/// Per-category sentiment breakdown in the same display order.
pub fn category_sentiment_display_order<'a>(
    stats: &'a [CategorySentimentStatistic],
    other: &str,
) -> Vec<&'a CategorySentimentStatistic> {
    let mut ordered: Vec<&CategorySentimentStatistic> = stats.iter().collect();
    ordered.sort_by(|a, b| compare_categories(&a.category, &b.category, other));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::SentimentStatistics;

    fn make_comment(id: &str, category: &str, importance: &str, commonality: &str) -> AnalyzedComment {
        AnalyzedComment {
            id: id.to_string(),
            comment: format!("comment {}", id),
            category: category.to_string(),
            sentiment: "中立".to_string(),
            importance: importance.to_string(),
            commonality: commonality.to_string(),
        }
    }

    fn ids(comments: &[TopComment]) -> Vec<&str> {
        comments.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_rank_truncates_and_keeps_tie_order() {
        // scores: 9, 9, 6, 6, 3, 3, 1 (shuffled in input)
        let comments = vec![
            make_comment("c3a", "講義内容", "高", "低"),
            make_comment("c9a", "運営", "高", "高"),
            make_comment("c6a", "運営", "高", "中"),
            make_comment("c1", "講義資料", "低", "低"),
            make_comment("c9b", "講義内容", "高", "高"),
            make_comment("c6b", "講義資料", "中", "高"),
            make_comment("c3b", "その他", "低", "高"),
        ];

        let result = rank(&comments, 5);
        assert_eq!(result.overall_top_comments.len(), 5);
        assert_eq!(ids(&result.overall_top_comments), vec!["c9a", "c9b", "c6a", "c6b", "c3a"]);

        let scores: Vec<u32> = result.overall_top_comments.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![9, 9, 6, 6, 3]);
    }

    #[test]
    fn test_rank_per_category() {
        let comments = vec![
            make_comment("a", "運営", "低", "低"),
            make_comment("b", "講義内容", "高", "中"),
            make_comment("c", "運営", "高", "高"),
            make_comment("d", "運営", "中", "中"),
        ];

        let result = rank(&comments, 2);
        let keys: Vec<&str> = result
            .category_top_comments
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["運営", "講義内容"]);
        assert_eq!(ids(result.category("運営").unwrap()), vec!["c", "d"]);
        assert_eq!(ids(result.category("講義内容").unwrap()), vec!["b"]);
        assert!(result.category("その他").is_none());
    }

    #[test]
    fn test_rank_empty() {
        for n in [0, 1, 5, 100] {
            let result = rank(&[], n);
            assert!(result.overall_top_comments.is_empty());
            assert!(result.category_top_comments.is_empty());
        }
    }

    #[test]
    fn test_rank_honours_out_of_range_counts() {
        let comments: Vec<AnalyzedComment> = (0..15)
            .map(|i| make_comment(&i.to_string(), "運営", "中", "中"))
            .collect();
        assert_eq!(rank(&comments, 12).overall_top_comments.len(), 12);
        assert!(rank(&comments, 0).overall_top_comments.is_empty());
    }

    #[test]
    fn test_unknown_labels_rank_as_low() {
        let comments = vec![
            make_comment("unknown", "運営", "???", "高"),
            make_comment("medium", "運営", "中", "高"),
        ];
        let result = rank(&comments, 2);
        assert_eq!(ids(&result.overall_top_comments), vec!["medium", "unknown"]);
        assert_eq!(result.overall_top_comments[1].score, 3);
    }

    #[test]
    fn test_display_categories_put_other_last() {
        let comments = vec![
            make_comment("1", OTHER_CATEGORY, "高", "高"),
            make_comment("2", "運営", "高", "高"),
            make_comment("3", "講義内容", "高", "高"),
            make_comment("4", "講義資料", "高", "高"),
        ];
        let result = rank(&comments, 5);
        let keys = display_categories(&result, OTHER_CATEGORY);
        assert_eq!(keys.last(), Some(&OTHER_CATEGORY));
        let mut expected = vec!["運営", "講義内容", "講義資料"];
        expected.sort();
        assert_eq!(&keys[..3], expected.as_slice());
    }

    #[test]
    fn test_category_sentiment_display_order() {
        let stat = |name: &str| CategorySentimentStatistic {
            category: name.to_string(),
            sentiment: SentimentStatistics::default(),
            total: 0,
        };
        let stats = vec![stat(OTHER_CATEGORY), stat("b"), stat("a")];
        let ordered: Vec<&str> = category_sentiment_display_order(&stats, OTHER_CATEGORY)
            .into_iter()
            .map(|s| s.category.as_str())
            .collect();
        assert_eq!(ordered, vec!["a", "b", OTHER_CATEGORY]);
    }

    #[test]
    fn test_serializes_categories_as_object() {
        let comments = vec![make_comment("1", "運営", "高", "高")];
        let json = serde_json::to_value(rank(&comments, 3)).unwrap();
        assert_eq!(json["max_count"], 3);
        assert_eq!(json["category_top_comments"]["運営"][0]["score"], 9);
    }
}
