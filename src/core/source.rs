//! Collaborator boundary: where snapshots and analysed comments come from.

use std::fs;
use std::path::PathBuf;

use super::error::Result;
use super::model::{AnalyzedComment, StatisticsSnapshot};

/// Supplies the results of the most recent analysis run.
pub trait AnalysisSource {
    /// Statistics for the latest run, or `None` if nothing has been analysed yet.
    fn fetch_statistics(&self) -> Result<Option<StatisticsSnapshot>>;

    /// Analysed comments. `max_count` is a hint; sources may return more and
    /// the ranker truncates.
    fn fetch_comments(&self, max_count: usize) -> Result<Vec<AnalyzedComment>>;

    /// Statistics and comments for one refresh.
    ///
    /// Sources that derive one from the other should override this so both
    /// come from the same read.
    fn fetch_analysis(&self, max_count: usize) -> Result<AnalysisRun> {
        Ok(AnalysisRun {
            snapshot: self.fetch_statistics()?,
            comments: self.fetch_comments(max_count)?,
        })
    }
}

/// The output of one analysis run as seen by a single refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisRun {
    pub snapshot: Option<StatisticsSnapshot>,
    pub comments: Vec<AnalyzedComment>,
}

/// Reads backend JSON exports from disk.
///
/// Without a statistics file the snapshot is aggregated from the comments.
pub struct FileSource {
    statistics_path: Option<PathBuf>,
    comments_path: Option<PathBuf>,
}

impl FileSource {
    pub fn new(statistics_path: Option<PathBuf>, comments_path: Option<PathBuf>) -> Self {
        Self {
            statistics_path,
            comments_path,
        }
    }

    fn load_comments(&self) -> Result<Vec<AnalyzedComment>> {
        match &self.comments_path {
            Some(path) => AnalyzedComment::list_from_json(&fs::read_to_string(path)?),
            None => Ok(Vec::new()),
        }
    }

    fn load_statistics(&self, comments: &[AnalyzedComment]) -> Result<Option<StatisticsSnapshot>> {
        if let Some(path) = &self.statistics_path {
            let content = fs::read_to_string(path)?;
            return StatisticsSnapshot::from_json(&content).map(Some);
        }
        if self.comments_path.is_some() {
            log::info!("No statistics file; aggregating {} comments", comments.len());
            return Ok(Some(StatisticsSnapshot::from_comments(comments)));
        }
        Ok(None)
    }
}

impl AnalysisSource for FileSource {
    fn fetch_statistics(&self) -> Result<Option<StatisticsSnapshot>> {
        if self.statistics_path.is_some() {
            return self.load_statistics(&[]);
        }
        let comments = self.load_comments()?;
        self.load_statistics(&comments)
    }

    fn fetch_comments(&self, _max_count: usize) -> Result<Vec<AnalyzedComment>> {
        self.load_comments()
    }

    fn fetch_analysis(&self, _max_count: usize) -> Result<AnalysisRun> {
        let comments = self.load_comments()?;
        let snapshot = self.load_statistics(&comments)?;
        Ok(AnalysisRun { snapshot, comments })
    }
}
