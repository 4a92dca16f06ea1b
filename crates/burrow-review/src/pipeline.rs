use std::fmt;

use burrow_core::{MarkerConfig, Report, ReviewSession, SessionMode};
use serde::Serialize;

use crate::{classify, group, normalize, select, session};

/// Result of a completed extraction run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    /// The final grouped, ordered report.
    pub report: Report,
    /// Statistics about the run.
    pub stats: ExtractionStats,
}

/// Statistics about an extraction run.
///
/// # Examples
///
/// ```
/// use burrow_review::pipeline::ExtractionStats;
///
/// let stats = ExtractionStats {
///     sessions_seen: 3,
///     sessions_selected: 1,
///     comments_processed: 5,
///     comments_recovered: 0,
/// };
/// assert!(stats.sessions_selected <= stats.sessions_seen);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStats {
    /// Review sessions present on the request.
    pub sessions_seen: usize,
    /// Sessions that contributed comments after mode selection.
    pub sessions_selected: usize,
    /// Comments that went through the pipeline.
    pub comments_processed: usize,
    /// Comments whose markup could not be normalized and fell back to raw
    /// text.
    pub comments_recovered: usize,
}

impl fmt::Display for ExtractionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sessions: {} seen, {} selected; comments: {} processed, {} recovered",
            self.sessions_seen,
            self.sessions_selected,
            self.comments_processed,
            self.comments_recovered,
        )
    }
}

/// Orchestrator that drives the full extraction pipeline.
///
/// Runs session selection, then per comment: markup normalization,
/// classification, and representation selection, then file grouping. The
/// pipeline owns every intermediate structure and performs no I/O, so a run
/// is deterministic for a given input.
pub struct ExtractionPipeline {
    markers: MarkerConfig,
    mode: SessionMode,
}

impl ExtractionPipeline {
    /// Create a pipeline from a marker table and session mode.
    pub fn new(markers: MarkerConfig, mode: SessionMode) -> Self {
        Self { markers, mode }
    }

    /// Run the pipeline over already-fetched sessions.
    pub fn run(&self, sessions: &[ReviewSession]) -> Extraction {
        let sessions_seen = sessions.len();
        let selected = session::select_comments(sessions, self.mode);
        let sessions_selected = match self.mode {
            SessionMode::All => sessions_seen,
            SessionMode::LatestOnly => sessions_seen.min(1),
        };

        let mut comments_recovered = 0;
        let mut pairs = Vec::with_capacity(selected.len());
        for raw in &selected {
            let normalized = normalize::normalize_body(&raw.body);
            if normalized.recovered {
                comments_recovered += 1;
            }
            let classified = classify::classify(raw, &normalized.text, &self.markers);
            let file = classified.file.clone();
            pairs.push((file, select::select_representation(classified)));
        }

        let report = Report::new(group::group_by_file(pairs));
        Extraction {
            report,
            stats: ExtractionStats {
                sessions_seen,
                sessions_selected,
                comments_processed: selected.len(),
                comments_recovered,
            },
        }
    }
}
