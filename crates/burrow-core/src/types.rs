use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Group name used for comments that carry no file path.
pub const GENERAL_GROUP: &str = "general";

/// One reviewer submission event: a batch of comments posted together.
///
/// Sessions are totally ordered by [`ReviewSession::submitted_at`]; the
/// "most recent" session is the one with the maximum timestamp. A session is
/// immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    /// Review identifier assigned by the remote host.
    pub id: u64,
    /// When the reviewer submitted this batch.
    pub submitted_at: DateTime<Utc>,
    /// Comments in the order the reviewer produced them.
    pub comments: Vec<RawComment>,
}

/// One comment as delivered by the remote source, markup and all.
///
/// # Examples
///
/// ```
/// use burrow_core::{LineRef, RawComment};
///
/// let comment = RawComment {
///     file: Some("src/auth.ts".into()),
///     line: Some(LineRef::Single(42)),
///     body: "_🧹 Nitpick_\n\n**Prefer const**".into(),
///     session_id: 7,
/// };
/// assert_eq!(comment.session_id, 7);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    /// Path of the targeted file; `None` lands in the [`GENERAL_GROUP`].
    pub file: Option<String>,
    /// Line or line range the comment targets, if any.
    pub line: Option<LineRef>,
    /// Raw markup-bearing body.
    pub body: String,
    /// Back-reference to the owning session (not ownership).
    pub session_id: u64,
}

/// A line reference: a single line or an inclusive range.
///
/// # Examples
///
/// ```
/// use burrow_core::LineRef;
///
/// let r: LineRef = "16-24".parse().unwrap();
/// assert_eq!(r, LineRef::Range(16, 24));
/// assert_eq!(r.to_string(), "16-24");
///
/// let s: LineRef = "5".parse().unwrap();
/// assert_eq!(s.to_string(), "5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineRef {
    /// A single line.
    Single(u64),
    /// An inclusive start-end range.
    Range(u64, u64),
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineRef::Single(n) => write!(f, "{n}"),
            LineRef::Range(start, end) => write!(f, "{start}-{end}"),
        }
    }
}

impl FromStr for LineRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((start, end)) = s.split_once('-') {
            let start: u64 = start
                .trim()
                .parse()
                .map_err(|_| format!("invalid line reference: {s}"))?;
            let end: u64 = end
                .trim()
                .parse()
                .map_err(|_| format!("invalid line reference: {s}"))?;
            Ok(LineRef::Range(start, end))
        } else {
            let line: u64 = s
                .parse()
                .map_err(|_| format!("invalid line reference: {s}"))?;
            Ok(LineRef::Single(line))
        }
    }
}

/// Category assigned to a comment by the classifier.
///
/// # Examples
///
/// ```
/// use burrow_core::Category;
///
/// let c: Category = serde_json::from_str("\"outside-range\"").unwrap();
/// assert_eq!(c, Category::OutsideRange);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Substantial enough to warrant prioritized agent attention.
    Actionable,
    /// A minor style or convention remark.
    Nitpick,
    /// About code outside the lines changed in the current request.
    OutsideRange,
}

impl Category {
    /// Fixed rendering priority within a file group, highest first.
    pub const PRIORITY: [Category; 3] =
        [Category::Actionable, Category::Nitpick, Category::OutsideRange];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Actionable => write!(f, "actionable"),
            Category::Nitpick => write!(f, "nitpick"),
            Category::OutsideRange => write!(f, "outside-range"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "actionable" => Ok(Category::Actionable),
            "nitpick" => Ok(Category::Nitpick),
            "outside-range" | "outside_range" => Ok(Category::OutsideRange),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// A comment after normalization and classification.
///
/// Raw bodies mix prose, patches, and directive blocks inconsistently, so
/// every extracted piece is optional; any subset may be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedComment {
    /// Category assigned by the marker table.
    pub category: Category,
    /// Path of the targeted file, if any.
    pub file: Option<String>,
    /// Line reference, if any.
    pub line: Option<LineRef>,
    /// Bold title extracted from the head of the body, if present.
    pub title: Option<String>,
    /// Directive text intended for an automated coding agent.
    pub instruction: Option<String>,
    /// Literal before/after patch text.
    pub patch: Option<String>,
    /// Remaining prose after block extraction.
    pub description: Option<String>,
}

/// The single representation chosen for a comment.
///
/// The no-redundancy rule is encoded in the type: the instruction variant
/// has no room for a patch, so the final output can never present two
/// competing fixes for one finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Representation {
    /// Directive text for an automated agent, assumed self-sufficient.
    Instruction(String),
    /// A literal patch, with the surrounding prose kept for context.
    Patch {
        /// The patch text.
        diff: String,
        /// Prose context, since the patch alone may not explain itself.
        description: Option<String>,
    },
    /// Prose only.
    Description(String),
}

/// Why the selector chose the representation it chose.
///
/// Surfaced only by debug output; never affects the report structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Decision {
    /// The instruction was kept; anything else the comment carried was dropped.
    InstructionKept {
        /// A patch block was present and discarded.
        dropped_patch: bool,
        /// A description was present and discarded.
        dropped_description: bool,
    },
    /// The patch was kept, with its description when one existed.
    PatchKept {
        /// A description accompanied the patch.
        with_description: bool,
    },
    /// Only prose was available.
    DescriptionOnly,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::InstructionKept {
                dropped_patch,
                dropped_description,
            } => {
                write!(f, "instruction kept")?;
                match (dropped_patch, dropped_description) {
                    (true, true) => write!(f, " (patch and description discarded)"),
                    (true, false) => write!(f, " (patch discarded)"),
                    (false, true) => write!(f, " (description discarded)"),
                    (false, false) => Ok(()),
                }
            }
            Decision::PatchKept { with_description } => {
                if *with_description {
                    write!(f, "patch kept with description")
                } else {
                    write!(f, "patch kept")
                }
            }
            Decision::DescriptionOnly => write!(f, "description only"),
        }
    }
}

/// The single chosen representation for one comment, ready to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedItem {
    /// Category assigned by the classifier.
    pub category: Category,
    /// Line reference, if any.
    pub line: Option<LineRef>,
    /// Extracted title, if any.
    pub title: Option<String>,
    /// The chosen representation.
    pub representation: Representation,
    /// The selector's reasoning, for debug output.
    pub decision: Decision,
}

/// All rendered items for one file, in final output order.
///
/// Invariant: actionable items precede all others; order among items of
/// equal priority is the original per-file arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileGroup {
    /// File path, or [`GENERAL_GROUP`] for comments without one.
    pub file: String,
    /// Items in final order.
    pub items: Vec<RenderedItem>,
}

/// The complete report: ordered file groups plus aggregate counts.
///
/// Created once per invocation and never mutated after render.
///
/// # Examples
///
/// ```
/// use burrow_core::Report;
///
/// let report = Report::new(vec![]);
/// assert_eq!(report.total_files, 0);
/// assert_eq!(report.total_comments, 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// File groups in first-seen order.
    pub groups: Vec<FileGroup>,
    /// Number of distinct files with feedback.
    pub total_files: usize,
    /// Total comments across all groups.
    pub total_comments: usize,
}

impl Report {
    /// Build a report from grouped items, computing the aggregate counts.
    pub fn new(groups: Vec<FileGroup>) -> Self {
        let total_files = groups.len();
        let total_comments = groups.iter().map(|g| g.items.len()).sum();
        Self {
            groups,
            total_files,
            total_comments,
        }
    }
}

/// Which review sessions to process.
///
/// # Examples
///
/// ```
/// use burrow_core::SessionMode;
///
/// let mode: SessionMode = "all".parse().unwrap();
/// assert_eq!(mode, SessionMode::All);
/// assert_eq!(SessionMode::default(), SessionMode::LatestOnly);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    /// Only the most recently submitted session (default).
    #[default]
    LatestOnly,
    /// Every session, in session order.
    All,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::LatestOnly => write!(f, "latest-only"),
            SessionMode::All => write!(f, "all"),
        }
    }
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest-only" | "latest" => Ok(SessionMode::LatestOnly),
            "all" => Ok(SessionMode::All),
            other => Err(format!("unknown session mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_ref_from_str() {
        assert_eq!("5".parse::<LineRef>().unwrap(), LineRef::Single(5));
        assert_eq!("16-24".parse::<LineRef>().unwrap(), LineRef::Range(16, 24));
        assert_eq!(
            " 16 - 24 ".parse::<LineRef>().unwrap(),
            LineRef::Range(16, 24)
        );
        assert!("abc".parse::<LineRef>().is_err());
        assert!("1-".parse::<LineRef>().is_err());
    }

    #[test]
    fn line_ref_display() {
        assert_eq!(LineRef::Single(5).to_string(), "5");
        assert_eq!(LineRef::Range(16, 24).to_string(), "16-24");
    }

    #[test]
    fn category_display_and_from_str() {
        assert_eq!(Category::Actionable.to_string(), "actionable");
        assert_eq!(Category::OutsideRange.to_string(), "outside-range");
        assert_eq!(
            "outside-range".parse::<Category>().unwrap(),
            Category::OutsideRange
        );
        assert_eq!("Nitpick".parse::<Category>().unwrap(), Category::Nitpick);
        assert!("severe".parse::<Category>().is_err());
    }

    #[test]
    fn category_priority_is_actionable_first() {
        assert_eq!(Category::PRIORITY[0], Category::Actionable);
        assert_eq!(Category::PRIORITY[1], Category::Nitpick);
        assert_eq!(Category::PRIORITY[2], Category::OutsideRange);
    }

    #[test]
    fn category_serializes_kebab_case() {
        let json = serde_json::to_string(&Category::OutsideRange).unwrap();
        assert_eq!(json, "\"outside-range\"");
    }

    #[test]
    fn report_counts_sum_over_groups() {
        let item = RenderedItem {
            category: Category::Actionable,
            line: None,
            title: None,
            representation: Representation::Description("text".into()),
            decision: Decision::DescriptionOnly,
        };
        let report = Report::new(vec![
            FileGroup {
                file: "a.ts".into(),
                items: vec![item.clone(), item.clone()],
            },
            FileGroup {
                file: GENERAL_GROUP.into(),
                items: vec![item],
            },
        ]);
        assert_eq!(report.total_files, 2);
        assert_eq!(report.total_comments, 3);
    }

    #[test]
    fn session_mode_from_str() {
        assert_eq!(
            "latest-only".parse::<SessionMode>().unwrap(),
            SessionMode::LatestOnly
        );
        assert_eq!("ALL".parse::<SessionMode>().unwrap(), SessionMode::All);
        assert!("some".parse::<SessionMode>().is_err());
    }

    #[test]
    fn rendered_item_serializes_camel_case() {
        let item = RenderedItem {
            category: Category::Nitpick,
            line: Some(LineRef::Single(3)),
            title: Some("t".into()),
            representation: Representation::Instruction("do it".into()),
            decision: Decision::InstructionKept {
                dropped_patch: false,
                dropped_description: false,
            },
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("representation").is_some());
        assert!(json.get("decision").is_some());
    }

    #[test]
    fn decision_display() {
        let d = Decision::InstructionKept {
            dropped_patch: true,
            dropped_description: true,
        };
        assert_eq!(d.to_string(), "instruction kept (patch and description discarded)");
        assert_eq!(
            Decision::PatchKept {
                with_description: true
            }
            .to_string(),
            "patch kept with description"
        );
        assert_eq!(Decision::DescriptionOnly.to_string(), "description only");
    }
}
