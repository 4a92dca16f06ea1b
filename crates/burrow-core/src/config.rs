use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BurrowError;

/// Top-level configuration loaded from `.burrow.toml`.
///
/// Every field has a default, so a missing or empty file behaves like the
/// stock setup.
///
/// # Examples
///
/// ```
/// use burrow_core::BurrowConfig;
///
/// let config = BurrowConfig::default();
/// assert!(config.reviewer.logins.contains(&"coderabbitai".to_string()));
/// assert!(!config.report.all_reviews);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BurrowConfig {
    /// Which remote accounts count as the automated reviewer.
    #[serde(default)]
    pub reviewer: ReviewerConfig,
    /// Sentinel phrases the reviewer embeds in comment bodies.
    #[serde(default)]
    pub markers: MarkerConfig,
    /// Report behavior settings.
    #[serde(default)]
    pub report: ReportConfig,
}

impl BurrowConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BurrowError::Io`] if the file cannot be read, or
    /// [`BurrowError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use burrow_core::BurrowConfig;
    /// use std::path::Path;
    ///
    /// let config = BurrowConfig::from_file(Path::new(".burrow.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, BurrowError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`BurrowError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow_core::BurrowConfig;
    ///
    /// let toml = r#"
    /// [report]
    /// all_reviews = true
    /// "#;
    /// let config = BurrowConfig::from_toml(toml).unwrap();
    /// assert!(config.report.all_reviews);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, BurrowError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Remote accounts whose reviews and comments are processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerConfig {
    /// Account logins, matched case-insensitively.
    #[serde(default = "default_logins")]
    pub logins: Vec<String>,
}

fn default_logins() -> Vec<String> {
    vec!["coderabbitai".into(), "coderabbitai[bot]".into()]
}

impl Default for ReviewerConfig {
    fn default() -> Self {
        Self {
            logins: default_logins(),
        }
    }
}

impl ReviewerConfig {
    /// Returns `true` if `login` belongs to the configured reviewer.
    pub fn matches(&self, login: &str) -> bool {
        self.logins.iter().any(|l| l.eq_ignore_ascii_case(login))
    }
}

/// The sentinel-phrase table used by the classifier.
///
/// The upstream reviewer's phrasing changes independently of this tool, so
/// the phrases live in configuration rather than scattered string checks.
/// Matching is case-insensitive substring containment.
///
/// # Examples
///
/// ```
/// use burrow_core::MarkerConfig;
///
/// let markers = MarkerConfig::default();
/// assert!(markers.is_nitpick("_🧹 Nitpick (assertive)_ rename this"));
/// assert!(markers.is_outside_range("♻️ Outside diff range comments"));
/// assert!(!markers.is_nitpick("plain comment"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Phrases marking a comment as outside the reviewed diff range.
    #[serde(default = "default_outside_range_markers")]
    pub outside_range: Vec<String>,
    /// Phrases marking a comment as a nitpick.
    #[serde(default = "default_nitpick_markers")]
    pub nitpick: Vec<String>,
    /// Phrases introducing a fenced agent-instruction block.
    #[serde(default = "default_instruction_markers")]
    pub instruction: Vec<String>,
}

fn default_outside_range_markers() -> Vec<String> {
    vec!["outside diff range".into()]
}

fn default_nitpick_markers() -> Vec<String> {
    vec!["nitpick".into()]
}

fn default_instruction_markers() -> Vec<String> {
    vec!["prompt for ai agents".into()]
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            outside_range: default_outside_range_markers(),
            nitpick: default_nitpick_markers(),
            instruction: default_instruction_markers(),
        }
    }
}

impl MarkerConfig {
    /// Returns `true` if `body` carries an outside-diff-range marker.
    pub fn is_outside_range(&self, body: &str) -> bool {
        contains_any(body, &self.outside_range)
    }

    /// Returns `true` if `body` carries a nitpick marker.
    pub fn is_nitpick(&self, body: &str) -> bool {
        contains_any(body, &self.nitpick)
    }

    /// Byte offsets in `body` where an instruction marker occurs.
    pub fn instruction_offsets(&self, body: &str) -> Vec<usize> {
        let lower = body.to_lowercase();
        let mut offsets = Vec::new();
        for marker in &self.instruction {
            let needle = marker.to_lowercase();
            if needle.is_empty() {
                continue;
            }
            let mut from = 0;
            while let Some(pos) = lower[from..].find(&needle) {
                offsets.push(from + pos);
                from += pos + needle.len();
            }
        }
        offsets.sort_unstable();
        offsets
    }
}

fn contains_any(body: &str, markers: &[String]) -> bool {
    let lower = body.to_lowercase();
    markers
        .iter()
        .any(|m| !m.is_empty() && lower.contains(&m.to_lowercase()))
}

/// Report behavior settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Process every review session instead of only the most recent one.
    #[serde(default)]
    pub all_reviews: bool,
}
