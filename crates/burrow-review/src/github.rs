use burrow_core::{BurrowConfig, BurrowError, LineRef, RawComment, ReviewSession};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::sections;

/// GitHub client for fetching the review data of one pull request.
///
/// # Examples
///
/// ```
/// use burrow_review::github::parse_pr_reference;
///
/// let (owner, repo, number) =
///     parse_pr_reference("https://github.com/obra/lace/pull/278").unwrap();
/// assert_eq!(owner, "obra");
/// assert_eq!(repo, "lace");
/// assert_eq!(number, 278);
/// ```
pub struct GitHubClient {
    octocrab: octocrab::Octocrab,
}

#[derive(Debug, Deserialize)]
struct ApiReview {
    id: u64,
    user: Option<ApiUser>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiInlineComment {
    #[serde(default)]
    pull_request_review_id: Option<u64>,
    user: Option<ApiUser>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    line: Option<u64>,
    #[serde(default)]
    start_line: Option<u64>,
    #[serde(default)]
    original_line: Option<u64>,
    #[serde(default)]
    original_start_line: Option<u64>,
    body: String,
}

impl GitHubClient {
    /// Create a client from an explicit token or the `GITHUB_TOKEN` /
    /// `GH_TOKEN` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`BurrowError::Config`] if no token is available, or
    /// [`BurrowError::Fetch`] if the client cannot be built.
    pub fn new(token: Option<&str>) -> Result<Self, BurrowError> {
        let token = match token {
            Some(t) => t.to_string(),
            None => std::env::var("GITHUB_TOKEN")
                .or_else(|_| std::env::var("GH_TOKEN"))
                .map_err(|_| {
                    BurrowError::Config(
                        "GITHUB_TOKEN not set. Pass --github-token or set GITHUB_TOKEN env var"
                            .into(),
                    )
                })?,
        };

        let octocrab = octocrab::Octocrab::builder()
            .personal_token(token)
            .build()
            .map_err(|e| BurrowError::Fetch(format!("failed to create GitHub client: {e}")))?;

        Ok(Self { octocrab })
    }

    /// Fetch the reviewer's sessions for one pull request.
    ///
    /// Pulls both surfaces the reviewer writes to: review submissions
    /// (whose bodies carry the collapsible per-file comment sections) and
    /// inline review comments, attached to their owning session by review
    /// id. Sessions are returned in the order the host lists them.
    ///
    /// # Errors
    ///
    /// Returns [`BurrowError::Fetch`] on network or API errors. This is the
    /// fatal error of the run; nothing here recovers partially.
    pub async fn fetch_sessions(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        config: &BurrowConfig,
    ) -> Result<Vec<ReviewSession>, BurrowError> {
        let route = format!("/repos/{owner}/{repo}/pulls/{pr_number}/reviews?per_page=100");
        let reviews: Vec<ApiReview> = self.octocrab.get(route, None::<&()>).await.map_err(|e| {
            BurrowError::Fetch(format!(
                "failed to fetch reviews for {owner}/{repo}#{pr_number}: {e}"
            ))
        })?;

        let mut sessions: Vec<ReviewSession> = Vec::new();
        for review in reviews {
            let Some(user) = &review.user else { continue };
            if !config.reviewer.matches(&user.login) {
                continue;
            }
            // Pending reviews have no timestamp and are not submissions yet.
            let Some(submitted_at) = review.submitted_at else {
                continue;
            };
            let body = review.body.as_deref().unwrap_or_default();
            let comments = sections::parse_review_body(body, review.id, &config.markers);
            sessions.push(ReviewSession {
                id: review.id,
                submitted_at,
                comments,
            });
        }

        let route = format!("/repos/{owner}/{repo}/pulls/{pr_number}/comments?per_page=100");
        let inline: Vec<ApiInlineComment> =
            self.octocrab.get(route, None::<&()>).await.map_err(|e| {
                BurrowError::Fetch(format!(
                    "failed to fetch inline comments for {owner}/{repo}#{pr_number}: {e}"
                ))
            })?;

        for comment in inline {
            let Some(user) = &comment.user else { continue };
            if !config.reviewer.matches(&user.login) {
                continue;
            }
            let Some(review_id) = comment.pull_request_review_id else {
                continue;
            };
            let Some(session) = sessions.iter_mut().find(|s| s.id == review_id) else {
                continue;
            };
            session.comments.push(RawComment {
                file: comment.path.clone(),
                line: inline_line_ref(&comment),
                body: comment.body.clone(),
                session_id: review_id,
            });
        }

        Ok(sessions)
    }
}

fn inline_line_ref(comment: &ApiInlineComment) -> Option<LineRef> {
    let start = comment.start_line.or(comment.original_start_line);
    let end = comment.line.or(comment.original_line);
    match (start, end) {
        (Some(start), Some(end)) if start != end => Some(LineRef::Range(start, end)),
        (_, Some(line)) => Some(LineRef::Single(line)),
        (Some(line), None) => Some(LineRef::Single(line)),
        (None, None) => None,
    }
}

/// Parse a pull request reference into `(owner, repo, number)`.
///
/// Accepts the full URL form, the short `owner/repo/number` form, and
/// `owner/repo#number`.
///
/// # Errors
///
/// Returns [`BurrowError::Config`] if the format is invalid.
///
/// # Examples
///
/// ```
/// use burrow_review::github::parse_pr_reference;
///
/// let (owner, repo, num) = parse_pr_reference("obra/lace/278").unwrap();
/// assert_eq!((owner.as_str(), repo.as_str(), num), ("obra", "lace", 278));
///
/// assert!(parse_pr_reference("not-a-reference").is_err());
/// ```
pub fn parse_pr_reference(input: &str) -> Result<(String, String, u64), BurrowError> {
    let input = input.trim();
    let invalid = || {
        BurrowError::Config(format!(
            "invalid PR reference '{input}', expected a GitHub PR URL, owner/repo/number, or owner/repo#number"
        ))
    };

    if let Some(rest) = input
        .strip_prefix("https://github.com/")
        .or_else(|| input.strip_prefix("http://github.com/"))
    {
        let parts: Vec<&str> = rest.trim_end_matches('/').split('/').collect();
        if parts.len() >= 4 && parts[2] == "pull" {
            let number: u64 = parts[3].parse().map_err(|_| invalid())?;
            return Ok((parts[0].to_string(), parts[1].to_string(), number));
        }
        return Err(invalid());
    }

    if let Some((owner_repo, number_str)) = input.split_once('#') {
        let Some((owner, repo)) = owner_repo.split_once('/') else {
            return Err(invalid());
        };
        let number: u64 = number_str.parse().map_err(|_| invalid())?;
        return Ok((owner.to_string(), repo.to_string(), number));
    }

    let parts: Vec<&str> = input.split('/').collect();
    if parts.len() == 3 && !parts[0].is_empty() && !parts[1].is_empty() {
        let number: u64 = parts[2].parse().map_err(|_| invalid())?;
        return Ok((parts[0].to_string(), parts[1].to_string(), number));
    }

    Err(invalid())
}
