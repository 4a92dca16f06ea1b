use burrow_core::{RawComment, ReviewSession, SessionMode};

/// Pick the comments to process from the full session list.
///
/// In [`SessionMode::LatestOnly`] the session with the maximum
/// `submitted_at` wins; identical timestamps are broken in favor of the
/// session appearing last in source order. In [`SessionMode::All`] every
/// session contributes, in session order then per-session order. Zero
/// sessions yield an empty list — downstream stages render a valid empty
/// report rather than failing.
pub fn select_comments(sessions: &[ReviewSession], mode: SessionMode) -> Vec<RawComment> {
    match mode {
        SessionMode::All => sessions
            .iter()
            .flat_map(|s| s.comments.iter().cloned())
            .collect(),
        SessionMode::LatestOnly => {
            let mut latest: Option<&ReviewSession> = None;
            for session in sessions {
                match latest {
                    // strictly older sessions lose; equal timestamps are
                    // replaced so the last-listed session wins the tie
                    Some(current) if session.submitted_at < current.submitted_at => {}
                    _ => latest = Some(session),
                }
            }
            latest.map(|s| s.comments.clone()).unwrap_or_default()
        }
    }
}
