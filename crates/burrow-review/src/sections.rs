use burrow_core::{LineRef, MarkerConfig, RawComment};
use once_cell::sync::Lazy;
use regex::Regex;

static SUMMARY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<summary>([^<]+)</summary>").expect("summary regex"));

// One collapsible per-file block: `<summary>path (count)</summary>` followed
// by its blockquote. Non-greedy, so nested instruction <details> (which have
// no blockquote of their own) never cut a block short.
static FILE_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)<summary>([^<]+?)\s*\((\d+)\)</summary>\s*<blockquote>(.*?)</blockquote>\s*</details>",
    )
    .expect("file section regex")
});

// One line-ranged entry inside a file block: `16-24`: **Title**
static LINE_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^`([^`\n]+)`:\s*\*\*([^\n]*?)\*\*").expect("line entry regex"));

static VALID_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9][0-9, \t-]*$").expect("range regex"));

// Summaries that end the comment sections of a review body.
const FOOTER_PHRASES: &[&str] = &["review details", "additional comments", "walkthrough"];

/// Split one review body into per-file raw comments.
///
/// A review body carries its comments inside collapsible sections labeled
/// with the outside-range and nitpick phrases, one nested block per file,
/// one backticked line-range entry per comment. Each extracted body is
/// prefixed with the owning section's label, so body-sourced comments
/// present the same sentinel surface to the classifier as inline comments
/// do. Walkthrough or summary bodies contain no such sections and yield
/// nothing.
pub fn parse_review_body(body: &str, session_id: u64, markers: &MarkerConfig) -> Vec<RawComment> {
    // CRLF would defeat the line-anchored entry matching below.
    let body = body.replace("\r\n", "\n");
    let body = body.as_str();

    let mut comments = Vec::new();
    for section in find_sections(body, markers) {
        for caps in FILE_SECTION.captures_iter(section.content) {
            let file = caps[1].trim().to_string();
            let content = caps
                .get(3)
                .map(|m| m.as_str())
                .unwrap_or_default();
            parse_file_entries(&section.label, &file, content, session_id, &mut comments);
        }
    }
    comments
}

struct Section<'a> {
    label: String,
    content: &'a str,
}

fn find_sections<'a>(body: &'a str, markers: &MarkerConfig) -> Vec<Section<'a>> {
    struct Summary {
        start: usize,
        end: usize,
        text: String,
        is_section: bool,
        is_boundary: bool,
    }

    let summaries: Vec<Summary> = SUMMARY_TAG
        .captures_iter(body)
        .map(|caps| {
            let whole = caps.get(0).expect("capture 0 always present");
            let text = caps[1].trim().to_string();
            let is_section = markers.is_outside_range(&text) || markers.is_nitpick(&text);
            let lower = text.to_lowercase();
            let is_footer = FOOTER_PHRASES.iter().any(|p| lower.contains(p));
            Summary {
                start: whole.start(),
                end: whole.end(),
                text,
                is_section,
                is_boundary: is_section || is_footer,
            }
        })
        .collect();

    let mut sections = Vec::new();
    for (i, summary) in summaries.iter().enumerate() {
        if !summary.is_section {
            continue;
        }
        let end = summaries[i + 1..]
            .iter()
            .find(|s| s.is_boundary)
            .map(|s| s.start)
            .unwrap_or(body.len());
        sections.push(Section {
            label: summary.text.clone(),
            content: &body[summary.end..end],
        });
    }
    sections
}

fn parse_file_entries(
    label: &str,
    file: &str,
    content: &str,
    session_id: u64,
    out: &mut Vec<RawComment>,
) {
    let entries: Vec<(usize, usize, String, String)> = LINE_ENTRY
        .captures_iter(content)
        .filter(|caps| VALID_RANGE.is_match(caps[1].trim()))
        .map(|caps| {
            let whole = caps.get(0).expect("capture 0 always present");
            (
                whole.start(),
                whole.end(),
                caps[1].trim().to_string(),
                caps[2].trim().to_string(),
            )
        })
        .collect();

    for (i, (_, end, range, title)) in entries.iter().enumerate() {
        let next_start = entries.get(i + 1).map(|e| e.0).unwrap_or(content.len());
        let rest = content[*end..next_start].trim();
        let body = format!("_{label}_\n\n**{title}**\n\n{rest}");
        out.push(RawComment {
            file: Some(file.to_string()),
            line: parse_line_ref(range),
            body,
            session_id,
        });
    }
}

// Multi-range entries ("5-7, 10-12") keep the first range; the rest stays in
// the body text as-is.
fn parse_line_ref(range: &str) -> Option<LineRef> {
    let first = range.split(',').next().unwrap_or(range).trim();
    first.parse().ok()
}
