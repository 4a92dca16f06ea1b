use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// A comment body with presentation markup stripped from its free text.
#[derive(Debug, Clone)]
pub struct NormalizedBody {
    /// The normalized text. Fenced blocks and inline code spans are
    /// byte-for-byte identical to the input.
    pub text: String,
    /// `true` if the body could not be treated as structured markup and was
    /// returned unmodified instead.
    pub recovered: bool,
}

static FENCE_DELIM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*```").expect("fence delim regex"));

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?ms)^[ \t]*```[^\n]*\n.*?^[ \t]*```[ \t]*$").expect("fenced block regex"));

static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`[^`\n]+`").expect("inline code regex"));

static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("html comment regex"));

// Reviewer boilerplate blockquotes ("‼️ **IMPORTANT** ..." and the
// "Carefully review ..." variant) including their continuation lines.
static WARNING_QUOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*>\s*(‼️\s*\*\*IMPORTANT\*\*|Carefully review).*(?:\n[ \t]*>.*)*")
        .expect("warning quote regex")
});

// Presentational tags only. An unknown angle-bracketed token (`Vec<u8>` in
// prose) is left alone.
static HTML_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)</?(?:details|summary|blockquote|div|span|p|br|hr|b|i|em|strong|u|sub|sup|tt|kbd|img|a|ul|ol|li|table|thead|tbody|tr|td|th|h[1-6])(?:\s[^>]*)?/?>",
    )
    .expect("html tag regex")
});

static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]+$").expect("blank line regex"));

static EXTRA_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("newline collapse regex"));

/// Strip presentation markup from one raw comment body.
///
/// Fenced blocks and inline code spans are lifted out before any stripping
/// runs and restored untouched afterwards, so literal diff content that
/// happens to contain `<` or `>` survives intact. A body whose fencing does
/// not balance cannot be treated as structured markup; it is returned
/// unmodified with [`NormalizedBody::recovered`] set, so one malformed
/// comment never aborts the rest of the run.
///
/// # Examples
///
/// ```
/// use burrow_review::normalize::normalize_body;
///
/// let raw = "<details><summary>hint</summary>Use &lt;T&gt; here</details>";
/// let normalized = normalize_body(raw);
/// assert_eq!(normalized.text, "hintUse <T> here");
/// assert!(!normalized.recovered);
/// ```
pub fn normalize_body(raw: &str) -> NormalizedBody {
    // The remote host delivers CRLF line endings; canonicalize before any
    // line-anchored matching.
    let raw = raw.replace("\r\n", "\n");

    if FENCE_DELIM.find_iter(&raw).count() % 2 != 0 {
        return NormalizedBody {
            text: raw,
            recovered: true,
        };
    }

    // Lift opaque spans out before stripping anything.
    let mut blocks: Vec<String> = Vec::new();
    let text = FENCED_BLOCK.replace_all(&raw, |caps: &Captures| {
        let token = format!("\u{0}B{}\u{0}", blocks.len());
        blocks.push(caps[0].to_string());
        token
    });
    let mut spans: Vec<String> = Vec::new();
    let text = INLINE_CODE.replace_all(&text, |caps: &Captures| {
        let token = format!("\u{0}C{}\u{0}", spans.len());
        spans.push(caps[0].to_string());
        token
    });

    let text = HTML_COMMENT.replace_all(&text, "");
    let text = WARNING_QUOTE.replace_all(&text, "");
    let text = HTML_TAG.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = BLANK_LINE.replace_all(&text, "");
    let text = EXTRA_NEWLINES.replace_all(&text, "\n\n");
    let mut text = text.trim().to_string();

    for (i, span) in spans.iter().enumerate() {
        text = text.replace(&format!("\u{0}C{i}\u{0}"), span);
    }
    for (i, block) in blocks.iter().enumerate() {
        text = text.replace(&format!("\u{0}B{i}\u{0}"), block);
    }

    NormalizedBody {
        text,
        recovered: false,
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
