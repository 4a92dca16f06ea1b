use burrow_core::{Category, ClassifiedComment, MarkerConfig, RawComment};
use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?ms)^[ \t]*```([^\n]*)\n(.*?)^[ \t]*```[ \t]*$").expect("fenced block regex"));

static LEADING_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\*\*([^*\n]+)\*\*:?[ \t]*").expect("leading title regex"));

static ALSO_APPLIES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^also applies to:.*$").expect("also applies regex"));

static HR_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*-{3,}[ \t]*$").expect("hr regex"));

static HUNK_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*@@[^\n]*\n?").expect("hunk marker regex"));

// A line that is nothing but an italic tag, e.g. `_🧹 Nitpick (assertive)_`.
static ITALIC_TAG_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*_[^_]*_\s*$").expect("italic tag regex"));

static EXTRA_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("newline collapse regex"));

#[derive(Debug)]
struct Block {
    start: usize,
    end: usize,
    info: String,
    content: String,
}

/// Classify one normalized comment.
///
/// The category comes from the marker table, in priority order:
/// outside-range markers win, then nitpick markers, otherwise the comment is
/// actionable. Independently of the category, at most one fenced
/// agent-instruction block and at most one fenced patch block are extracted;
/// whatever prose remains becomes the description. When a comment carries
/// more than one block of a kind, only the first is kept and the rest are
/// folded into the description as plain text.
pub fn classify(raw: &RawComment, normalized: &str, markers: &MarkerConfig) -> ClassifiedComment {
    let category = if markers.is_outside_range(normalized) {
        Category::OutsideRange
    } else if markers.is_nitpick(normalized) {
        Category::Nitpick
    } else {
        Category::Actionable
    };

    let blocks: Vec<Block> = FENCED_BLOCK
        .captures_iter(normalized)
        .map(|caps| {
            let whole = caps.get(0).expect("capture 0 always present");
            Block {
                start: whole.start(),
                end: whole.end(),
                info: caps[1].trim().to_string(),
                content: caps[2].to_string(),
            }
        })
        .collect();

    // A block is an instruction block when an instruction marker precedes it
    // and no other block sits between the marker and the fence.
    let mut instruction_indices: Vec<usize> = Vec::new();
    for offset in markers.instruction_offsets(normalized) {
        let claimed = blocks
            .iter()
            .enumerate()
            .find(|(i, b)| b.start >= offset && !instruction_indices.contains(i))
            .map(|(i, _)| i);
        if let Some(i) = claimed {
            instruction_indices.push(i);
        }
    }
    instruction_indices.sort_unstable();
    let kept_instruction = instruction_indices.first().copied();

    let kept_patch = blocks
        .iter()
        .enumerate()
        .find(|(i, b)| !instruction_indices.contains(i) && is_patch_fence(&b.info))
        .map(|(i, _)| i);

    // Everything not kept stays in the description; surplus blocks are
    // folded in as plain text.
    let mut description = String::new();
    let mut pos = 0;
    for (i, block) in blocks.iter().enumerate() {
        description.push_str(&normalized[pos..block.start]);
        if Some(i) != kept_instruction && Some(i) != kept_patch {
            description.push_str(&block.content);
        }
        pos = block.end;
    }
    description.push_str(&normalized[pos..]);

    let (title, description) = split_title(&description);
    let description = clean_description(&description, markers);

    let instruction = kept_instruction
        .map(|i| blocks[i].content.trim().to_string())
        .filter(|s| !s.is_empty());
    let patch = kept_patch
        .map(|i| clean_patch(&blocks[i].content))
        .filter(|s| !s.is_empty());

    ClassifiedComment {
        category,
        file: raw.file.clone(),
        line: raw.line,
        title,
        instruction,
        patch,
        description: if description.is_empty() {
            None
        } else {
            Some(description)
        },
    }
}

fn is_patch_fence(info: &str) -> bool {
    info.eq_ignore_ascii_case("diff") || info.eq_ignore_ascii_case("suggestion")
}

/// Strip diff hunk markers (`@@ -1,4 +1,6 @@` headers and lone `@@` lines)
/// from an extracted patch.
fn clean_patch(diff: &str) -> String {
    HUNK_MARKER.replace_all(diff, "").trim().to_string()
}

fn split_title(text: &str) -> (Option<String>, String) {
    match LEADING_TITLE.captures(text) {
        Some(caps) => {
            let title = caps[1].trim().to_string();
            let rest = text[caps.get(0).expect("capture 0 always present").end()..].to_string();
            (Some(title).filter(|t| !t.is_empty()), rest)
        }
        None => (None, text.to_string()),
    }
}

fn clean_description(text: &str, markers: &MarkerConfig) -> String {
    let text = ALSO_APPLIES.replace_all(text, "");
    let text = HR_LINE.replace_all(&text, "");
    // Drop lines that only introduce the instruction block, and italic tag
    // lines that merely restate the category (the classifier already read
    // them).
    let kept: Vec<&str> = text
        .lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            let introduces_instruction = markers
                .instruction
                .iter()
                .any(|m| !m.is_empty() && lower.contains(&m.to_lowercase()));
            let category_tag = ITALIC_TAG_LINE.is_match(line)
                && (markers.is_nitpick(line) || markers.is_outside_range(line));
            !introduces_instruction && !category_tag
        })
        .collect();
    let text = kept.join("\n");
    EXTRA_NEWLINES.replace_all(&text, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::LineRef;

    fn raw(body: &str) -> RawComment {
        RawComment {
            file: Some("src/app.ts".into()),
            line: Some(LineRef::Single(10)),
            body: body.into(),
            session_id: 1,
        }
    }

    fn markers() -> MarkerConfig {
        MarkerConfig::default()
    }

    #[test]
    fn outside_range_marker_wins_over_nitpick() {
        let body = "♻️ Outside diff range comments\n\nnitpick: rename";
        let c = classify(&raw(body), body, &markers());
        assert_eq!(c.category, Category::OutsideRange);
    }

    #[test]
    fn nitpick_marker_detected() {
        let body = "_🧹 Nitpick (assertive)_\n\nPrefer const here.";
        let c = classify(&raw(body), body, &markers());
        assert_eq!(c.category, Category::Nitpick);
        assert_eq!(c.description.as_deref(), Some("Prefer const here."));
    }

    #[test]
    fn plain_comment_is_actionable() {
        let body = "This leaks the file handle on early return.";
        let c = classify(&raw(body), body, &markers());
        assert_eq!(c.category, Category::Actionable);
        assert!(c.instruction.is_none());
        assert!(c.patch.is_none());
    }

    #[test]
    fn extracts_instruction_after_marker() {
        let body = "Fix the guard.\n\n🤖 Prompt for AI Agents\n```\nIn src/app.ts line 10, add a null check.\n```";
        let c = classify(&raw(body), body, &markers());
        assert_eq!(
            c.instruction.as_deref(),
            Some("In src/app.ts line 10, add a null check.")
        );
        // the marker line itself stays out of the description
        assert_eq!(c.description.as_deref(), Some("Fix the guard."));
    }

    #[test]
    fn extracts_patch_from_diff_fence() {
        let body = "Use the safe accessor.\n\n```diff\n- a.unwrap()\n+ a?\n```";
        let c = classify(&raw(body), body, &markers());
        assert_eq!(c.patch.as_deref(), Some("- a.unwrap()\n+ a?"));
        assert_eq!(c.description.as_deref(), Some("Use the safe accessor."));
    }

    #[test]
    fn suggestion_fence_counts_as_patch() {
        let body = "```suggestion\nconst x = 1;\n```";
        let c = classify(&raw(body), body, &markers());
        assert_eq!(c.patch.as_deref(), Some("const x = 1;"));
    }

    #[test]
    fn plain_fence_is_neither_patch_nor_instruction() {
        let body = "Example output:\n\n```\nhello\n```";
        let c = classify(&raw(body), body, &markers());
        assert!(c.patch.is_none());
        assert!(c.instruction.is_none());
        // folded into the description as plain text
        assert!(c.description.as_deref().unwrap().contains("hello"));
    }

    #[test]
    fn both_instruction_and_patch_extracted() {
        let body = "**Null deref**\n\ndescription\n\n```diff\n- x\n+ y\n```\n\n🤖 Prompt for AI Agents\n```\ndo the thing\n```";
        let c = classify(&raw(body), body, &markers());
        assert_eq!(c.title.as_deref(), Some("Null deref"));
        assert_eq!(c.patch.as_deref(), Some("- x\n+ y"));
        assert_eq!(c.instruction.as_deref(), Some("do the thing"));
        assert_eq!(c.description.as_deref(), Some("description"));
    }

    #[test]
    fn second_patch_block_folds_into_description() {
        let body = "```diff\n- first\n+ one\n```\n\n```diff\n- second\n+ two\n```";
        let c = classify(&raw(body), body, &markers());
        assert_eq!(c.patch.as_deref(), Some("- first\n+ one"));
        let desc = c.description.unwrap();
        assert!(desc.contains("- second"));
        assert!(!desc.contains("```"));
    }

    #[test]
    fn second_instruction_block_folds_into_description() {
        let body = "🤖 Prompt for AI Agents\n```\nfirst directive\n```\n\n🤖 Prompt for AI Agents\n```\nsecond directive\n```";
        let c = classify(&raw(body), body, &markers());
        assert_eq!(c.instruction.as_deref(), Some("first directive"));
        assert!(c.description.unwrap().contains("second directive"));
    }

    #[test]
    fn hunk_markers_cleaned_from_patch() {
        let body = "```diff\n@@ -1,4 +1,6 @@\n- old\n+ new\n@@\n```";
        let c = classify(&raw(body), body, &markers());
        assert_eq!(c.patch.as_deref(), Some("- old\n+ new"));
    }

    #[test]
    fn also_applies_lines_removed() {
        let body = "**Rename this**\n\nShort description.\nAlso applies to: 33-35, 40-41";
        let c = classify(&raw(body), body, &markers());
        assert_eq!(c.title.as_deref(), Some("Rename this"));
        assert_eq!(c.description.as_deref(), Some("Short description."));
    }

    #[test]
    fn file_and_line_carried_over() {
        let body = "text";
        let c = classify(&raw(body), body, &markers());
        assert_eq!(c.file.as_deref(), Some("src/app.ts"));
        assert_eq!(c.line, Some(LineRef::Single(10)));
    }

    #[test]
    fn empty_body_yields_all_none() {
        let c = classify(&raw(""), "", &markers());
        assert_eq!(c.category, Category::Actionable);
        assert!(c.title.is_none());
        assert!(c.description.is_none());
    }

    #[test]
    fn custom_marker_table_is_honored() {
        let custom = MarkerConfig {
            outside_range: vec!["beyond the hunk".into()],
            nitpick: vec!["tiny:".into()],
            instruction: vec!["agent directive".into()],
        };
        let body = "tiny: missing semicolon";
        let c = classify(&raw(body), body, &custom);
        assert_eq!(c.category, Category::Nitpick);

        let body = "Beyond the hunk, this constant is stale.";
        let c = classify(&raw(body), body, &custom);
        assert_eq!(c.category, Category::OutsideRange);
    }
}
