use std::fmt::Write as _;

use burrow_core::{Report, Representation};

/// Serialize a report into the final text document.
///
/// Pure formatting: total over any well-formed report, including the empty
/// one, which still gets its header and a "No feedback found." line. With
/// `debug` set, each item carries a clearly marked `[debug]` annotation
/// describing the representation-selection decision.
///
/// # Examples
///
/// ```
/// use burrow_core::Report;
/// use burrow_review::render::render_report;
///
/// let text = render_report(&Report::new(vec![]), false);
/// assert!(text.contains("Total files with feedback: 0"));
/// assert!(text.contains("Total comments: 0"));
/// assert!(text.contains("No feedback found."));
/// ```
pub fn render_report(report: &Report, debug: bool) -> String {
    let mut out = String::new();
    out.push_str("# CodeRabbit Review Feedback\n");
    out.push_str(&"=".repeat(40));
    out.push_str("\n\n");
    let _ = writeln!(out, "Total files with feedback: {}", report.total_files);
    let _ = writeln!(out, "Total comments: {}", report.total_comments);

    if report.groups.is_empty() {
        out.push_str("\nNo feedback found.\n");
        return out;
    }

    for group in &report.groups {
        out.push('\n');
        let _ = writeln!(out, "## {}", group.file);
        let _ = writeln!(out, "{} comment(s)", group.items.len());

        for (i, item) in group.items.iter().enumerate() {
            out.push('\n');
            let _ = write!(out, "### {}. [{}]", i + 1, item.category);
            if let Some(line) = &item.line {
                let _ = write!(out, " Lines {line}");
            }
            if let Some(title) = &item.title {
                let _ = write!(out, ": {title}");
            }
            out.push('\n');
            if debug {
                let _ = writeln!(out, "[debug] {}", item.decision);
            }

            match &item.representation {
                Representation::Instruction(text) => {
                    out.push('\n');
                    out.push_str("AI instruction:\n```\n");
                    out.push_str(text);
                    if !text.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str("```\n");
                }
                Representation::Patch { diff, description } => {
                    if let Some(description) = description {
                        out.push('\n');
                        out.push_str("Issue:\n");
                        out.push_str(description);
                        out.push('\n');
                    }
                    out.push('\n');
                    out.push_str("Suggested change:\n```diff\n");
                    out.push_str(diff);
                    if !diff.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str("```\n");
                }
                Representation::Description(text) => {
                    if !text.is_empty() {
                        out.push('\n');
                        out.push_str(text);
                        out.push('\n');
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::{Category, Decision, FileGroup, LineRef, RenderedItem};

    fn instruction_item(text: &str) -> RenderedItem {
        RenderedItem {
            category: Category::Actionable,
            line: Some(LineRef::Single(10)),
            title: Some("Guard the lookup".into()),
            representation: Representation::Instruction(text.into()),
            decision: Decision::InstructionKept {
                dropped_patch: true,
                dropped_description: false,
            },
        }
    }

    fn patch_item() -> RenderedItem {
        RenderedItem {
            category: Category::Nitpick,
            line: Some(LineRef::Range(5, 7)),
            title: None,
            representation: Representation::Patch {
                diff: "- let x = 1;\n+ const x = 1;".into(),
                description: Some("Prefer const.".into()),
            },
            decision: Decision::PatchKept {
                with_description: true,
            },
        }
    }

    #[test]
    fn empty_report_has_header_and_no_sections() {
        let text = render_report(&Report::new(vec![]), false);
        assert!(text.contains("Total files with feedback: 0"));
        assert!(text.contains("Total comments: 0"));
        assert!(text.contains("No feedback found."));
        assert!(!text.contains("## "));
    }

    #[test]
    fn sections_follow_group_order_with_counts() {
        let report = Report::new(vec![
            FileGroup {
                file: "src/x.ts".into(),
                items: vec![instruction_item("do the thing"), patch_item()],
            },
            FileGroup {
                file: "general".into(),
                items: vec![RenderedItem {
                    category: Category::OutsideRange,
                    line: None,
                    title: None,
                    representation: Representation::Description("stale constant".into()),
                    decision: Decision::DescriptionOnly,
                }],
            },
        ]);
        let text = render_report(&report, false);
        assert!(text.contains("Total files with feedback: 2"));
        assert!(text.contains("Total comments: 3"));
        let x_pos = text.find("## src/x.ts").unwrap();
        let general_pos = text.find("## general").unwrap();
        assert!(x_pos < general_pos);
        assert!(text.contains("2 comment(s)"));
        // numbering restarts per group
        assert!(text.contains("### 1. [actionable] Lines 10: Guard the lookup"));
        assert!(text.contains("### 2. [nitpick] Lines 5-7"));
        assert!(text.contains("### 1. [outside-range]"));
    }

    #[test]
    fn instruction_rendered_as_fenced_block() {
        let report = Report::new(vec![FileGroup {
            file: "a.rs".into(),
            items: vec![instruction_item("In a.rs line 10, add a null check.")],
        }]);
        let text = render_report(&report, false);
        assert!(text.contains("AI instruction:\n```\nIn a.rs line 10, add a null check.\n```"));
    }

    #[test]
    fn patch_rendered_with_description_before_diff() {
        let report = Report::new(vec![FileGroup {
            file: "a.rs".into(),
            items: vec![patch_item()],
        }]);
        let text = render_report(&report, false);
        let issue = text.find("Issue:\nPrefer const.").unwrap();
        let change = text.find("Suggested change:\n```diff\n- let x = 1;\n+ const x = 1;\n```").unwrap();
        assert!(issue < change);
    }

    #[test]
    fn debug_mode_interleaves_marked_decisions() {
        let report = Report::new(vec![FileGroup {
            file: "a.rs".into(),
            items: vec![instruction_item("x")],
        }]);
        let plain = render_report(&report, false);
        let debug = render_report(&report, true);
        assert!(!plain.contains("[debug]"));
        assert!(debug.contains("[debug] instruction kept (patch discarded)"));
    }

    #[test]
    fn empty_description_item_still_numbered() {
        let report = Report::new(vec![FileGroup {
            file: "general".into(),
            items: vec![RenderedItem {
                category: Category::Actionable,
                line: None,
                title: None,
                representation: Representation::Description(String::new()),
                decision: Decision::DescriptionOnly,
            }],
        }]);
        let text = render_report(&report, false);
        assert!(text.contains("### 1. [actionable]"));
        assert!(text.contains("Total comments: 1"));
    }
}
