use burrow_core::{ClassifiedComment, Decision, RenderedItem, Representation};

/// Choose the single representation for a classified comment.
///
/// Strict priority: an instruction wins outright and both the patch and the
/// description are discarded (the instruction is assumed self-sufficient for
/// an automated agent); otherwise a patch is rendered together with its
/// description; otherwise the description stands alone. Presenting two
/// competing fixes for one finding would force the downstream agent to
/// guess, so the output never carries both an instruction and a patch.
///
/// # Examples
///
/// ```
/// use burrow_core::{Category, ClassifiedComment, Representation};
/// use burrow_review::select::select_representation;
///
/// let comment = ClassifiedComment {
///     category: Category::Actionable,
///     file: None,
///     line: None,
///     title: None,
///     instruction: Some("add a bounds check".into()),
///     patch: Some("- a[i]\n+ a.get(i)".into()),
///     description: Some("possible OOB".into()),
/// };
/// let item = select_representation(comment);
/// assert_eq!(
///     item.representation,
///     Representation::Instruction("add a bounds check".into())
/// );
/// ```
pub fn select_representation(comment: ClassifiedComment) -> RenderedItem {
    let ClassifiedComment {
        category,
        line,
        title,
        instruction,
        patch,
        description,
        ..
    } = comment;

    let (representation, decision) = match (instruction, patch, description) {
        (Some(instruction), patch, description) => (
            Representation::Instruction(instruction),
            Decision::InstructionKept {
                dropped_patch: patch.is_some(),
                dropped_description: description.is_some(),
            },
        ),
        (None, Some(diff), description) => {
            let with_description = description.is_some();
            (
                Representation::Patch { diff, description },
                Decision::PatchKept { with_description },
            )
        }
        (None, None, description) => (
            // A comment with no content at all still keeps its slot and
            // sequence number downstream.
            Representation::Description(description.unwrap_or_default()),
            Decision::DescriptionOnly,
        ),
    };

    RenderedItem {
        category,
        line,
        title,
        representation,
        decision,
    }
}
