use burrow_core::{Category, FileGroup, RenderedItem, GENERAL_GROUP};

/// Group rendered items by file path and order each group by category
/// priority.
///
/// Group order is the order of first occurrence of each path in the input —
/// not alphabetical — preserving the reviewer's original file traversal
/// order. A missing path maps to the [`GENERAL_GROUP`] bucket.
pub fn group_by_file(items: Vec<(Option<String>, RenderedItem)>) -> Vec<FileGroup> {
    let mut groups: Vec<FileGroup> = Vec::new();
    for (file, item) in items {
        let name = file.unwrap_or_else(|| GENERAL_GROUP.to_string());
        match groups.iter_mut().find(|g| g.file == name) {
            Some(group) => group.items.push(item),
            None => groups.push(FileGroup {
                file: name,
                items: vec![item],
            }),
        }
    }
    for group in &mut groups {
        group.items = partition_by_category(std::mem::take(&mut group.items));
    }
    groups
}

/// Stable category partition: bucket by category in fixed priority order and
/// concatenate.
///
/// Within each bucket the original relative order is untouched, which makes
/// the operation deterministic and idempotent — re-partitioning an already
/// partitioned sequence is a no-op.
pub fn partition_by_category(items: Vec<RenderedItem>) -> Vec<RenderedItem> {
    let mut out = Vec::with_capacity(items.len());
    for category in Category::PRIORITY {
        for item in items.iter().filter(|i| i.category == category) {
            out.push(item.clone());
        }
    }
    out
}
