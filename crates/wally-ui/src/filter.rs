//! Pure filtering and grouping over item lists.
//!
//! These functions operate on index vectors into the caller's item slice,
//! so derived views never copy items. The [`ComboBox`](crate::ComboBox)
//! facade caches the filtered index vector and recomputes it only when the
//! data or the search query changes.

use crate::item::ComboItem;

/// Compute the filtered view of `items` for a search query.
///
/// Returns indices into `items`, preserving original order. The trimmed
/// query matches case-insensitively as a substring of the label, the
/// description (when present) or the string form of the value. An empty
/// trimmed query selects every item.
pub fn filter_indices(items: &[ComboItem], query: &str) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return (0..items.len()).collect();
    }

    (0..items.len())
        .filter(|&i| item_matches(&items[i], &needle))
        .collect()
}

/// Check whether one item matches an already-lowercased, trimmed needle.
fn item_matches(item: &ComboItem, needle: &str) -> bool {
    if item.label.to_lowercase().contains(needle) {
        return true;
    }
    if let Some(description) = &item.description
        && description.to_lowercase().contains(needle)
    {
        return true;
    }
    item.value.to_string().to_lowercase().contains(needle)
}

/// Bucket the filtered view by group label, in first-seen order.
///
/// `filtered` holds indices into `items` (as produced by
/// [`filter_indices`]). Each bucket holds *positions within the filtered
/// view* (0-based), so a bucket entry doubles as the flat index used for
/// keyboard highlighting. Within each bucket, filtered-view order is
/// preserved.
pub fn group_positions(items: &[ComboItem], filtered: &[usize]) -> Vec<(String, Vec<usize>)> {
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();

    for (position, &item_index) in filtered.iter().enumerate() {
        let label = items[item_index].group_label();
        match groups.iter_mut().find(|(l, _)| l == label) {
            Some((_, positions)) => positions.push(position),
            None => groups.push((label.to_string(), vec![position])),
        }
    }

    groups
}
