//! The row pipeline: filtering, sorting, and separator insertion.
//!
//! Pure functions over canonical tool data. The stage order is fixed:
//! filter first, then sort, then separators between the surviving groups.

use std::cmp::Ordering;

use crate::model::{Entry, RecordDetails, Row, ToolData};
use crate::tools::{ColumnId, SearchField};

/// The single active sort: one column, one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: ColumnId,
    pub descending: bool,
}

/// Compute the renderable rows for one tool from its canonical data plus
/// the active filter and sort.
///
/// Grouped data keeps its cluster semantics throughout: members are
/// filtered per group (emptied groups are dropped), sorted within their
/// group with the reference pinned first, groups are ordered by their
/// representative entry, and one separator lands between each pair of
/// groups.
pub fn compute_rows(
    data: &ToolData,
    filter: &str,
    sort: Option<SortSpec>,
    search_fields: &[SearchField],
) -> Vec<Row> {
    match data {
        ToolData::Flat(entries) => {
            let mut visible = filter_entries(entries, filter, search_fields);
            if let Some(spec) = sort {
                visible.sort_by(|a, b| compare_with_spec(a, b, spec));
            }
            visible.into_iter().map(Row::Entry).collect()
        }
        ToolData::Grouped(groups) => {
            let mut visible = filter_groups(groups, filter, search_fields);
            if let Some(spec) = sort {
                for group in &mut visible {
                    sort_members(group, spec);
                }
                visible.sort_by(|a, b| {
                    compare_with_spec(representative(a), representative(b), spec)
                });
            }
            insert_separators(visible)
        }
    }
}

/// Number of real entries a row sequence holds (separators excluded).
pub fn entry_count(rows: &[Row]) -> usize {
    rows.iter().filter(|row| !row.is_separator()).count()
}

fn filter_entries(entries: &[Entry], filter: &str, fields: &[SearchField]) -> Vec<Entry> {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|entry| entry_matches(entry, &needle, fields))
        .cloned()
        .collect()
}

/// Group-aware filtering: members are matched independently; a group whose
/// members all miss is dropped. The reference survives as long as any
/// member matches, so the cluster stays interpretable.
fn filter_groups(groups: &[Vec<Entry>], filter: &str, fields: &[SearchField]) -> Vec<Vec<Entry>> {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return groups.to_vec();
    }
    groups
        .iter()
        .filter_map(|group| {
            let members: Vec<Entry> = group
                .iter()
                .filter(|entry| !entry.is_reference && entry_matches(entry, &needle, fields))
                .cloned()
                .collect();
            if members.is_empty() {
                return None;
            }
            let mut kept = Vec::with_capacity(members.len() + 1);
            if let Some(reference) = group.iter().find(|entry| entry.is_reference) {
                kept.push(reference.clone());
            }
            kept.extend(members);
            Some(kept)
        })
        .collect()
}

fn entry_matches(entry: &Entry, needle_lower: &str, fields: &[SearchField]) -> bool {
    fields.iter().any(|field| {
        let haystack = match field {
            SearchField::FileName => entry.file_name.as_str(),
            SearchField::Path => entry.id(),
            SearchField::Title => match &entry.raw.details {
                RecordDetails::Music { title, .. } => title.as_str(),
                _ => "",
            },
            SearchField::Artist => match &entry.raw.details {
                RecordDetails::Music { artist, .. } => artist.as_str(),
                _ => "",
            },
        };
        haystack.to_lowercase().contains(needle_lower)
    })
}

/// Sort a group's members in place. The reference entry, when present, is
/// always first and stays there.
fn sort_members(group: &mut [Entry], spec: SortSpec) {
    let start = usize::from(group.first().is_some_and(|entry| entry.is_reference));
    group[start..].sort_by(|a, b| compare_with_spec(a, b, spec));
}

/// The entry a group is ordered by: its reference when present, else its
/// first member.
fn representative(group: &[Entry]) -> &Entry {
    &group[0]
}

fn compare_with_spec(a: &Entry, b: &Entry, spec: SortSpec) -> Ordering {
    let ordering = compare_entries(a, b, spec.column);
    if spec.descending {
        ordering.reverse()
    } else {
        ordering
    }
}

/// Per-column comparison. Numeric columns compare the underlying raw
/// values; text columns compare case-insensitively with a byte-order
/// tiebreak so the ordering is total.
pub fn compare_entries(a: &Entry, b: &Entry, column: ColumnId) -> Ordering {
    match column {
        ColumnId::Size => a.raw.size.cmp(&b.raw.size),
        ColumnId::Modified => a.raw.modified.cmp(&b.raw.modified),
        ColumnId::Similarity => similarity(a).cmp(&similarity(b)),
        ColumnId::Dimensions => pixel_area(a).cmp(&pixel_area(b)),
        ColumnId::Bitrate => bitrate(a).cmp(&bitrate(b)),
        ColumnId::Path => compare_text(a.id(), b.id()),
        ColumnId::FileName | ColumnId::FolderName => compare_text(&a.file_name, &b.file_name),
        ColumnId::Title => compare_text(music_fields(a).0, music_fields(b).0),
        ColumnId::Artist => compare_text(music_fields(a).1, music_fields(b).1),
        ColumnId::Year => compare_text(music_fields(a).2, music_fields(b).2),
        ColumnId::Length => compare_text(music_fields(a).3, music_fields(b).3),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn similarity(entry: &Entry) -> u32 {
    match entry.raw.details {
        RecordDetails::Image { similarity, .. } | RecordDetails::Video { similarity } => similarity,
        _ => 0,
    }
}

/// Resolution sort key; entries without dimensions rank as zero.
pub fn pixel_area(entry: &Entry) -> u64 {
    match entry.raw.details {
        RecordDetails::Image { width, height, .. } => u64::from(width) * u64::from(height),
        _ => 0,
    }
}

fn bitrate(entry: &Entry) -> u32 {
    match entry.raw.details {
        RecordDetails::Music { bitrate, .. } => bitrate,
        _ => 0,
    }
}

fn music_fields(entry: &Entry) -> (&str, &str, &str, &str) {
    match &entry.raw.details {
        RecordDetails::Music {
            title,
            artist,
            year,
            length,
            ..
        } => (title, artist, year, length),
        _ => ("", "", "", ""),
    }
}

/// Flatten groups into rows with one separator between each pair of
/// groups: exactly `groups.len() - 1` separators, none trailing.
fn insert_separators(groups: Vec<Vec<Entry>>) -> Vec<Row> {
    let group_count = groups.len();
    let mut rows = Vec::new();
    for (index, group) in groups.into_iter().enumerate() {
        let boundary_id = group
            .iter()
            .find_map(|entry| entry.group_id)
            .unwrap_or(index as u64);
        rows.extend(group.into_iter().map(Row::Entry));
        if index + 1 != group_count {
            rows.push(Row::Separator {
                group_id: boundary_id,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{assemble_groups, flat_entries, RawRecord};

    fn record(path: &str, size: u64, modified: i64) -> RawRecord {
        RawRecord {
            path: path.to_string(),
            size,
            modified,
            details: RecordDetails::File,
        }
    }

    fn grouped_fixture() -> ToolData {
        ToolData::Grouped(assemble_groups(vec![
            (
                None,
                vec![record("/photos/a.jpg", 500, 30), record("/backup/a.jpg", 500, 10)],
            ),
            (
                None,
                vec![record("/docs/b.pdf", 1000, 99), record("/docs/old/b.pdf", 1000, 5)],
            ),
            (
                None,
                vec![record("/tmp/c.log", 10, 44), record("/var/c.log", 10, 41)],
            ),
        ]))
    }

    const NAME_PATH: &[SearchField] = &[SearchField::FileName, SearchField::Path];

    #[test]
    fn test_empty_filter_is_identity() {
        let data = grouped_fixture();
        let rows = compute_rows(&data, "", None, NAME_PATH);
        assert_eq!(entry_count(&rows), 6);

        let flat = ToolData::Flat(flat_entries(vec![
            record("/one", 1, 0),
            record("/two", 2, 0),
        ]));
        let rows = compute_rows(&flat, "   ", None, NAME_PATH);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_separator_count_is_groups_minus_one() {
        let data = grouped_fixture();
        let rows = compute_rows(&data, "", None, NAME_PATH);
        let separators = rows.iter().filter(|row| row.is_separator()).count();
        assert_eq!(separators, 2);
        assert!(!rows.last().unwrap().is_separator());
    }

    #[test]
    fn test_default_order_by_descending_primary_size() {
        let data = grouped_fixture();
        let rows = compute_rows(&data, "", None, NAME_PATH);
        let first_of_each: Vec<u64> = rows
            .split(|row| row.is_separator())
            .map(|group| group[0].as_entry().unwrap().raw.size)
            .collect();
        assert_eq!(first_of_each, vec![1000, 500, 10]);
    }

    #[test]
    fn test_filter_is_case_insensitive_on_configured_fields() {
        let flat = ToolData::Flat(flat_entries(vec![
            record("/x/ABCdef.txt", 1, 0),
            record("/x/zzz.txt", 1, 0),
            record("/x/xyzabc.txt", 1, 0),
            record("/x/nope.txt", 1, 0),
            record("/x/other.txt", 1, 0),
        ]));
        let rows = compute_rows(&flat, "abc", None, NAME_PATH);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_filter_drops_emptied_groups_and_rebuilds_separators() {
        let data = grouped_fixture();
        let rows = compute_rows(&data, "docs", None, NAME_PATH);
        assert_eq!(entry_count(&rows), 2);
        assert_eq!(rows.iter().filter(|row| row.is_separator()).count(), 0);
    }

    #[test]
    fn test_filter_keeps_reference_while_members_match() {
        let data = ToolData::Grouped(assemble_groups(vec![(
            Some(record("/keep/ref.bin", 900, 0)),
            vec![record("/match/abc.bin", 800, 0), record("/miss/zzz.bin", 700, 0)],
        )]));
        let rows = compute_rows(&data, "abc", None, NAME_PATH);
        let ids: Vec<&str> = rows
            .iter()
            .filter_map(Row::as_entry)
            .map(Entry::id)
            .collect();
        assert_eq!(ids, vec!["/keep/ref.bin", "/match/abc.bin"]);
    }

    #[test]
    fn test_sort_descending_reverses_members_within_groups() {
        let data = grouped_fixture();
        let asc = SortSpec {
            column: ColumnId::Modified,
            descending: false,
        };
        let desc = SortSpec {
            column: ColumnId::Modified,
            descending: true,
        };
        let rows_asc = compute_rows(&data, "", Some(asc), NAME_PATH);
        let rows_desc = compute_rows(&data, "", Some(desc), NAME_PATH);

        // Key each group by its id set: group order may differ between
        // directions (the representative changes), member order must not.
        let per_group = |rows: &[Row]| -> std::collections::HashMap<Vec<String>, Vec<String>> {
            rows.split(|row| row.is_separator())
                .map(|group| {
                    let ids: Vec<String> = group
                        .iter()
                        .filter_map(Row::as_entry)
                        .map(|entry| entry.id().to_string())
                        .collect();
                    let mut key = ids.clone();
                    key.sort();
                    (key, ids)
                })
                .collect()
        };

        let groups_asc = per_group(&rows_asc);
        let groups_desc = per_group(&rows_desc);
        assert_eq!(groups_asc.len(), groups_desc.len());
        for (key, asc_ids) in groups_asc {
            let mut reversed = asc_ids;
            reversed.reverse();
            assert_eq!(groups_desc[&key], reversed);
        }
    }

    #[test]
    fn test_sort_pins_reference_first() {
        let data = ToolData::Grouped(assemble_groups(vec![(
            Some(record("/ref", 1, 50)),
            vec![record("/new", 2, 90), record("/old", 3, 10)],
        )]));
        let spec = SortSpec {
            column: ColumnId::Size,
            descending: true,
        };
        let rows = compute_rows(&data, "", Some(spec), NAME_PATH);
        let ids: Vec<&str> = rows
            .iter()
            .filter_map(Row::as_entry)
            .map(Entry::id)
            .collect();
        assert_eq!(ids, vec!["/ref", "/old", "/new"]);
    }

    #[test]
    fn test_sort_orders_groups_by_representative() {
        let data = grouped_fixture();
        let spec = SortSpec {
            column: ColumnId::Size,
            descending: false,
        };
        let rows = compute_rows(&data, "", Some(spec), NAME_PATH);
        let sizes: Vec<u64> = rows
            .split(|row| row.is_separator())
            .map(|group| group[0].as_entry().unwrap().raw.size)
            .collect();
        assert_eq!(sizes, vec![10, 500, 1000]);
    }

    #[test]
    fn test_text_sort_is_case_insensitive() {
        let flat = ToolData::Flat(flat_entries(vec![
            record("/b/Beta.txt", 1, 0),
            record("/a/alpha.txt", 1, 0),
            record("/c/GAMMA.txt", 1, 0),
        ]));
        let spec = SortSpec {
            column: ColumnId::FileName,
            descending: false,
        };
        let rows = compute_rows(&flat, "", Some(spec), NAME_PATH);
        let names: Vec<&str> = rows
            .iter()
            .filter_map(Row::as_entry)
            .map(|entry| entry.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["alpha.txt", "Beta.txt", "GAMMA.txt"]);
    }

    #[test]
    fn test_single_group_has_no_separator() {
        let data = ToolData::Grouped(assemble_groups(vec![(
            None,
            vec![record("/a", 1, 0), record("/b", 1, 0)],
        )]));
        let rows = compute_rows(&data, "", None, NAME_PATH);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| !row.is_separator()));
    }
}
