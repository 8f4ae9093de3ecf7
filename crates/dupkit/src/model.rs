//! Canonical data model: raw backend records, display entries, rows, and
//! group assembly.

use humansize::{format_size, BINARY};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One record as produced by the scanning backend. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub path: String,
    pub size: u64,
    /// Modification time, epoch seconds.
    pub modified: i64,
    #[serde(default)]
    pub details: RecordDetails,
}

/// Tool-specific payload carried alongside the common fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordDetails {
    #[default]
    File,
    Folder,
    Duplicate {
        hash: String,
    },
    Image {
        width: u32,
        height: u32,
        similarity: u32,
    },
    Video {
        similarity: u32,
    },
    Music {
        title: String,
        artist: String,
        year: String,
        genre: String,
        bitrate: u32,
        length: String,
    },
}

/// The complete result batch of one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanPayload {
    Flat(Vec<RawRecord>),
    /// (optional reference, members) per cluster.
    Grouped(Vec<(Option<RawRecord>, Vec<RawRecord>)>),
}

impl ScanPayload {
    pub fn len(&self) -> usize {
        match self {
            ScanPayload::Flat(records) => records.len(),
            ScanPayload::Grouped(tuples) => tuples
                .iter()
                .map(|(reference, members)| members.len() + reference.is_some() as usize)
                .sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Canonical display row derived from one raw record. The path doubles as
/// the stable row id.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub file_name: String,
    pub size_text: String,
    pub modified_text: String,
    pub dimensions_text: String,
    pub similarity_text: String,
    pub bitrate_text: String,
    pub is_reference: bool,
    pub group_id: Option<u64>,
    pub raw: RawRecord,
}

impl Entry {
    pub fn id(&self) -> &str {
        &self.raw.path
    }
}

/// A renderable row: either a real entry or a synthetic boundary between
/// two groups. Consumers pattern-match; there is no sentinel-id convention.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Entry(Entry),
    Separator { group_id: u64 },
}

impl Row {
    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            Row::Entry(entry) => Some(entry),
            Row::Separator { .. } => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Row::Separator { .. })
    }
}

/// Canonical per-tool data: the shape follows the tool's result shape.
#[derive(Debug, Clone)]
pub enum ToolData {
    Flat(Vec<Entry>),
    Grouped(Vec<Vec<Entry>>),
}

impl ToolData {
    pub fn total_count(&self) -> usize {
        match self {
            ToolData::Flat(entries) => entries.len(),
            ToolData::Grouped(groups) => groups.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    /// Remove entries whose path is in `removed`, then drop grouped clusters
    /// that no longer contain any non-reference member.
    pub fn remove_paths(&mut self, removed: &HashSet<String>) {
        match self {
            ToolData::Flat(entries) => {
                entries.retain(|entry| !removed.contains(entry.id()));
            }
            ToolData::Grouped(groups) => {
                for group in groups.iter_mut() {
                    group.retain(|entry| !removed.contains(entry.id()));
                }
                groups.retain(|group| group.iter().any(|entry| !entry.is_reference));
            }
        }
    }
}

/// Convert one raw record into its display entry. Total: absent optional
/// fields come out as empty strings.
pub fn to_entry(raw: RawRecord, is_reference: bool, group_id: Option<u64>) -> Entry {
    let (dimensions_text, similarity_text, bitrate_text) = match &raw.details {
        RecordDetails::Image {
            width,
            height,
            similarity,
        } => (
            format!("{width}x{height}"),
            similarity.to_string(),
            String::new(),
        ),
        RecordDetails::Video { similarity } => {
            (String::new(), similarity.to_string(), String::new())
        }
        RecordDetails::Music { bitrate, .. } => {
            (String::new(), String::new(), format!("{bitrate} kbps"))
        }
        _ => (String::new(), String::new(), String::new()),
    };

    Entry {
        file_name: base_name(&raw.path),
        size_text: human_size(raw.size),
        modified_text: format_timestamp(raw.modified),
        dimensions_text,
        similarity_text,
        bitrate_text,
        is_reference,
        group_id,
        raw,
    }
}

/// Convert a flat batch.
pub fn flat_entries(records: Vec<RawRecord>) -> Vec<Entry> {
    records
        .into_iter()
        .map(|raw| to_entry(raw, false, None))
        .collect()
}

/// Assemble grouped tuples into ordered entry groups.
///
/// Tuples are default-ordered by descending primary size (the reference's
/// size when present, else the first member's) before any user sort applies.
/// The reference converts first without a group id; members share one
/// incrementing group id. Tuples without members are skipped.
pub fn assemble_groups(tuples: Vec<(Option<RawRecord>, Vec<RawRecord>)>) -> Vec<Vec<Entry>> {
    let mut tuples: Vec<_> = tuples
        .into_iter()
        .filter(|(_, members)| !members.is_empty())
        .collect();

    tuples.sort_by(|a, b| primary_size(b).cmp(&primary_size(a)));

    let mut groups = Vec::with_capacity(tuples.len());
    for (index, (reference, members)) in tuples.into_iter().enumerate() {
        let group_id = index as u64 + 1;
        let mut group = Vec::with_capacity(members.len() + 1);
        if let Some(raw) = reference {
            group.push(to_entry(raw, true, None));
        }
        for raw in members {
            group.push(to_entry(raw, false, Some(group_id)));
        }
        groups.push(group);
    }
    groups
}

fn primary_size(tuple: &(Option<RawRecord>, Vec<RawRecord>)) -> u64 {
    match &tuple.0 {
        Some(reference) => reference.size,
        None => tuple.1.first().map_or(0, |member| member.size),
    }
}

/// Build canonical tool data from a scan payload.
pub fn payload_to_data(payload: ScanPayload) -> ToolData {
    match payload {
        ScanPayload::Flat(records) => ToolData::Flat(flat_entries(records)),
        ScanPayload::Grouped(tuples) => ToolData::Grouped(assemble_groups(tuples)),
    }
}

/// Binary-unit size string ("1.21 MiB"), consistent across the whole UI.
pub fn human_size(bytes: u64) -> String {
    format_size(bytes, BINARY)
}

/// Last path segment, regardless of separator style.
pub fn base_name(path: &str) -> String {
    path.rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Epoch seconds to "YYYY-mm-dd HH:MM:SS" (UTC). Out-of-range values come
/// out as an empty string rather than an error.
pub fn format_timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, size: u64, modified: i64) -> RawRecord {
        RawRecord {
            path: path.to_string(),
            size,
            modified,
            details: RecordDetails::File,
        }
    }

    #[test]
    fn test_base_name_handles_both_separator_styles() {
        assert_eq!(base_name("/home/user/photo.jpg"), "photo.jpg");
        assert_eq!(base_name("C:\\Users\\user\\photo.jpg"), "photo.jpg");
        assert_eq!(base_name("plain.txt"), "plain.txt");
        assert_eq!(base_name(""), "");
    }

    #[test]
    fn test_entry_defaults_for_missing_fields() {
        let entry = to_entry(record("/a", 0, 0), false, None);
        assert_eq!(entry.size_text, "0 B");
        assert_eq!(entry.modified_text, "1970-01-01 00:00:00");
        assert_eq!(entry.dimensions_text, "");
        assert_eq!(entry.similarity_text, "");
        assert_eq!(entry.bitrate_text, "");
    }

    #[test]
    fn test_image_entry_derives_dimensions() {
        let raw = RawRecord {
            path: "/pic.png".to_string(),
            size: 2048,
            modified: 1_700_000_000,
            details: RecordDetails::Image {
                width: 1920,
                height: 1080,
                similarity: 4,
            },
        };
        let entry = to_entry(raw, false, Some(1));
        assert_eq!(entry.dimensions_text, "1920x1080");
        assert_eq!(entry.similarity_text, "4");
        assert_eq!(entry.size_text, "2 KiB");
    }

    #[test]
    fn test_assemble_orders_groups_by_primary_size_desc() {
        let tuples = vec![
            (None, vec![record("/m", 500, 0), record("/n", 400, 0)]),
            (None, vec![record("/a", 1000, 0), record("/b", 900, 0)]),
            (None, vec![record("/x", 10, 0), record("/y", 5, 0)]),
        ];
        let groups = assemble_groups(tuples);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0][0].raw.size, 1000);
        assert_eq!(groups[1][0].raw.size, 500);
        assert_eq!(groups[2][0].raw.size, 10);
    }

    #[test]
    fn test_assemble_reference_first_without_group_id() {
        let tuples = vec![(
            Some(record("/ref", 700, 0)),
            vec![record("/m1", 600, 0), record("/m2", 500, 0)],
        )];
        let groups = assemble_groups(tuples);
        let group = &groups[0];
        assert!(group[0].is_reference);
        assert_eq!(group[0].group_id, None);
        assert!(group[1..].iter().all(|e| e.group_id == Some(1)));
    }

    #[test]
    fn test_assemble_skips_memberless_tuples() {
        let tuples = vec![
            (Some(record("/ref", 700, 0)), vec![]),
            (None, vec![record("/a", 10, 0)]),
        ];
        let groups = assemble_groups(tuples);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0][0].id(), "/a");
    }

    #[test]
    fn test_remove_paths_drops_emptied_groups() {
        let tuples = vec![
            (
                Some(record("/ref", 900, 0)),
                vec![record("/a", 800, 0), record("/b", 700, 0)],
            ),
            (None, vec![record("/c", 100, 0), record("/d", 90, 0)]),
        ];
        let mut data = ToolData::Grouped(assemble_groups(tuples));

        let removed: HashSet<String> = ["/a", "/b"].iter().map(|s| s.to_string()).collect();
        data.remove_paths(&removed);

        match data {
            ToolData::Grouped(groups) => {
                // The group reduced to only its reference is gone entirely.
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0][0].id(), "/c");
            }
            ToolData::Flat(_) => unreachable!(),
        }
    }
}
