//! Row selection: the per-tool selection set, the per-group auto-selection
//! criteria, and selection inversion.

use std::collections::HashSet;

use crate::model::{Entry, ToolData};
use crate::tools::SelectCriterion;
use crate::ui::rows::pixel_area;

/// Selected row ids for one tool. Absence means unselected; separator ids
/// never exist here because separators are not entries.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<String>,
}

impl Selection {
    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    /// Header-driven "select all visible" and its inverse.
    pub fn set_all<'a, I>(&mut self, ids: I, value: bool)
    where
        I: IntoIterator<Item = &'a str>,
    {
        if value {
            self.selected.extend(ids.into_iter().map(str::to_string));
        } else {
            for id in ids {
                self.selected.remove(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replace the whole selection, as the auto-selection algorithms do.
    pub fn replace(&mut self, ids: HashSet<String>) {
        self.selected = ids;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn keys(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// All selectable ids in the dataset: every non-reference entry, whether or
/// not the active filter currently shows it.
pub fn selectable_ids(data: &ToolData) -> Vec<String> {
    match data {
        ToolData::Flat(entries) => entries.iter().map(|entry| entry.id().to_string()).collect(),
        ToolData::Grouped(groups) => groups
            .iter()
            .flatten()
            .filter(|entry| !entry.is_reference)
            .map(|entry| entry.id().to_string())
            .collect(),
    }
}

/// New selection = universe − currently selected.
pub fn invert_selection(current: &Selection, universe: &[String]) -> HashSet<String> {
    universe
        .iter()
        .filter(|id| !current.contains(id))
        .cloned()
        .collect()
}

/// Pick one winner per group by the given criterion.
///
/// Candidates are the entries carrying a group id — references carry none
/// and never participate. Reduction keeps the running winner on ties, so
/// the first member wins them.
pub fn select_by_criterion(data: &ToolData, criterion: SelectCriterion) -> HashSet<String> {
    let ToolData::Grouped(groups) = data else {
        return HashSet::new();
    };

    let mut winners = HashSet::new();
    for group in groups {
        let mut members = group.iter().filter(|entry| entry.group_id.is_some());
        let Some(first) = members.next() else {
            continue;
        };
        let winner = members.fold(first, |winner, candidate| {
            if keeps_winner(winner, candidate, criterion) {
                winner
            } else {
                candidate
            }
        });
        winners.insert(winner.id().to_string());
    }
    winners
}

fn keeps_winner(winner: &Entry, candidate: &Entry, criterion: SelectCriterion) -> bool {
    match criterion {
        SelectCriterion::LargestSize => winner.raw.size >= candidate.raw.size,
        SelectCriterion::SmallestSize => winner.raw.size <= candidate.raw.size,
        SelectCriterion::Newest => winner.raw.modified >= candidate.raw.modified,
        SelectCriterion::Oldest => winner.raw.modified <= candidate.raw.modified,
        SelectCriterion::HighestResolution => pixel_area(winner) >= pixel_area(candidate),
        SelectCriterion::LowestResolution => pixel_area(winner) <= pixel_area(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{assemble_groups, RawRecord, RecordDetails};

    fn record(path: &str, size: u64, modified: i64) -> RawRecord {
        RawRecord {
            path: path.to_string(),
            size,
            modified,
            details: RecordDetails::File,
        }
    }

    fn image(path: &str, width: u32, height: u32) -> RawRecord {
        RawRecord {
            path: path.to_string(),
            size: 100,
            modified: 0,
            details: RecordDetails::Image {
                width,
                height,
                similarity: 0,
            },
        }
    }

    fn grouped(tuples: Vec<(Option<RawRecord>, Vec<RawRecord>)>) -> ToolData {
        ToolData::Grouped(assemble_groups(tuples))
    }

    #[test]
    fn test_toggle_and_set_all() {
        let mut selection = Selection::default();
        selection.toggle("/a");
        assert!(selection.contains("/a"));
        selection.toggle("/a");
        assert!(selection.is_empty());

        selection.set_all(["/a", "/b", "/c"], true);
        assert_eq!(selection.len(), 3);
        selection.set_all(["/a", "/b"], false);
        assert_eq!(selection.keys(), vec!["/c".to_string()]);
    }

    #[test]
    fn test_largest_size_picks_one_maximal_member_per_group() {
        let data = grouped(vec![
            (
                None,
                vec![record("/a1", 10, 0), record("/a2", 30, 0), record("/a3", 20, 0)],
            ),
            (None, vec![record("/b1", 5, 0), record("/b2", 7, 0)]),
        ]);
        let winners = select_by_criterion(&data, SelectCriterion::LargestSize);
        assert_eq!(winners.len(), 2);
        assert!(winners.contains("/a2"));
        assert!(winners.contains("/b2"));
    }

    #[test]
    fn test_ties_go_to_the_first_member() {
        let data = grouped(vec![(
            None,
            vec![record("/first", 10, 0), record("/second", 10, 0)],
        )]);
        for criterion in [SelectCriterion::LargestSize, SelectCriterion::SmallestSize] {
            let winners = select_by_criterion(&data, criterion);
            assert_eq!(winners.len(), 1);
            assert!(winners.contains("/first"), "{criterion:?}");
        }
    }

    #[test]
    fn test_references_never_win() {
        let data = grouped(vec![(
            Some(record("/ref", 1000, 99)),
            vec![record("/m1", 10, 1), record("/m2", 20, 2)],
        )]);
        let winners = select_by_criterion(&data, SelectCriterion::LargestSize);
        assert_eq!(winners.len(), 1);
        assert!(winners.contains("/m2"));
    }

    #[test]
    fn test_date_criteria() {
        let data = grouped(vec![(
            None,
            vec![record("/old", 1, 100), record("/new", 1, 900)],
        )]);
        let newest = select_by_criterion(&data, SelectCriterion::Newest);
        assert!(newest.contains("/new"));
        let oldest = select_by_criterion(&data, SelectCriterion::Oldest);
        assert!(oldest.contains("/old"));
    }

    #[test]
    fn test_resolution_criteria_compare_pixel_area() {
        let data = grouped(vec![(
            None,
            vec![image("/wide", 1920, 1080), image("/small", 640, 480)],
        )]);
        let highest = select_by_criterion(&data, SelectCriterion::HighestResolution);
        assert!(highest.contains("/wide"));
        let lowest = select_by_criterion(&data, SelectCriterion::LowestResolution);
        assert!(lowest.contains("/small"));
    }

    #[test]
    fn test_invert_round_trip() {
        let universe: Vec<String> = ["/a", "/b", "/c", "/d"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut selection = Selection::default();
        selection.set_all(["/a", "/b"], true);

        let inverted = invert_selection(&selection, &universe);
        assert_eq!(
            inverted,
            HashSet::from(["/c".to_string(), "/d".to_string()])
        );

        let mut once = Selection::default();
        once.replace(inverted);
        let twice = invert_selection(&once, &universe);
        assert_eq!(
            twice,
            HashSet::from(["/a".to_string(), "/b".to_string()])
        );
    }

    #[test]
    fn test_invert_universe_excludes_references() {
        let data = grouped(vec![(
            Some(record("/ref", 9, 0)),
            vec![record("/m1", 1, 0), record("/m2", 2, 0)],
        )]);
        let universe = selectable_ids(&data);
        assert_eq!(universe.len(), 2);
        assert!(!universe.contains(&"/ref".to_string()));
    }
}
