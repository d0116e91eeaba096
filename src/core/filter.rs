// ColaCup - core/filter.rs
//
// Filter model, predicate-based filter engine, identifier grouping and
// display ordering.
// All predicates are AND-combined.
// Core layer: pure logic, no I/O or threading.

use crate::core::model::{LogEntry, LogGroup, SortOrder, TimeRange};
use crate::util::constants::ALL_SENTINEL;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A single filter condition. Predicates are shared with background threads.
pub type LogPredicate = Box<dyn Fn(&LogEntry) -> bool + Send + Sync>;

// =============================================================================
// Filter model
// =============================================================================

/// What the user picked on the filter screen.
///
/// `flags` and `modules` either hold exactly the `"ALL"` sentinel or a
/// non-empty set of concrete values. The update methods keep that shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterModel {
    pub sort: SortOrder,
    pub time_range: TimeRange,
    pub flags: BTreeSet<String>,
    pub modules: BTreeSet<String>,
}

impl Default for FilterModel {
    fn default() -> Self {
        Self {
            sort: SortOrder::default(),
            time_range: TimeRange::default(),
            flags: all_selection(),
            modules: all_selection(),
        }
    }
}

impl FilterModel {
    /// Filter model with the given ordering and range and no flag/module constraint.
    pub fn new(sort: SortOrder, time_range: TimeRange) -> Self {
        Self {
            sort,
            time_range,
            ..Default::default()
        }
    }

    pub fn update_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub fn update_time_range(&mut self, time_range: TimeRange) {
        self.time_range = time_range;
    }

    /// Select or deselect a flag. Selecting `"ALL"` drops every concrete flag,
    /// selecting a concrete flag drops `"ALL"`, an emptied set becomes `{"ALL"}`.
    pub fn update_selected_flag(&mut self, flag: &str, selected: bool) {
        update_selection(&mut self.flags, flag, selected);
    }

    /// Module counterpart of [`FilterModel::update_selected_flag`].
    pub fn update_selected_module(&mut self, module: &str, selected: bool) {
        update_selection(&mut self.modules, module, selected);
    }

    /// Clear flag and module constraints. Sort and time range are kept.
    pub fn reset_selection(&mut self) {
        self.flags = all_selection();
        self.modules = all_selection();
    }

    /// Drop selected values that no longer occur in the available vocabulary.
    pub fn retain_known(&mut self, all_flags: &[String], all_modules: &[String]) {
        retain_in(&mut self.flags, all_flags);
        retain_in(&mut self.modules, all_modules);
    }

    /// True when neither flags nor modules constrain the result.
    pub fn is_unconstrained(&self) -> bool {
        is_all(&self.flags) && is_all(&self.modules)
    }

    /// Build the predicate list for this model. Unconstrained sets contribute
    /// no predicate, so a fully unconstrained model yields an empty list.
    pub fn predicates(&self) -> Vec<LogPredicate> {
        let mut predicates: Vec<LogPredicate> = Vec::new();

        if !is_all(&self.flags) {
            let flags = self.flags.clone();
            predicates.push(Box::new(move |entry: &LogEntry| flags.contains(&entry.flag)));
        }

        if !is_all(&self.modules) {
            let modules = self.modules.clone();
            predicates.push(Box::new(move |entry: &LogEntry| {
                modules.contains(&entry.module)
            }));
        }

        predicates
    }
}

fn all_selection() -> BTreeSet<String> {
    BTreeSet::from([ALL_SENTINEL.to_string()])
}

/// Empty and `{"ALL"}` both mean "unconstrained".
fn is_all(set: &BTreeSet<String>) -> bool {
    set.is_empty() || (set.len() == 1 && set.contains(ALL_SENTINEL))
}

fn update_selection(set: &mut BTreeSet<String>, value: &str, selected: bool) {
    if value == ALL_SENTINEL {
        if selected {
            *set = all_selection();
        } else {
            set.remove(ALL_SENTINEL);
        }
    } else if selected {
        set.remove(ALL_SENTINEL);
        set.insert(value.to_string());
    } else {
        set.remove(value);
    }

    if set.is_empty() {
        *set = all_selection();
    }
}

fn retain_in(set: &mut BTreeSet<String>, known: &[String]) {
    if is_all(set) {
        *set = all_selection();
        return;
    }
    set.retain(|value| known.iter().any(|k| k == value));
    if set.is_empty() {
        *set = all_selection();
    }
}

// =============================================================================
// Filtering
// =============================================================================

/// Keep entries matching every predicate. An empty predicate list matches
/// everything.
pub fn filter(logs: &[LogEntry], predicates: &[LogPredicate]) -> Vec<LogEntry> {
    if predicates.is_empty() {
        return logs.to_vec();
    }
    logs.iter()
        .filter(|entry| predicates.iter().all(|p| p(entry)))
        .cloned()
        .collect()
}

/// Flag and module vocabularies observed in `logs`, each led by `"ALL"`
/// and sorted.
pub fn vocabulary(logs: &[LogEntry]) -> (Vec<String>, Vec<String>) {
    let mut flags: BTreeSet<&str> = BTreeSet::new();
    let mut modules: BTreeSet<&str> = BTreeSet::new();
    for entry in logs {
        flags.insert(&entry.flag);
        modules.insert(&entry.module);
    }

    let with_sentinel = |values: BTreeSet<&str>| {
        std::iter::once(ALL_SENTINEL.to_string())
            .chain(
                values
                    .into_iter()
                    .filter(|v| *v != ALL_SENTINEL)
                    .map(str::to_string),
            )
            .collect::<Vec<_>>()
    };

    (with_sentinel(flags), with_sentinel(modules))
}

// =============================================================================
// Grouping and ordering
// =============================================================================

#[derive(Debug, PartialEq, Eq, Hash)]
enum GroupKey<'a> {
    Named(&'a str),
    Anonymous(usize),
}

/// Partition `logs` by identifier.
///
/// Entries without an identifier each get their own group. Groups are ordered
/// by the timestamp of their first member, ascending; members keep their
/// original relative order.
pub fn group_by_identifier(logs: &[LogEntry]) -> Vec<LogGroup> {
    let mut index: HashMap<GroupKey<'_>, usize> = HashMap::new();
    let mut groups: Vec<LogGroup> = Vec::new();
    let mut anonymous = 0usize;

    for entry in logs {
        let key = match entry.identifier.as_deref() {
            Some(id) => GroupKey::Named(id),
            None => {
                anonymous += 1;
                GroupKey::Anonymous(anonymous)
            }
        };
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(entry.clone());
    }

    // Stable: groups starting at the same instant keep first-seen order.
    groups.sort_by(|a, b| a[0].timestamp.total_cmp(&b[0].timestamp));
    groups
}

/// Reverse group order for newest-first display. Multi-entry groups are
/// reversed internally too so their newest fragment leads.
pub fn reversed_for_display(groups: Vec<LogGroup>) -> Vec<LogGroup> {
    groups
        .into_iter()
        .rev()
        .map(|mut group| {
            if group.len() > 1 {
                group.reverse();
            }
            group
        })
        .collect()
}

/// Group `logs` and put the groups in `sort` order.
pub fn arrange(logs: &[LogEntry], sort: SortOrder) -> Vec<LogGroup> {
    let groups = group_by_identifier(logs);
    match sort {
        SortOrder::Ascending => groups,
        SortOrder::Descending => reversed_for_display(groups),
    }
}

/// Filter `logs` with the model's predicates, then group and order them.
pub fn apply_filter_model(logs: &[LogEntry], model: &FilterModel) -> Vec<LogGroup> {
    let filtered = filter(logs, &model.predicates());
    arrange(&filtered, model.sort)
}

/// Case-sensitive substring search over messages, grouped and ordered.
pub fn search(logs: &[LogEntry], keyword: &str, sort: SortOrder) -> Vec<LogGroup> {
    let keyword = keyword.to_string();
    let predicates: Vec<LogPredicate> =
        vec![Box::new(move |entry: &LogEntry| entry.message.contains(&keyword))];
    arrange(&filter(logs, &predicates), sort)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::flags;

    fn make_entry(timestamp: f64, flag: &str, module: &str, message: &str) -> LogEntry {
        LogEntry {
            timestamp,
            flag: flag.to_string(),
            module: module.to_string(),
            file: "Test.swift".to_string(),
            function: "test()".to_string(),
            line: timestamp as u64,
            message: message.to_string(),
            identifier: None,
        }
    }

    fn with_id(mut entry: LogEntry, id: &str) -> LogEntry {
        entry.identifier = Some(id.to_string());
        entry
    }

    fn timestamps(groups: &[LogGroup]) -> Vec<Vec<f64>> {
        groups
            .iter()
            .map(|g| g.iter().map(|e| e.timestamp).collect())
            .collect()
    }

    #[test]
    fn test_empty_predicates_is_identity() {
        let logs = vec![
            make_entry(1.0, flags::ERROR, "Net", "a"),
            make_entry(2.0, flags::DEBUG, "UI", "b"),
        ];
        assert_eq!(filter(&logs, &[]), logs);
    }

    #[test]
    fn test_predicates_are_and_combined() {
        let logs = vec![
            make_entry(1.0, flags::ERROR, "Net", "a"),
            make_entry(2.0, flags::ERROR, "UI", "b"),
            make_entry(3.0, flags::DEBUG, "Net", "c"),
        ];
        let mut model = FilterModel::default();
        model.update_selected_flag(flags::ERROR, true);
        model.update_selected_module("Net", true);

        let result = filter(&logs, &model.predicates());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].message, "a");
    }

    #[test]
    fn test_unconstrained_model_builds_no_predicates() {
        assert!(FilterModel::default().predicates().is_empty());

        let mut model = FilterModel::default();
        model.flags.clear();
        assert!(model.predicates().is_empty());
    }

    #[test]
    fn test_deselecting_last_flag_normalises_to_all() {
        let mut model = FilterModel::default();
        model.update_selected_flag(flags::ERROR, true);
        assert_eq!(model.flags, BTreeSet::from([flags::ERROR.to_string()]));

        model.update_selected_flag(flags::ERROR, false);
        assert_eq!(model.flags, BTreeSet::from([ALL_SENTINEL.to_string()]));
    }

    #[test]
    fn test_selecting_all_clears_concrete_values() {
        let mut model = FilterModel::default();
        model.update_selected_module("Net", true);
        model.update_selected_module("UI", true);
        assert_eq!(model.modules.len(), 2);

        model.update_selected_module(ALL_SENTINEL, true);
        assert_eq!(model.modules, BTreeSet::from([ALL_SENTINEL.to_string()]));

        // Deselecting ALL with nothing else selected stays unconstrained.
        model.update_selected_module(ALL_SENTINEL, false);
        assert!(model.is_unconstrained());
    }

    #[test]
    fn test_reset_selection_keeps_sort_and_range() {
        let mut model = FilterModel::new(SortOrder::Ascending, TimeRange::SinceLaunch);
        model.update_selected_flag(flags::ERROR, true);
        model.update_selected_module("Net", true);
        assert!(!model.is_unconstrained());

        model.reset_selection();
        assert!(model.is_unconstrained());
        assert!(model.predicates().is_empty());
        assert_eq!(model.sort, SortOrder::Ascending);
        assert_eq!(model.time_range, TimeRange::SinceLaunch);
    }

    #[test]
    fn test_retain_known_drops_vanished_values() {
        let mut model = FilterModel::default();
        model.update_selected_flag("CUSTOM", true);
        model.update_selected_module("Net", true);
        model.update_selected_module("Gone", true);

        let all_flags = vec![ALL_SENTINEL.to_string(), flags::DEBUG.to_string()];
        let all_modules = vec![ALL_SENTINEL.to_string(), "Net".to_string()];
        model.retain_known(&all_flags, &all_modules);

        assert_eq!(model.flags, BTreeSet::from([ALL_SENTINEL.to_string()]));
        assert_eq!(model.modules, BTreeSet::from(["Net".to_string()]));
    }

    #[test]
    fn test_vocabulary_leads_with_sentinel() {
        let logs = vec![
            make_entry(1.0, flags::WARNING, "UI", "a"),
            make_entry(2.0, flags::DEBUG, "Net", "b"),
            make_entry(3.0, flags::DEBUG, "UI", "c"),
        ];
        let (all_flags, all_modules) = vocabulary(&logs);
        assert_eq!(all_flags, vec!["ALL", "DEBUG", "WARNING"]);
        assert_eq!(all_modules, vec!["ALL", "Net", "UI"]);
    }

    #[test]
    fn test_grouping_is_lossless_partition() {
        let logs = vec![
            with_id(make_entry(1.0, flags::DEBUG, "M", "a1"), "a"),
            make_entry(2.0, flags::DEBUG, "M", "x"),
            with_id(make_entry(3.0, flags::DEBUG, "M", "b1"), "b"),
            with_id(make_entry(4.0, flags::DEBUG, "M", "a2"), "a"),
            make_entry(5.0, flags::DEBUG, "M", "y"),
            with_id(make_entry(6.0, flags::DEBUG, "M", "b2"), "b"),
        ];
        let groups = group_by_identifier(&logs);
        assert_eq!(
            timestamps(&groups),
            vec![vec![1.0, 4.0], vec![2.0], vec![3.0, 6.0], vec![5.0]]
        );

        let mut flat: Vec<f64> = groups.iter().flatten().map(|e| e.timestamp).collect();
        flat.sort_by(f64::total_cmp);
        assert_eq!(flat, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_anonymous_entries_never_merge() {
        let logs = vec![
            make_entry(1.0, flags::DEBUG, "M", "same"),
            make_entry(1.0, flags::DEBUG, "M", "same"),
        ];
        assert_eq!(group_by_identifier(&logs).len(), 2);
    }

    #[test]
    fn test_reversed_for_display_flips_multi_entry_groups_only() {
        let groups = vec![
            vec![make_entry(1.0, "F", "M", "a"), make_entry(2.0, "F", "M", "b")],
            vec![make_entry(3.0, "F", "M", "c")],
        ];
        let reversed = reversed_for_display(groups.clone());
        assert_eq!(timestamps(&reversed), vec![vec![3.0], vec![2.0, 1.0]]);

        // Involution.
        assert_eq!(reversed_for_display(reversed), groups);
    }

    #[test]
    fn test_search_is_case_sensitive_and_sorted() {
        let logs = vec![
            make_entry(1.0, flags::DEBUG, "M", "Login ok"),
            make_entry(2.0, flags::DEBUG, "M", "login failed"),
            make_entry(3.0, flags::DEBUG, "M", "Login retry"),
        ];
        let groups = search(&logs, "Login", SortOrder::Descending);
        assert_eq!(timestamps(&groups), vec![vec![3.0], vec![1.0]]);

        let groups = search(&logs, "Login", SortOrder::Ascending);
        assert_eq!(timestamps(&groups), vec![vec![1.0], vec![3.0]]);
    }

    #[test]
    fn test_apply_filter_model_groups_filtered_entries() {
        let logs = vec![
            with_id(make_entry(1.0, flags::ERROR, "Net", "part 1"), "req"),
            make_entry(2.0, flags::DEBUG, "Net", "noise"),
            with_id(make_entry(3.0, flags::ERROR, "Net", "part 2"), "req"),
        ];
        let mut model = FilterModel::new(SortOrder::Descending, TimeRange::SinceLaunch);
        model.update_selected_flag(flags::ERROR, true);

        let groups = apply_filter_model(&logs, &model);
        assert_eq!(timestamps(&groups), vec![vec![3.0, 1.0]]);
    }
}
