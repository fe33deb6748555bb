//! Ordered status vocabulary built from the rule table.
//!
//! Every status has an `order` and a `score`. Lower order means higher
//! priority when two statuses are combined; the greatest order wins when a
//! group of statuses is summarised. Statuses missing from the table (the
//! reserved `unclassified` value included) have order `-1`, so they rank
//! below every known status and never win a pair against one.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use chembl_model::{StatusFlag, StatusRule, StatusValue};

use crate::error::StatusTableError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusEntry {
    status: StatusValue,
    order: i64,
    score: i64,
}

#[derive(Debug, Clone)]
pub struct StatusTable {
    /// All rows sorted by (order, status).
    entries: Vec<StatusEntry>,
    /// Conditional rules in evaluation order.
    rules: Vec<StatusRule>,
    index: HashMap<StatusValue, usize>,
}

impl StatusTable {
    pub fn new(rows: &[StatusRule]) -> Result<Self, StatusTableError> {
        if rows.is_empty() {
            return Err(StatusTableError::Empty);
        }
        let mut sorted: Vec<&StatusRule> = rows.iter().collect();
        sorted.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.status.cmp(&b.status)));

        let mut entries = Vec::with_capacity(sorted.len());
        let mut index = HashMap::with_capacity(sorted.len());
        for rule in &sorted {
            if index.insert(rule.status.clone(), entries.len()).is_some() {
                return Err(StatusTableError::DuplicateStatus(rule.status.to_string()));
            }
            entries.push(StatusEntry {
                status: rule.status.clone(),
                order: rule.order,
                score: rule.score,
            });
        }
        let rules = sorted
            .into_iter()
            .filter(|rule| rule.condition.is_some())
            .cloned()
            .collect();
        Ok(Self {
            entries,
            rules,
            index,
        })
    }

    /// Conditional rules in priority order.
    pub fn rules(&self) -> &[StatusRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, status: &StatusValue) -> bool {
        self.index.contains_key(status)
    }

    /// Statuses in order.
    pub fn statuses(&self) -> impl Iterator<Item = &StatusValue> {
        self.entries.iter().map(|entry| &entry.status)
    }

    pub fn global_min(&self) -> &StatusValue {
        &self.entries[0].status
    }

    pub fn global_max(&self) -> &StatusValue {
        &self.entries[self.entries.len() - 1].status
    }

    /// First rule status whose condition tests one of `flags`.
    pub fn get_min(&self, flags: &BTreeSet<StatusFlag>) -> Option<&StatusValue> {
        self.rules
            .iter()
            .find(|rule| {
                rule.condition
                    .is_some_and(|condition| flags.contains(&condition.flag))
            })
            .map(|rule| &rule.status)
    }

    /// Greatest status of `statuses`, `None` when the input is empty.
    pub fn get_max<'a, I>(&self, statuses: I) -> Option<StatusValue>
    where
        I: IntoIterator<Item = &'a StatusValue>,
    {
        statuses
            .into_iter()
            .max_by(|a, b| self.compare(a, b))
            .cloned()
    }

    /// The higher-priority (lower order) of two statuses.
    ///
    /// Only statuses present in the table take part: a single known
    /// endpoint wins, and two unknown endpoints give `unclassified`.
    pub fn pair(&self, a: &StatusValue, b: &StatusValue) -> StatusValue {
        match (self.contains(a), self.contains(b)) {
            (true, true) => match self.compare(a, b) {
                Ordering::Greater => b.clone(),
                _ => a.clone(),
            },
            (true, false) => a.clone(),
            (false, true) => b.clone(),
            (false, false) => StatusValue::unclassified(),
        }
    }

    /// Status following `status`; the last status for unknown values and
    /// for the last one.
    pub fn next(&self, status: &StatusValue) -> &StatusValue {
        let last = self.entries.len() - 1;
        let position = self
            .index
            .get(status)
            .map_or(last, |idx| (*idx + 1).min(last));
        &self.entries[position].status
    }

    pub fn order(&self, status: &StatusValue) -> i64 {
        self.index
            .get(status)
            .map_or(-1, |idx| self.entries[*idx].order)
    }

    pub fn score(&self, status: &StatusValue) -> i64 {
        self.index
            .get(status)
            .map_or(-1, |idx| self.entries[*idx].score)
    }

    /// Compare by order, then by name so the result is total.
    pub fn compare(&self, a: &StatusValue, b: &StatusValue) -> Ordering {
        self.order(a)
            .cmp(&self.order(b))
            .then_with(|| a.cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use chembl_model::StatusCondition;

    use super::*;

    fn rule(status: &str, field: &str, value: &str, order: i64, score: i64) -> StatusRule {
        StatusRule {
            status: StatusValue::new(status).expect("status"),
            condition: StatusCondition::parse(field, value).expect("condition"),
            order,
            score,
        }
    }

    fn table() -> StatusTable {
        StatusTable::new(&[
            rule("S3", "review", "null", 3, 0),
            rule("S1", "high_citation_rate", "true", 1, 10),
            rule("S2", "no_issue", "true", 2, 5),
        ])
        .expect("table")
    }

    fn status(value: &str) -> StatusValue {
        StatusValue::new(value).expect("status")
    }

    #[test]
    fn rules_are_sorted_and_unconditional_rows_excluded() {
        let table = table();
        let names: Vec<&str> = table.rules().iter().map(|rule| rule.status.as_str()).collect();
        assert_eq!(names, vec!["S1", "S2"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.global_min().as_str(), "S1");
        assert_eq!(table.global_max().as_str(), "S3");
    }

    #[test]
    fn order_and_score_lookups() {
        let table = table();
        assert_eq!(table.order(&status("S2")), 2);
        assert_eq!(table.score(&status("S3")), 0);
        assert_eq!(table.order(&status("S9")), -1);
        assert_eq!(table.score(&StatusValue::unclassified()), -1);
    }

    #[test]
    fn pair_takes_lower_order() {
        let table = table();
        assert_eq!(table.pair(&status("S1"), &status("S2")).as_str(), "S1");
        assert_eq!(table.pair(&status("S3"), &status("S2")).as_str(), "S2");
    }

    #[test]
    fn pair_ignores_unknown_endpoints() {
        let table = table();
        assert_eq!(
            table.pair(&status("S3"), &StatusValue::unclassified()),
            status("S3")
        );
        assert_eq!(
            table.pair(&StatusValue::unclassified(), &status("S2")),
            status("S2")
        );
        assert_eq!(
            table.pair(&status("S9"), &StatusValue::unclassified()),
            StatusValue::unclassified()
        );
    }

    #[test]
    fn get_max_takes_greatest_order() {
        let table = table();
        let values = [status("S1"), status("S3")];
        assert_eq!(table.get_max(&values), Some(status("S3")));
        let with_unknown = [StatusValue::unclassified(), status("S1")];
        assert_eq!(table.get_max(&with_unknown), Some(status("S1")));
        assert_eq!(table.get_max(std::iter::empty()), None);
    }

    #[test]
    fn next_stops_at_last() {
        let table = table();
        assert_eq!(table.next(&status("S1")).as_str(), "S2");
        assert_eq!(table.next(&status("S3")).as_str(), "S3");
        assert_eq!(table.next(&status("S9")).as_str(), "S3");
    }

    #[test]
    fn get_min_matches_condition_flags() {
        let table = table();
        let flags = BTreeSet::from([StatusFlag::HighCitationRate, StatusFlag::Review]);
        assert_eq!(table.get_min(&flags).map(StatusValue::as_str), Some("S1"));
        let none = BTreeSet::from([StatusFlag::Review]);
        assert_eq!(table.get_min(&none), None);
    }

    #[test]
    fn construction_errors() {
        assert_eq!(StatusTable::new(&[]).err(), Some(StatusTableError::Empty));
        let duplicate = StatusTable::new(&[
            rule("S1", "review", "true", 1, 0),
            rule("S1", "review", "false", 2, 0),
        ]);
        assert_eq!(
            duplicate.err(),
            Some(StatusTableError::DuplicateStatus("S1".to_string()))
        );
    }
}
