use std::cmp::Ordering;
use std::fmt;

use super::filter::FilteredView;
use super::model::{CaseDataset, CaseRecord};

/// Electronic / physical classification derived from the base year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessKind {
    Electronic,
    PhysicalOld,
}

impl ProcessKind {
    pub fn of(record: &CaseRecord) -> Self {
        if record.is_electronic() {
            ProcessKind::Electronic
        } else {
            ProcessKind::PhysicalOld
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProcessKind::Electronic => "Electronic",
            ProcessKind::PhysicalOld => "Physical/Old",
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A filtered row together with its derived label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedRow<'a> {
    /// Index into the dataset.
    pub index: usize,
    pub record: &'a CaseRecord,
    pub kind: ProcessKind,
}

/// Label every row of the view. The dataset itself is not touched.
pub fn annotate<'a>(view: &FilteredView<'a>) -> Vec<AnnotatedRow<'a>> {
    let dataset: &'a CaseDataset = view.dataset;
    view.indices
        .iter()
        .map(|&index| {
            let record = &dataset.records[index];
            AnnotatedRow {
                index,
                record,
                kind: ProcessKind::of(record),
            }
        })
        .collect()
}

/// Largest balance first, rows without a balance last. Stable.
pub fn sort_by_balance(rows: &mut [AnnotatedRow<'_>]) {
    rows.sort_by(|a, b| match (a.record.balance, b.record.balance) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
