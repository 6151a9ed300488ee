use std::collections::BTreeSet;

use super::model::{CaseDataset, CaseRecord, Column};

// ---------------------------------------------------------------------------
// Filter criteria: what the side panel selects
// ---------------------------------------------------------------------------

/// Active filter selections. An empty facet set means "no constraint";
/// a `false` toggle means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub courts: BTreeSet<String>,
    pub states: BTreeSet<String>,
    pub cnj_valid_only: bool,
    pub doc_valid_only: bool,
    pub electronic_only: bool,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == FilterCriteria::default()
    }

    /// Turn the active selections into predicates. Criteria whose column is
    /// absent from the dataset are skipped.
    pub fn predicates<'a>(&'a self, dataset: &CaseDataset) -> Vec<Predicate<'a>> {
        let candidates = [
            (!self.courts.is_empty()).then_some(Predicate::OneOf(Column::Court, &self.courts)),
            (!self.states.is_empty()).then_some(Predicate::OneOf(Column::State, &self.states)),
            self.cnj_valid_only.then_some(Predicate::FlagSet(Column::CnjOk)),
            self.doc_valid_only.then_some(Predicate::FlagSet(Column::DocOk)),
            self.electronic_only.then_some(Predicate::Electronic),
        ];
        candidates
            .into_iter()
            .flatten()
            .filter(|p| dataset.has_column(p.column()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Predicate: one independent row test
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate<'a> {
    /// Exact, case-sensitive membership of a normalized text column.
    OneOf(Column, &'a BTreeSet<String>),
    /// Boolean quality flag must be `true`.
    FlagSet(Column),
    /// Base year above the electronic threshold.
    Electronic,
}

impl Predicate<'_> {
    pub fn column(&self) -> Column {
        match self {
            Predicate::OneOf(col, _) | Predicate::FlagSet(col) => *col,
            Predicate::Electronic => Column::BaseYear,
        }
    }

    pub fn matches(&self, record: &CaseRecord) -> bool {
        match self {
            Predicate::OneOf(col, selected) => {
                record.text(*col).is_some_and(|v| selected.contains(v))
            }
            Predicate::FlagSet(col) => record.flag(*col) == Some(true),
            Predicate::Electronic => record.is_electronic(),
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredView: rows of the shared dataset that pass the criteria
// ---------------------------------------------------------------------------

/// A read-only view over a dataset: the indices of the rows that passed.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub dataset: &'a CaseDataset,
    pub indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every row.
    pub fn all(dataset: &'a CaseDataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &'a CaseRecord> + '_ {
        let dataset: &'a CaseDataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the view of rows that pass every active criterion.
pub fn apply<'a>(dataset: &'a CaseDataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let predicates = criteria.predicates(dataset);
    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| predicates.iter().all(|p| p.matches(rec)))
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    log::debug!(
        "{} predicates kept {} of {} rows",
        predicates.len(),
        indices.len(),
        dataset.len()
    );
    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(court: &str, state: &str, year: Option<f64>, cnj: Option<bool>) -> CaseRecord {
        CaseRecord {
            court: Some(court.into()),
            state: Some(state.into()),
            base_year: year,
            cnj_ok: cnj,
            ..Default::default()
        }
    }

    fn dataset() -> CaseDataset {
        CaseDataset::new(
            vec![
                record("TRT2", "SP", Some(2016.0), Some(true)),
                record("TRT1", "RJ", Some(2010.0), Some(false)),
                record("TRT2", "SP", None, None),
                record("TRT15", "SP", Some(2020.0), Some(true)),
                record("TRT1", "RJ", Some(2018.0), Some(true)),
            ],
            [Column::Court, Column::State, Column::BaseYear, Column::CnjOk]
                .into_iter()
                .collect(),
        )
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn default_criteria_keep_every_row() {
        let ds = dataset();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(apply(&ds, &criteria).indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn court_selection_scenario() {
        let ds = CaseDataset::new(
            vec![
                CaseRecord {
                    court: Some("A".into()),
                    base_year: Some(2015.0),
                    ..Default::default()
                },
                CaseRecord {
                    court: Some("B".into()),
                    base_year: Some(2010.0),
                    ..Default::default()
                },
            ],
            [Column::Court, Column::BaseYear].into_iter().collect(),
        );
        let criteria = FilterCriteria {
            courts: set(&["A"]),
            ..Default::default()
        };
        let view = apply(&ds, &criteria);
        assert_eq!(view.indices, vec![0]);
    }

    #[test]
    fn criteria_combine_with_and() {
        let ds = dataset();
        let criteria = FilterCriteria {
            states: set(&["SP"]),
            cnj_valid_only: true,
            electronic_only: true,
            ..Default::default()
        };
        assert_eq!(apply(&ds, &criteria).indices, vec![0, 3]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = dataset();
        let criteria = FilterCriteria {
            courts: set(&["TRT1", "TRT2"]),
            electronic_only: true,
            ..Default::default()
        };
        assert_eq!(apply(&ds, &criteria).indices, apply(&ds, &criteria).indices);
    }

    fn keep(ds: &CaseDataset, order: &[Predicate<'_>]) -> Vec<usize> {
        (0..ds.len())
            .filter(|&i| order.iter().all(|p| p.matches(&ds.records[i])))
            .collect()
    }

    #[test]
    fn predicate_order_does_not_matter() {
        let ds = dataset();
        let criteria = FilterCriteria {
            courts: set(&["TRT2", "TRT15"]),
            electronic_only: true,
            ..Default::default()
        };
        let predicates = criteria.predicates(&ds);
        let mut reversed = predicates.clone();
        reversed.reverse();
        assert_eq!(keep(&ds, &predicates), keep(&ds, &reversed));
        assert_eq!(keep(&ds, &predicates), vec![0, 3]);
    }

    #[test]
    fn facet_match_is_case_sensitive() {
        let ds = dataset();
        let criteria = FilterCriteria {
            courts: set(&["trt2"]),
            ..Default::default()
        };
        assert!(apply(&ds, &criteria).is_empty());
    }

    #[test]
    fn criteria_on_absent_columns_are_skipped() {
        let ds = dataset();
        let criteria = FilterCriteria {
            doc_valid_only: true,
            ..Default::default()
        };
        assert!(criteria.predicates(&ds).is_empty());
        assert_eq!(apply(&ds, &criteria).len(), ds.len());
    }

    #[test]
    fn missing_flag_does_not_pass_quality_toggle() {
        let ds = dataset();
        let criteria = FilterCriteria {
            cnj_valid_only: true,
            ..Default::default()
        };
        assert_eq!(apply(&ds, &criteria).indices, vec![0, 3, 4]);
    }

    #[test]
    fn filtering_leaves_dataset_untouched() {
        let ds = dataset();
        let before = ds.records.clone();
        let criteria = FilterCriteria {
            states: set(&["RJ"]),
            ..Default::default()
        };
        let view = apply(&ds, &criteria);
        assert_eq!(view.records().count(), 2);
        assert_eq!(ds.records, before);
    }
}
