use std::collections::{BTreeMap, HashMap};

use super::filter::FilteredView;
use super::model::Column;

/// Defendants shown in the concentration chart.
pub const DEFAULT_TOP_N: usize = 15;

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Headline numbers for the current view. All zero for an empty view.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    /// Rows in the full dataset.
    pub total_rows: usize,
    /// Rows in the filtered view.
    pub filtered_rows: usize,
    pub electronic_rows: usize,
    /// Share of electronic rows, in `[0, 100]`.
    pub electronic_pct: f64,
    pub deposit_total: f64,
    pub balance_total: f64,
}

pub fn summarize(view: &FilteredView<'_>) -> Metrics {
    let ds = view.dataset;
    let electronic_rows = if ds.has_column(Column::BaseYear) {
        view.records().filter(|r| r.is_electronic()).count()
    } else {
        0
    };
    let electronic_pct = if view.is_empty() {
        0.0
    } else {
        electronic_rows as f64 / view.len() as f64 * 100.0
    };
    let column_sum = |col: Column| -> f64 {
        if !ds.has_column(col) {
            return 0.0;
        }
        view.records().filter_map(|r| r.number(col)).sum()
    };

    Metrics {
        total_rows: ds.len(),
        filtered_rows: view.len(),
        electronic_rows,
        electronic_pct,
        deposit_total: column_sum(Column::DepositOriginal),
        balance_total: column_sum(Column::Balance),
    }
}

// ---------------------------------------------------------------------------
// Defendant ranking
// ---------------------------------------------------------------------------

/// One bar of the defendant concentration chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DefendantTotal {
    pub defendant: String,
    pub total_balance: f64,
    pub cases: usize,
}

/// Group by defendant, sum balances, and keep the `n` largest.
///
/// Groups appear in first-seen order before the stable sort, so equal
/// totals keep that order. Rows without a defendant are not grouped.
pub fn rank_by_defendant(view: &FilteredView<'_>, n: usize) -> Vec<DefendantTotal> {
    let mut groups: Vec<DefendantTotal> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for rec in view.records() {
        let Some(name) = rec.defendant.as_deref() else {
            continue;
        };
        let idx = *slot.entry(name).or_insert_with(|| {
            groups.push(DefendantTotal {
                defendant: name.to_string(),
                total_balance: 0.0,
                cases: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[idx];
        group.total_balance += rec.balance.unwrap_or(0.0);
        group.cases += 1;
    }

    groups.sort_by(|a, b| b.total_balance.total_cmp(&a.total_balance));
    groups.truncate(n);
    groups
}

// ---------------------------------------------------------------------------
// Base-year histogram
// ---------------------------------------------------------------------------

/// Rows per integer base year, ascending. Missing years are skipped.
pub fn year_histogram(view: &FilteredView<'_>) -> Vec<(i64, usize)> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for year in view.records().filter_map(|r| r.base_year) {
        *counts.entry(year.floor() as i64).or_default() += 1;
    }
    counts.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterCriteria};
    use crate::data::model::{CaseDataset, CaseRecord};
    use std::collections::BTreeSet;

    fn case(defendant: &str, balance: f64, year: f64) -> CaseRecord {
        CaseRecord {
            defendant: Some(defendant.into()),
            court: Some("TRT2".into()),
            balance: Some(balance),
            deposit_original: Some(balance / 2.0),
            base_year: Some(year),
            ..Default::default()
        }
    }

    fn all_columns() -> BTreeSet<Column> {
        Column::ALL.into_iter().collect()
    }

    #[test]
    fn summary_counts_and_sums() {
        let ds = CaseDataset::new(
            vec![
                case("ACME", 100.0, 2016.0),
                case("GLOBEX", 50.0, 2010.0),
                case("ACME", 30.0, 2019.0),
                case("INITECH", 20.0, 2012.0),
            ],
            all_columns(),
        );
        let m = summarize(&FilteredView::all(&ds));
        assert_eq!(m.total_rows, 4);
        assert_eq!(m.filtered_rows, 4);
        assert_eq!(m.electronic_rows, 2);
        assert_eq!(m.electronic_pct, 50.0);
        assert_eq!(m.balance_total, 200.0);
        assert_eq!(m.deposit_total, 100.0);
    }

    #[test]
    fn court_selection_gives_full_electronic_share() {
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
            courts: BTreeSet::from(["A".to_string()]),
            ..Default::default()
        };
        let m = summarize(&apply(&ds, &criteria));
        assert_eq!(m.filtered_rows, 1);
        assert_eq!(m.electronic_pct, 100.0);
    }

    #[test]
    fn empty_view_reports_zeroes() {
        let ds = CaseDataset::new(vec![case("ACME", 10.0, 2020.0)], all_columns());
        let criteria = FilterCriteria {
            courts: BTreeSet::from(["NOWHERE".to_string()]),
            ..Default::default()
        };
        let view = apply(&ds, &criteria);
        let m = summarize(&view);
        assert_eq!(m.filtered_rows, 0);
        assert_eq!(m.total_rows, 1);
        assert_eq!(m.electronic_pct, 0.0);
        assert_eq!(m.deposit_total, 0.0);
        assert!(rank_by_defendant(&view, DEFAULT_TOP_N).is_empty());
        assert!(year_histogram(&view).is_empty());
    }

    #[test]
    fn absent_deposit_column_sums_to_zero() {
        let mut columns = all_columns();
        columns.remove(&Column::DepositOriginal);
        let ds = CaseDataset::new(
            vec![CaseRecord {
                base_year: Some(2020.0),
                ..Default::default()
            }],
            columns,
        );
        assert_eq!(summarize(&FilteredView::all(&ds)).deposit_total, 0.0);
    }

    #[test]
    fn absent_year_column_means_no_electronic_rows() {
        let ds = CaseDataset::new(
            vec![CaseRecord::default(), CaseRecord::default()],
            [Column::Court].into_iter().collect(),
        );
        let m = summarize(&FilteredView::all(&ds));
        assert_eq!(m.electronic_pct, 0.0);
    }

    #[test]
    fn ranking_sorts_by_total_and_truncates() {
        let ds = CaseDataset::new(
            vec![
                case("ACME", 100.0, 2016.0),
                case("GLOBEX", 50.0, 2010.0),
                case("ACME", 30.0, 2019.0),
                case("INITECH", 20.0, 2012.0),
            ],
            all_columns(),
        );
        let ranking = rank_by_defendant(&FilteredView::all(&ds), 2);
        assert_eq!(
            ranking,
            vec![
                DefendantTotal {
                    defendant: "ACME".into(),
                    total_balance: 130.0,
                    cases: 2
                },
                DefendantTotal {
                    defendant: "GLOBEX".into(),
                    total_balance: 50.0,
                    cases: 1
                },
            ]
        );
    }

    #[test]
    fn ranking_ties_keep_encounter_order() {
        let ds = CaseDataset::new(
            vec![
                case("ZETA", 10.0, 2016.0),
                case("ALPHA", 10.0, 2016.0),
                case("MID", 10.0, 2016.0),
            ],
            all_columns(),
        );
        let names: Vec<String> = rank_by_defendant(&FilteredView::all(&ds), DEFAULT_TOP_N)
            .into_iter()
            .map(|g| g.defendant)
            .collect();
        assert_eq!(names, vec!["ZETA", "ALPHA", "MID"]);
    }

    #[test]
    fn top_n_never_exceeds_view_total() {
        let records = (0..40)
            .map(|i| case(&format!("D{}", i % 20), f64::from(i) * 3.5, 2015.0))
            .collect();
        let ds = CaseDataset::new(records, all_columns());
        let view = FilteredView::all(&ds);

        let ranking = rank_by_defendant(&view, DEFAULT_TOP_N);
        assert_eq!(ranking.len(), DEFAULT_TOP_N);
        let top: f64 = ranking.iter().map(|g| g.total_balance).sum();
        assert!(summarize(&view).balance_total >= top);
        assert!(ranking
            .windows(2)
            .all(|w| w[0].total_balance >= w[1].total_balance));
    }

    #[test]
    fn histogram_counts_per_year() {
        let ds = CaseDataset::new(
            vec![
                case("A", 1.0, 2016.0),
                case("B", 1.0, 2010.0),
                case("C", 1.0, 2016.0),
                CaseRecord::default(),
            ],
            all_columns(),
        );
        assert_eq!(
            year_histogram(&FilteredView::all(&ds)),
            vec![(2010, 1), (2016, 2)]
        );
    }
}
