use std::sync::Arc;

use recovery_panel::config::PanelConfig;
use recovery_panel::data::aggregate::{
    rank_by_defendant, summarize, year_histogram, DefendantTotal, Metrics,
};
use recovery_panel::data::annotate::{annotate, sort_by_balance, ProcessKind};
use recovery_panel::data::filter::{apply, FilterCriteria};
use recovery_panel::data::loader::DatasetLoader;
use recovery_panel::data::model::{CaseDataset, Column};
use recovery_panel::session::SessionContext;

// ---------------------------------------------------------------------------
// Login form
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Last attempt was rejected.
    pub rejected: bool,
}

// ---------------------------------------------------------------------------
// Derived view: everything recomputed on a filter change
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ViewSummary {
    pub metrics: Metrics,
    pub ranking: Vec<DefendantTotal>,
    pub histogram: Vec<(i64, usize)>,
    /// Table rows in display order: dataset index and label.
    pub rows: Vec<(usize, ProcessKind)>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: PanelConfig,
    pub session: SessionContext,
    pub login: LoginForm,
    loader: DatasetLoader,

    /// Loaded dataset (None until the session is authorized).
    pub dataset: Option<Arc<CaseDataset>>,
    /// Fatal load failure; the panel renders nothing else once set.
    pub load_error: Option<String>,

    pub criteria: FilterCriteria,
    pub court_options: Vec<String>,
    pub state_options: Vec<String>,

    /// Aggregates for the current criteria (cached).
    pub view: ViewSummary,
}

impl AppState {
    pub fn new(config: PanelConfig) -> Self {
        let loader = config.loader();
        Self {
            config,
            session: SessionContext::default(),
            login: LoginForm::default(),
            loader,
            dataset: None,
            load_error: None,
            criteria: FilterCriteria::default(),
            court_options: Vec::new(),
            state_options: Vec::new(),
            view: ViewSummary::default(),
        }
    }

    /// Check the login form; on success load the dataset.
    pub fn submit_login(&mut self) {
        self.session =
            SessionContext::authenticate(&self.config, &self.login.username, &self.login.password);
        self.login.password.clear();
        self.login.rejected = !self.session.authorized;
        if self.session.authorized {
            self.load_dataset();
        }
    }

    /// Load (or reuse) the dataset. A failure is terminal for the session.
    pub fn load_dataset(&mut self) {
        if !self.session.authorized {
            return;
        }
        match self.loader.load() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Halting session: {e}");
                self.load_error = Some(e.to_string());
            }
        }
    }

    /// Ingest a loaded dataset, populate the pickers and compute the first view.
    pub fn set_dataset(&mut self, dataset: Arc<CaseDataset>) {
        log::info!(
            "Dataset ready: {} cases, columns {:?}",
            dataset.len(),
            dataset.columns
        );
        self.court_options = dataset.facet_options(Column::Court);
        self.state_options = dataset.facet_options(Column::State);
        self.criteria = FilterCriteria::default();
        self.dataset = Some(dataset);
        self.load_error = None;
        self.refilter();
    }

    /// Recompute the whole view after a criteria change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let view = apply(ds, &self.criteria);
        let mut rows = annotate(&view);
        sort_by_balance(&mut rows);

        self.view = ViewSummary {
            metrics: summarize(&view),
            ranking: rank_by_defendant(&view, self.config.top_n),
            histogram: year_histogram(&view),
            rows: rows.iter().map(|r| (r.index, r.kind)).collect(),
        };
    }

    /// Toggle a court in the selection.
    pub fn toggle_court(&mut self, court: &str) {
        toggle(&mut self.criteria.courts, court);
        self.refilter();
    }

    /// Toggle a state in the selection.
    pub fn toggle_state(&mut self, state: &str) {
        toggle(&mut self.criteria.states, state);
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.refilter();
    }
}

fn toggle(selected: &mut std::collections::BTreeSet<String>, value: &str) {
    if !selected.remove(value) {
        selected.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recovery_panel::data::model::CaseRecord;
    use std::collections::BTreeSet;

    fn signed_in_state() -> AppState {
        let mut state = AppState::new(PanelConfig::default());
        state.session = SessionContext { authorized: true };
        let records = vec![
            CaseRecord {
                court: Some("A".into()),
                state: Some("SP".into()),
                defendant: Some("ACME".into()),
                base_year: Some(2015.0),
                balance: Some(10.0),
                ..Default::default()
            },
            CaseRecord {
                court: Some("B".into()),
                state: Some("RJ".into()),
                defendant: Some("GLOBEX".into()),
                base_year: Some(2010.0),
                balance: Some(30.0),
                ..Default::default()
            },
        ];
        let columns: BTreeSet<Column> = Column::ALL.into_iter().collect();
        state.set_dataset(Arc::new(CaseDataset::new(records, columns)));
        state
    }

    #[test]
    fn wrong_password_keeps_session_closed() {
        let mut state = AppState::new(PanelConfig::default());
        state.login.username = "palermo".into();
        state.login.password = "nope".into();
        state.submit_login();
        assert!(!state.session.authorized);
        assert!(state.login.rejected);
        assert!(state.login.password.is_empty());
        assert!(state.dataset.is_none());
        assert!(state.load_error.is_none());
    }

    #[test]
    fn missing_dataset_halts_after_login() {
        let tmp = tempfile::tempdir().unwrap();
        let config = PanelConfig {
            source_path: tmp.path().join("absent.xlsx"),
            cache_path: tmp.path().join("absent.parquet"),
            ..PanelConfig::default()
        };
        let mut state = AppState::new(config);
        state.login.username = "palermo".into();
        state.login.password = "palermo".into();
        state.submit_login();
        assert!(state.session.authorized);
        assert!(state.dataset.is_none());
        assert!(state.load_error.as_deref().unwrap().contains("not found"));
    }

    #[test]
    fn toggles_recompute_the_view() {
        let mut state = signed_in_state();
        assert_eq!(state.court_options, vec!["A", "B"]);
        assert_eq!(state.view.metrics.filtered_rows, 2);
        // Balance order: GLOBEX's row first.
        assert_eq!(state.view.rows[0].0, 1);

        state.toggle_court("A");
        assert_eq!(state.view.metrics.filtered_rows, 1);
        assert_eq!(state.view.metrics.electronic_pct, 100.0);
        assert_eq!(state.view.ranking[0].defendant, "ACME");

        state.toggle_state("RJ");
        assert_eq!(state.view.metrics.filtered_rows, 0);
        assert!(state.view.rows.is_empty());

        state.clear_filters();
        assert_eq!(state.view.metrics.filtered_rows, 2);
    }
}
