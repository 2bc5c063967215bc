use std::sync::Arc;

use crate::data::aggregate::{summarize, Breakdowns, Metrics};
use crate::data::filter::{apply_intent, DropdownOptions, FilterIntent, FilterState};
use crate::data::model::{Dataset, Dimension, Transaction};
use crate::data::table::{search_rows, sort_rows, TableColumn, TableSort};

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

/// Everything the presentation layer reads for one filter state.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub options: DropdownOptions,
    pub metrics: Metrics,
    pub breakdowns: Breakdowns,
    /// Indices into the dataset of the rows passing the filters, source order.
    pub visible_indices: Vec<usize>,
}

impl DashboardView {
    pub fn compute(dataset: &Dataset, filters: &FilterState) -> Self {
        let records = dataset.records();
        let predicates = filters.predicates();
        let visible_indices: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, t)| predicates.iter().all(|p| p.matches(t)))
            .map(|(i, _)| i)
            .collect();
        let filtered: Vec<&Transaction> = visible_indices.iter().map(|&i| &records[i]).collect();
        DashboardView {
            options: DropdownOptions::from_filtered(&filtered),
            metrics: summarize(&filtered),
            breakdowns: Breakdowns::compute(&filtered),
            visible_indices,
        }
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// One interactive session: the shared dataset plus this session's filters.
pub struct Session {
    /// Loaded once at startup, never mutated.
    dataset: Arc<Dataset>,

    /// Filters currently in effect.
    filters: FilterState,

    /// Widget values being edited, applied per dimension.
    pub draft: FilterState,

    /// Cached derived view; `None` after any intent until next read.
    view: Option<DashboardView>,

    /// Table presentation: column sort and search text.
    pub table_sort: Option<TableSort>,
    pub table_search: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Session {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            filters: FilterState::default(),
            draft: FilterState::default(),
            view: None,
            table_sort: None,
            table_search: String::new(),
            status_message: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Process one intent to completion. Derived data is recomputed lazily.
    pub fn dispatch(&mut self, intent: FilterIntent) {
        log::debug!("Filter intent: {intent:?}");
        match &intent {
            FilterIntent::Reset(dimension) => self.draft.clear(*dimension),
            FilterIntent::ResetAll => self.draft = FilterState::default(),
            FilterIntent::Apply { .. } => {}
        }
        self.filters = apply_intent(&self.filters, intent);
        self.view = None;
    }

    /// Apply the draft value of one dimension.
    pub fn apply_draft(&mut self, dimension: Dimension) {
        let value = self.draft.get(dimension).map(str::to_string);
        self.dispatch(FilterIntent::Apply { dimension, value });
    }

    /// Current derived view, recomputed if the filters changed since last read.
    pub fn view(&mut self) -> &DashboardView {
        let dataset = &self.dataset;
        let filters = &self.filters;
        self.view
            .get_or_insert_with(|| DashboardView::compute(dataset, filters))
    }

    /// Visible rows after table search and sort.
    pub fn table_rows(&mut self) -> Vec<&Transaction> {
        let indices = self.view().visible_indices.clone();
        let records = self.dataset.records();
        let visible: Vec<&Transaction> = indices.iter().map(|&i| &records[i]).collect();
        let mut rows = search_rows(&visible, &self.table_search);
        if let Some(sort) = self.table_sort {
            sort_rows(&mut rows, sort);
        }
        rows
    }

    /// Header click on the table.
    pub fn toggle_sort(&mut self, column: TableColumn) {
        self.table_sort = Some(TableSort::toggled(self.table_sort, column));
    }
}
