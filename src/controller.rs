//! Recharge List Controller
//!
//! Owns the list query state and runs the list page's flows: load, filter,
//! paging, sorting, edit, delete and export.
//!
//! Every handler takes `&self`. State lives in `RefCell`s that are never
//! borrowed across an `.await`, so overlapping handlers (a second click
//! while a request is in flight) run side by side without a guard.

use chrono::NaiveDate;
use std::cell::RefCell;

use crate::api::{Endpoints, RechargeApi};
use crate::locale::Locale;
use crate::model::RechargeId;
use crate::query::{Filters, ListQueryState, SortKey};
use crate::table::{EditForm, RenderedTable};
use crate::view::{ListView, Notice};

pub struct RechargeListController<A, V> {
    api: A,
    view: V,
    endpoints: Endpoints,
    locale: Locale,
    state: RefCell<ListQueryState>,
    pending_delete: RefCell<Option<RechargeId>>,
}

impl<A: RechargeApi, V: ListView> RechargeListController<A, V> {
    pub fn new(api: A, view: V, endpoints: Endpoints, locale: Locale) -> Self {
        Self {
            api,
            view,
            endpoints,
            locale,
            state: RefCell::new(ListQueryState::new()),
            pending_delete: RefCell::new(None),
        }
    }

    /// Start from a given query state instead of the defaults
    pub fn with_state(self, state: ListQueryState) -> Self {
        self.state.replace(state);
        self
    }

    pub fn state(&self) -> ListQueryState {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn pending_delete(&self) -> Option<RechargeId> {
        self.pending_delete.borrow().clone()
    }

    /// Fetch the current page and replace the table with it.
    ///
    /// On failure the previous table stays as it was.
    pub async fn load_recharges(&self) {
        let query = self.state();
        tracing::debug!(
            page = query.current_page,
            sort_by = %query.sort_by,
            sort_dir = query.sort_dir.as_str(),
            "Loading recharges"
        );

        match self.api.list(&query).await {
            Ok(page) => {
                let table =
                    RenderedTable::render(&page, query.current_page, query.page_size, self.locale);
                self.view.show_table(&table);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load recharges");
                self.view
                    .notify(Notice::danger(self.locale.messages().load_failed));
            }
        }
    }

    pub async fn apply_filters(&self, filters: Filters) {
        self.state.borrow_mut().apply_filters(filters);
        self.load_recharges().await;
    }

    pub async fn clear_filters(&self) {
        let filters = {
            let mut state = self.state.borrow_mut();
            state.clear_filters();
            state.filters.clone()
        };
        self.view.show_filters(&filters);
        self.load_recharges().await;
    }

    /// Take the current filter inputs with the date range replaced by the
    /// 30 days ending `today`, and reload from page 1
    pub async fn last_30_days(&self, inputs: Filters, today: NaiveDate) {
        let filters = {
            let mut state = self.state.borrow_mut();
            state.apply_filters(inputs);
            state.last_30_days(today);
            state.filters.clone()
        };
        self.view.show_filters(&filters);
        self.load_recharges().await;
    }

    /// No-op on page 1
    pub async fn prev_page(&self) {
        let moved = self.state.borrow_mut().prev_page();
        if moved {
            self.load_recharges().await;
        }
    }

    pub async fn next_page(&self) {
        self.state.borrow_mut().next_page();
        self.load_recharges().await;
    }

    pub async fn toggle_sort(&self, key: SortKey) {
        self.state.borrow_mut().toggle_sort(key);
        self.load_recharges().await;
    }

    /// Open the edit modal filled from the row as currently rendered.
    ///
    /// Returns `false` when no row with `id` is on screen.
    pub fn begin_edit(&self, id: &RechargeId) -> bool {
        match self.view.rendered_row(id) {
            Some(row) => {
                let form = EditForm::from_row(&row, self.locale);
                self.view.open_edit(&form);
                true
            }
            None => {
                tracing::warn!(id = %id, "Edit requested for a row that is not rendered");
                false
            }
        }
    }

    /// Send the form as a full-record update
    pub async fn save_edit(&self, form: &EditForm) {
        let messages = self.locale.messages();

        let update = match form.to_update() {
            Ok(update) => update,
            Err(e) => {
                tracing::warn!(id = %form.id, error = %e, "Edit form rejected");
                self.view.notify(Notice::danger(messages.form_error(&e)));
                return;
            }
        };

        match self.api.update(&form.id, &update).await {
            Ok(()) => {
                tracing::info!(id = %form.id, "Recharge updated");
                self.view.notify(Notice::success(messages.save_succeeded));
                self.view.close_edit();
                self.load_recharges().await;
            }
            Err(e) => {
                tracing::warn!(id = %form.id, error = %e, "Failed to update recharge");
                let message = e.server_message().unwrap_or(messages.save_failed);
                self.view.notify(Notice::danger(message));
            }
        }
    }

    /// Open the delete confirmation for `id`. Nothing is sent yet.
    pub fn begin_delete(&self, id: &RechargeId) {
        self.pending_delete.replace(Some(id.clone()));
        self.view.open_delete_confirm(id);
    }

    pub fn cancel_delete(&self) {
        self.pending_delete.replace(None);
        self.view.close_delete_confirm();
    }

    /// Delete the recharge the confirmation was opened for
    pub async fn confirm_delete(&self) {
        let messages = self.locale.messages();
        let Some(id) = self.pending_delete() else {
            tracing::warn!("Delete confirmed without a pending recharge");
            return;
        };

        match self.api.delete(&id).await {
            Ok(()) => {
                tracing::info!(id = %id, "Recharge deleted");
                self.pending_delete.replace(None);
                self.view.notify(Notice::success(messages.delete_succeeded));
                self.view.close_delete_confirm();
                self.load_recharges().await;
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Failed to delete recharge");
                self.view.notify(Notice::danger(messages.delete_failed));
            }
        }
    }

    /// Navigate to the CSV export for the current filters
    pub fn export(&self) {
        let url = self.endpoints.export(&self.state.borrow());
        tracing::info!(url = %url, "Navigating to CSV export");
        self.view.navigate(&url);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory doubles for the API and the views

    use super::*;
    use crate::charts::{ChartSlot, ChartSpec};
    use crate::error::{ApiError, ApiResult};
    use crate::model::{MonthlyAggregate, RechargePage, RechargeRecord, RechargeUpdate};
    use crate::summary::DashboardSummary;
    use crate::table::RenderedRow;
    use crate::view::ChartSurface;
    use async_trait::async_trait;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        List(ListQueryState),
        Update(RechargeId, RechargeUpdate),
        Delete(RechargeId),
        Monthly,
    }

    #[derive(Default)]
    pub struct FakeApi {
        pub calls: RefCell<Vec<Call>>,
        pub list_results: RefCell<VecDeque<ApiResult<RechargePage>>>,
        pub update_results: RefCell<VecDeque<ApiResult<()>>>,
        pub delete_results: RefCell<VecDeque<ApiResult<()>>>,
        pub monthly_result: RefCell<Option<ApiResult<MonthlyAggregate>>>,
    }

    impl FakeApi {
        pub fn push_list(&self, result: ApiResult<RechargePage>) {
            self.list_results.borrow_mut().push_back(result);
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        pub fn list_calls(&self) -> Vec<ListQueryState> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::List(q) => Some(q),
                    _ => None,
                })
                .collect()
        }
    }

    fn empty_page() -> RechargePage {
        RechargePage {
            items: vec![],
            total: 0,
            has_prev: false,
            has_next: false,
        }
    }

    #[async_trait(?Send)]
    impl RechargeApi for FakeApi {
        async fn list(&self, query: &ListQueryState) -> ApiResult<RechargePage> {
            self.calls.borrow_mut().push(Call::List(query.clone()));
            self.list_results
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(empty_page()))
        }

        async fn update(&self, id: &RechargeId, update: &RechargeUpdate) -> ApiResult<()> {
            self.calls
                .borrow_mut()
                .push(Call::Update(id.clone(), update.clone()));
            self.update_results.borrow_mut().pop_front().unwrap_or(Ok(()))
        }

        async fn delete(&self, id: &RechargeId) -> ApiResult<()> {
            self.calls.borrow_mut().push(Call::Delete(id.clone()));
            self.delete_results.borrow_mut().pop_front().unwrap_or(Ok(()))
        }

        async fn monthly(&self) -> ApiResult<MonthlyAggregate> {
            self.calls.borrow_mut().push(Call::Monthly);
            self.monthly_result
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(ApiError::Transport("no fixture".into())))
        }
    }

    #[derive(Default)]
    pub struct RecordingView {
        pub table: RefCell<Option<RenderedTable>>,
        pub tables_shown: RefCell<usize>,
        pub filters: RefCell<Option<Filters>>,
        pub edit: RefCell<Option<EditForm>>,
        pub delete_target: RefCell<Option<RechargeId>>,
        pub notices: RefCell<Vec<Notice>>,
        pub navigations: RefCell<Vec<String>>,
        pub charts: RefCell<Vec<ChartSpec>>,
        pub messages: RefCell<Vec<(ChartSlot, String)>>,
        pub summary: RefCell<Option<DashboardSummary>>,
    }

    impl RecordingView {
        pub fn notices(&self) -> Vec<Notice> {
            self.notices.borrow().clone()
        }
    }

    impl ListView for RecordingView {
        fn show_table(&self, table: &RenderedTable) {
            self.table.replace(Some(table.clone()));
            *self.tables_shown.borrow_mut() += 1;
        }

        fn show_filters(&self, filters: &Filters) {
            self.filters.replace(Some(filters.clone()));
        }

        fn rendered_row(&self, id: &RechargeId) -> Option<RenderedRow> {
            self.table
                .borrow()
                .as_ref()
                .and_then(|t| t.body.find(id).cloned())
        }

        fn open_edit(&self, form: &EditForm) {
            self.edit.replace(Some(form.clone()));
        }

        fn close_edit(&self) {
            self.edit.replace(None);
        }

        fn open_delete_confirm(&self, id: &RechargeId) {
            self.delete_target.replace(Some(id.clone()));
        }

        fn close_delete_confirm(&self) {
            self.delete_target.replace(None);
        }

        fn notify(&self, notice: Notice) {
            self.notices.borrow_mut().push(notice);
        }

        fn navigate(&self, url: &str) {
            self.navigations.borrow_mut().push(url.to_string());
        }
    }

    impl ChartSurface for RecordingView {
        fn render_chart(&self, spec: &ChartSpec) {
            self.charts.borrow_mut().push(spec.clone());
        }

        fn show_message(&self, slot: ChartSlot, message: &str) {
            self.messages.borrow_mut().push((slot, message.to_string()));
        }

        fn show_summary(&self, summary: &DashboardSummary) {
            self.summary.replace(Some(summary.clone()));
        }
    }

    pub fn record(id: &str, day: u32) -> RechargeRecord {
        RechargeRecord {
            id: RechargeId::new(id),
            data: NaiveDate::from_ymd_opt(2024, 6, day).unwrap().into(),
            kwh: 25.0,
            custo: 37.5,
            isento: false,
            odometro: 18000.0 + day as f64 * 100.0,
            local: Some("Garagem".to_string()),
            observacoes: None,
        }
    }

    pub fn page_of(items: Vec<RechargeRecord>, total: u64, has_prev: bool, has_next: bool) -> RechargePage {
        RechargePage {
            items,
            total,
            has_prev,
            has_next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::error::ApiError;
    use crate::query::{IsentoFilter, SortDir};
    use crate::table::TableBody;
    use crate::view::NoticeLevel;

    fn controller() -> RechargeListController<FakeApi, RecordingView> {
        RechargeListController::new(
            FakeApi::default(),
            RecordingView::default(),
            Endpoints::default(),
            Locale::PtBr,
        )
    }

    #[tokio::test]
    async fn test_load_renders_rows_and_pager() {
        let ctrl = controller();
        ctrl.api()
            .push_list(Ok(page_of(vec![record("1", 1), record("2", 2)], 2, false, false)));

        ctrl.load_recharges().await;

        let table = ctrl.view().table.borrow().clone().unwrap();
        assert_eq!(table.body.row_count(), 2);
        assert_eq!(table.pager.caption, "Exibindo 1–2 de 2");
        assert!(!table.pager.prev_enabled);
        assert!(!table.pager.next_enabled);
        assert!(ctrl.view().notices().is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_shows_placeholder() {
        let ctrl = controller();
        ctrl.load_recharges().await;

        let table = ctrl.view().table.borrow().clone().unwrap();
        assert!(matches!(table.body, TableBody::Placeholder { colspan: 8, .. }));
        assert_eq!(table.body.row_count(), 1);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_table() {
        let ctrl = controller();
        ctrl.api()
            .push_list(Ok(page_of(vec![record("1", 1)], 1, false, false)));
        ctrl.load_recharges().await;
        let before = ctrl.view().table.borrow().clone();

        ctrl.api().push_list(Err(ApiError::Status { status: 500 }));
        ctrl.next_page().await;

        assert_eq!(*ctrl.view().table.borrow(), before);
        assert_eq!(*ctrl.view().tables_shown.borrow(), 1);
        assert_eq!(
            ctrl.view().notices(),
            vec![Notice::danger("Erro ao carregar recargas")]
        );
    }

    #[tokio::test]
    async fn test_apply_filters_resets_page_and_reloads() {
        let ctrl = controller();
        ctrl.next_page().await;
        ctrl.next_page().await;

        let filters = Filters {
            local: "Shopping".to_string(),
            isento: IsentoFilter::True,
            ..Filters::default()
        };
        ctrl.apply_filters(filters.clone()).await;

        let last = ctrl.api().list_calls().pop().unwrap();
        assert_eq!(last.current_page, 1);
        assert_eq!(last.filters, filters);
    }

    #[tokio::test]
    async fn test_clear_filters_resets_inputs() {
        let ctrl = controller().with_state(ListQueryState {
            current_page: 3,
            filters: Filters {
                observacoes: "viagem".to_string(),
                ..Filters::default()
            },
            ..ListQueryState::default()
        });

        ctrl.clear_filters().await;

        assert_eq!(*ctrl.view().filters.borrow(), Some(Filters::default()));
        let last = ctrl.api().list_calls().pop().unwrap();
        assert_eq!(last.current_page, 1);
        assert_eq!(last.filters, Filters::default());
    }

    #[tokio::test]
    async fn test_last_30_days_sets_range() {
        let ctrl = controller();
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        ctrl.last_30_days(Filters::default(), today).await;

        let shown = ctrl.view().filters.borrow().clone().unwrap();
        assert_eq!(shown.date_from, NaiveDate::from_ymd_opt(2023, 12, 16));
        assert_eq!(shown.date_to, Some(today));
        assert_eq!(ctrl.api().list_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_last_30_days_keeps_unapplied_inputs() {
        let ctrl = controller().with_state(ListQueryState {
            current_page: 2,
            ..ListQueryState::default()
        });
        let typed = Filters {
            local: "Shell".to_string(),
            observacoes: "rodovia".to_string(),
            isento: IsentoFilter::False,
            date_from: NaiveDate::from_ymd_opt(2020, 1, 1),
            date_to: None,
        };
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();

        ctrl.last_30_days(typed, today).await;

        let expected = Filters {
            local: "Shell".to_string(),
            observacoes: "rodovia".to_string(),
            isento: IsentoFilter::False,
            date_from: NaiveDate::from_ymd_opt(2024, 3, 1),
            date_to: Some(today),
        };
        let last = ctrl.api().list_calls().pop().unwrap();
        assert_eq!(last.current_page, 1);
        assert_eq!(last.filters, expected);
        assert!(last
            .list_query_string()
            .contains("&local=Shell&observacoes=rodovia&isento=false&date_from=2024-03-01&date_to=2024-03-31"));
        assert_eq!(*ctrl.view().filters.borrow(), Some(expected));
    }

    #[tokio::test]
    async fn test_prev_on_first_page_does_nothing() {
        let ctrl = controller();
        ctrl.prev_page().await;
        assert!(ctrl.api().calls().is_empty());

        ctrl.next_page().await;
        ctrl.prev_page().await;
        let pages: Vec<u32> = ctrl
            .api()
            .list_calls()
            .iter()
            .map(|q| q.current_page)
            .collect();
        assert_eq!(pages, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_next_page_is_unguarded() {
        let ctrl = controller();
        ctrl.api()
            .push_list(Ok(page_of(vec![], 45, true, false)));
        ctrl.state.borrow_mut().current_page = 3;

        ctrl.next_page().await;

        let table = ctrl.view().table.borrow().clone().unwrap();
        assert_eq!(ctrl.state().current_page, 4);
        assert_eq!(table.pager.caption, "Exibindo 61–45 de 45");
        assert!(matches!(table.body, TableBody::Placeholder { .. }));
    }

    #[tokio::test]
    async fn test_sort_toggle_reloads() {
        let ctrl = controller();
        ctrl.toggle_sort(SortKey::Data).await;
        ctrl.toggle_sort(SortKey::Kwh).await;

        let calls = ctrl.api().list_calls();
        assert_eq!((calls[0].sort_by, calls[0].sort_dir), (SortKey::Data, SortDir::Desc));
        assert_eq!((calls[1].sort_by, calls[1].sort_dir), (SortKey::Kwh, SortDir::Asc));
    }

    #[tokio::test]
    async fn test_edit_flow_sends_full_record() {
        let ctrl = controller();
        let mut rec = record("7", 3);
        rec.observacoes = Some("Primeira recarga no posto novo da rodovia".to_string());
        ctrl.api()
            .push_list(Ok(page_of(vec![rec.clone()], 1, false, false)));
        ctrl.load_recharges().await;

        assert!(ctrl.begin_edit(&RechargeId::new("7")));
        let mut form = ctrl.view().edit.borrow().clone().unwrap();
        assert_eq!(form.custo, "37.50");
        form.kwh = "26.5".to_string();

        ctrl.save_edit(&form).await;

        let update = ctrl
            .api()
            .calls()
            .into_iter()
            .find_map(|c| match c {
                Call::Update(id, update) => Some((id, update)),
                _ => None,
            })
            .unwrap();
        assert_eq!(update.0.as_str(), "7");
        assert_eq!(update.1.kwh, 26.5);
        assert_eq!(update.1.custo, 37.5);
        assert_eq!(update.1.local, "Garagem");
        assert_eq!(
            update.1.observacoes,
            "Primeira recarga no posto novo da rodovia"
        );

        assert!(ctrl.view().edit.borrow().is_none());
        assert_eq!(
            ctrl.view().notices(),
            vec![Notice::success("Recarga atualizada com sucesso!")]
        );
        assert_eq!(ctrl.api().list_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_edit_of_unrendered_row_is_refused() {
        let ctrl = controller();
        assert!(!ctrl.begin_edit(&RechargeId::new("99")));
        assert!(ctrl.view().edit.borrow().is_none());
    }

    #[tokio::test]
    async fn test_edit_failure_uses_server_message_or_fallback() {
        let ctrl = controller();
        ctrl.api()
            .push_list(Ok(page_of(vec![record("5", 5)], 1, false, false)));
        ctrl.load_recharges().await;
        ctrl.begin_edit(&RechargeId::new("5"));
        let form = ctrl.view().edit.borrow().clone().unwrap();

        ctrl.api().update_results.borrow_mut().extend([
            Err(ApiError::Rejected {
                status: 400,
                message: "Custo deve ser >= 0.".to_string(),
            }),
            Err(ApiError::Status { status: 502 }),
        ]);
        ctrl.save_edit(&form).await;
        ctrl.save_edit(&form).await;

        let messages: Vec<String> = ctrl
            .view()
            .notices()
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert_eq!(messages, vec!["Custo deve ser >= 0.", "Erro ao salvar edição"]);
        assert!(ctrl.view().edit.borrow().is_some());
        assert_eq!(ctrl.api().list_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let ctrl = controller();
        ctrl.api()
            .push_list(Ok(page_of(vec![record("5", 5)], 1, false, false)));
        ctrl.load_recharges().await;
        ctrl.begin_edit(&RechargeId::new("5"));
        let mut form = ctrl.view().edit.borrow().clone().unwrap();
        form.odometro = String::new();

        ctrl.save_edit(&form).await;

        assert!(!ctrl
            .api()
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Update(..))));
        assert_eq!(
            ctrl.view().notices()[0],
            Notice::danger("Valor inválido para Odômetro: ")
        );
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let ctrl = controller();
        let id = RechargeId::new("12");

        ctrl.begin_delete(&id);
        assert_eq!(*ctrl.view().delete_target.borrow(), Some(id.clone()));
        assert!(ctrl.api().calls().is_empty());

        ctrl.cancel_delete();
        ctrl.confirm_delete().await;
        assert!(ctrl.api().calls().is_empty());

        ctrl.begin_delete(&id);
        ctrl.confirm_delete().await;
        assert_eq!(ctrl.api().calls()[0], Call::Delete(id));
        assert_eq!(ctrl.api().list_calls().len(), 1);
        assert!(ctrl.pending_delete().is_none());
        assert!(ctrl.view().delete_target.borrow().is_none());
    }

    #[tokio::test]
    async fn test_delete_failure_shows_generic_error() {
        let ctrl = controller();
        ctrl.api().delete_results.borrow_mut().push_back(Err(ApiError::Rejected {
            status: 404,
            message: "not found".to_string(),
        }));

        ctrl.begin_delete(&RechargeId::new("3"));
        ctrl.confirm_delete().await;

        assert_eq!(
            ctrl.view().notices(),
            vec![Notice::danger("Erro ao excluir recarga")]
        );
        assert!(ctrl.api().list_calls().is_empty());
        assert!(ctrl.pending_delete().is_some());
    }

    #[tokio::test]
    async fn test_export_navigates_with_filters_only() {
        let ctrl = controller();
        ctrl.next_page().await;
        ctrl.toggle_sort(SortKey::Custo).await;
        ctrl.apply_filters(Filters {
            observacoes: "rápida".to_string(),
            ..Filters::default()
        })
        .await;

        ctrl.export();

        assert_eq!(
            ctrl.view().navigations.borrow().clone(),
            vec!["/export_recharges?local=&observacoes=r%C3%A1pida&isento=all&date_from=&date_to="]
        );
    }

    #[tokio::test]
    async fn test_overlapping_requests_are_not_deduplicated() {
        let ctrl = controller();
        tokio::join!(ctrl.next_page(), ctrl.next_page());

        let pages: Vec<u32> = ctrl
            .api()
            .list_calls()
            .iter()
            .map(|q| q.current_page)
            .collect();
        assert_eq!(pages.len(), 2);
        assert_eq!(ctrl.state().current_page, 3);
    }
}
