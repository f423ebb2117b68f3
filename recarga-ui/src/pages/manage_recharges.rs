//! Manage Recharges Page
//!
//! Filterable, sortable, paged recharge table with edit and delete modals
//! and CSV export. All flows run through [`RechargeListController`]; this
//! page only binds its [`ListView`] seam to signals.

use chrono::NaiveDate;
use leptos::*;
use recarga::{
    EditForm, Filters, IsentoFilter, ListView, Notice, RechargeId, RechargeListController,
    RenderedRow, RenderedTable, SortDir, SortKey, TableBody,
};
use std::rc::Rc;

use crate::api::GlooRechargeApi;
use crate::state::global::{use_global_state, GlobalState};

type Controller = RechargeListController<GlooRechargeApi, SignalListView>;

/// [`ListView`] backed by signals
#[derive(Clone, Copy)]
pub struct SignalListView {
    table: RwSignal<Option<RenderedTable>>,
    /// Filter inputs; edited in place by the user
    filters: RwSignal<Filters>,
    edit: RwSignal<Option<EditForm>>,
    delete_target: RwSignal<Option<RechargeId>>,
    global: GlobalState,
}

impl SignalListView {
    fn new(global: GlobalState) -> Self {
        Self {
            table: create_rw_signal(None),
            filters: create_rw_signal(Filters::default()),
            edit: create_rw_signal(None),
            delete_target: create_rw_signal(None),
            global,
        }
    }
}

impl ListView for SignalListView {
    fn show_table(&self, table: &RenderedTable) {
        self.table.set(Some(table.clone()));
    }

    fn show_filters(&self, filters: &Filters) {
        self.filters.set(filters.clone());
    }

    fn rendered_row(&self, id: &RechargeId) -> Option<RenderedRow> {
        self.table
            .with_untracked(|t| t.as_ref().and_then(|t| t.body.find(id).cloned()))
    }

    fn open_edit(&self, form: &EditForm) {
        self.edit.set(Some(form.clone()));
    }

    fn close_edit(&self) {
        self.edit.set(None);
    }

    fn open_delete_confirm(&self, id: &RechargeId) {
        self.delete_target.set(Some(id.clone()));
    }

    fn close_delete_confirm(&self) {
        self.delete_target.set(None);
    }

    fn notify(&self, notice: Notice) {
        self.global.notify(notice);
    }

    fn navigate(&self, url: &str) {
        if let Err(e) = window().location().set_href(url) {
            web_sys::console::error_2(&"Navigation failed".into(), &e);
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Manage recharges page component
#[component]
pub fn ManageRecharges() -> impl IntoView {
    let global = use_global_state();
    let view_state = SignalListView::new(global);
    let api = GlooRechargeApi::new();
    let endpoints = api.endpoints().clone();
    let controller = store_value(Rc::new(RechargeListController::new(
        api,
        view_state,
        endpoints,
        global.locale,
    )));
    let sort = create_rw_signal((SortKey::Data, SortDir::Asc));
    let m = global.locale.messages();

    let c = controller.get_value();
    spawn_local(async move { c.load_recharges().await });

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">{m.page_title}</h1>
                <button
                    class="px-4 py-2 rounded-lg bg-green-600 text-white hover:bg-green-700"
                    on:click=move |_| controller.get_value().export()
                >
                    {m.export_csv}
                </button>
            </div>

            <FilterBar controller=controller filters=view_state.filters />
            <RechargeTable controller=controller view_state=view_state sort=sort />
            <EditModal controller=controller edit=view_state.edit />
            <DeleteModal controller=controller target=view_state.delete_target />
        </div>
    }
}

#[component]
fn FilterBar(controller: StoredValue<Rc<Controller>>, filters: RwSignal<Filters>) -> impl IntoView {
    let m = use_global_state().locale.messages();
    let [.., isento_label, _, local_label, notes_label] = m.columns;
    let apply = move |_| {
        let c = controller.get_value();
        let current = filters.get_untracked();
        spawn_local(async move { c.apply_filters(current).await });
    };
    let clear = move |_| {
        let c = controller.get_value();
        spawn_local(async move { c.clear_filters().await });
    };
    let last_30 = move |_| {
        let c = controller.get_value();
        let current = filters.get_untracked();
        let today = chrono::Local::now().date_naive();
        spawn_local(async move { c.last_30_days(current, today).await });
    };

    view! {
        <section class="bg-white rounded-xl shadow p-4 grid md:grid-cols-6 gap-4 items-end">
            <label class="flex flex-col text-sm">
                {local_label}
                <input
                    type="text"
                    class="border rounded px-2 py-1"
                    prop:value=move || filters.with(|f| f.local.clone())
                    on:input=move |ev| filters.update(|f| f.local = event_target_value(&ev))
                />
            </label>
            <label class="flex flex-col text-sm">
                {notes_label}
                <input
                    type="text"
                    class="border rounded px-2 py-1"
                    prop:value=move || filters.with(|f| f.observacoes.clone())
                    on:input=move |ev| filters.update(|f| f.observacoes = event_target_value(&ev))
                />
            </label>
            <label class="flex flex-col text-sm">
                {isento_label}
                <select
                    class="border rounded px-2 py-1"
                    prop:value=move || filters.with(|f| f.isento.as_str())
                    on:change=move |ev| {
                        let isento = event_target_value(&ev).parse().unwrap_or(IsentoFilter::All);
                        filters.update(|f| f.isento = isento);
                    }
                >
                    <option value="all">{m.isento_all}</option>
                    <option value="true">{m.yes}</option>
                    <option value="false">{m.no}</option>
                </select>
            </label>
            <label class="flex flex-col text-sm">
                {m.date_from}
                <input
                    type="date"
                    class="border rounded px-2 py-1"
                    prop:value=move || filters.with(|f| date_value(f.date_from))
                    on:change=move |ev| filters.update(|f| f.date_from = parse_date(&event_target_value(&ev)))
                />
            </label>
            <label class="flex flex-col text-sm">
                {m.date_to}
                <input
                    type="date"
                    class="border rounded px-2 py-1"
                    prop:value=move || filters.with(|f| date_value(f.date_to))
                    on:change=move |ev| filters.update(|f| f.date_to = parse_date(&event_target_value(&ev)))
                />
            </label>
            <div class="flex flex-wrap gap-2">
                <button class="px-3 py-1 rounded bg-blue-600 text-white" on:click=apply>{m.apply}</button>
                <button class="px-3 py-1 rounded bg-gray-200" on:click=clear>{m.clear}</button>
                <button class="px-3 py-1 rounded bg-gray-200" on:click=last_30>{m.last_30_days}</button>
            </div>
        </section>
    }
}

#[component]
fn RechargeTable(
    controller: StoredValue<Rc<Controller>>,
    view_state: SignalListView,
    sort: RwSignal<(SortKey, SortDir)>,
) -> impl IntoView {
    let messages = view_state.global.locale.messages();

    let headers = SortKey::ALL
        .into_iter()
        .zip(messages.columns)
        .map(|(key, title)| {
            let on_click = move |_| {
                let c = controller.get_value();
                spawn_local(async move {
                    c.toggle_sort(key).await;
                    let state = c.state();
                    sort.set((state.sort_by, state.sort_dir));
                });
            };
            let indicator = move || match sort.get() {
                (k, SortDir::Asc) if k == key => " ▲",
                (k, SortDir::Desc) if k == key => " ▼",
                _ => "",
            };
            view! {
                <th class="px-3 py-2 text-left cursor-pointer select-none" on:click=on_click>
                    {title}{indicator}
                </th>
            }
        })
        .collect_view();

    let body = move || match view_state.table.get() {
        None => view! {
            <tr><td colspan="8" class="px-3 py-6 text-center text-gray-400">"…"</td></tr>
        }
        .into_view(),
        Some(RenderedTable {
            body: TableBody::Placeholder { message, colspan },
            ..
        }) => view! {
            <tr><td colspan=colspan class="px-3 py-6 text-center text-gray-500">{message}</td></tr>
        }
        .into_view(),
        Some(RenderedTable {
            body: TableBody::Rows(rows),
            ..
        }) => rows
            .into_iter()
            .map(|row| view! { <RechargeRow controller=controller row=row /> })
            .collect_view(),
    };

    let pager = move || view_state.table.with(|t| t.as_ref().map(|t| t.pager.clone()));
    let prev = move |_| {
        let c = controller.get_value();
        spawn_local(async move { c.prev_page().await });
    };
    let next = move |_| {
        let c = controller.get_value();
        spawn_local(async move { c.next_page().await });
    };

    view! {
        <section class="bg-white rounded-xl shadow overflow-x-auto">
            <table class="min-w-full text-sm">
                <thead class="bg-gray-50">
                    <tr>
                        {headers}
                        <th class="px-3 py-2">{messages.actions}</th>
                    </tr>
                </thead>
                <tbody>{body}</tbody>
            </table>
            <div class="flex items-center justify-between px-4 py-3 border-t">
                <span class="text-sm text-gray-600">
                    {move || pager().map(|p| p.caption).unwrap_or_default()}
                </span>
                <div class="space-x-2">
                    <button
                        class="px-3 py-1 rounded bg-gray-200 disabled:opacity-50"
                        prop:disabled=move || !pager().map(|p| p.prev_enabled).unwrap_or(false)
                        on:click=prev
                    >
                        {messages.prev_page}
                    </button>
                    <button
                        class="px-3 py-1 rounded bg-gray-200 disabled:opacity-50"
                        prop:disabled=move || !pager().map(|p| p.next_enabled).unwrap_or(false)
                        on:click=next
                    >
                        {messages.next_page}
                    </button>
                </div>
            </div>
        </section>
    }
}

#[component]
fn RechargeRow(controller: StoredValue<Rc<Controller>>, row: RenderedRow) -> impl IntoView {
    let edit_id = row.id.clone();
    let delete_id = row.id.clone();
    let [data, kwh, custo, isento, odometro, local, notes] = row.cells;
    let m = use_global_state().locale.messages();

    view! {
        <tr class="border-t hover:bg-gray-50">
            <td class="px-3 py-2">{data}</td>
            <td class="px-3 py-2">{kwh}</td>
            <td class="px-3 py-2">{custo}</td>
            <td class="px-3 py-2">{isento}</td>
            <td class="px-3 py-2">{odometro}</td>
            <td class="px-3 py-2">{local}</td>
            <td class="px-3 py-2" title=row.notes_title>{notes}</td>
            <td class="px-3 py-2 space-x-2 whitespace-nowrap">
                <button
                    class="px-2 py-1 rounded bg-blue-600 text-white"
                    on:click=move |_| {
                        controller.get_value().begin_edit(&edit_id);
                    }
                >
                    {m.edit}
                </button>
                <button
                    class="px-2 py-1 rounded bg-red-600 text-white"
                    on:click=move |_| controller.get_value().begin_delete(&delete_id)
                >
                    {m.delete}
                </button>
            </td>
        </tr>
    }
}

#[component]
fn EditModal(controller: StoredValue<Rc<Controller>>, edit: RwSignal<Option<EditForm>>) -> impl IntoView {
    let m = use_global_state().locale.messages();
    let [data_label, kwh_label, custo_label, isento_label, odometro_label, local_label, notes_label] =
        m.columns;

    move || {
        edit.get().map(|initial| {
            let form = create_rw_signal(initial);
            let save = move |ev: ev::SubmitEvent| {
                ev.prevent_default();
                let c = controller.get_value();
                let current = form.get_untracked();
                spawn_local(async move { c.save_edit(&current).await });
            };
            let cancel = move |_| controller.get_value().view().close_edit();

            view! {
                <div class="fixed inset-0 bg-black/50 flex items-center justify-center z-40">
                    <form class="bg-white rounded-xl shadow-lg p-6 w-full max-w-lg space-y-3" on:submit=save>
                        <h2 class="text-xl font-semibold">{m.edit_title}</h2>
                        <FormField label=data_label kind="date" value=Signal::derive(move || form.with(|f| f.data.clone()))
                            on_input=move |v| form.update(|f| f.data = v) />
                        <FormField label=kwh_label kind="number" value=Signal::derive(move || form.with(|f| f.kwh.clone()))
                            on_input=move |v| form.update(|f| f.kwh = v) />
                        <FormField label=custo_label kind="number" value=Signal::derive(move || form.with(|f| f.custo.clone()))
                            on_input=move |v| form.update(|f| f.custo = v) />
                        <FormField label=odometro_label kind="number" value=Signal::derive(move || form.with(|f| f.odometro.clone()))
                            on_input=move |v| form.update(|f| f.odometro = v) />
                        <FormField label=local_label kind="text" value=Signal::derive(move || form.with(|f| f.local.clone()))
                            on_input=move |v| form.update(|f| f.local = v) />
                        <label class="flex items-center gap-2 text-sm">
                            <input
                                type="checkbox"
                                prop:checked=move || form.with(|f| f.isento)
                                on:change=move |ev| form.update(|f| f.isento = event_target_checked(&ev))
                            />
                            {isento_label}
                        </label>
                        <label class="flex flex-col text-sm">
                            {notes_label}
                            <textarea
                                class="border rounded px-2 py-1"
                                prop:value=move || form.with(|f| f.observacoes.clone())
                                on:input=move |ev| form.update(|f| f.observacoes = event_target_value(&ev))
                            />
                        </label>
                        <div class="flex justify-end gap-2">
                            <button type="button" class="px-4 py-2 rounded bg-gray-200" on:click=cancel>{m.cancel}</button>
                            <button type="submit" class="px-4 py-2 rounded bg-blue-600 text-white">{m.save}</button>
                        </div>
                    </form>
                </div>
            }
        })
    }
}

#[component]
fn FormField(
    label: &'static str,
    kind: &'static str,
    value: Signal<String>,
    on_input: impl Fn(String) + 'static,
) -> impl IntoView {
    view! {
        <label class="flex flex-col text-sm">
            {label}
            <input
                type=kind
                step="any"
                class="border rounded px-2 py-1"
                prop:value=move || value.get()
                on:input=move |ev| on_input(event_target_value(&ev))
            />
        </label>
    }
}

#[component]
fn DeleteModal(
    controller: StoredValue<Rc<Controller>>,
    target: RwSignal<Option<RechargeId>>,
) -> impl IntoView {
    let m = use_global_state().locale.messages();

    move || {
        target.get().map(|_| {
            let confirm = move |_| {
                let c = controller.get_value();
                spawn_local(async move { c.confirm_delete().await });
            };
            let cancel = move |_| controller.get_value().cancel_delete();

            view! {
                <div class="fixed inset-0 bg-black/50 flex items-center justify-center z-40">
                    <div class="bg-white rounded-xl shadow-lg p-6 w-full max-w-sm space-y-4">
                        <h2 class="text-xl font-semibold">{m.delete_title}</h2>
                        <p class="text-sm text-gray-600">{m.delete_warning}</p>
                        <div class="flex justify-end gap-2">
                            <button class="px-4 py-2 rounded bg-gray-200" on:click=cancel>{m.cancel}</button>
                            <button class="px-4 py-2 rounded bg-red-600 text-white" on:click=confirm>{m.delete}</button>
                        </div>
                    </div>
                </div>
            }
        })
    }
}
