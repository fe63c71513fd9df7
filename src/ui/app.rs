use std::time::Instant;

use ratatui::style::{Color, Style};
use tracing::{debug, warn};

use crate::config::Timing;
use crate::models::{Entity, FormData, Record};
use crate::store::Store;

use super::confirm::{self, Choice, GateDecision, PendingAction};
use super::filter::filter_records;
use super::forms::FormController;
use super::helpers::surface_store_error;
use super::input::LogicalKey;

/// Entries of the fixed main menu, in cursor order.
pub const MAIN_MENU: [&str; 4] = ["Customers", "Products", "Statistics", "Exit"];

const MENU_STATS: usize = 2;
const MENU_EXIT: usize = 3;

/// High-level navigation states. Exactly one is active; it decides both which
/// handler receives keys and which screen gets painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Main,
    CustomerList,
    ProductList,
    CustomerForm,
    ProductForm,
    ConfirmAction,
    /// Transient result of a save or delete.
    Message,
    /// Transient record counts.
    Stats,
}

impl View {
    pub fn list_for(entity: Entity) -> Self {
        match entity {
            Entity::Customer => View::CustomerList,
            Entity::Product => View::ProductList,
        }
    }

    pub fn form_for(entity: Entity) -> Self {
        match entity {
            Entity::Customer => View::CustomerForm,
            Entity::Product => View::ProductForm,
        }
    }

    pub fn list_entity(self) -> Option<Entity> {
        match self {
            View::CustomerList => Some(Entity::Customer),
            View::ProductList => Some(Entity::Product),
            _ => None,
        }
    }

    pub fn form_entity(self) -> Option<Entity> {
        match self {
            View::CustomerForm => Some(Entity::Customer),
            View::ProductForm => Some(Entity::Product),
            _ => None,
        }
    }
}

/// Holds a footer or message-screen text plus its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn new<S: Into<String>>(text: S, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Severity levels shown in the footer and on the message screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    pub(crate) fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// A delayed transition owned by the screen that scheduled it. Leaving that
/// screen drops it, so a stale return can never fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledReturn {
    pub due: Instant,
    pub target: View,
}

/// Everything the controller mutates while handling keys.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub view: View,
    /// Cursor into the filtered list, or into [`MAIN_MENU`] on the main view.
    pub selected_index: usize,
    pub search_filter: String,
    pub is_searching: bool,
    pub form_data: FormData,
    pub form_step: usize,
    /// `None` while creating a new record.
    pub editing_id: Option<i64>,
    /// Uncommitted text of the form field or search box being edited.
    pub input_buffer: String,
    pub confirm_index: Choice,
    pub confirm_action: PendingAction,
    pub confirm_message: String,
    pub previous_view: Option<View>,
    /// Full, unfiltered rows of the table behind the current list or form.
    pub records: Vec<Record>,
    /// Body of the message screen.
    pub message: Option<StatusMessage>,
    /// Footer line.
    pub status: Option<StatusMessage>,
    /// Row counts for the stats screen; `None` when the count failed.
    pub stats: Vec<(Entity, Option<usize>)>,
    pub pending: Option<ScheduledReturn>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            view: View::Main,
            selected_index: 0,
            search_filter: String::new(),
            is_searching: false,
            form_data: FormData::new(),
            form_step: 0,
            editing_id: None,
            input_buffer: String::new(),
            confirm_index: Choice::Yes,
            confirm_action: PendingAction::Save,
            confirm_message: String::new(),
            previous_view: None,
            records: Vec::new(),
            message: None,
            status: None,
            stats: Vec::new(),
            pending: None,
        }
    }

    pub fn filtered_records(&self) -> Vec<&Record> {
        filter_records(&self.records, &self.search_filter)
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.filtered_records().get(self.selected_index).copied()
    }

    fn form(&mut self, entity: Entity) -> FormController<'_> {
        FormController::new(
            entity,
            &mut self.form_data,
            &mut self.form_step,
            &mut self.input_buffer,
        )
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of feeding the controller one key or one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed; skip the repaint.
    Ignored,
    Repaint,
    Quit,
}

/// The view state machine. Owns the session and the store; every key is
/// handled to completion, including any store call, before the next one.
pub struct Controller<S: Store> {
    state: SessionState,
    store: S,
    timing: Timing,
}

impl<S: Store> Controller<S> {
    pub fn new(store: S, timing: Timing) -> Self {
        Self {
            state: SessionState::new(),
            store,
            timing,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn handle_key(&mut self, key: LogicalKey) -> Outcome {
        match key {
            LogicalKey::CtrlC => return Outcome::Quit,
            LogicalKey::Unrecognized => return Outcome::Ignored,
            _ => {}
        }

        match self.state.view {
            View::Main => self.handle_main(key),
            View::CustomerList => self.handle_list(Entity::Customer, key),
            View::ProductList => self.handle_list(Entity::Product, key),
            View::CustomerForm => self.handle_form(Entity::Customer, key),
            View::ProductForm => self.handle_form(Entity::Product, key),
            View::ConfirmAction => self.handle_confirm(key),
            View::Message | View::Stats => Outcome::Ignored,
        }
    }

    /// Fire the scheduled return if it is due at `now`.
    pub fn tick(&mut self, now: Instant) -> Outcome {
        let Some(pending) = self.state.pending else {
            return Outcome::Ignored;
        };
        if now < pending.due {
            return Outcome::Ignored;
        }

        self.state.pending = None;
        match pending.target.list_entity() {
            Some(entity) => self.enter_list(entity),
            None => self.enter_main(MENU_STATS),
        }
    }

    /// Every view change goes through here so a pending return belonging to
    /// the screen being left is cancelled.
    fn switch_view(&mut self, view: View) {
        if let Some(pending) = self.state.pending.take() {
            debug!(target_view = ?pending.target, "cancelled scheduled return");
        }
        debug!(from = ?self.state.view, to = ?view, "view change");
        self.state.view = view;
    }

    fn handle_main(&mut self, key: LogicalKey) -> Outcome {
        match key {
            LogicalKey::Up if self.state.selected_index > 0 => {
                self.state.selected_index -= 1;
                Outcome::Repaint
            }
            LogicalKey::Down if self.state.selected_index < MAIN_MENU.len() - 1 => {
                self.state.selected_index += 1;
                Outcome::Repaint
            }
            LogicalKey::Enter => match self.state.selected_index {
                0 => self.enter_list(Entity::Customer),
                1 => self.enter_list(Entity::Product),
                MENU_STATS => self.enter_stats(),
                _ => Outcome::Quit,
            },
            LogicalKey::Escape => Outcome::Quit,
            _ => Outcome::Ignored,
        }
    }

    fn enter_main(&mut self, menu_index: usize) -> Outcome {
        self.switch_view(View::Main);
        self.state.selected_index = menu_index.min(MENU_EXIT);
        self.state.previous_view = None;
        self.state.status = None;
        Outcome::Repaint
    }

    /// Open a list view with a fresh list session and a freshly fetched copy of
    /// the table. Any form or search in progress is discarded.
    fn enter_list(&mut self, entity: Entity) -> Outcome {
        self.switch_view(View::list_for(entity));
        let state = &mut self.state;
        state.selected_index = 0;
        state.search_filter.clear();
        state.is_searching = false;
        state.input_buffer.clear();
        state.form_data.clear();
        state.form_step = 0;
        state.editing_id = None;
        state.previous_view = None;
        state.message = None;
        state.status = None;
        self.reload_records(entity);
        Outcome::Repaint
    }

    fn reload_records(&mut self, entity: Entity) {
        match self.store.list(entity) {
            Ok(records) => self.state.records = records,
            Err(err) => {
                warn!(%entity, error = %err, "failed to load records");
                self.state.records.clear();
                self.state.status = Some(StatusMessage::new(
                    format!(
                        "Could not load {}: {}",
                        entity.plural().to_lowercase(),
                        surface_store_error(&err)
                    ),
                    StatusKind::Error,
                ));
            }
        }
    }

    fn enter_stats(&mut self) -> Outcome {
        self.switch_view(View::Stats);
        self.state.stats = Entity::ALL
            .iter()
            .map(|&entity| {
                let count = self
                    .store
                    .count(entity)
                    .map_err(|err| warn!(%entity, error = %err, "failed to count records"))
                    .ok();
                (entity, count)
            })
            .collect();
        self.state.pending = Some(ScheduledReturn {
            due: Instant::now() + self.timing.stats_delay,
            target: View::Main,
        });
        Outcome::Repaint
    }

    fn handle_list(&mut self, entity: Entity, key: LogicalKey) -> Outcome {
        match key {
            LogicalKey::CtrlN => self.open_form(entity, None),
            LogicalKey::Escape if self.state.is_searching => {
                self.state.is_searching = false;
                self.state.search_filter.clear();
                self.state.input_buffer.clear();
                self.state.selected_index = 0;
                Outcome::Repaint
            }
            LogicalKey::Escape => self.enter_main(entity_menu_index(entity)),
            _ if self.state.is_searching => self.handle_search(key),
            LogicalKey::Up => self.move_selection(-1),
            LogicalKey::Down => self.move_selection(1),
            LogicalKey::Enter => match self.state.selected_record().cloned() {
                Some(record) => self.open_form(entity, Some(record)),
                None => Outcome::Ignored,
            },
            LogicalKey::Printable(ch) => {
                self.state.is_searching = true;
                self.state.input_buffer = ch.to_string();
                self.sync_filter();
                Outcome::Repaint
            }
            _ => Outcome::Ignored,
        }
    }

    /// Live search: the committed filter tracks the buffer on every edit.
    fn handle_search(&mut self, key: LogicalKey) -> Outcome {
        match key {
            LogicalKey::Printable(ch) => {
                self.state.input_buffer.push(ch);
                self.sync_filter();
                Outcome::Repaint
            }
            LogicalKey::Backspace => {
                if self.state.input_buffer.pop().is_none() {
                    return Outcome::Ignored;
                }
                self.sync_filter();
                Outcome::Repaint
            }
            LogicalKey::Enter => {
                self.state.search_filter = std::mem::take(&mut self.state.input_buffer);
                self.state.is_searching = false;
                Outcome::Repaint
            }
            LogicalKey::Up => self.move_selection(-1),
            LogicalKey::Down => self.move_selection(1),
            _ => Outcome::Ignored,
        }
    }

    fn sync_filter(&mut self) {
        self.state.search_filter = self.state.input_buffer.clone();
        self.state.selected_index = 0;
    }

    fn move_selection(&mut self, delta: isize) -> Outcome {
        let len = self.state.filtered_records().len();
        if len == 0 {
            return Outcome::Ignored;
        }
        let current = self.state.selected_index;
        let next = (current as isize + delta).clamp(0, len as isize - 1) as usize;
        if next == current {
            return Outcome::Ignored;
        }
        self.state.selected_index = next;
        Outcome::Repaint
    }

    /// Enter a form at step 0, seeded from `record` when editing.
    fn open_form(&mut self, entity: Entity, record: Option<Record>) -> Outcome {
        self.switch_view(View::form_for(entity));
        self.state.form_step = 0;
        self.state.editing_id = record.as_ref().map(Record::id);
        self.state.form_data = record.map(|r| r.to_form_data()).unwrap_or_default();
        self.state.previous_view = None;
        self.state.status = None;
        self.state.form(entity).reseed();
        Outcome::Repaint
    }

    fn handle_form(&mut self, entity: Entity, key: LogicalKey) -> Outcome {
        match key {
            LogicalKey::CtrlS => {
                self.state.form(entity).commit_field();
                self.open_confirm(entity, PendingAction::Save)
            }
            LogicalKey::CtrlD if self.state.editing_id.is_some() => {
                self.state.form(entity).commit_field();
                self.open_confirm(entity, PendingAction::Delete)
            }
            LogicalKey::Escape => self.enter_list(entity),
            LogicalKey::Tab | LogicalKey::Enter | LogicalKey::Down => {
                self.state.form(entity).advance();
                Outcome::Repaint
            }
            LogicalKey::Up => {
                self.state.form(entity).retreat();
                Outcome::Repaint
            }
            LogicalKey::Printable(ch) => {
                self.state.form(entity).push_char(ch);
                Outcome::Repaint
            }
            LogicalKey::Backspace => {
                if self.state.form(entity).backspace() {
                    Outcome::Repaint
                } else {
                    Outcome::Ignored
                }
            }
            _ => Outcome::Ignored,
        }
    }

    fn open_confirm(&mut self, entity: Entity, action: PendingAction) -> Outcome {
        let origin = self.state.view;
        self.switch_view(View::ConfirmAction);
        self.state.previous_view = Some(origin);
        self.state.confirm_action = action;
        self.state.confirm_index = action.default_choice();
        self.state.confirm_message = confirm::prompt(entity, action, self.state.editing_id);
        Outcome::Repaint
    }

    fn handle_confirm(&mut self, key: LogicalKey) -> Outcome {
        let Some(entity) = self.state.previous_view.and_then(View::form_entity) else {
            warn!(previous = ?self.state.previous_view, "confirmation without an originating form");
            return self.enter_main(0);
        };

        match confirm::handle_key(&mut self.state.confirm_index, key) {
            GateDecision::Ignored => Outcome::Ignored,
            GateDecision::Moved => Outcome::Repaint,
            GateDecision::Cancel => self.return_to_form(entity),
            GateDecision::Execute => self.execute_pending(entity),
        }
    }

    /// Back to the same step of the originating form, with the buffer showing
    /// the value committed on the way into the modal.
    fn return_to_form(&mut self, entity: Entity) -> Outcome {
        self.switch_view(View::form_for(entity));
        self.state.previous_view = None;
        self.state.form(entity).reseed();
        Outcome::Repaint
    }

    fn execute_pending(&mut self, entity: Entity) -> Outcome {
        let message = confirm::execute(
            &mut self.store,
            entity,
            self.state.confirm_action,
            self.state.editing_id,
            &self.state.form_data,
        );

        self.switch_view(View::Message);
        self.state.previous_view = Some(View::form_for(entity));
        self.state.message = Some(message);
        self.state.pending = Some(ScheduledReturn {
            due: Instant::now() + self.timing.message_delay,
            target: View::list_for(entity),
        });
        Outcome::Repaint
    }
}

fn entity_menu_index(entity: Entity) -> usize {
    match entity {
        Entity::Customer => 0,
        Entity::Product => 1,
    }
}
