use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use tracing::{error, info, warn};

use crate::api::ExpenseStore;
use crate::models::{
    expense::Expense,
    form::{EditForm, ExpenseForm, FormField},
};
use crate::summary::{current_month_total, format_total};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    CreateExpense,
    ExpenseList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A store call queued by a key press. The loop redraws before running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Load,
    Delete,
    SaveEdit,
}

impl Action {
    pub fn busy_label(&self) -> &'static str {
        match self {
            Action::Create => "Recording expense...",
            Action::Load => "Loading expenses...",
            Action::Delete => "Deleting expense...",
            Action::SaveEdit => "Saving changes...",
        }
    }
}

/// Blocking message; swallows input until dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

#[derive(Debug)]
pub struct App<S> {
    store: S,
    pub screen: Screen,
    pub form: ExpenseForm,
    pub form_focus: FormField,
    pub expenses: Vec<Expense>,
    pub list_state: ListState,
    pub edit: Option<EditForm>,
    pub edit_focus: FormField,
    pub notification: Option<Notification>,
    pub pending: Option<Action>,
    pub quit: bool,
}

impl<S: ExpenseStore> App<S> {
    pub fn new(store: S) -> Self {
        App {
            store,
            screen: Screen::CreateExpense,
            form: ExpenseForm::new(),
            form_focus: FormField::Category,
            expenses: Vec::new(),
            list_state: ListState::default(),
            edit: None,
            edit_focus: FormField::Category,
            notification: None,
            pending: None,
            quit: false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn month_total(&self) -> String {
        format_total(current_month_total(&self.expenses))
    }

    pub fn selected(&self) -> Option<&Expense> {
        self.list_state.selected().and_then(|i| self.expenses.get(i))
    }

    pub fn next(&mut self) {
        if self.expenses.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i < self.expenses.len() - 1 => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.expenses.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.expenses.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn clamp_selection(&mut self) {
        let selected = match (self.list_state.selected(), self.expenses.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.list_state.select(selected);
    }

    fn notify(&mut self, kind: NotificationKind, title: &str, message: String) {
        self.notification = Some(Notification {
            kind,
            title: title.to_string(),
            message,
        });
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Fetches every record and replaces the local list. The list is left as-is on failure.
    pub async fn load_expenses(&mut self) -> bool {
        match self.store.list().await {
            Ok(expenses) => {
                self.expenses = expenses;
                self.clamp_selection();
                true
            }
            Err(err) => {
                error!(error = %err, "failed to load expenses");
                self.notify(NotificationKind::Error, "Error", "Could not load expenses".into());
                false
            }
        }
    }

    pub async fn submit_create(&mut self) {
        let payload = match self.form.validate() {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "create form rejected");
                self.notify(NotificationKind::Error, "Error", err.to_string());
                return;
            }
        };

        match self.store.create(&payload).await {
            Ok(()) => {
                info!(category = %payload.category, amount = payload.amount, "expense recorded");
                self.notify(NotificationKind::Success, "Success", "Expense recorded".into());
                self.form.reset();
                self.form_focus = FormField::Category;
            }
            Err(err) => {
                error!(error = %err, "failed to create expense");
                self.notify(
                    NotificationKind::Error,
                    "Error",
                    err.user_message("Something went wrong while recording the expense"),
                );
            }
        }
    }

    pub async fn delete_selected(&mut self) {
        let Some(id) = self.selected().map(|e| e.id) else {
            return;
        };

        match self.store.delete(id).await {
            Ok(()) => {
                info!(id, "expense deleted");
                self.notify(NotificationKind::Success, "Success", "Expense deleted".into());
                self.load_expenses().await;
            }
            Err(err) => {
                error!(id, error = %err, "failed to delete expense");
                self.notify(
                    NotificationKind::Error,
                    "Error",
                    err.user_message("Could not delete the expense"),
                );
            }
        }
    }

    pub fn open_edit(&mut self) {
        let edit = self.selected().map(EditForm::from_expense);
        if edit.is_some() {
            self.edit = edit;
            self.edit_focus = FormField::Category;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Sends the modal's fields as a full replace. The modal stays open on failure.
    pub async fn save_edit(&mut self) {
        let Some(edit) = self.edit.as_ref() else {
            return;
        };
        let id = edit.id;
        let payload = match edit.validate() {
            Ok(payload) => payload,
            Err(err) => {
                warn!(id, error = %err, "edit form rejected");
                self.notify(NotificationKind::Error, "Error", err.to_string());
                return;
            }
        };

        match self.store.update(id, &payload).await {
            Ok(()) => {
                info!(id, "expense updated");
                self.edit = None;
                self.notify(NotificationKind::Success, "Success", "Expense updated".into());
                self.load_expenses().await;
            }
            Err(err) => {
                error!(id, error = %err, "failed to update expense");
                self.notify(
                    NotificationKind::Error,
                    "Error",
                    err.user_message("Could not update the expense"),
                );
            }
        }
    }

    /// Switches to the list and queues a fetch.
    pub fn show_list(&mut self) {
        self.screen = Screen::ExpenseList;
        self.pending = Some(Action::Load);
    }

    pub fn show_form(&mut self) {
        self.screen = Screen::CreateExpense;
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Runs the queued store call, if any, and clears the busy state.
    pub async fn run_pending(&mut self) {
        let Some(action) = self.pending else {
            return;
        };

        match action {
            Action::Create => self.submit_create().await,
            Action::Load => {
                self.load_expenses().await;
            }
            Action::Delete => self.delete_selected().await,
            Action::SaveEdit => self.save_edit().await,
        }
        self.pending = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        // Input is disabled while a request is in flight
        if self.is_busy() {
            return;
        }

        if self.notification.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.dismiss_notification();
            }
            return;
        }

        if self.edit.is_some() {
            self.handle_edit_key(key);
            return;
        }

        match self.screen {
            Screen::CreateExpense => self.handle_form_key(key),
            Screen::ExpenseList => self.handle_list_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.form_focus = self.form_focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.form_focus = self.form_focus.previous(),
            KeyCode::Enter => self.pending = Some(Action::Create),
            KeyCode::Esc => self.show_list(),
            KeyCode::Backspace => {
                self.form.field_mut(self.form_focus).pop();
            }
            _ => {
                if let Some(c) = typed_char(&key) {
                    self.form.field_mut(self.form_focus).push(c);
                }
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Up => self.previous(),
            KeyCode::Down => self.next(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit(),
            KeyCode::Char('d') => {
                if self.selected().is_some() {
                    self.pending = Some(Action::Delete);
                }
            }
            KeyCode::Char('r') => self.pending = Some(Action::Load),
            KeyCode::Char('n') | KeyCode::Esc => self.show_form(),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let focus = self.edit_focus;
        match key.code {
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Enter => self.pending = Some(Action::SaveEdit),
            KeyCode::Tab | KeyCode::Down => self.edit_focus = focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.edit_focus = focus.previous(),
            KeyCode::Backspace => {
                if let Some(edit) = self.edit.as_mut() {
                    edit.field_mut(focus).pop();
                }
            }
            _ => {
                if let (Some(c), Some(edit)) = (typed_char(&key), self.edit.as_mut()) {
                    edit.field_mut(focus).push(c);
                }
            }
        }
    }
}

/// Printable input; chords with Ctrl or Alt never reach a text field.
fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => Some(c),
        _ => None,
    }
}
