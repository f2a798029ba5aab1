//! The only control flow in the app: an action mutates the state, the
//! budget is recomputed and the state is written back to storage.

use crate::budget::{compute, Breakdown};
use crate::model::AppState;
use crate::storage::{BudgetRepository, KeyValueStore};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    SetIncome(String),
    AddCategory(String),
    RenameCategory { id: String, name: String },
    DeleteCategory(String),
    SetCategoryValue { id: String, value: String },
    AddItem(String),
    DeleteItem { category_id: String, item_id: String },
    SetItemName { category_id: String, item_id: String, name: String },
    SetItemValue { category_id: String, item_id: String, value: String },
    Reset,
}

/// Pure state transition. Returns whether anything changed.
pub fn reduce(state: &mut AppState, action: Action) -> bool {
    match action {
        Action::SetIncome(text) => state.set_income(&text),
        Action::AddCategory(name) => state.add_category(&name).is_some(),
        Action::RenameCategory { id, name } => state.rename_category(&id, &name),
        Action::DeleteCategory(id) => state.remove_category(&id).is_some(),
        Action::SetCategoryValue { id, value } => state.set_category_value(&id, &value),
        Action::AddItem(category_id) => state.add_item(&category_id).is_some(),
        Action::DeleteItem {
            category_id,
            item_id,
        } => state.remove_item(&category_id, &item_id).is_some(),
        Action::SetItemName {
            category_id,
            item_id,
            name,
        } => state.set_item_name(&category_id, &item_id, &name),
        Action::SetItemValue {
            category_id,
            item_id,
            value,
        } => state.set_item_value(&category_id, &item_id, &value),
        Action::Reset => {
            let changed = !state.income.is_empty() || !state.categories.is_empty();
            state.clear();
            changed
        }
    }
}

/// What the UI asks for. Destructive requests and "add category" go through
/// [`Dialogs`] before becoming an [`Action`].
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Apply(Action),
    AddCategory,
    DeleteCategory(String),
    DeleteItem { category_id: String, item_id: String },
    Reset,
}

/// Interactive confirmation and text entry.
pub trait Dialogs {
    fn confirm(&self, message: &str) -> bool;
    fn prompt(&self, message: &str) -> Option<String>;
}

/// `window.confirm` / `window.prompt`. Without a window every question is
/// answered "no".
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserDialogs;

impl Dialogs for BrowserDialogs {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn prompt(&self, message: &str) -> Option<String> {
        web_sys::window()
            .and_then(|window| window.prompt_with_message(message).ok())
            .flatten()
    }
}

pub struct Controller<S, D> {
    state: AppState,
    breakdown: Breakdown,
    repository: BudgetRepository<S>,
    dialogs: D,
}

impl<S: KeyValueStore, D: Dialogs> Controller<S, D> {
    /// Load the stored budget (or an empty one) and compute its figures.
    pub fn load(store: S, dialogs: D) -> Self {
        let repository = BudgetRepository::new(store);
        let state = repository.load();
        let breakdown = compute(&state);
        Self {
            state,
            breakdown,
            repository,
            dialogs,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn breakdown(&self) -> &Breakdown {
        &self.breakdown
    }

    pub fn recompute(&mut self) {
        self.breakdown = compute(&self.state);
    }

    fn persist(&self) {
        if let Err(err) = self.repository.save(&self.state) {
            tracing::warn!(error = %err, "could not persist budget");
        }
    }

    /// Apply an action without asking the user. Returns whether the state
    /// changed; a change is always recomputed and persisted.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let label = action_label(&action);
        let changed = reduce(&mut self.state, action);
        if changed {
            tracing::debug!(action = label, "state changed");
            self.recompute();
            self.persist();
        }
        changed
    }

    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Apply(action) => self.dispatch(action),
            Command::AddCategory => self.request_add_category(),
            Command::DeleteCategory(id) => self.request_delete_category(&id),
            Command::DeleteItem {
                category_id,
                item_id,
            } => self.request_delete_item(&category_id, &item_id),
            Command::Reset => self.request_reset(),
        }
    }

    /// Ask for a name and append a category. Cancel or a blank name aborts.
    pub fn request_add_category(&mut self) -> bool {
        let Some(name) = self.dialogs.prompt("Název nové kategorie:") else {
            return false;
        };
        let added = self.dispatch(Action::AddCategory(name.clone()));
        if added {
            tracing::info!(name = %name.trim(), "category added");
        }
        added
    }

    pub fn request_delete_category(&mut self, id: &str) -> bool {
        let Some(name) = self.state.category(id).map(|c| c.name.clone()) else {
            return false;
        };
        if !self
            .dialogs
            .confirm(&format!("Smazat kategorii „{}“?", name))
        {
            return false;
        }
        let deleted = self.dispatch(Action::DeleteCategory(id.to_string()));
        if deleted {
            tracing::info!(%id, %name, "category deleted");
        }
        deleted
    }

    pub fn request_delete_item(&mut self, category_id: &str, item_id: &str) -> bool {
        let Some(item_name) = self
            .state
            .category(category_id)
            .and_then(|c| c.items().iter().find(|item| item.id == item_id))
            .map(|item| item.name.clone())
        else {
            return false;
        };
        let message = if item_name.trim().is_empty() {
            "Smazat položku?".to_string()
        } else {
            format!("Smazat položku „{}“?", item_name)
        };
        if !self.dialogs.confirm(&message) {
            return false;
        }
        self.dispatch(Action::DeleteItem {
            category_id: category_id.to_string(),
            item_id: item_id.to_string(),
        })
    }

    /// Clear the stored budget and start over with an empty one.
    pub fn request_reset(&mut self) -> bool {
        if !self.dialogs.confirm("Vymazat vše?") {
            return false;
        }
        if let Err(err) = self.repository.clear() {
            tracing::warn!(error = %err, "could not clear stored budget");
        }
        reduce(&mut self.state, Action::Reset);
        self.recompute();
        tracing::info!("budget reset");
        true
    }
}

fn action_label(action: &Action) -> &'static str {
    match action {
        Action::SetIncome(_) => "set_income",
        Action::AddCategory(_) => "add_category",
        Action::RenameCategory { .. } => "rename_category",
        Action::DeleteCategory(_) => "delete_category",
        Action::SetCategoryValue { .. } => "set_category_value",
        Action::AddItem(_) => "add_item",
        Action::DeleteItem { .. } => "delete_item",
        Action::SetItemName { .. } => "set_item_name",
        Action::SetItemValue { .. } => "set_item_value",
        Action::Reset => "reset",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::settings::STORAGE_KEY;
    use crate::storage::MemoryStore;

    #[derive(Default)]
    struct Scripted {
        answers: RefCell<Vec<bool>>,
        names: RefCell<Vec<Option<String>>>,
        asked: RefCell<Vec<String>>,
    }

    impl Dialogs for Scripted {
        fn confirm(&self, message: &str) -> bool {
            self.asked.borrow_mut().push(message.to_string());
            self.answers.borrow_mut().pop().unwrap_or(false)
        }

        fn prompt(&self, message: &str) -> Option<String> {
            self.asked.borrow_mut().push(message.to_string());
            self.names.borrow_mut().pop().flatten()
        }
    }

    #[test]
    fn reduce_reports_no_change_for_rejected_actions() {
        let mut state = AppState::default();
        assert!(!reduce(&mut state, Action::AddCategory(" ".into())));
        assert!(!reduce(&mut state, Action::DeleteCategory("nope".into())));
        assert!(!reduce(&mut state, Action::SetIncome(String::new())));
        assert!(!reduce(&mut state, Action::Reset));
        assert!(reduce(&mut state, Action::SetIncome("10".into())));
        assert!(reduce(&mut state, Action::Reset));
    }

    #[test]
    fn dispatch_persists_every_change() {
        let store = MemoryStore::default();
        let mut controller = Controller::load(store.clone(), Scripted::default());
        assert!(store.get(STORAGE_KEY).unwrap().is_none());

        controller.dispatch(Action::SetIncome("2500".into()));
        let raw = store.get(STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"prijem\":\"2500\""));
        assert_eq!(controller.breakdown().income, 2500.0);
    }

    #[test]
    fn declined_delete_leaves_state_alone() {
        let dialogs = Scripted::default();
        let mut controller = Controller::load(MemoryStore::default(), dialogs);
        controller.dispatch(Action::AddCategory("Jídlo".into()));
        let id = controller.state().categories[0].id.clone();

        assert!(!controller.request_delete_category(&id));
        assert_eq!(controller.state().categories.len(), 1);
        assert_eq!(
            controller.dialogs.asked.borrow().last().unwrap(),
            "Smazat kategorii „Jídlo“?"
        );

        controller.dialogs.answers.borrow_mut().push(true);
        assert!(controller.request_delete_category(&id));
        assert!(controller.state().categories.is_empty());
    }

    #[test]
    fn cancelled_prompt_adds_nothing() {
        let dialogs = Scripted::default();
        dialogs.names.borrow_mut().push(None);
        let mut controller = Controller::load(MemoryStore::default(), dialogs);
        assert!(!controller.request_add_category());
        assert!(controller.state().categories.is_empty());

        controller
            .dialogs
            .names
            .borrow_mut()
            .push(Some("  Bydlení ".into()));
        assert!(controller.request_add_category());
        assert_eq!(controller.state().categories[0].name, "Bydlení");
    }

    #[test]
    fn item_delete_needs_confirmation() {
        let mut controller = Controller::load(MemoryStore::default(), Scripted::default());
        controller.dispatch(Action::AddCategory("Auto".into()));
        let cat = controller.state().categories[0].id.clone();
        controller.dispatch(Action::AddItem(cat.clone()));
        let item = controller.state().categories[0].items()[0].id.clone();

        assert!(!controller.request_delete_item(&cat, &item));
        assert_eq!(controller.state().categories[0].items().len(), 1);

        controller.dialogs.answers.borrow_mut().push(true);
        assert!(controller.request_delete_item(&cat, &item));
        assert!(controller.state().categories[0].items().is_empty());
    }

    #[test]
    fn reset_clears_storage_and_state() {
        let store = MemoryStore::default();
        let mut controller = Controller::load(store.clone(), Scripted::default());
        controller.dispatch(Action::SetIncome("100".into()));
        controller.dispatch(Action::AddCategory("A".into()));

        assert!(!controller.request_reset());
        assert!(store.get(STORAGE_KEY).unwrap().is_some());

        controller.dialogs.answers.borrow_mut().push(true);
        assert!(controller.request_reset());
        assert!(store.get(STORAGE_KEY).unwrap().is_none());
        assert_eq!(controller.state(), &AppState::default());
        assert_eq!(controller.breakdown(), &Breakdown::default());
    }
}
