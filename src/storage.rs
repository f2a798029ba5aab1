//! Key-value persistence: the port, its browser and in-memory backends, and
//! the repository that maps [`AppState`] to the versioned storage record.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::StorageError;
use crate::model::{Amount, AppState, Category, Item};
use crate::settings::{palette_color, STORAGE_KEY};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        window
            .local_storage()
            .map_err(|err| StorageError::Backend(format!("{:?}", err)))?
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|err| StorageError::Backend(format!("{:?}", err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Backend(format!("{:?}", err)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|err| StorageError::Backend(format!("{:?}", err)))
    }
}

/// Shared in-memory map; clones see the same entries.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Serialize)]
struct StoredState<'a> {
    prijem: &'a str,
    categories: Vec<StoredCategory<'a>>,
}

#[derive(Serialize)]
struct StoredCategory<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Vec<StoredItem<'a>>>,
    color: &'a str,
}

#[derive(Serialize)]
struct StoredItem<'a> {
    id: &'a str,
    name: &'a str,
    value: &'a str,
}

#[derive(Deserialize)]
struct LenientState {
    #[serde(default, deserialize_with = "lenient_text")]
    prijem: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    categories: Option<Vec<LenientCategory>>,
}

#[derive(Deserialize)]
struct LenientCategory {
    #[serde(default, deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    color: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    value: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    items: Option<Vec<LenientItem>>,
}

#[derive(Deserialize)]
struct LenientItem {
    #[serde(default, deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    value: Option<String>,
}

// Strings and numbers are both accepted as text; anything else is absent.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

// Entries that do not decode are dropped; a non-array is absent.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => Some(
            values
                .into_iter()
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect(),
        ),
        _ => None,
    })
}

pub fn encode_state(state: &AppState) -> Result<String, StorageError> {
    let record = StoredState {
        prijem: &state.income,
        categories: state
            .categories
            .iter()
            .map(|c| {
                let (value, items) = match &c.amount {
                    Amount::Direct(value) => (Some(value.as_str()), None),
                    Amount::Itemized(items) => (
                        None,
                        Some(
                            items
                                .iter()
                                .map(|item| StoredItem {
                                    id: &item.id,
                                    name: &item.name,
                                    value: &item.value,
                                })
                                .collect(),
                        ),
                    ),
                };
                StoredCategory {
                    id: &c.id,
                    name: &c.name,
                    value,
                    items,
                    color: &c.color,
                }
            })
            .collect(),
    };
    Ok(serde_json::to_string(&record)?)
}

/// Decode a stored record, filling in whatever is missing.
///
/// Absent or duplicate ids are regenerated, missing names and colors get
/// positional defaults, and a category with an `items` list is itemized.
pub fn decode_state(raw: &str) -> Result<AppState, StorageError> {
    let record: LenientState = serde_json::from_str(raw)?;
    let mut state = AppState {
        income: record.prijem.unwrap_or_default(),
        categories: Vec::new(),
    };
    let mut seen = HashSet::new();

    for (index, stored) in record.categories.unwrap_or_default().into_iter().enumerate() {
        let id = claim_id(&mut seen, &state, stored.id, "cat");
        let amount = match stored.items {
            Some(items) => {
                let mut decoded = Vec::with_capacity(items.len());
                for item in items {
                    let item_id = claim_id(&mut seen, &state, item.id, "item");
                    decoded.push(Item {
                        id: item_id,
                        name: item.name.unwrap_or_default(),
                        value: item.value.unwrap_or_default(),
                    });
                }
                Amount::Itemized(decoded)
            }
            None => Amount::Direct(stored.value.unwrap_or_default()),
        };
        state.categories.push(Category {
            id,
            name: stored
                .name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| format!("Kategorie {}", index + 1)),
            color: stored
                .color
                .filter(|color| !color.trim().is_empty())
                .unwrap_or_else(|| palette_color(index).to_string()),
            amount,
        });
    }

    Ok(state)
}

fn claim_id(
    seen: &mut HashSet<String>,
    state: &AppState,
    candidate: Option<String>,
    prefix: &str,
) -> String {
    let id = match candidate {
        Some(id) if !id.trim().is_empty() && !seen.contains(&id) => id,
        _ => loop {
            let fresh = state.next_id(prefix);
            if !seen.contains(&fresh) {
                break fresh;
            }
        },
    };
    seen.insert(id.clone());
    id
}

/// Reads and writes the whole [`AppState`] under one versioned key.
pub struct BudgetRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> BudgetRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    /// Load the stored state; absent, unreadable or malformed data yields
    /// the empty default.
    pub fn load(&self) -> AppState {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no stored budget, starting empty");
                return AppState::default();
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "could not read stored budget");
                return AppState::default();
            }
        };
        match decode_state(&raw) {
            Ok(state) => {
                tracing::debug!(
                    key = %self.key,
                    categories = state.categories.len(),
                    "loaded stored budget"
                );
                state
            }
            Err(err) => {
                tracing::debug!(key = %self.key, error = %err, "ignoring malformed budget record");
                AppState::default()
            }
        }
    }

    pub fn save(&self, state: &AppState) -> Result<(), StorageError> {
        let raw = encode_state(state)?;
        self.store.set(&self.key, &raw)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_loads_empty_state() {
        let repo = BudgetRepository::new(MemoryStore::default());
        assert_eq!(repo.load(), AppState::default());
    }

    #[test]
    fn malformed_json_loads_empty_state() {
        let store = MemoryStore::default();
        store.set(STORAGE_KEY, "{\"prijem\": ").unwrap();
        let repo = BudgetRepository::new(store);
        assert_eq!(repo.load(), AppState::default());
    }

    #[test]
    fn decodes_nested_record_from_browser() {
        let raw = r##"{
            "prijem": "30000",
            "categories": [
                {"id": "cat-1", "name": "Splátky", "color": "#8b5cf6",
                 "items": [{"id": "item-1", "name": "Hypotéka", "value": "10000"}]},
                {"id": "cat-2", "name": "Úspory", "color": "#22c55e", "items": []}
            ]
        }"##;
        let state = decode_state(raw).unwrap();
        assert_eq!(state.income, "30000");
        assert_eq!(state.categories.len(), 2);
        assert_eq!(state.categories[0].items()[0].name, "Hypotéka");
        assert_eq!(state.categories[0].total(), 10000.0);
        assert!(state.categories[1].is_itemized());
    }

    #[test]
    fn fills_in_missing_fields() {
        let raw = r#"{"categories": [{"value": 1200}, {"name": "", "items": [{"value": "5"}]}, 7]}"#;
        let state = decode_state(raw).unwrap();
        assert_eq!(state.income, "");
        assert_eq!(state.categories.len(), 2);

        let first = &state.categories[0];
        assert!(first.id.starts_with("cat-"));
        assert_eq!(first.name, "Kategorie 1");
        assert_eq!(first.color, "#8b5cf6");
        assert_eq!(first.amount, Amount::Direct("1200".to_string()));

        let second = &state.categories[1];
        assert_eq!(second.name, "Kategorie 2");
        assert_eq!(second.color, "#22c55e");
        assert!(second.items()[0].id.starts_with("item-"));
        assert_eq!(second.total(), 5.0);
    }

    #[test]
    fn duplicate_ids_are_regenerated() {
        let raw = r#"{"prijem": "", "categories": [
            {"id": "same", "name": "A", "value": "1"},
            {"id": "same", "name": "B", "value": "2"}
        ]}"#;
        let state = decode_state(raw).unwrap();
        assert_eq!(state.categories[0].id, "same");
        assert_ne!(state.categories[1].id, "same");
    }

    #[test]
    fn encoding_uses_value_or_items_per_category() {
        let mut state = AppState::default();
        state.income = "1000".to_string();
        let flat = state.add_category("Flat").unwrap().id.clone();
        state.set_category_value(&flat, "10");
        let nested = state.add_category("Nested").unwrap().id.clone();
        state.add_item(&nested);

        let json: Value = serde_json::from_str(&encode_state(&state).unwrap()).unwrap();
        assert_eq!(json["prijem"], "1000");
        assert_eq!(json["categories"][0]["value"], "10");
        assert!(json["categories"][0].get("items").is_none());
        assert!(json["categories"][1]["items"].is_array());
        assert!(json["categories"][1].get("value").is_none());
    }

    #[test]
    fn clear_removes_only_the_budget_key() {
        let store = MemoryStore::default();
        store.set("other", "x").unwrap();
        let repo = BudgetRepository::new(store.clone());
        repo.save(&AppState::default()).unwrap();
        assert_eq!(store.len(), 2);
        repo.clear().unwrap();
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
        assert_eq!(store.get("other").unwrap().as_deref(), Some("x"));
    }
}
