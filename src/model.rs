//! In-memory budget state: income, categories and their line items.
//!
//! Every numeric field is kept as the raw text the user typed so that the
//! input boxes round-trip exactly; [`parse_amount`] turns that text into a
//! non-negative number whenever a value is needed.

use uuid::Uuid;

use crate::settings::palette_color;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub income: String,
    pub categories: Vec<Category>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub amount: Amount,
}

/// Where a category's value comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum Amount {
    /// A single value typed directly on the category.
    Direct(String),
    /// The sum of the category's line items.
    Itemized(Vec<Item>),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub value: String,
}

/// Parse user-entered text as a non-negative amount.
///
/// A decimal comma is accepted, trailing garbage after a valid number is
/// ignored, and anything unparsable, negative or non-finite becomes 0.
pub fn parse_amount(text: &str) -> f64 {
    let normalized = text.trim().replacen(',', ".", 1);
    let prefix = numeric_prefix(&normalized);
    match prefix.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return "";
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    &text[..end]
}

impl Category {
    /// The category's value: its direct value or the sum of its items.
    pub fn total(&self) -> f64 {
        match &self.amount {
            Amount::Direct(value) => parse_amount(value),
            Amount::Itemized(items) => items.iter().map(|item| parse_amount(&item.value)).sum(),
        }
    }

    pub fn items(&self) -> &[Item] {
        match &self.amount {
            Amount::Direct(_) => &[],
            Amount::Itemized(items) => items,
        }
    }

    pub fn is_itemized(&self) -> bool {
        matches!(self.amount, Amount::Itemized(_))
    }

    fn item_mut(&mut self, item_id: &str) -> Option<&mut Item> {
        match &mut self.amount {
            Amount::Direct(_) => None,
            Amount::Itemized(items) => items.iter_mut().find(|item| item.id == item_id),
        }
    }
}

impl AppState {
    pub fn income_amount(&self) -> f64 {
        parse_amount(&self.income)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn category_mut(&mut self, id: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.id == id)
    }

    /// True when `id` is used by any category or item.
    pub fn contains_id(&self, id: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.id == id || c.items().iter().any(|item| item.id == id))
    }

    pub fn next_id(&self, prefix: &str) -> String {
        loop {
            let id = format!("{}-{}", prefix, Uuid::new_v4().simple());
            if !self.contains_id(&id) {
                return id;
            }
        }
    }

    pub fn set_income(&mut self, text: &str) -> bool {
        if self.income == text {
            return false;
        }
        self.income = text.to_string();
        true
    }

    /// Append a new, empty category. Blank names are rejected.
    pub fn add_category(&mut self, name: &str) -> Option<&Category> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let category = Category {
            id: self.next_id("cat"),
            name: name.to_string(),
            color: palette_color(self.categories.len()).to_string(),
            amount: Amount::Direct(String::new()),
        };
        self.categories.push(category);
        self.categories.last()
    }

    /// Rename a category. A blank name leaves the current one in place.
    pub fn rename_category(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.category_mut(id) {
            Some(category) if category.name != name => {
                category.name = name.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn remove_category(&mut self, id: &str) -> Option<Category> {
        let index = self.categories.iter().position(|c| c.id == id)?;
        Some(self.categories.remove(index))
    }

    pub fn set_category_value(&mut self, id: &str, text: &str) -> bool {
        match self.category_mut(id) {
            Some(Category {
                amount: Amount::Direct(value),
                ..
            }) if value != text => {
                *value = text.to_string();
                true
            }
            _ => false,
        }
    }

    /// Append an empty item to a category and return its id.
    ///
    /// A directly-valued category becomes itemized; a non-empty direct value
    /// is carried over as the first item.
    pub fn add_item(&mut self, category_id: &str) -> Option<String> {
        let item_id = self.next_id("item");
        let category = self.category_mut(category_id)?;
        if let Amount::Direct(value) = &category.amount {
            let carried = if value.trim().is_empty() {
                Vec::new()
            } else {
                let first_id = format!("{item_id}-0");
                vec![Item {
                    id: first_id,
                    name: String::new(),
                    value: value.clone(),
                }]
            };
            category.amount = Amount::Itemized(carried);
        }
        if let Amount::Itemized(items) = &mut category.amount {
            items.push(Item {
                id: item_id.clone(),
                name: String::new(),
                value: String::new(),
            });
        }
        Some(item_id)
    }

    pub fn remove_item(&mut self, category_id: &str, item_id: &str) -> Option<Item> {
        match &mut self.category_mut(category_id)?.amount {
            Amount::Direct(_) => None,
            Amount::Itemized(items) => {
                let index = items.iter().position(|item| item.id == item_id)?;
                Some(items.remove(index))
            }
        }
    }

    pub fn set_item_name(&mut self, category_id: &str, item_id: &str, name: &str) -> bool {
        match self
            .category_mut(category_id)
            .and_then(|c| c.item_mut(item_id))
        {
            Some(item) if item.name != name => {
                item.name = name.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn set_item_value(&mut self, category_id: &str, item_id: &str, text: &str) -> bool {
        match self
            .category_mut(category_id)
            .and_then(|c| c.item_mut(item_id))
        {
            Some(item) if item.value != text => {
                item.value = text.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.income.clear();
        self.categories.clear();
    }
}
