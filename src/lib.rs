//! Browser budget visualizer: monthly income and spending categories in,
//! totals, a status badge and a donut chart out. State lives in
//! `localStorage` between visits.

pub mod budget;
pub mod chart;
pub mod components;
pub mod controller;
pub mod error;
pub mod format;
pub mod geometry;
pub mod logging;
pub mod model;
pub mod settings;
pub mod storage;

pub use budget::{compute, Breakdown, Status};
pub use controller::{Action, Command, Controller, Dialogs};
pub use model::{Amount, AppState, Category, Item};
pub use storage::{BudgetRepository, KeyValueStore, MemoryStore};
