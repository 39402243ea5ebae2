//! Recipe catalog and weekly meal planner core: SQLite store, meal plan,
//! shopping list derivation, statistics, and spreadsheet export.

pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod service;
pub mod shopping;
pub mod stats;

pub use error::{Result, StoreError};
