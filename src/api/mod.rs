pub mod client;
pub mod error;
pub mod memory;

pub use client::{ExpenseStore, HttpExpenseStore};
pub use error::ApiError;
pub use memory::MemoryStore;
