pub mod api;
pub mod config;
pub mod models;
pub mod summary;
pub mod ui;

// Re-export commonly used items
pub use api::{ApiError, ExpenseStore, HttpExpenseStore, MemoryStore};
pub use config::Settings;
pub use models::expense::{Expense, NewExpense, UpdateExpense};
pub use models::form::{EditForm, ExpenseForm, ValidationError};
pub use ui::app::App;
