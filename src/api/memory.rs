use async_trait::async_trait;
use tokio::sync::Mutex;

use super::client::ExpenseStore;
use super::error::ApiError;
use crate::models::expense::{Expense, NewExpense, UpdateExpense};

/// Number of calls made to each endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub create: usize,
    pub list: usize,
    pub update: usize,
    pub delete: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.create + self.list + self.update + self.delete
    }
}

#[derive(Debug, Default)]
struct Inner {
    expenses: Vec<Expense>,
    next_id: i64,
    calls: CallCounts,
    fail_with: Option<String>,
}

/// In-memory ExpenseStore for tests. Records every call and can be told to fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        let next_id = expenses.iter().map(|e| e.id).max().unwrap_or(0);
        Self {
            inner: Mutex::new(Inner {
                expenses,
                next_id,
                ..Inner::default()
            }),
        }
    }

    /// Every subsequent call fails with a 500 carrying `message`.
    pub async fn fail_with(&self, message: &str) {
        self.inner.lock().await.fail_with = Some(message.to_string());
    }

    pub async fn recover(&self) {
        self.inner.lock().await.fail_with = None;
    }

    pub async fn calls(&self) -> CallCounts {
        self.inner.lock().await.calls
    }

    pub async fn expenses(&self) -> Vec<Expense> {
        self.inner.lock().await.expenses.clone()
    }
}

fn failure(inner: &Inner) -> Result<(), ApiError> {
    match &inner.fail_with {
        Some(message) => Err(ApiError::Status {
            status: 500,
            message: message.clone(),
        }),
        None => Ok(()),
    }
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        message: "Expense not found".to_string(),
    }
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn create(&self, expense: &NewExpense) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().await;
        inner.calls.create += 1;
        failure(&inner)?;

        inner.next_id += 1;
        let id = inner.next_id;
        inner.expenses.push(Expense {
            id,
            category: expense.category.clone(),
            description: expense.description.clone(),
            amount: expense.amount,
            created_at: expense.created_at.clone(),
        });
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Expense>, ApiError> {
        let mut inner = self.inner.lock().await;
        inner.calls.list += 1;
        failure(&inner)?;
        Ok(inner.expenses.clone())
    }

    async fn update(&self, id: i64, expense: &UpdateExpense) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().await;
        inner.calls.update += 1;
        failure(&inner)?;

        let existing = inner
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(not_found)?;
        existing.category = expense.category.clone();
        existing.description = expense.description.clone();
        existing.amount = expense.amount;
        existing.created_at = expense.created_at.clone();
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().await;
        inner.calls.delete += 1;
        failure(&inner)?;

        let index = inner
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(not_found)?;
        inner.expenses.remove(index);
        Ok(())
    }
}
