use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{error, info};

use super::error::ApiError;
use crate::models::expense::{Expense, ExpenseList, NewExpense, UpdateExpense};

/// The remote expense store.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn create(&self, expense: &NewExpense) -> Result<(), ApiError>;
    async fn list(&self) -> Result<Vec<Expense>, ApiError>;
    async fn update(&self, id: i64, expense: &UpdateExpense) -> Result<(), ApiError>;
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpExpenseStore {
    client: Client,
    base_url: String,
}

impl HttpExpenseStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_default();
        error!(status = status.as_u16(), %message, "expense api returned an error");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ExpenseStore for HttpExpenseStore {
    async fn create(&self, expense: &NewExpense) -> Result<(), ApiError> {
        let url = self.endpoint("create");
        info!(%url, category = %expense.category, amount = expense.amount, "creating expense");
        let response = self.client.post(&url).json(expense).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Expense>, ApiError> {
        let url = self.endpoint("get");
        info!(%url, "fetching expenses");
        let response = self.client.get(&url).send().await?;
        let body: ExpenseList = Self::check(response).await?.json().await?;
        info!(count = body.expenses.len(), "fetched expenses");
        Ok(body.expenses)
    }

    async fn update(&self, id: i64, expense: &UpdateExpense) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("update/{}", id));
        info!(%url, id, "updating expense");
        let response = self.client.put(&url).json(expense).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("delete/{}", id));
        info!(%url, id, "deleting expense");
        let response = self.client.delete(&url).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
