use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
    widgets::ListItem,
};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub category: String,
    pub description: String,
    #[serde(deserialize_with = "amount_from_number_or_string")]
    pub amount: f64,
    pub created_at: String,
}

/// Body of `POST /create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub created_at: String,
}

/// Body of `PUT /update/:id`. Replaces all four editable fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateExpense {
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseList {
    pub expenses: Vec<Expense>,
}

impl Expense {
    /// The `YYYY-MM-DD` part of `created_at`.
    pub fn date_part(&self) -> &str {
        self.created_at.get(..10).unwrap_or(&self.created_at)
    }

    pub fn to_list_item(&self) -> ListItem<'_> {
        ListItem::new(Line::from(vec![
            Span::raw(format!("{:<10} ", self.date_part())),
            Span::styled(format!("{:>10.2} ", self.amount), Style::default().fg(Color::Yellow)),
            Span::styled(format!("{:<20} ", self.category), Style::default().fg(Color::Cyan)),
            Span::raw(self.description.as_str()),
        ]))
    }
}

fn amount_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("amount '{}' is not a number", s))),
    }
}
