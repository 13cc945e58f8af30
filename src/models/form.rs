use chrono::{Local, NaiveDate};
use thiserror::Error;

use super::expense::{Expense, NewExpense, UpdateExpense};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Amount must be a number")]
    InvalidAmount,
    #[error("Date must be in YYYY-MM-DD format")]
    InvalidDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Category,
    Description,
    Amount,
    Date,
}

impl FormField {
    pub fn all() -> [FormField; 4] {
        [
            FormField::Category,
            FormField::Description,
            FormField::Amount,
            FormField::Date,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Category => "Category",
            FormField::Description => "Description",
            FormField::Amount => "Amount",
            FormField::Date => "Date (YYYY-MM-DD)",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FormField::Category => "Services, food, treats, transport...",
            FormField::Description => "What was it for",
            FormField::Amount => "0.00",
            FormField::Date => "",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FormField::Category => FormField::Description,
            FormField::Description => FormField::Amount,
            FormField::Amount => FormField::Date,
            FormField::Date => FormField::Category,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FormField::Category => FormField::Date,
            FormField::Description => FormField::Category,
            FormField::Amount => FormField::Description,
            FormField::Date => FormField::Amount,
        }
    }
}

/// Naive string-to-float parsing of a user-typed amount.
pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(ValidationError::InvalidAmount),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate)
}

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// State of the "new expense" screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub category: String,
    pub description: String,
    pub amount: String,
    pub date: String,
}

impl Default for ExpenseForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseForm {
    pub fn new() -> Self {
        Self {
            category: String::new(),
            description: String::new(),
            amount: String::new(),
            date: today(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Category => &self.category,
            FormField::Description => &self.description,
            FormField::Amount => &self.amount,
            FormField::Date => &self.date,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Category => &mut self.category,
            FormField::Description => &mut self.description,
            FormField::Amount => &mut self.amount,
            FormField::Date => &mut self.date,
        }
    }

    pub fn validate(&self) -> Result<NewExpense, ValidationError> {
        if self.category.is_empty() || self.description.is_empty() || self.amount.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        let amount = parse_amount(&self.amount)?;
        let date = parse_date(&self.date)?;

        Ok(NewExpense {
            category: self.category.clone(),
            description: self.description.clone(),
            amount,
            created_at: date.format("%Y-%m-%d").to_string(),
        })
    }
}

/// State of the edit modal on the list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    pub id: i64,
    pub category: String,
    pub description: String,
    pub amount: String,
    pub created_at: String,
}

impl EditForm {
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            category: expense.category.clone(),
            description: expense.description.clone(),
            amount: expense.amount.to_string(),
            created_at: expense.date_part().to_string(),
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Category => &self.category,
            FormField::Description => &self.description,
            FormField::Amount => &self.amount,
            FormField::Date => &self.created_at,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Category => &mut self.category,
            FormField::Description => &mut self.description,
            FormField::Amount => &mut self.amount,
            FormField::Date => &mut self.created_at,
        }
    }

    pub fn validate(&self) -> Result<UpdateExpense, ValidationError> {
        if self.category.is_empty()
            || self.description.is_empty()
            || self.amount.is_empty()
            || self.created_at.is_empty()
        {
            return Err(ValidationError::MissingFields);
        }
        let amount = parse_amount(&self.amount)?;
        let date = parse_date(&self.created_at)?;

        Ok(UpdateExpense {
            category: self.category.clone(),
            description: self.description.clone(),
            amount,
            created_at: format!("{}T00:00:00Z", date.format("%Y-%m-%d")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> ExpenseForm {
        ExpenseForm {
            category: "food".into(),
            description: "lunch".into(),
            amount: "12.50".into(),
            date: "2024-05-03".into(),
        }
    }

    #[test]
    fn every_required_field_is_checked() {
        for field in [FormField::Category, FormField::Description, FormField::Amount] {
            let mut form = filled_form();
            form.field_mut(field).clear();
            assert_eq!(form.validate(), Err(ValidationError::MissingFields), "{:?}", field);
        }
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        let mut form = filled_form();
        form.amount = "twelve".into();
        assert_eq!(form.validate(), Err(ValidationError::InvalidAmount));

        form.amount = "NaN".into();
        assert_eq!(form.validate(), Err(ValidationError::InvalidAmount));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut form = filled_form();
        form.date = "03/05/2024".into();
        assert_eq!(form.validate(), Err(ValidationError::InvalidDate));
    }

    #[test]
    fn valid_form_builds_create_payload() {
        let payload = filled_form().validate().unwrap();
        assert_eq!(payload.amount, 12.5);
        assert_eq!(payload.created_at, "2024-05-03");
        assert_eq!(payload.category, "food");
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut form = filled_form();
        form.reset();
        assert_eq!(form, ExpenseForm::new());
        assert!(form.category.is_empty() && form.description.is_empty() && form.amount.is_empty());
    }

    #[test]
    fn edit_form_seeds_from_record_and_builds_put_payload() {
        let expense = Expense {
            id: 4,
            category: "bus".into(),
            description: "ticket".into(),
            amount: 3.2,
            created_at: "2024-05-04T18:22:10.123".into(),
        };
        let mut form = EditForm::from_expense(&expense);
        assert_eq!(form.amount, "3.2");
        assert_eq!(form.created_at, "2024-05-04");

        form.amount = "4".into();
        let payload = form.validate().unwrap();
        assert_eq!(payload.amount, 4.0);
        assert_eq!(payload.created_at, "2024-05-04T00:00:00Z");
    }

    #[test]
    fn edit_form_requires_a_date() {
        let mut form = EditForm {
            id: 1,
            category: "a".into(),
            description: "b".into(),
            amount: "1".into(),
            created_at: String::new(),
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingFields));

        form.created_at = "tomorrow".into();
        assert_eq!(form.validate(), Err(ValidationError::InvalidDate));
    }

    #[test]
    fn field_focus_cycles() {
        let mut field = FormField::Category;
        for _ in 0..FormField::all().len() {
            field = field.next();
        }
        assert_eq!(field, FormField::Category);
        assert_eq!(FormField::Category.previous(), FormField::Date);
    }
}
