pub mod expense;
pub mod form;
