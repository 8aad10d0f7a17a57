pub mod choices;
pub mod expense;
