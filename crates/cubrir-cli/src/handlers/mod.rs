//! Command handlers - extracted from main.rs for testability

pub mod check;
pub mod history;

pub use check::execute_check;
pub use history::execute_history;
