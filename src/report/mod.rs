pub mod console;
pub mod summary_model;
