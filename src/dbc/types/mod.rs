pub mod attributes;
pub mod database;
pub mod errors;
pub mod message;
pub mod signal;
pub mod value_table;
