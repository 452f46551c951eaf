pub mod classify;
pub mod segment;
pub mod templates;
