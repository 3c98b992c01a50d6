pub mod records;
pub mod setup;
pub mod summary;
pub mod ui;
