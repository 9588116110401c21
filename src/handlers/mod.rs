pub mod docs;
pub mod forms;
pub mod items;
pub mod models;
