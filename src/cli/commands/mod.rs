pub mod items;
pub mod models;
