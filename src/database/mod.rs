pub mod item;
pub mod manager;
pub mod repository;

pub use item::{Item, ItemDraft, ItemError, ItemPatch, ModelSummary};
pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{ItemRepository, ListOptions};
