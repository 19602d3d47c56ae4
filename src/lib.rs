// todostore - Todo-list state machine with JSON file persistence

pub mod models;
pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use models::{Filter, Task};
pub use store::TaskListStore;
