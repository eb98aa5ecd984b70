//! Domain types and DTOs
//!
//! These types define the data structures for TaskFlow entities.

pub mod filters;
pub mod profiles;
pub mod tasks;

// Re-export commonly used types
pub use filters::{TaskListFilter, TaskQuery};
pub use profiles::{ProfileUpdate, UserId, UserIdentity};
pub use tasks::{NewTask, Task, TaskCategory, TaskId, TaskPatch, TaskPriority, TaskStatus};
