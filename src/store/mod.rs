//! Session state containers.
//!
//! Plain synchronous structs; the application state wraps each in a mutex.

pub mod tasks;
pub mod users;

pub use tasks::{TaskStats, TaskStore};
pub use users::UserStore;
