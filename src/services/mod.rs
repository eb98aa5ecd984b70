//! Service layer modules for external integrations.
//!
//! Contains the client for the hosted record service.

pub mod records;

pub use records::{HttpRecordClient, RecordService};
