//! Utility modules for the MasterTask client.
//!
//! - [`datetime`] - week boundaries, lenient date parsing and user date formats

pub mod datetime;
