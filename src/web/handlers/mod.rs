//! Route handler modules for the lead-capture REST API.

pub mod contact;
pub mod health;
pub mod leads;
