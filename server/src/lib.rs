//! Leadrelay Server
//!
//! Webhook relay between a VICIdial dialer and a GoHighLevel CRM.
//! Validates and reshapes inbound payloads, forwards them to the right
//! upstream API and reshapes the answer for the caller.

pub mod api;
pub mod config;
pub mod crm;
pub mod extract;
pub mod phone;
pub mod vicidial;
