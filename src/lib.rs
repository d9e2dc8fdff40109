//! cicsctl: CICS resource management over CMCI
//!
//! A client library and CLI for defining, querying, installing, and deleting
//! CICS resources through the CMCI REST API. Typed parameters are validated,
//! rendered into CMCI XML request envelopes, and dispatched to a region or
//! CICSplex endpoint.

pub mod api;
pub mod cli;
pub mod client;
pub mod define;
pub mod error;
pub mod logging;
pub mod profile;
pub mod request;
pub mod resource;
pub mod response;
