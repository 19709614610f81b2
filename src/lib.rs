//! SMA Settlement Calculator API Library
//!
//! This library provides the core functionality for the SMA settlement
//! calculator API: settlement option computation, printable report
//! rendering, and submission of calculation summaries to the remote
//! spreadsheet-recording API.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models (claim form, calculation result, submission record).
//! - `report`: Settlement option computation and report rendering.
//! - `session`: Per-session last-calculation cache.
//! - `sheets_client`: Spreadsheet-recording API client.
//! - `submission`: Submission record building and the submit/counter-offer flow.
//! - `template`: Print template loading and readiness.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod report;
pub mod session;
pub mod sheets_client;
pub mod submission;
pub mod template;
