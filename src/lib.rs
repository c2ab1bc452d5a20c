//! Scoring engine for usability surveys of AI agent products.
//!
//! A submission carries Kano feature pairs, the ten SUS items and an optional
//! AIPET follow-up. [`evaluation::evaluate`] turns it into an immutable
//! [`models::EvaluationRecord`]; [`store`] and [`db`] persist those records.

pub mod aipet;
pub mod assessment;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod evaluation;
pub mod kano;
pub mod models;
pub mod report;
pub mod service;
pub mod store;
pub mod sus;

pub use error::{EvaluationError, Result};
pub use evaluation::{evaluate, EngineOptions};
pub use models::{EvaluationRecord, EvaluationRequest};
