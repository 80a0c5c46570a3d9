//! Price alerts: threshold classification and the sticky trigger lifecycle.
//!
//! - [`alerts_model`] - Alert domain models and the status state machine
//! - [`alerts_traits`] - The persistence collaborator boundary
//! - [`alerts_service`] - Classification, trigger persistence, reset

pub mod alerts_model;
pub mod alerts_service;
pub mod alerts_traits;


pub use alerts_model::{
    AlertDirection, AlertEvaluation, AlertStatus, NewPriceAlert, PriceAlert, PriceAlertUpdate,
};
pub use alerts_service::{classify, distance_percent, AlertService};
pub use alerts_traits::AlertStore;
