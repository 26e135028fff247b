//! # Report Client
//!
//! HTTP access to the violation report backend. [`ApiClient`] is both the
//! [`report_address::DistrictAccountSource`] that feeds address autocomplete
//! and the [`report_submission::ReportTransport`] that delivers reports.
//!
//! ## Example
//!
//! ```no_run
//! use report_address::AddressResolutionController;
//! use report_client::{ApiClient, ApiConfig, ApiEnvironment};
//! use report_submission::ReportForm;
//! use std::sync::Arc;
//!
//! # async fn example() -> report_client::Result<()> {
//! let config = ApiConfig::for_environment(ApiEnvironment::Development)?;
//! let client = Arc::new(ApiClient::new(&config)?);
//!
//! let form = ReportForm::new(
//!     AddressResolutionController::with_defaults(client.clone()),
//!     client,
//! );
//! form.address().set_district("ventana");
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;

pub use client::ApiClient;
pub use config::{ApiConfig, ApiEnvironment, DEVELOPMENT_BASE_URL, PRODUCTION_BASE_URL_VAR};
pub use error::{ClientError, Result};
