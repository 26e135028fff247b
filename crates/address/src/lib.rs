//! # Report Address
//!
//! District-scoped address resolution for violation reports.
//!
//! ## Flow
//!
//! ```text
//! set_district
//!     │
//!     ├──> DistrictCatalog (default city/state/zip)
//!     │
//!     └──> DistrictAccountSource (async, newest request wins)
//!            └─> SuggestionIndex
//!
//! set_address_line1
//!     │
//!     └──> DebouncedQuery (150 ms, last keystroke wins)
//!            └─> SuggestionIndex::query ──> suggestions
//!
//! select_suggestion ──> address fields
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use report_address::{AddressResolutionController, StaticAccountSource};
//! use report_protocol::AddressSuggestion;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = StaticAccountSource::new()
//!         .with_district("waters_edge", vec![AddressSuggestion::new("123 Oak St")]);
//!     let controller = AddressResolutionController::with_defaults(Arc::new(source));
//!
//!     controller.set_district("waters_edge");
//!     controller.set_address_line1("oak");
//!
//!     let mut changes = controller.subscribe();
//!     changes
//!         .wait_for(|snapshot| !snapshot.suggestions.is_empty())
//!         .await
//!         .unwrap();
//! }
//! ```

mod config;
mod controller;
mod debounce;
mod district;
mod error;
mod index;
mod source;

pub use config::AddressConfig;
pub use controller::{
    AddressField, AddressResolutionController, AddressSnapshot, DistrictLoadState,
};
pub use debounce::DebouncedQuery;
pub use district::{DefaultLocation, District, DistrictCatalog, DISTRICT_PLACEHOLDER_LABEL};
pub use error::{AddressError, Result};
pub use index::SuggestionIndex;
pub use source::{DistrictAccountSource, StaticAccountSource};
