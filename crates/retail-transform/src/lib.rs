//! Star-schema construction for the retail extracts.
//!
//! Every stage is a function from input frames to a new frame:
//!
//! - **customers / products / suppliers**: dimension cleaning
//! - **time_dim**: the shared time dimension and its lookup
//! - **sales / shipments**: fact reconciliation against the dimensions
//! - **format_ids**: fixed-width identifier rendering
//! - **integrity**: final referential-integrity verification
//!
//! Identifier repair lives in [`ids`], field rules in [`normalization`].

pub mod customers;
pub mod datetime;
pub mod error;
pub mod format_ids;
pub mod frame;
pub mod ids;
pub mod integrity;
pub mod normalization;
pub mod products;
pub mod sales;
pub mod shipments;
pub mod suppliers;
pub mod time_dim;

pub use customers::clean_customers;
pub use error::{Result, TransformError};
pub use format_ids::{DEFAULT_ID_WIDTH, format_identifiers, pad_id};
pub use ids::{ClaimedIds, reconcile_ids};
pub use integrity::check_integrity;
pub use products::clean_products;
pub use sales::{ProductCatalog, reconcile_sales};
pub use shipments::reconcile_shipments;
pub use suppliers::clean_suppliers;
pub use time_dim::{TimeLookup, build_time_dimension, time_dimension_from_extracts};
