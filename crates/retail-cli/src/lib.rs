//! CLI library components for the retail ETL.

pub mod logging;
pub mod pipeline;
