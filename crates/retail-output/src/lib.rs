//! Output generation for the retail star schema.
//!
//! - **writer**: atomic CSV writing with read-back confirmation
//! - **checksum**: SHA-256 of written files
//! - **loader**: the [`WarehouseLoader`] handoff and a manifest-producing loader

pub mod checksum;
pub mod error;
pub mod loader;
pub mod writer;

pub use checksum::compute_file_sha256;
pub use error::{OutputError, Result};
pub use loader::{
    CONSTRAINT_SCRIPTS, LoadManifest, LoadReport, ManifestLoader, WarehouseLoader, load_outputs,
};
pub use writer::{OutputArtifact, confirm_readable, write_table_csv};
