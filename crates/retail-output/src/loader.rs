//! Warehouse load handoff.
//!
//! The warehouse itself is external. The pipeline appends every output table
//! through a [`WarehouseLoader`] in dependency order and only then applies the
//! constraint scripts, so that keys are enforced after all rows are present.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::checksum::compute_file_sha256;
use crate::error::{OutputError, Result};
use crate::writer::OutputArtifact;

/// Constraint scripts applied after loading, in order.
pub const CONSTRAINT_SCRIPTS: [&str; 3] = ["p_keys.sql", "f_keys.sql", "indexes.sql"];

/// Destination for the finished tables.
pub trait WarehouseLoader {
    /// Appends one table into its pre-existing warehouse table.
    fn append_table(&mut self, artifact: &OutputArtifact) -> Result<()>;

    /// Applies one constraint script. A failure must leave the warehouse as it
    /// was before the script.
    fn apply_constraints(&mut self, script: &Path) -> Result<()>;

    /// Called once after every table and script was handled.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestTable {
    pub warehouse_table: String,
    #[serde(flatten)]
    pub artifact: OutputArtifact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestScript {
    pub name: String,
    pub path: PathBuf,
    pub sha256: String,
}

/// Everything an external bulk loader needs, in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadManifest {
    pub tables: Vec<ManifestTable>,
    pub constraint_scripts: Vec<ManifestScript>,
}

/// Loader that records the load plan as `load_manifest.json`.
#[derive(Debug)]
pub struct ManifestLoader {
    path: PathBuf,
    manifest: LoadManifest,
}

impl ManifestLoader {
    pub const FILE_NAME: &'static str = "load_manifest.json";

    pub fn new(output_dir: &Path) -> Self {
        Self {
            path: output_dir.join(Self::FILE_NAME),
            manifest: LoadManifest::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest(&self) -> &LoadManifest {
        &self.manifest
    }
}

impl WarehouseLoader for ManifestLoader {
    fn append_table(&mut self, artifact: &OutputArtifact) -> Result<()> {
        self.manifest.tables.push(ManifestTable {
            warehouse_table: artifact.table.warehouse_table().to_string(),
            artifact: artifact.clone(),
        });
        Ok(())
    }

    fn apply_constraints(&mut self, script: &Path) -> Result<()> {
        let name = script
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        let content = fs::read_to_string(script).map_err(|err| OutputError::ConstraintScript {
            script: name.clone(),
            message: err.to_string(),
        })?;
        if content.trim().is_empty() {
            return Err(OutputError::ConstraintScript {
                script: name,
                message: "script is empty".to_string(),
            });
        }
        self.manifest.constraint_scripts.push(ManifestScript {
            name,
            path: script.to_path_buf(),
            sha256: compute_file_sha256(script)?,
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.manifest).map_err(|source| {
            OutputError::Manifest {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json + "\n").map_err(|source| OutputError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Outcome of a completed load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub tables_loaded: usize,
    pub scripts_applied: Vec<String>,
}

/// Appends every artifact in table order, then applies the constraint scripts.
///
/// A failing script is logged and the remaining scripts are still attempted;
/// the load fails afterwards if any script failed.
pub fn load_outputs(
    loader: &mut dyn WarehouseLoader,
    artifacts: &[OutputArtifact],
    constraints_dir: Option<&Path>,
) -> Result<LoadReport> {
    let mut ordered: Vec<&OutputArtifact> = artifacts.iter().collect();
    ordered.sort_by_key(|artifact| artifact.table);

    let mut report = LoadReport::default();
    for artifact in ordered {
        loader.append_table(artifact)?;
        report.tables_loaded += 1;
        info!(
            table = artifact.table.warehouse_table(),
            rows = artifact.rows,
            "appended table"
        );
    }

    let mut failed = Vec::new();
    if let Some(dir) = constraints_dir {
        for name in CONSTRAINT_SCRIPTS {
            match loader.apply_constraints(&dir.join(name)) {
                Ok(()) => {
                    info!(script = name, "applied constraints");
                    report.scripts_applied.push(name.to_string());
                }
                Err(err) => {
                    warn!(script = name, error = %err, "constraint script failed");
                    failed.push(name.to_string());
                }
            }
        }
    }

    loader.finish()?;
    if !failed.is_empty() {
        return Err(OutputError::ConstraintsFailed { failed });
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use retail_model::Table;
    use tempfile::TempDir;

    fn artifact(table: Table) -> OutputArtifact {
        OutputArtifact {
            table,
            path: PathBuf::from(table.output_file_name()),
            rows: 1,
            sha256: "0".repeat(64),
        }
    }

    #[derive(Default)]
    struct RecordingLoader {
        calls: Vec<String>,
        failing_script: Option<&'static str>,
    }

    impl WarehouseLoader for RecordingLoader {
        fn append_table(&mut self, artifact: &OutputArtifact) -> Result<()> {
            self.calls.push(artifact.table.warehouse_table().to_string());
            Ok(())
        }

        fn apply_constraints(&mut self, script: &Path) -> Result<()> {
            let name = script.file_name().unwrap().to_str().unwrap().to_string();
            self.calls.push(name.clone());
            if self.failing_script == Some(name.as_str()) {
                return Err(OutputError::ConstraintScript {
                    script: name,
                    message: "rolled back".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_tables_load_in_dependency_order() {
        let mut loader = RecordingLoader::default();
        let artifacts = [
            artifact(Table::Shipments),
            artifact(Table::Customers),
            artifact(Table::Time),
            artifact(Table::Sales),
        ];
        let report = load_outputs(&mut loader, &artifacts, Some(Path::new("sql"))).unwrap();
        assert_eq!(report.tables_loaded, 4);
        assert_eq!(
            loader.calls,
            vec![
                "clientes",
                "tiempo",
                "ventas",
                "envios",
                "p_keys.sql",
                "f_keys.sql",
                "indexes.sql"
            ]
        );
    }

    #[test]
    fn test_failed_script_does_not_stop_the_rest() {
        let mut loader = RecordingLoader {
            failing_script: Some("f_keys.sql"),
            ..Default::default()
        };
        let err = load_outputs(&mut loader, &[], Some(Path::new("sql"))).unwrap_err();
        assert!(matches!(err, OutputError::ConstraintsFailed { ref failed } if failed == &["f_keys.sql"]));
        assert_eq!(loader.calls, vec!["p_keys.sql", "f_keys.sql", "indexes.sql"]);
    }

    #[test]
    fn test_manifest_loader_writes_json() {
        let dir = TempDir::new().unwrap();
        let sql = dir.path().join("sql");
        fs::create_dir(&sql).unwrap();
        fs::write(sql.join("p_keys.sql"), "ALTER TABLE clientes ADD PRIMARY KEY (cliente_id);").unwrap();
        fs::write(sql.join("f_keys.sql"), "ALTER TABLE ventas ADD FOREIGN KEY (cliente_id);").unwrap();
        fs::write(sql.join("indexes.sql"), "").unwrap();

        let mut loader = ManifestLoader::new(dir.path());
        let err = load_outputs(&mut loader, &[artifact(Table::Customers)], Some(&sql)).unwrap_err();
        assert!(matches!(err, OutputError::ConstraintsFailed { .. }));

        let json = fs::read_to_string(loader.path()).unwrap();
        let manifest: LoadManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(manifest.tables.len(), 1);
        assert_eq!(manifest.tables[0].warehouse_table, "clientes");
        assert_eq!(manifest.constraint_scripts.len(), 2);
        assert_eq!(manifest.constraint_scripts[1].name, "f_keys.sql");
    }
}
