//! Raw extract discovery in the input directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use retail_model::Table;

use crate::error::{IngestError, Result};

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|source| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// The five raw extracts located in one input directory.
#[derive(Debug, Clone)]
pub struct RawInputs {
    pub dir: PathBuf,
    pub files: BTreeMap<Table, PathBuf>,
}

impl RawInputs {
    pub fn path(&self, table: Table) -> Option<&Path> {
        self.files.get(&table).map(PathBuf::as_path)
    }
}

/// Locates every raw extract in `dir`, matching file names case-insensitively.
///
/// All missing extracts are reported together.
pub fn discover_raw_inputs(dir: &Path) -> Result<RawInputs> {
    let csv_files = list_csv_files(dir)?;
    let mut files = BTreeMap::new();
    let mut missing = Vec::new();

    for table in Table::RAW {
        let Some(expected) = table.raw_file_name() else {
            continue;
        };
        let found = csv_files.iter().find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.eq_ignore_ascii_case(expected))
        });
        match found {
            Some(path) => {
                debug!(table = %table, path = %path.display(), "found raw extract");
                files.insert(table, path.clone());
            }
            None => missing.push(expected.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(IngestError::MissingExtracts {
            dir: dir.to_path_buf(),
            missing,
        });
    }

    Ok(RawInputs {
        dir: dir.to_path_buf(),
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_csv_files_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["b.csv", "a.CSV", "notes.txt"] {
            std::fs::write(dir.path().join(name), "x\n1").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let files = list_csv_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
    }

    #[test]
    fn test_missing_directory() {
        let err = list_csv_files(Path::new("/nonexistent/retail/data")).unwrap_err();
        assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_discover_reports_all_missing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("CLIENTES.csv"), "x\n").unwrap();
        std::fs::write(dir.path().join("productos.csv"), "x\n").unwrap();

        let err = discover_raw_inputs(dir.path()).unwrap_err();
        match err {
            IngestError::MissingExtracts { missing, .. } => {
                assert_eq!(
                    missing,
                    vec!["proveedores.csv", "ventas.csv", "logistica.csv"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_discover_all_present() {
        let dir = TempDir::new().unwrap();
        for table in Table::RAW {
            let name = table.raw_file_name().unwrap();
            std::fs::write(dir.path().join(name), "x\n").unwrap();
        }
        let inputs = discover_raw_inputs(dir.path()).unwrap();
        assert_eq!(inputs.files.len(), 5);
        assert!(inputs.path(Table::Time).is_none());
        assert!(inputs.path(Table::Sales).is_some());
    }
}
