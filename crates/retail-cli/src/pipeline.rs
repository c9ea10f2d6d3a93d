//! Stage orchestration for one ETL run.
//!
//! Stages run in dependency order. The three dimension cleaners are
//! independent and run on worker threads that report over a channel; the
//! orchestrator waits for all of them with a bounded timeout before building
//! the time dimension and the fact tables.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use polars::prelude::DataFrame;
use retail_ingest::{discover_raw_inputs, read_csv_table, read_raw_table};
use retail_model::{IntegrityReport, Table, TableSummary};
use retail_output::{LoadReport, ManifestLoader, OutputArtifact, load_outputs, write_table_csv};
use retail_transform::{
    DEFAULT_ID_WIDTH, TimeLookup, check_integrity, clean_customers, clean_products,
    clean_suppliers, format_identifiers, reconcile_sales, reconcile_shipments,
    time_dimension_from_extracts,
};
use tracing::{Span, debug, info, info_span, warn};

use crate::logging::redact_value;

type Cleaner = fn(&DataFrame) -> retail_transform::Result<DataFrame>;

const DIMENSION_CLEANERS: [(Table, Cleaner); 3] = [
    (Table::Customers, clean_customers),
    (Table::Products, clean_products),
    (Table::Suppliers, clean_suppliers),
];

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Width identifiers are zero-padded to.
    pub id_width: usize,
    /// How long to wait for the dimension cleaners.
    pub stage_timeout: Duration,
    pub parallel_cleaners: bool,
    /// Directory holding the constraint scripts, if they should be applied.
    pub constraints_dir: Option<PathBuf>,
    /// Record the load in `load_manifest.json`.
    pub write_manifest: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            id_width: DEFAULT_ID_WIDTH,
            stage_timeout: Duration::from_secs(30),
            parallel_cleaners: true,
            constraints_dir: None,
            write_manifest: false,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub tables: Vec<TableSummary>,
    pub artifacts: Vec<OutputArtifact>,
    pub load: Option<LoadReport>,
    pub manifest: Option<PathBuf>,
}

/// Runs every stage from raw extracts to written, loaded outputs.
pub fn run_pipeline(options: &PipelineOptions) -> Result<RunResult> {
    let run_span = info_span!(
        "run",
        input_dir = %options.input_dir.display(),
        output_dir = %options.output_dir.display()
    );
    let _run_guard = run_span.enter();
    let run_start = Instant::now();

    // Stage 1: ingest
    let raw = timed_stage("ingest", || ingest(&options.input_dir))?;

    // Stage 2: dimension cleaning
    let mut tables = timed_stage("dimensions", || {
        if options.parallel_cleaners {
            clean_dimensions_parallel(&raw, options.stage_timeout)
        } else {
            clean_dimensions_sequential(&raw)
        }
    })?;

    // Stage 3: shared time dimension
    let time = timed_stage("time", || {
        time_dimension_from_extracts(raw_table(&raw, Table::Sales)?, raw_table(&raw, Table::Shipments)?)
            .context("build time dimension")
    })?;
    let lookup = TimeLookup::from_dimension(&time).context("index time dimension")?;
    tables.insert(Table::Time, time);

    // Stage 4: sales
    let sales = timed_stage("sales", || {
        reconcile_sales(
            raw_table(&raw, Table::Sales)?,
            table_ref(&tables, Table::Products)?,
            table_ref(&tables, Table::Customers)?,
            &lookup,
        )
        .context("reconcile sales")
    })?;
    tables.insert(Table::Sales, sales);

    // Stage 5: shipments
    let shipments = timed_stage("shipments", || {
        reconcile_shipments(
            raw_table(&raw, Table::Shipments)?,
            table_ref(&tables, Table::Sales)?,
            table_ref(&tables, Table::Suppliers)?,
            &lookup,
        )
        .context("reconcile shipments")
    })?;
    tables.insert(Table::Shipments, shipments);

    // Stage 6: identifier formatting
    let formatted = timed_stage("format", || {
        tables
            .iter()
            .map(|(&table, df)| {
                format_identifiers(df, table, options.id_width)
                    .map(|df| (table, df))
                    .with_context(|| format!("format identifiers of {table}"))
            })
            .collect::<Result<BTreeMap<_, _>>>()
    })?;

    // Stage 7: integrity
    timed_stage("integrity", || {
        let report = check_integrity(&formatted).context("check integrity")?;
        ensure_clean(&report)
    })?;

    // Stage 8: outputs
    let artifacts = timed_stage("write", || {
        formatted
            .iter()
            .map(|(&table, df)| {
                write_table_csv(df, table, &options.output_dir)
                    .with_context(|| format!("write {}", table.output_file_name()))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    // Stage 9: load handoff
    let (load, manifest) = if options.write_manifest || options.constraints_dir.is_some() {
        timed_stage("load", || {
            let mut loader = ManifestLoader::new(&options.output_dir);
            let report = load_outputs(&mut loader, &artifacts, options.constraints_dir.as_deref())
                .context("load outputs")?;
            Ok((Some(report), Some(loader.path().to_path_buf())))
        })?
    } else {
        (None, None)
    };

    let summaries = summarize(&raw, &artifacts);
    for summary in &summaries {
        info!(
            table = %summary.table,
            rows_in = summary.input_rows,
            rows_out = summary.output_rows,
            dropped = summary.dropped(),
            "table complete"
        );
    }
    info!(duration_ms = run_start.elapsed().as_millis(), "run complete");

    Ok(RunResult {
        output_dir: options.output_dir.clone(),
        tables: summaries,
        artifacts,
        load,
        manifest,
    })
}

/// Re-checks referential integrity of a directory of written outputs.
pub fn verify_outputs(output_dir: &Path) -> Result<IntegrityReport> {
    let span = info_span!("verify", output_dir = %output_dir.display());
    let _guard = span.enter();

    let tables = Table::ALL
        .into_iter()
        .map(|table| {
            let path = output_dir.join(table.output_file_name());
            read_csv_table(&path)
                .map(|df| (table, df))
                .with_context(|| format!("read {}", path.display()))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;
    let report = check_integrity(&tables).context("check integrity")?;
    log_issues(&report);
    Ok(report)
}

fn timed_stage<T>(name: &'static str, run: impl FnOnce() -> Result<T>) -> Result<T> {
    let span = info_span!("stage", stage = name);
    let start = Instant::now();
    let output = span.in_scope(run)?;
    info!(stage = name, duration_ms = start.elapsed().as_millis(), "stage complete");
    Ok(output)
}

fn ingest(input_dir: &Path) -> Result<BTreeMap<Table, DataFrame>> {
    let inputs = discover_raw_inputs(input_dir).context("discover raw extracts")?;
    let mut raw = BTreeMap::new();
    for table in Table::RAW {
        let path = inputs
            .path(table)
            .ok_or_else(|| anyhow!("no raw extract for {table}"))?;
        let df = read_raw_table(path, table).with_context(|| format!("read {}", path.display()))?;
        debug!(table = %table, rows = df.height(), "read raw extract");
        raw.insert(table, df);
    }
    Ok(raw)
}

fn raw_table(raw: &BTreeMap<Table, DataFrame>, table: Table) -> Result<&DataFrame> {
    raw.get(&table)
        .ok_or_else(|| anyhow!("raw extract for {table} was not ingested"))
}

fn table_ref(tables: &BTreeMap<Table, DataFrame>, table: Table) -> Result<&DataFrame> {
    tables
        .get(&table)
        .ok_or_else(|| anyhow!("{table} was not built before it was needed"))
}

fn clean_dimensions_sequential(raw: &BTreeMap<Table, DataFrame>) -> Result<BTreeMap<Table, DataFrame>> {
    DIMENSION_CLEANERS
        .iter()
        .map(|&(table, clean)| {
            clean(raw_table(raw, table)?)
                .map(|df| (table, df))
                .with_context(|| format!("clean {table}"))
        })
        .collect()
}

/// Runs the dimension cleaners on worker threads and waits for all of them.
///
/// Each worker sends its finished table over the channel. A cleaner that has
/// not reported within `timeout` fails the run.
fn clean_dimensions_parallel(
    raw: &BTreeMap<Table, DataFrame>,
    timeout: Duration,
) -> Result<BTreeMap<Table, DataFrame>> {
    let (sender, receiver) = mpsc::channel();
    let mut handles = Vec::with_capacity(DIMENSION_CLEANERS.len());
    for (table, clean) in DIMENSION_CLEANERS {
        let df = raw_table(raw, table)?.clone();
        let sender = sender.clone();
        let span = Span::current();
        let handle = thread::Builder::new()
            .name(format!("clean-{}", table.code()))
            .spawn(move || {
                let result = span.in_scope(|| clean(&df));
                // The receiver is gone only after a timeout already failed the run.
                let _ = sender.send((table, result));
            })
            .with_context(|| format!("spawn cleaner for {table}"))?;
        handles.push(handle);
    }
    drop(sender);

    let deadline = Instant::now() + timeout;
    let mut cleaned = BTreeMap::new();
    while cleaned.len() < DIMENSION_CLEANERS.len() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match receiver.recv_timeout(remaining) {
            Ok((table, result)) => {
                let df = result.with_context(|| format!("clean {table}"))?;
                debug!(table = %table, rows = df.height(), "cleaner finished");
                cleaned.insert(table, df);
            }
            Err(RecvTimeoutError::Timeout) => {
                let pending: Vec<&str> = DIMENSION_CLEANERS
                    .iter()
                    .filter(|(table, _)| !cleaned.contains_key(table))
                    .map(|(table, _)| table.code())
                    .collect();
                bail!(
                    "dimension cleaning did not complete within {}s (pending: {})",
                    timeout.as_secs_f64(),
                    pending.join(", ")
                );
            }
            Err(RecvTimeoutError::Disconnected) => {
                bail!("a dimension cleaner exited without reporting its table");
            }
        }
    }

    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow!("dimension cleaner thread panicked"))?;
    }
    Ok(cleaned)
}

fn ensure_clean(report: &IntegrityReport) -> Result<()> {
    if report.is_clean() {
        return Ok(());
    }
    log_issues(report);
    bail!(
        "integrity check failed with {} violation(s) across {} check(s)",
        report.violation_count(),
        report.issues.len()
    )
}

fn log_issues(report: &IntegrityReport) {
    for issue in &report.issues {
        warn!(
            table = %issue.table,
            column = %issue.column,
            kind = ?issue.kind,
            count = issue.count,
            example = issue.example.as_deref().map(redact_value),
            "integrity violation"
        );
    }
}

fn summarize(raw: &BTreeMap<Table, DataFrame>, artifacts: &[OutputArtifact]) -> Vec<TableSummary> {
    artifacts
        .iter()
        .map(|artifact| TableSummary {
            table: artifact.table,
            input_rows: raw.get(&artifact.table).map_or(0, DataFrame::height),
            output_rows: artifact.rows,
            output_path: Some(artifact.path.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};
    use retail_model::schema::{customers, products, suppliers};

    fn raw_frame(columns: &[&str], rows: &[&[&str]]) -> DataFrame {
        DataFrame::new(
            columns
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let values: Vec<Option<String>> = rows
                        .iter()
                        .map(|row| (!row[idx].is_empty()).then(|| row[idx].to_string()))
                        .collect();
                    Series::new((*name).into(), values).into_column()
                })
                .collect(),
        )
        .unwrap()
    }

    fn raw_dimensions() -> BTreeMap<Table, DataFrame> {
        BTreeMap::from([
            (
                Table::Customers,
                raw_frame(&customers::ALL, &[&["1", "ana lopez", "34", "F", "lima"]]),
            ),
            (
                Table::Products,
                raw_frame(&products::ALL, &[&["1", "laptop", "tecnologia", "1200.5"]]),
            ),
            (
                Table::Suppliers,
                raw_frame(&suppliers::ALL, &[&["1", "acme", "ventas@acme.com", "quito"]]),
            ),
        ])
    }

    #[test]
    fn test_parallel_cleaning_matches_sequential() {
        let raw = raw_dimensions();
        let parallel = clean_dimensions_parallel(&raw, Duration::from_secs(30)).unwrap();
        let sequential = clean_dimensions_sequential(&raw).unwrap();
        assert_eq!(parallel.len(), 3);
        for (table, df) in &sequential {
            assert!(parallel[table].equals_missing(df), "{table}");
        }
    }

    #[test]
    fn test_missing_dimension_is_fatal() {
        let mut raw = raw_dimensions();
        raw.remove(&Table::Suppliers);
        let err = clean_dimensions_parallel(&raw, Duration::from_secs(30)).unwrap_err();
        assert!(err.to_string().contains("suppliers"));
    }

    #[test]
    fn test_unclean_report_is_fatal() {
        let report = IntegrityReport {
            issues: vec![retail_model::IntegrityIssue {
                table: Table::Sales,
                column: "cliente_id".to_string(),
                kind: retail_model::IntegrityIssueKind::DanglingReference,
                count: 2,
                example: None,
            }],
        };
        let err = ensure_clean(&report).unwrap_err();
        assert_eq!(
            err.to_string(),
            "integrity check failed with 2 violation(s) across 1 check(s)"
        );
        assert!(ensure_clean(&IntegrityReport::default()).is_ok());
    }

    #[test]
    fn test_default_options() {
        let options = PipelineOptions::default();
        assert_eq!(options.input_dir, PathBuf::from("data"));
        assert_eq!(options.id_width, 10);
        assert_eq!(options.stage_timeout, Duration::from_secs(30));
        assert!(options.parallel_cleaners);
    }
}
