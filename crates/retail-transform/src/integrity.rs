//! Referential-integrity verification over the finished star schema.
//!
//! The warehouse applies its constraints only after loading, so this check is
//! the last point at which a broken key can stop a run.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;
use retail_model::schema::shipments;
use retail_model::{IntegrityIssue, IntegrityIssueKind, IntegrityReport, ShipmentStatus, Table};
use tracing::debug;

use crate::error::Result;
use crate::frame::string_values;

/// Checks key uniqueness, foreign-key resolution and shipment statuses.
///
/// Keys are compared textually, so formatted and unformatted tables must not
/// be mixed.
pub fn check_integrity(tables: &BTreeMap<Table, DataFrame>) -> Result<IntegrityReport> {
    let mut report = IntegrityReport::default();
    let mut keys: BTreeMap<Table, BTreeSet<String>> = BTreeMap::new();

    for (&table, df) in tables {
        let pk = table.primary_key();
        if df.column(pk).is_err() {
            report.issues.push(missing_column(table, pk));
            continue;
        }
        let mut seen = BTreeSet::new();
        let mut duplicates = Vec::new();
        for value in string_values(df, table, pk)?.into_iter().flatten() {
            if !seen.insert(value.clone()) {
                duplicates.push(value);
            }
        }
        push_issue(&mut report, table, pk, IntegrityIssueKind::DuplicateKey, duplicates);
        keys.insert(table, seen);
    }

    let empty = BTreeSet::new();
    for (&table, df) in tables {
        for fk in table.foreign_keys() {
            if df.column(fk.column).is_err() {
                report.issues.push(missing_column(table, fk.column));
                continue;
            }
            let targets = keys.get(&fk.references).unwrap_or(&empty);
            let dangling: Vec<String> = string_values(df, table, fk.column)?
                .into_iter()
                .filter(|value| value.as_ref().is_none_or(|v| !targets.contains(v)))
                .map(Option::unwrap_or_default)
                .collect();
            push_issue(
                &mut report,
                table,
                fk.column,
                IntegrityIssueKind::DanglingReference,
                dangling,
            );
        }
    }

    if let Some(df) = tables.get(&Table::Shipments) {
        if df.column(shipments::STATUS).is_ok() {
            let invalid: Vec<String> = string_values(df, Table::Shipments, shipments::STATUS)?
                .into_iter()
                .filter(|value| {
                    value
                        .as_deref()
                        .is_none_or(|v| v.parse::<ShipmentStatus>().is_err())
                })
                .map(Option::unwrap_or_default)
                .collect();
            push_issue(
                &mut report,
                Table::Shipments,
                shipments::STATUS,
                IntegrityIssueKind::InvalidStatus,
                invalid,
            );
        } else {
            report.issues.push(missing_column(Table::Shipments, shipments::STATUS));
        }
    }

    debug!(
        tables = tables.len(),
        issues = report.issues.len(),
        "integrity check complete"
    );
    Ok(report)
}

fn missing_column(table: Table, column: &str) -> IntegrityIssue {
    IntegrityIssue {
        table,
        column: column.to_string(),
        kind: IntegrityIssueKind::MissingColumn,
        count: 1,
        example: None,
    }
}

fn push_issue(
    report: &mut IntegrityReport,
    table: Table,
    column: &str,
    kind: IntegrityIssueKind,
    offenders: Vec<String>,
) {
    if offenders.is_empty() {
        return;
    }
    report.issues.push(IntegrityIssue {
        table,
        column: column.to_string(),
        kind,
        count: offenders.len(),
        example: offenders.into_iter().next(),
    });
}
