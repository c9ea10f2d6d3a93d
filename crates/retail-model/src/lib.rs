pub mod enums;
pub mod error;
pub mod processing;
pub mod schema;
pub mod table;

pub use enums::{Gender, ShipmentStatus};
pub use error::{ModelError, Result};
pub use processing::{IntegrityIssue, IntegrityIssueKind, IntegrityReport, TableSummary};
pub use table::{ForeignKey, Table};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_codes_map_case_insensitively() {
        assert_eq!(Gender::from_code(Some("m")), Gender::Masculino);
        assert_eq!(Gender::from_code(Some("f")), Gender::Femenino);
        assert_eq!(Gender::from_code(Some("X")), Gender::Otro);
        assert_eq!(Gender::from_code(Some(" M")), Gender::Otro);
        assert_eq!(Gender::from_code(None), Gender::Otro);
    }

    #[test]
    fn shipment_status_is_exact() {
        assert_eq!(
            "En tránsito".parse::<ShipmentStatus>().ok(),
            Some(ShipmentStatus::EnTransito)
        );
        assert!("entregado".parse::<ShipmentStatus>().is_err());
        assert!("Perdido".parse::<ShipmentStatus>().is_err());
    }

    #[test]
    fn table_catalogue_is_consistent() {
        for table in Table::ALL {
            let columns = table.columns();
            for id in table.id_columns() {
                assert!(columns.contains(&id), "{table} lacks {id}");
            }
            assert_eq!(table.code().parse::<Table>().ok(), Some(table));
        }
        assert_eq!(
            Table::Sales.id_columns(),
            vec!["venta_id", "producto_id", "cliente_id", "tiempo_id"]
        );
        assert_eq!("envios".parse::<Table>().ok(), Some(Table::Shipments));
    }

    #[test]
    fn summary_serializes() {
        let summary = TableSummary {
            table: Table::Sales,
            input_rows: 10,
            output_rows: 7,
            output_path: None,
        };
        assert_eq!(summary.dropped(), 3);
        let json = serde_json::to_string(&summary).expect("serialize summary");
        let round: TableSummary = serde_json::from_str(&json).expect("deserialize summary");
        assert_eq!(round, summary);
    }

    #[test]
    fn integrity_report_counts() {
        let report = IntegrityReport {
            issues: vec![IntegrityIssue {
                table: Table::Sales,
                column: "producto_id".to_string(),
                kind: IntegrityIssueKind::DanglingReference,
                count: 2,
                example: Some("0000000042".to_string()),
            }],
        };
        assert!(!report.is_clean());
        assert_eq!(report.violation_count(), 2);
    }
}
