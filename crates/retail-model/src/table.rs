//! Catalogue of the six star-schema tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::schema::{customers, products, sales, shipments, suppliers, time};

/// A table produced by the pipeline.
///
/// Variant order is load order: dimensions before the facts that reference
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Customers,
    Products,
    Suppliers,
    Time,
    Sales,
    Shipments,
}

/// A foreign key column and the table whose primary key it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references: Table,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Customers,
        Table::Products,
        Table::Suppliers,
        Table::Time,
        Table::Sales,
        Table::Shipments,
    ];

    /// Tables read from a raw extract, in extraction order.
    pub const RAW: [Table; 5] = [
        Table::Customers,
        Table::Products,
        Table::Suppliers,
        Table::Sales,
        Table::Shipments,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Table::Customers => "customers",
            Table::Products => "products",
            Table::Suppliers => "suppliers",
            Table::Time => "time",
            Table::Sales => "sales",
            Table::Shipments => "shipments",
        }
    }

    /// Short description for summaries.
    pub fn description(self) -> &'static str {
        match self {
            Table::Customers => "Customer dimension",
            Table::Products => "Product dimension",
            Table::Suppliers => "Supplier dimension",
            Table::Time => "Shared time dimension",
            Table::Sales => "Sales fact table",
            Table::Shipments => "Shipments fact table",
        }
    }

    /// File name of the raw extract, `None` for derived tables.
    pub fn raw_file_name(self) -> Option<&'static str> {
        match self {
            Table::Customers => Some("clientes.csv"),
            Table::Products => Some("productos.csv"),
            Table::Suppliers => Some("proveedores.csv"),
            Table::Time => None,
            Table::Sales => Some("ventas.csv"),
            Table::Shipments => Some("logistica.csv"),
        }
    }

    pub fn output_file_name(self) -> &'static str {
        match self {
            Table::Customers => "clientes_cleaned.csv",
            Table::Products => "productos_cleaned.csv",
            Table::Suppliers => "proveedores_cleaned.csv",
            Table::Time => "dim_tiempo.csv",
            Table::Sales => "ventas_cleaned.csv",
            Table::Shipments => "logistica_cleaned.csv",
        }
    }

    /// Name of the pre-existing warehouse table the output is appended to.
    pub fn warehouse_table(self) -> &'static str {
        match self {
            Table::Customers => "clientes",
            Table::Products => "productos",
            Table::Suppliers => "proveedores",
            Table::Time => "tiempo",
            Table::Sales => "ventas",
            Table::Shipments => "envios",
        }
    }

    /// Columns required in the raw extract.
    pub fn raw_columns(self) -> &'static [&'static str] {
        match self {
            Table::Customers => &customers::ALL,
            Table::Products => &products::ALL,
            Table::Suppliers => &suppliers::ALL,
            Table::Time => &[],
            Table::Sales => &sales::RAW,
            Table::Shipments => &shipments::RAW,
        }
    }

    /// Columns of the cleaned table, in output order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Customers => &customers::ALL,
            Table::Products => &products::ALL,
            Table::Suppliers => &suppliers::ALL,
            Table::Time => &time::ALL,
            Table::Sales => &sales::ALL,
            Table::Shipments => &shipments::ALL,
        }
    }

    pub fn primary_key(self) -> &'static str {
        match self {
            Table::Customers => customers::ID,
            Table::Products => products::ID,
            Table::Suppliers => suppliers::ID,
            Table::Time => time::ID,
            Table::Sales => sales::ID,
            Table::Shipments => shipments::ID,
        }
    }

    pub fn foreign_keys(self) -> &'static [ForeignKey] {
        const SALES_FKS: [ForeignKey; 3] = [
            ForeignKey {
                column: sales::PRODUCT_ID,
                references: Table::Products,
            },
            ForeignKey {
                column: sales::CUSTOMER_ID,
                references: Table::Customers,
            },
            ForeignKey {
                column: sales::TIME_ID,
                references: Table::Time,
            },
        ];
        const SHIPMENT_FKS: [ForeignKey; 3] = [
            ForeignKey {
                column: shipments::SALE_ID,
                references: Table::Sales,
            },
            ForeignKey {
                column: shipments::SUPPLIER_ID,
                references: Table::Suppliers,
            },
            ForeignKey {
                column: shipments::TIME_ID,
                references: Table::Time,
            },
        ];
        match self {
            Table::Sales => &SALES_FKS,
            Table::Shipments => &SHIPMENT_FKS,
            _ => &[],
        }
    }

    /// Every identifier column (primary key first, then foreign keys).
    pub fn id_columns(self) -> Vec<&'static str> {
        let mut columns = vec![self.primary_key()];
        columns.extend(self.foreign_keys().iter().map(|fk| fk.column));
        columns
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Table {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|table| {
                table.code().eq_ignore_ascii_case(s) || table.warehouse_table().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| ModelError::UnknownTable(s.to_string()))
    }
}
