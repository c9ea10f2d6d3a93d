//! Column-name constants for the retail extracts and warehouse tables.
//!
//! The raw extracts and the warehouse share the source system's column names,
//! so these are the single source of truth for every stage.

// ── Customers ───────────────────────────────────────────────────────────────
pub mod customers {
    pub const ID: &str = "cliente_id";
    pub const NAME: &str = "nombre";
    pub const AGE: &str = "edad";
    pub const GENDER: &str = "genero";
    pub const LOCATION: &str = "ubicacion";

    pub const ALL: [&str; 5] = [ID, NAME, AGE, GENDER, LOCATION];
}

// ── Products ────────────────────────────────────────────────────────────────
pub mod products {
    pub const ID: &str = "producto_id";
    pub const NAME: &str = "nombre_producto";
    pub const CATEGORY: &str = "categoria";
    pub const BASE_PRICE: &str = "precio_base";

    pub const ALL: [&str; 4] = [ID, NAME, CATEGORY, BASE_PRICE];
}

// ── Suppliers ───────────────────────────────────────────────────────────────
pub mod suppliers {
    pub const ID: &str = "proveedor_id";
    pub const NAME: &str = "nombre_proveedor";
    pub const CONTACT: &str = "contacto";
    pub const LOCATION: &str = "ubicacion";

    pub const ALL: [&str; 4] = [ID, NAME, CONTACT, LOCATION];
}

// ── Time dimension ──────────────────────────────────────────────────────────
pub mod time {
    pub const ID: &str = "tiempo_id";
    pub const DATE: &str = "fecha";
    pub const TIME: &str = "hora";
    pub const YEAR: &str = "anio";
    pub const MONTH: &str = "mes";
    pub const DAY: &str = "dia";
    pub const DAY_NAME: &str = "dia_nombre";
    pub const MONTH_NAME: &str = "mes_nombre";

    pub const ALL: [&str; 8] = [ID, DATE, TIME, YEAR, MONTH, DAY, DAY_NAME, MONTH_NAME];
}

// ── Sales ───────────────────────────────────────────────────────────────────
pub mod sales {
    pub const ID: &str = "venta_id";
    pub const PRODUCT_ID: &str = "producto_id";
    pub const QUANTITY: &str = "cantidad";
    pub const UNIT_PRICE: &str = "precio_unitario";
    pub const CUSTOMER_ID: &str = "cliente_id";
    pub const BRANCH_ID: &str = "sucursal_id";
    pub const DATE: &str = "fecha";
    pub const TOTAL: &str = "total";
    pub const TIME_ID: &str = "tiempo_id";

    /// Columns expected in the raw extract.
    pub const RAW: [&str; 7] = [
        ID,
        PRODUCT_ID,
        QUANTITY,
        UNIT_PRICE,
        CUSTOMER_ID,
        BRANCH_ID,
        DATE,
    ];
    /// Columns of the reconciled table, in output order.
    pub const ALL: [&str; 8] = [
        ID,
        PRODUCT_ID,
        QUANTITY,
        UNIT_PRICE,
        CUSTOMER_ID,
        BRANCH_ID,
        TOTAL,
        TIME_ID,
    ];
}

// ── Shipments ───────────────────────────────────────────────────────────────
pub mod shipments {
    pub const ID: &str = "envio_id";
    pub const SALE_ID: &str = "venta_id";
    pub const SUPPLIER_ID: &str = "proveedor_id";
    pub const STATUS: &str = "estado_envio";
    pub const SHIP_DATE: &str = "fecha_envio";
    pub const TIME_ID: &str = "tiempo_id";

    pub const RAW: [&str; 5] = [ID, SALE_ID, SUPPLIER_ID, STATUS, SHIP_DATE];
    pub const ALL: [&str; 5] = [ID, SALE_ID, SUPPLIER_ID, STATUS, TIME_ID];
}
