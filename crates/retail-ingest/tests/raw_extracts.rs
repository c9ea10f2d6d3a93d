use std::fs;

use retail_ingest::{discover_raw_inputs, read_raw_table};
use retail_model::Table;
use tempfile::TempDir;

fn write_extracts(dir: &TempDir) {
    fs::write(
        dir.path().join("clientes.csv"),
        "cliente_id,nombre,edad,genero,ubicacion\n1,ana lopez,34,F,lima\n2,,,,\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("productos.csv"),
        "producto_id,nombre_producto,categoria,precio_base\n1,Laptop,Tecnologia,1200.5\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("proveedores.csv"),
        "proveedor_id,nombre_proveedor,contacto,ubicacion\n1,Acme,ventas@acme.com,Quito\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("ventas.csv"),
        "venta_id,producto_id,cantidad,precio_unitario,cliente_id,sucursal_id,fecha\n\
         1,1,2,1200.5,1,3,2023-01-05 10:15:42\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("logistica.csv"),
        "envio_id,venta_id,proveedor_id,estado_envio,fecha_envio\n1,1,1,Entregado,2023-01-06\n",
    )
    .unwrap();
}

#[test]
fn discovers_and_reads_every_extract() {
    let dir = TempDir::new().unwrap();
    write_extracts(&dir);

    let inputs = discover_raw_inputs(dir.path()).unwrap();
    for table in Table::RAW {
        let path = inputs.path(table).unwrap();
        let df = read_raw_table(path, table).unwrap();
        assert!(df.height() >= 1, "{table} should have rows");
    }
}

#[test]
fn raw_values_stay_as_text() {
    let dir = TempDir::new().unwrap();
    write_extracts(&dir);

    let df = read_raw_table(&dir.path().join("clientes.csv"), Table::Customers).unwrap();
    assert_eq!(df.height(), 2);
    let edad = df.column("edad").unwrap().str().unwrap();
    assert_eq!(edad.get(0), Some("34"));
    assert_eq!(edad.get(1), None);

    let ventas = read_raw_table(&dir.path().join("ventas.csv"), Table::Sales).unwrap();
    let precio = ventas.column("precio_unitario").unwrap().str().unwrap();
    assert_eq!(precio.get(0), Some("1200.5"));
}
