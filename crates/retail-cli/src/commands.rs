use std::time::Duration;

use anyhow::Result;
use comfy_table::Table as DisplayTable;
use retail_model::{IntegrityReport, Table};

use retail_cli::pipeline::{PipelineOptions, RunResult, run_pipeline, verify_outputs};

use crate::cli::{RunArgs, VerifyArgs};
use crate::summary::{apply_table_style, header_cell, table_cell};

pub fn run_tables() -> Result<()> {
    let mut table = DisplayTable::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Description"),
        header_cell("Raw extract"),
        header_cell("Output file"),
        header_cell("Primary key"),
    ]);
    apply_table_style(&mut table);
    for entry in Table::ALL {
        table.add_row(vec![
            table_cell(entry.warehouse_table()),
            entry.description().into(),
            entry.raw_file_name().unwrap_or("-").into(),
            entry.output_file_name().into(),
            entry.primary_key().into(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_etl(args: &RunArgs) -> Result<RunResult> {
    run_pipeline(&pipeline_options(args))
}

pub fn run_verify(args: &VerifyArgs) -> Result<IntegrityReport> {
    verify_outputs(&args.output_dir)
}

fn pipeline_options(args: &RunArgs) -> PipelineOptions {
    PipelineOptions {
        input_dir: args.input_dir.clone(),
        output_dir: args.output_dir.clone(),
        id_width: args.id_width,
        stage_timeout: Duration::from_secs(args.stage_timeout),
        parallel_cleaners: !args.sequential,
        constraints_dir: args.constraints_dir.clone(),
        write_manifest: args.manifest,
    }
}
