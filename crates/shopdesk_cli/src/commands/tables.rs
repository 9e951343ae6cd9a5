//! Tables command implementation.

use super::{CliResult, Context};
use serde::Serialize;
use shopdesk_client::Resource;

/// One known endpoint.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    /// Endpoint path.
    pub path: &'static str,
    /// Backing table.
    pub table: &'static str,
}

/// One table loaded in the primary store.
#[derive(Debug, Serialize)]
pub struct TableInfo {
    /// Table name.
    pub name: String,
    /// Number of rows.
    pub rows: usize,
}

/// Tables command result.
#[derive(Debug, Serialize)]
pub struct TablesResult {
    /// Endpoint to table mapping.
    pub endpoints: Vec<EndpointInfo>,
    /// Loaded tables.
    pub tables: Vec<TableInfo>,
}

/// Collects the endpoint map and the loaded tables.
pub fn collect(context: &Context) -> TablesResult {
    let endpoints = Resource::ALL
        .iter()
        .map(|resource| EndpointInfo {
            path: resource.path(),
            table: resource.table(),
        })
        .collect();
    let store = context.store();
    let tables = store
        .table_names()
        .into_iter()
        .map(|name| TableInfo {
            rows: store.row_count(&name),
            name,
        })
        .collect();
    TablesResult { endpoints, tables }
}

/// Runs the tables command.
pub fn run(context: &Context) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&collect(context))?);
    Ok(())
}
