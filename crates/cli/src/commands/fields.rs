//! Form field listing

use serde::Serialize;
use tabled::Tabled;

use super::Session;
use crate::output::{format_bound, render_table, OutputFormat};
use risk_lib::form::Column;

/// Row for the fields table
#[derive(Tabled, Serialize)]
struct FieldRow {
    #[tabled(rename = "Column")]
    column: Column,
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Min")]
    #[serde(skip)]
    min_display: String,
    #[tabled(rename = "Max")]
    #[serde(skip)]
    max_display: String,
    #[tabled(skip)]
    min: Option<f64>,
    #[tabled(skip)]
    max: Option<f64>,
    #[tabled(rename = "Step")]
    step: f64,
    #[tabled(rename = "Default")]
    default: f64,
}

/// Render the input form: one row per feature in model order
pub fn render_fields(session: &Session) -> String {
    let rows: Vec<FieldRow> = session
        .form
        .fields()
        .iter()
        .map(|field| FieldRow {
            column: field.column,
            feature: field.spec.feature.clone(),
            label: field.spec.label.clone(),
            min_display: format_bound(field.spec.min),
            max_display: format_bound(field.spec.max),
            min: field.spec.min,
            max: field.spec.max,
            step: field.spec.step,
            default: field.spec.default,
        })
        .collect();

    let table = render_table(&rows, session.format);
    match session.format {
        OutputFormat::Json => table,
        OutputFormat::Table => format!("Patient Inputs\n{}", table),
    }
}
