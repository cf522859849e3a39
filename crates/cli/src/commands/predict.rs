//! One-shot prediction from command-line values

use anyhow::{Context, Result};

use super::{PredictionReport, Session};
use crate::output::{render_prediction, render_warnings, OutputFormat};

/// Parse a `feature=value` assignment
pub fn parse_assignment(raw: &str) -> Result<(String, f64), String> {
    let (feature, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FEATURE=VALUE, got '{}'", raw))?;
    let feature = feature.trim();
    if feature.is_empty() {
        return Err(format!("missing feature name in '{}'", raw));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    if !value.is_finite() {
        return Err(format!("'{}' is not a finite number", raw));
    }
    Ok((feature.to_string(), value))
}

/// Fill the form from defaults plus overrides, then predict
pub fn run_predict(session: &Session, values: &[(String, f64)], show_details: bool) -> Result<String> {
    let mut state = session.form.initial_state();
    for (feature, value) in values {
        state.set(feature, *value)?;
    }

    let warnings = session.check(&state);
    let prediction = session.predict(&state).context("Prediction failed")?;

    if session.format == OutputFormat::Json {
        let report = PredictionReport {
            warnings,
            prediction,
        };
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut sections = Vec::new();
    if let Some(block) = render_warnings(&warnings) {
        sections.push(block);
    }
    sections.push("-".repeat(50));
    sections.push(render_prediction(&prediction, show_details));
    Ok(sections.join("\n"))
}
