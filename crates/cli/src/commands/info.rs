//! Usage guidance and model summary

use colored::Colorize;
use serde::Serialize;

use super::Session;
use crate::output::OutputFormat;

const NOT_PROVIDED: &str = "(not provided)";

const GUIDANCE: &[&str] = &[
    "Enter recent and accurate measurements (ideally taken the same day).",
    "Use the correct units shown beside each input.",
    "Avoid guessing; if a value is unknown, measure it first.",
    "This model is most reliable when inputs fall within typical physiological ranges.",
];

#[derive(Serialize)]
struct ModelInfo<'a> {
    model_type: &'a str,
    threshold: f64,
    rule: &'a str,
    features: &'a [String],
    classifier: &'a str,
    guidance: &'a [&'a str],
}

pub fn render_info(session: &Session) -> anyhow::Result<String> {
    let metadata = session.artifacts.metadata();
    let info = ModelInfo {
        model_type: metadata.model_type.as_deref().unwrap_or(NOT_PROVIDED),
        threshold: metadata.threshold,
        rule: metadata.rule.as_deref().unwrap_or(NOT_PROVIDED),
        features: &metadata.features,
        classifier: session.artifacts.classifier().kind(),
        guidance: GUIDANCE,
    };

    if session.format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&info)?);
    }

    let mut out = Vec::new();
    out.push(format!("{}", "Health Risk Predictor".bold()));
    out.push("Enter patient measurements to estimate high metabolic risk.".to_string());
    out.push(String::new());
    out.push(format!("{}", "How to get the most accurate result".bold()));
    out.push("=".repeat(50));
    out.extend(GUIDANCE.iter().map(|line| format!("- {}", line)));
    out.push(String::new());
    out.push(format!("{}", "Model info".bold()));
    out.push("=".repeat(50));
    out.push(format!("Model:              {}", info.model_type.cyan()));
    out.push(format!("Decision threshold: {}", info.threshold));
    out.push(format!("Target rule used:   {}", info.rule));
    out.push(format!("Features expected:  {}", info.features.join(", ")));
    out.push(format!("Classifier:         {}", info.classifier));
    Ok(out.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::constant_artifacts;
    use risk_lib::StructuredLogger;

    #[test]
    fn test_info_summary() {
        let artifacts = constant_artifacts(&["age", "hdl"], 0.0, 0.35);
        let session = Session::new(&artifacts, StructuredLogger::new("test"), OutputFormat::Table);
        let text = render_info(&session).unwrap();
        assert!(text.contains("Decision threshold: 0.35"));
        assert!(text.contains("Features expected:  age, hdl"));
        assert!(text.contains("diabetes if glyhb >= 7.0"));
    }

    #[test]
    fn test_info_json_marks_missing_fields() {
        let mut artifacts_meta = constant_artifacts(&["age"], 0.0, 0.5).metadata().clone();
        artifacts_meta.model_type = None;
        let artifacts = risk_lib::Artifacts::new(
            Box::new(risk_lib::predictor::LogisticClassifier::new(vec![0.0], 0.0, None).unwrap()),
            artifacts_meta,
        );
        let session = Session::new(&artifacts, StructuredLogger::new("test"), OutputFormat::Json);
        let json: serde_json::Value = serde_json::from_str(&render_info(&session).unwrap()).unwrap();
        assert_eq!(json["model_type"], NOT_PROVIDED);
        assert_eq!(json["classifier"], "logistic_regression");
    }
}
