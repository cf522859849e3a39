//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use risk_lib::predictor::{format_percent, format_probability};
use risk_lib::{ExtremeValueWarning, PredictionResult, RiskLabel};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Render a list of items as a table or JSON array
pub fn render_table<T: Tabled + Serialize>(items: &[T], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                return "No items found".yellow().to_string();
            }
            Table::new(items).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(&items).unwrap_or_default(),
    }
}

/// Format a warning message
pub fn warning(message: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), message)
}

/// Format an info message
pub fn info(message: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), message)
}

/// Format an optional bound, `-` when the field is unbounded
pub fn format_bound(bound: Option<f64>) -> String {
    bound.map(|b| b.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Advisory block listing every extreme value
pub fn render_warnings(warnings: &[ExtremeValueWarning]) -> Option<String> {
    if warnings.is_empty() {
        return None;
    }
    let lines: Vec<String> = warnings.iter().map(|w| format!("- {}", w)).collect();
    Some(warning(&format!("Input check:\n{}", lines.join("\n"))))
}

/// Verdict, suggested action, and optionally the raw probability detail
pub fn render_prediction(result: &PredictionResult, show_details: bool) -> String {
    let headline = format!("{}  (P = {})", result.message, format_percent(result.probability));
    let headline = match result.label {
        RiskLabel::High => headline.red().bold().to_string(),
        RiskLabel::Lower => headline.green().bold().to_string(),
    };

    let mut lines = vec![
        headline,
        format!("Suggested action: {}", result.suggested_action),
    ];
    if show_details {
        lines.push(format!(
            "{} {}",
            "Probability (risk=1):".bold(),
            format_probability(result.probability)
        ));
        lines.push(format!("{} {}", "Threshold used:".bold(), result.threshold));
        lines.push(format!("Generated at: {}", format_timestamp(result.generated_at)));
    }
    lines.join("\n")
}

/// Format a unix timestamp for display
pub fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(probability: f64, label: RiskLabel) -> PredictionResult {
        PredictionResult {
            probability,
            label,
            message: "High risk predicted".to_string(),
            suggested_action: "see a doctor".to_string(),
            threshold: 0.5,
            generated_at: 0,
        }
    }

    #[test]
    fn test_render_prediction_with_details() {
        let text = render_prediction(&result(0.72, RiskLabel::High), true);
        assert!(text.contains("High risk predicted  (P = 72.0%)"));
        assert!(text.contains("Suggested action: see a doctor"));
        assert!(text.contains("0.7200"));
        assert!(text.contains("0.5"));
        assert!(text.contains("1970-01-01 00:00:00 UTC"));
    }

    #[test]
    fn test_render_prediction_without_details() {
        let text = render_prediction(&result(0.72, RiskLabel::High), false);
        assert!(!text.contains("0.7200"));
        assert!(!text.contains("Threshold used"));
    }

    #[test]
    fn test_no_warnings_renders_nothing() {
        assert!(render_warnings(&[]).is_none());
    }

    #[test]
    fn test_format_bound() {
        assert_eq!(format_bound(Some(50.0)), "50");
        assert_eq!(format_bound(Some(0.5)), "0.5");
        assert_eq!(format_bound(None), "-");
    }
}
