//! Interactive form session
//!
//! Prompts for every field, shows the advisories and the prediction, then
//! offers another round. Values carry over between rounds so the operator
//! only re-enters what changed.

use anyhow::Result;
use std::io::{BufRead, Write};

use super::Session;
use crate::output::{format_bound, info, render_prediction, render_warnings, warning};
use risk_lib::form::FormField;

/// What the operator asked for after a prompt
enum Reply {
    Value(String),
    Eof,
}

fn read_reply<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<Reply> {
    write!(out, "{}", prompt)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Reply::Eof);
    }
    Ok(Reply::Value(line.trim().to_string()))
}

fn field_prompt(field: &FormField, current: f64) -> String {
    let spec = &field.spec;
    if spec.is_bounded() {
        format!(
            "{} [{}..{}, step {}] ({}): ",
            spec.label,
            format_bound(spec.min),
            format_bound(spec.max),
            spec.step,
            current
        )
    } else {
        format!("{} ({}): ", spec.label, current)
    }
}

/// Run the prompt loop until the operator declines another round or input
/// ends. Returns the number of predictions made.
pub fn run_interactive<R: BufRead, W: Write>(
    session: &Session,
    mut input: R,
    mut out: W,
    show_details: bool,
) -> Result<usize> {
    let mut state = session.form.initial_state();
    let mut predictions = 0;

    writeln!(out, "{}", info("Press Enter to keep the value shown in parentheses."))?;
    'rounds: loop {
        writeln!(out, "\nPatient Inputs")?;
        for field in session.form.fields() {
            loop {
                let current = state.get(&field.spec.feature).unwrap_or(field.spec.default);
                let reply = match read_reply(&mut input, &mut out, &field_prompt(field, current))? {
                    Reply::Eof => break 'rounds,
                    Reply::Value(reply) => reply,
                };
                if reply.is_empty() {
                    break;
                }
                let outcome = reply
                    .parse::<f64>()
                    .map_err(|_| format!("'{}' is not a number", reply))
                    .and_then(|value| state.set(&field.spec.feature, value).map_err(|e| e.to_string()));
                match outcome {
                    Ok(()) => break,
                    Err(message) => writeln!(out, "{}", warning(&message))?,
                }
            }
        }

        let warnings = session.check(&state);
        if let Some(block) = render_warnings(&warnings) {
            writeln!(out, "{}", block)?;
        }
        writeln!(out, "{}", "-".repeat(50))?;

        // A failed prediction ends only this round; the form stays usable
        match session.predict(&state) {
            Ok(result) => {
                predictions += 1;
                writeln!(out, "{}", render_prediction(&result, show_details))?;
            }
            Err(e) => writeln!(out, "{}", warning(&format!("Prediction failed: {}", e)))?,
        }

        match read_reply(&mut input, &mut out, "\nPredict again? [y/N]: ")? {
            Reply::Value(answer) if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") => {}
            _ => break,
        }
    }

    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::constant_artifacts;
    use crate::output::OutputFormat;
    use risk_lib::StructuredLogger;
    use std::io::Cursor;

    fn run(features: &[&str], intercept: f64, script: &str) -> (usize, String) {
        let artifacts = constant_artifacts(features, intercept, 0.5);
        let session = Session::new(&artifacts, StructuredLogger::new("test"), OutputFormat::Table);
        let mut out = Vec::new();
        let count = run_interactive(&session, Cursor::new(script.to_string()), &mut out, true).unwrap();
        (count, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_defaults_accepted_with_enter() {
        let (count, text) = run(&["age", "stab.glu"], 0.0, "\n\nn\n");
        assert_eq!(count, 1);
        assert!(text.contains("Age (years) [18..100, step 1] (45): "));
        assert!(text.contains("High risk predicted  (P = 50.0%)"));
    }

    #[test]
    fn test_invalid_entry_reprompts() {
        let (count, text) = run(&["age"], -2.0, "abc\n60\nn\n");
        assert_eq!(count, 1);
        assert!(text.contains("'abc' is not a number"));
        assert!(text.contains("Lower risk predicted"));
    }

    #[test]
    fn test_extreme_value_warned_but_predicted() {
        let (count, text) = run(&["stab.glu"], 0.0, "50\nn\n");
        assert_eq!(count, 1);
        assert!(text.contains("Glucose (mg/dL) is at an extreme value (50.0)"));
    }

    #[test]
    fn test_values_carry_over_between_rounds() {
        let (count, text) = run(&["age"], 0.0, "70\ny\n\nn\n");
        assert_eq!(count, 2);
        assert!(text.contains("Age (years) [18..100, step 1] (70): "));
    }

    #[test]
    fn test_eof_ends_session() {
        let (count, _) = run(&["age", "hdl"], 0.0, "50\n");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_unbounded_prompt() {
        let (_, text) = run(&["frame"], 0.0, "\nn\n");
        assert!(text.contains("frame (0): "));
    }
}
