//! Input form model
//!
//! Resolves each declared feature into a form field using the static
//! catalog of labels, ranges and defaults, keeps the operator's current
//! values, and reports extreme-value advisories. Advisories never block a
//! prediction and entered values are never clamped; only defaults are.

use crate::error::FormError;
use crate::models::{FieldSpec, InputVector};
use serde::Serialize;
use std::fmt;

/// Numeric bounds and increment for a feature input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Static description of a known feature. Every attribute falls back
/// independently when absent.
#[derive(Debug, Clone, Copy)]
pub struct FeatureDescriptor {
    pub id: &'static str,
    pub label: Option<&'static str>,
    pub range: Option<FieldRange>,
    pub default: Option<f64>,
}

const fn known(id: &'static str, label: &'static str, min: f64, max: f64, step: f64, default: f64) -> FeatureDescriptor {
    FeatureDescriptor {
        id,
        label: Some(label),
        range: Some(FieldRange { min, max, step }),
        default: Some(default),
    }
}

/// Diabetes screening measurements the bundled model was trained on
pub const BUILTIN_FEATURES: &[FeatureDescriptor] = &[
    known("age", "Age (years)", 18.0, 100.0, 1.0, 45.0),
    known("stab.glu", "Glucose (mg/dL)", 50.0, 450.0, 1.0, 95.0),
    known("chol", "Total Cholesterol (mg/dL)", 75.0, 450.0, 1.0, 200.0),
    known("hdl", "HDL Cholesterol (mg/dL)", 10.0, 130.0, 1.0, 50.0),
    known("bp.1s", "Systolic BP (mmHg)", 80.0, 260.0, 1.0, 130.0),
    known("bp.1d", "Diastolic BP (mmHg)", 40.0, 160.0, 1.0, 80.0),
    known("weight", "Weight (lb)", 70.0, 400.0, 1.0, 175.0),
    known("waist", "Waist (inches)", 20.0, 70.0, 0.5, 38.0),
    known("hip", "Hip (inches)", 25.0, 80.0, 0.5, 43.0),
];

/// Step used for unbounded fields
pub const DEFAULT_STEP: f64 = 1.0;

/// Typed lookup over feature descriptors with resolve-with-fallback
#[derive(Debug, Clone, Copy)]
pub struct FeatureCatalog {
    entries: &'static [FeatureDescriptor],
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FeatureCatalog {
    pub fn builtin() -> Self {
        Self::new(BUILTIN_FEATURES)
    }

    pub fn new(entries: &'static [FeatureDescriptor]) -> Self {
        Self { entries }
    }

    fn lookup(&self, feature: &str) -> Option<&FeatureDescriptor> {
        self.entries.iter().find(|d| d.id == feature)
    }

    pub fn resolve_field(&self, feature: &str) -> FieldSpec {
        let descriptor = self.lookup(feature);
        let label = descriptor
            .and_then(|d| d.label)
            .unwrap_or(feature)
            .to_string();
        let range = descriptor.and_then(|d| d.range);
        let default = descriptor.and_then(|d| d.default).unwrap_or(0.0);

        match range {
            Some(r) => FieldSpec {
                feature: feature.to_string(),
                label,
                min: Some(r.min),
                max: Some(r.max),
                step: r.step,
                default: default.max(r.min).min(r.max),
            },
            None => FieldSpec {
                feature: feature.to_string(),
                label,
                min: None,
                max: None,
                step: DEFAULT_STEP,
                default,
            },
        }
    }
}

/// Resolve a field against the built-in catalog
pub fn resolve_field(feature: &str) -> FieldSpec {
    FeatureCatalog::builtin().resolve_field(feature)
}

/// Visual column a field is placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Left,
    Right,
}

impl Column {
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Column::Left
        } else {
            Column::Right
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Left => write!(f, "left"),
            Column::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub spec: FieldSpec,
    pub column: Column,
}

/// Fields for every feature the model declares, in declaration order
#[derive(Debug, Clone)]
pub struct FormModel {
    fields: Vec<FormField>,
}

impl FormModel {
    pub fn build(features: &[String], catalog: &FeatureCatalog) -> Self {
        let fields = features
            .iter()
            .enumerate()
            .map(|(i, feature)| FormField {
                spec: catalog.resolve_field(feature),
                column: Column::for_index(i),
            })
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, feature: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.spec.feature == feature)
    }

    /// Form state populated with every field's default
    pub fn initial_state(&self) -> FormState {
        FormState {
            values: self
                .fields
                .iter()
                .map(|f| (f.spec.feature.clone(), f.spec.default))
                .collect(),
        }
    }

    /// Extreme-value advisories for the current values, in form order
    pub fn check_extremes(&self, state: &FormState) -> Vec<ExtremeValueWarning> {
        self.fields
            .iter()
            .filter_map(|field| {
                let value = state.get(&field.spec.feature)?;
                field.spec.is_extreme(value).then(|| ExtremeValueWarning {
                    feature: field.spec.feature.clone(),
                    label: field.spec.label.clone(),
                    value,
                })
            })
            .collect()
    }
}

/// Current operator values, one per form field
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    values: Vec<(String, f64)>,
}

impl FormState {
    pub fn get(&self, feature: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(f, _)| f == feature)
            .map(|(_, v)| *v)
    }

    /// Set a value. Out-of-range values are accepted as entered.
    pub fn set(&mut self, feature: &str, value: f64) -> Result<(), FormError> {
        if !value.is_finite() {
            return Err(FormError::NonFiniteValue {
                feature: feature.to_string(),
            });
        }
        match self.values.iter_mut().find(|(f, _)| f == feature) {
            Some((_, slot)) => {
                *slot = value;
                Ok(())
            }
            None => Err(FormError::UnknownFeature {
                feature: feature.to_string(),
                expected: self
                    .values
                    .iter()
                    .map(|(f, _)| f.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(f, v)| (f.as_str(), *v))
    }

    pub fn input_vector(&self) -> InputVector {
        self.values.iter().map(|(f, v)| (f.clone(), *v)).collect()
    }
}

/// Advisory raised for a value sitting on or beyond its range bounds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeValueWarning {
    pub feature: String,
    pub label: String,
    pub value: f64,
}

impl fmt::Display for ExtremeValueWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is at an extreme value ({:?}). Double-check units/measurement.",
            self.label, self.value
        )
    }
}
