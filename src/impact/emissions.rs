// src/impact/emissions.rs
// CO2-equivalent arithmetic for a month of reported values

use std::collections::{HashMap, HashSet};

use crate::error::{AppError, AppResult};

use super::models::ImpactValueInput;

pub const INVALID_METRICS: &str = "Some metrics are invalid or inactive.";

/// A reported amount with its derived equivalent
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub metric_id: String,
    pub amount: f64,
    pub co2_equivalent: f64,
}

pub fn co2_equivalent(amount: f64, emission_factor: f64) -> f64 {
    amount * emission_factor
}

/// Convert reported values using the emission factors of the metrics the
/// company may report. Returns the per-value emissions and their total.
pub fn calculate(values: &[ImpactValueInput], factors: &HashMap<String, f64>) -> AppResult<(Vec<Emission>, f64)> {
    if values.is_empty() {
        return Err(AppError::invalid_input("At least one value is required"));
    }

    let mut seen = HashSet::new();
    let mut emissions = Vec::with_capacity(values.len());
    let mut total = 0.0;

    for value in values {
        if !value.amount.is_finite() || value.amount < 0.0 {
            return Err(AppError::invalid_input("Amounts must be non-negative numbers"));
        }

        let factor = match factors.get(&value.metric_id) {
            Some(factor) if seen.insert(value.metric_id.as_str()) => *factor,
            _ => return Err(AppError::conflict(INVALID_METRICS)),
        };

        let co2 = co2_equivalent(value.amount, factor);
        total += co2;
        emissions.push(Emission {
            metric_id: value.metric_id.clone(),
            amount: value.amount,
            co2_equivalent: co2,
        });
    }

    Ok((emissions, total))
}
