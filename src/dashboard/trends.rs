// src/dashboard/trends.rs
// Period-over-period arithmetic behind the dashboard cards

/// Percentage change from `previous` to `current`. Zero when there is
/// nothing to compare against.
pub fn trend_percent(current: f64, previous: Option<f64>) -> f64 {
    match previous {
        Some(prev) if prev != 0.0 => (current - prev) / prev * 100.0,
        _ => 0.0,
    }
}

/// Lower emissions improve the score: 100 at zero, 0 from 50 kg CO2e upward
pub fn impact_score(total_impact: f64) -> f64 {
    (100.0 - 2.0 * total_impact).clamp(0.0, 100.0)
}

pub fn per_capita(value: f64, employees: i32) -> f64 {
    value / f64::from(employees.max(1))
}

pub fn goal_met(value: f64, target: Option<f64>) -> Option<bool> {
    target.map(|t| value <= t)
}
