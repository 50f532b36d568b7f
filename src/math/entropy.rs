//! Shannon entropy of weighted tile domains

/// `w * ln(w)`, taken as 0 for non-positive weights
pub fn weight_log_weight(weight: f64) -> f64 {
    if weight > 0.0 {
        weight * weight.ln()
    } else {
        0.0
    }
}

/// Entropy from the running sums `Σw` and `Σ w ln w`
///
/// Equal to `ln(Σw) - Σ(w ln w) / Σw`, or 0 once the domain has no weight left.
pub fn entropy_from_sums(weight_sum: f64, weight_log_weight_sum: f64) -> f64 {
    if weight_sum > 0.0 {
        weight_sum.ln() - weight_log_weight_sum / weight_sum
    } else {
        0.0
    }
}

/// Entropy of a set of weights, computed directly
pub fn entropy_of(weights: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, sum_log) = weights
        .into_iter()
        .fold((0.0, 0.0), |(sum, sum_log), weight| {
            (sum + weight, sum_log + weight_log_weight(weight))
        });
    entropy_from_sums(sum, sum_log)
}
