//! Cost estimation for model invocations.
//!
//! Pure arithmetic over a profile's per-million-token rates. Used both for
//! pre-selection filtering (against `max_cost_per_query`) and for post-hoc
//! budget recording after an invocation completes.

use crate::registry::ModelProfile;

/// Assumed input size of a typical query, in tokens
pub const TYPICAL_INPUT_TOKENS: u64 = 2_000;

/// Assumed output size of a typical query, in tokens
pub const TYPICAL_OUTPUT_TOKENS: u64 = 500;

/// Expected USD cost of invoking `profile` with the given token counts.
///
/// Zero-cost (local) profiles return exactly `0.0`.
///
/// # Example
///
/// ```
/// use conclave_domain::cost::estimate;
/// use conclave_domain::registry::ModelProfile;
///
/// let profile = ModelProfile::new("cheap", "openai").with_cost(0.27, 1.10);
/// assert!((estimate(&profile, 2_000, 500) - 0.00109).abs() < 1e-12);
/// ```
pub fn estimate(profile: &ModelProfile, input_tokens: u64, output_tokens: u64) -> f64 {
    let input_cost = (input_tokens as f64 / 1_000_000.0) * profile.cost_per_million_input;
    let output_cost = (output_tokens as f64 / 1_000_000.0) * profile.cost_per_million_output;
    input_cost + output_cost
}

/// Expected cost of a typical query against `profile`
pub fn estimate_typical(profile: &ModelProfile) -> f64 {
    estimate(profile, TYPICAL_INPUT_TOKENS, TYPICAL_OUTPUT_TOKENS)
}

/// Project a monthly spend from a per-query cost and expected volume
pub fn project_monthly(cost_per_query: f64, queries_per_month: u64) -> f64 {
    cost_per_query * queries_per_month as f64
}
