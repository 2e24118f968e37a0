//! Exertion estimation: RPE from a set at a known 1RM, and 1RM from a set.
//!
//! The RPE estimate is a coarse lookup over 5%-wide intensity buckets; the
//! 1RM estimate uses the Brzycki formula. Both refuse to compute on invalid
//! input instead of producing a number.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

/// Brzycki's denominator reaches zero at 37 reps; anything at or past this is refused.
pub const BRZYCKI_REP_LIMIT: u32 = 37;

/// RPE by reps (index = reps - 1), keyed by percentage of 1RM.
static RPE_TABLE: Lazy<BTreeMap<u32, Vec<f64>>> = Lazy::new(|| {
    BTreeMap::from([
        (70, vec![6.5, 7.0, 7.5, 8.0, 8.5, 9.0, 9.5, 10.0]),
        (75, vec![7.0, 7.5, 8.0, 8.5, 9.0, 9.5, 10.0]),
        (80, vec![7.5, 8.0, 8.5, 9.0, 9.5, 10.0]),
        (85, vec![8.0, 8.5, 9.0, 9.5, 10.0]),
        (90, vec![8.5, 9.0, 9.5, 10.0]),
        (95, vec![9.5, 10.0]),
        (100, vec![10.0]),
    ])
});

/// Result of an RPE lookup
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RpeEstimate {
    pub rpe: f64,
    /// Load as a percentage of the 1RM, before bucketing
    pub percentage: f64,
    /// The table bucket the percentage was snapped to
    pub bucket: u32,
}

/// Estimate the RPE of a set of `reps` at `weight` given a 1RM.
///
/// Returns `None` unless weight and 1RM are positive and finite and reps >= 1.
pub fn estimate_rpe(weight: f64, reps: u32, one_rep_max: f64) -> Option<f64> {
    rpe_estimate(weight, reps, one_rep_max).map(|estimate| estimate.rpe)
}

/// Like [`estimate_rpe`], but also reports the intensity and chosen bucket.
///
/// Equidistant buckets resolve to the lower percentage.
pub fn rpe_estimate(weight: f64, reps: u32, one_rep_max: f64) -> Option<RpeEstimate> {
    if !is_positive(weight) || !is_positive(one_rep_max) || reps == 0 {
        return None;
    }

    let percentage = weight / one_rep_max * 100.0;

    let mut nearest: Option<(u32, &[f64])> = None;
    for (&bucket, row) in RPE_TABLE.iter() {
        let closer = match nearest {
            None => true,
            Some((best, _)) => {
                (f64::from(bucket) - percentage).abs() < (f64::from(best) - percentage).abs()
            }
        };
        if closer {
            nearest = Some((bucket, row.as_slice()));
        }
    }

    let (bucket, row) = nearest?;
    let index = (reps as usize - 1).min(row.len() - 1);

    tracing::debug!(percentage, bucket, reps, "RPE lookup");

    Some(RpeEstimate {
        rpe: row[index],
        percentage,
        bucket,
    })
}

/// Estimate a one-rep max from a set using the Brzycki formula, rounded to a whole unit.
///
/// Returns `None` for non-positive weight, zero reps, or reps at or beyond
/// [`BRZYCKI_REP_LIMIT`] where the formula's denominator is no longer positive.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> Option<f64> {
    if !is_positive(weight) || reps == 0 || reps >= BRZYCKI_REP_LIMIT {
        return None;
    }

    let denominator = 1.0278 - 0.0278 * f64::from(reps);
    Some((weight / denominator).round())
}

/// Plain-language meaning of an RPE value, in terms of reps left in reserve.
pub fn describe_rpe(rpe: f64) -> &'static str {
    if rpe >= 10.0 {
        "Maximal effort, no reps left"
    } else if rpe >= 9.0 {
        "Very hard, one more rep possible"
    } else if rpe >= 8.0 {
        "Hard, two more reps possible"
    } else if rpe >= 7.0 {
        "Moderate, three more reps possible"
    } else {
        "Easy, four or more reps possible"
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
