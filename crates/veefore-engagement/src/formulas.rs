//! Base engagement-rate formulas. All results are percentages rounded to two decimals.

use crate::error::EngagementError;
use crate::types::{EngagementInput, PostEngagement};

/// Round a percentage to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn percentage(numerator: i64, denominator: i64) -> f64 {
    numerator as f64 / denominator as f64 * 100.0
}

/// Unrounded ERF; zero followers yields exactly 0.
pub(crate) fn raw_erf(total: i64, followers: i64) -> f64 {
    if followers == 0 {
        return 0.0;
    }
    percentage(total, followers)
}

/// ERF: `(likes + comments + shares + saves) / followers * 100`.
///
/// Zero followers is defined as a rate of 0, not a division error.
pub fn calculate_erf(input: &EngagementInput) -> Result<f64, EngagementError> {
    let followers = input.checked_followers()?;
    let total = input.total_engagements()?;
    Ok(round2(raw_erf(total, followers)))
}

/// AER: `sum(post engagements) / (post count * followers) * 100`.
pub fn calculate_aer(posts: &[PostEngagement], followers: i64) -> Result<f64, EngagementError> {
    if posts.is_empty() {
        return Err(EngagementError::InvalidInput(
            "at least one post is required".to_string(),
        ));
    }
    if followers < 0 {
        return Err(EngagementError::InvalidInput(format!(
            "followers must be non-negative, got {followers}"
        )));
    }

    let total = posts.iter().try_fold(0i64, |acc, post| {
        acc.checked_add(post.total()?)
            .ok_or_else(|| EngagementError::InvalidInput("engagement total overflows".to_string()))
    })?;
    if followers == 0 {
        return Ok(0.0);
    }

    let denominator = (posts.len() as f64) * (followers as f64);
    Ok(round2(total as f64 / denominator * 100.0))
}

/// ERR: `(likes + comments + shares + saves) / reach * 100`.
///
/// Reach is a precondition here: missing or non-positive reach is an error.
pub fn calculate_err(input: &EngagementInput) -> Result<f64, EngagementError> {
    let reach = match input.reach {
        Some(reach) if reach > 0 => reach,
        Some(reach) => {
            return Err(EngagementError::InvalidInput(format!(
                "reach must be positive, got {reach}"
            )))
        }
        None => {
            return Err(EngagementError::InvalidInput(
                "reach is required for ERR".to_string(),
            ))
        }
    };
    let total = input.total_engagements()?;
    Ok(round2(percentage(total, reach)))
}
