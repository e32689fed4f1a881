use crate::error::EngagementError;
use crate::formulas::{calculate_erf, calculate_err};
use crate::smart::SMALL_ACCOUNT_MAX_FOLLOWERS;
use crate::types::{EngagementInput, MethodComparison};

/// Compute ERF, and ERR when reach is known, with a sentence comparing them.
///
/// Both rates are reported unclamped.
pub fn compare_methods(input: &EngagementInput) -> Result<MethodComparison, EngagementError> {
    let erf = calculate_erf(input)?;
    let err = match input.reach {
        Some(reach) if reach > 0 => Some(calculate_err(input)?),
        _ => None,
    };

    let followers = input.followers;
    let comparison = match (followers <= SMALL_ACCOUNT_MAX_FOLLOWERS, err) {
        (true, Some(err)) => format!(
            "Small account ({followers} followers): reach-based rate {err:.2}% is more \
             representative than follower-based rate {erf:.2}%"
        ),
        (true, None) => format!(
            "Small account ({followers} followers): follower-based rate {erf:.2}% may be \
             unreliable; reach data is unavailable"
        ),
        (false, Some(err)) => format!(
            "Follower-based rate {erf:.2}% is the standard for accounts with {followers} \
             followers; reach-based rate is {err:.2}%"
        ),
        (false, None) => format!(
            "Follower-based rate {erf:.2}% for {followers} followers; reach data is unavailable"
        ),
    };

    Ok(MethodComparison {
        erf,
        err,
        comparison,
    })
}
