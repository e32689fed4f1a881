//! Method selection between ERF and ERR.
//!
//! Follower-based rates are meaningless for tiny accounts (one engaged
//! non-follower can push them past 100%), so accounts with at most 100
//! followers use reach when the reach figure is trustworthy. Reach is
//! distrusted when engagement exceeds twice the reported reach, which
//! typically means reach has not been synced yet.

use crate::error::EngagementError;
use crate::formulas::{percentage, raw_erf, round2};
use crate::types::{EngagementInput, EngagementMethod, EngagementResult, PostHistory};

/// Accounts at or below this follower count prefer reach-based rates.
pub const SMALL_ACCOUNT_MAX_FOLLOWERS: i64 = 100;

/// Engagement above `reach * SUSPICIOUS_REACH_FACTOR` marks reach as unreliable.
pub const SUSPICIOUS_REACH_FACTOR: i64 = 2;

/// Displayed rates never exceed this.
pub const MAX_RATE: f64 = 100.0;

/// Share of average per-post engagement attributed to likes in last-N mode.
pub const LAST_N_LIKES_SHARE: f64 = 0.7;

/// Share of average per-post engagement attributed to comments in last-N mode.
pub const LAST_N_COMMENTS_SHARE: f64 = 0.3;

fn is_suspicious_reach(total: i64, reach: Option<i64>) -> bool {
    match reach {
        Some(reach) => i128::from(total) > i128::from(reach) * i128::from(SUSPICIOUS_REACH_FACTOR),
        None => false,
    }
}

fn describe(
    method: EngagementMethod,
    rate: f64,
    total: i64,
    followers: i64,
    reach: Option<i64>,
    capped: bool,
) -> String {
    let reach = reach.unwrap_or_default();
    let mut description = match method {
        EngagementMethod::ByReach => format!(
            "Engagement rate by reach: {total} engagements from {reach} accounts reached = \
             {rate:.2}% (small account with {followers} followers)"
        ),
        EngagementMethod::ByFollowers => format!(
            "Engagement rate by followers: {total} engagements from {followers} followers = {rate:.2}%"
        ),
        EngagementMethod::ByFollowersReachUnreliable => format!(
            "Engagement rate by followers: {total} engagements from {followers} followers = \
             {rate:.2}% (reach data unreliable: {total} engagements exceed twice the reported \
             reach of {reach})"
        ),
    };
    if capped {
        description.push_str(" (capped at 100%)");
    }
    description
}

/// Pick the statistically sound formula for this account and compute it.
///
/// The rate is always clamped to 100%; data-quality problems never turn into
/// errors here. Only negative counts are rejected.
pub fn calculate_smart(input: &EngagementInput) -> Result<EngagementResult, EngagementError> {
    let total = input.total_engagements()?;
    let followers = input.checked_followers()?;
    if let Some(reach) = input.reach {
        if reach < 0 {
            return Err(EngagementError::InvalidInput(format!(
                "reach must be non-negative, got {reach}"
            )));
        }
    }

    let suspicious = is_suspicious_reach(total, input.reach);
    let small_account = followers <= SMALL_ACCOUNT_MAX_FOLLOWERS;
    let usable_reach = input.reach.filter(|&reach| reach > 0);

    let (method, raw_rate) = match usable_reach {
        Some(reach) if small_account && !suspicious => {
            (EngagementMethod::ByReach, percentage(total, reach))
        }
        Some(_) if small_account => (
            EngagementMethod::ByFollowersReachUnreliable,
            raw_erf(total, followers),
        ),
        _ => (EngagementMethod::ByFollowers, raw_erf(total, followers)),
    };

    let rounded = round2(raw_rate);
    let capped = rounded > MAX_RATE;
    let rate = rounded.min(MAX_RATE);

    Ok(EngagementResult {
        rate,
        method,
        total_engagements: total,
        description: describe(method, rate, total, followers, input.reach, capped),
    })
}

/// Smart selection over the `n` most recent posts.
///
/// Per-post like/comment breakdown is approximated by splitting the average
/// engagement per post 70% likes / 30% comments. Each share is rounded to the
/// nearest integer, halves away from zero, so the proxy total can exceed the
/// average: a single post with 5 engagements becomes 4 likes + 2 comments = 6.
pub fn calculate_for_last_n_posts(
    history: &PostHistory,
    n: usize,
) -> Result<EngagementResult, EngagementError> {
    if n == 0 || n > history.posts.len() {
        return Err(EngagementError::InvalidInput(format!(
            "n must be between 1 and {}, got {n}",
            history.posts.len()
        )));
    }

    let recent = &history.posts[..n];
    let total = recent.iter().try_fold(0i64, |acc, post| {
        acc.checked_add(post.total()?)
            .ok_or_else(|| EngagementError::InvalidInput("engagement total overflows".to_string()))
    })?;
    let average = total as f64 / n as f64;

    let proxy = EngagementInput {
        likes: (average * LAST_N_LIKES_SHARE).round() as i64,
        comments: (average * LAST_N_COMMENTS_SHARE).round() as i64,
        shares: 0,
        saves: 0,
        followers: history.followers,
        reach: history.reach,
    };
    calculate_smart(&proxy)
}
