//! Engagement-rate calculation for social accounts.
//!
//! Three formulas:
//! - ERF: engagement by followers
//! - AER: average engagement across posts, by followers
//! - ERR: engagement by reach
//!
//! [`calculate_smart`] picks between ERF and ERR based on account size and how
//! trustworthy the reach figure is. Everything here is a pure function.

pub mod compare;
pub mod error;
pub mod formulas;
pub mod smart;
pub mod types;

pub use compare::compare_methods;
pub use error::EngagementError;
pub use formulas::{calculate_aer, calculate_erf, calculate_err};
pub use smart::{
    calculate_for_last_n_posts, calculate_smart, LAST_N_COMMENTS_SHARE, LAST_N_LIKES_SHARE,
    MAX_RATE, SMALL_ACCOUNT_MAX_FOLLOWERS, SUSPICIOUS_REACH_FACTOR,
};
pub use types::{
    EngagementInput, EngagementMethod, EngagementResult, MethodComparison, PostEngagement,
    PostHistory,
};
