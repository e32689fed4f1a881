use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngagementError;

fn check_count(name: &str, value: i64) -> Result<i64, EngagementError> {
    if value < 0 {
        return Err(EngagementError::InvalidInput(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    Ok(value)
}

fn sum_counts(counts: &[(&str, i64)]) -> Result<i64, EngagementError> {
    counts.iter().try_fold(0i64, |acc, &(name, value)| {
        acc.checked_add(check_count(name, value)?)
            .ok_or_else(|| EngagementError::InvalidInput("engagement total overflows".to_string()))
    })
}

/// Interaction counts for one account, as fetched from the platform API.
///
/// Counts are signed so that bad upstream values are rejected with
/// [`EngagementError::InvalidInput`] rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementInput {
    pub likes: i64,
    pub comments: i64,
    #[serde(default)]
    pub shares: i64,
    #[serde(default)]
    pub saves: i64,
    pub followers: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach: Option<i64>,
}

impl EngagementInput {
    pub fn new(likes: i64, comments: i64, followers: i64) -> Self {
        Self {
            likes,
            comments,
            followers,
            ..Self::default()
        }
    }

    pub fn with_shares(mut self, shares: i64) -> Self {
        self.shares = shares;
        self
    }

    pub fn with_saves(mut self, saves: i64) -> Self {
        self.saves = saves;
        self
    }

    pub fn with_reach(mut self, reach: i64) -> Self {
        self.reach = Some(reach);
        self
    }

    /// `likes + comments + shares + saves`, rejecting negative counts.
    pub fn total_engagements(&self) -> Result<i64, EngagementError> {
        sum_counts(&[
            ("likes", self.likes),
            ("comments", self.comments),
            ("shares", self.shares),
            ("saves", self.saves),
        ])
    }

    pub(crate) fn checked_followers(&self) -> Result<i64, EngagementError> {
        check_count("followers", self.followers)
    }
}

/// Interaction counts for a single post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEngagement {
    pub likes: i64,
    pub comments: i64,
    #[serde(default)]
    pub shares: i64,
    #[serde(default)]
    pub saves: i64,
}

impl PostEngagement {
    pub fn new(likes: i64, comments: i64, shares: i64, saves: i64) -> Self {
        Self {
            likes,
            comments,
            shares,
            saves,
        }
    }

    pub fn total(&self) -> Result<i64, EngagementError> {
        sum_counts(&[
            ("likes", self.likes),
            ("comments", self.comments),
            ("shares", self.shares),
            ("saves", self.saves),
        ])
    }
}

/// Recent posts of an account, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostHistory {
    pub posts: Vec<PostEngagement>,
    pub followers: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach: Option<i64>,
}

/// Formula chosen by smart selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementMethod {
    /// Engagement rate by followers.
    #[serde(rename = "ERF")]
    ByFollowers,
    /// Engagement rate by followers, chosen because the reach figure looked wrong.
    #[serde(rename = "ERF (reach data unreliable)")]
    ByFollowersReachUnreliable,
    /// Engagement rate by reach.
    #[serde(rename = "ERR")]
    ByReach,
}

impl EngagementMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementMethod::ByFollowers => "ERF",
            EngagementMethod::ByFollowersReachUnreliable => "ERF (reach data unreliable)",
            EngagementMethod::ByReach => "ERR",
        }
    }
}

impl fmt::Display for EngagementMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementResult {
    /// Percentage, 0–100, two decimals.
    pub rate: f64,
    pub method: EngagementMethod,
    pub total_engagements: i64,
    /// Display sentence shown to users as is.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodComparison {
    pub erf: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<f64>,
    pub comparison: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_includes_optional_counts() {
        let input = EngagementInput::new(45, 12, 50).with_shares(3).with_saves(8);
        assert_eq!(input.total_engagements().unwrap(), 68);
    }

    #[test]
    fn negative_count_is_rejected() {
        let input = EngagementInput::new(10, -1, 50);
        let err = input.total_engagements().unwrap_err();
        assert_eq!(
            err,
            EngagementError::InvalidInput("comments must be non-negative, got -1".to_string())
        );
    }

    #[test]
    fn overflow_is_rejected() {
        let input = EngagementInput::new(i64::MAX, 1, 50);
        assert!(input.total_engagements().is_err());
    }

    #[test]
    fn shares_and_saves_default_to_zero_when_deserialized() {
        let input: EngagementInput =
            serde_json::from_str(r#"{"likes":5,"comments":2,"followers":10}"#).unwrap();
        assert_eq!(input.shares, 0);
        assert_eq!(input.saves, 0);
        assert_eq!(input.reach, None);
    }

    #[test]
    fn method_serializes_as_tag() {
        let json = serde_json::to_string(&EngagementMethod::ByFollowersReachUnreliable).unwrap();
        assert_eq!(json, r#""ERF (reach data unreliable)""#);
        assert_eq!(EngagementMethod::ByReach.to_string(), "ERR");
    }

    #[test]
    fn result_uses_camel_case() {
        let result = EngagementResult {
            rate: 12.5,
            method: EngagementMethod::ByFollowers,
            total_engagements: 25,
            description: "d".to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["totalEngagements"], 25);
        assert_eq!(value["method"], "ERF");
    }
}
