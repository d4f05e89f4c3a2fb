//! Badge thresholds and tier evaluation
//!
//! Each contribution criterion has a bronze, silver and gold threshold. A
//! user meets a tier for a criterion when their count reaches the
//! threshold, and the per-criterion results are summed per tier.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contribution criteria a badge can be awarded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BadgeCriterion {
    QuestionCount,
    AnswerCount,
    QuestionUpvotes,
    AnswerUpvotes,
    TotalViews,
}

/// Thresholds for the three tiers of one criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeThresholds {
    pub bronze: i64,
    pub silver: i64,
    pub gold: i64,
}

impl BadgeThresholds {
    pub const fn new(bronze: i64, silver: i64, gold: i64) -> Self {
        Self {
            bronze,
            silver,
            gold,
        }
    }

    /// Tiers reached by `count`
    pub fn evaluate(&self, count: i64) -> BadgeCounts {
        BadgeCounts {
            gold: u32::from(count >= self.gold),
            silver: u32::from(count >= self.silver),
            bronze: u32::from(count >= self.bronze),
        }
    }
}

/// Threshold table for every criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeCriteria {
    pub question_count: BadgeThresholds,
    pub answer_count: BadgeThresholds,
    pub question_upvotes: BadgeThresholds,
    pub answer_upvotes: BadgeThresholds,
    pub total_views: BadgeThresholds,
}

impl Default for BadgeCriteria {
    fn default() -> Self {
        Self {
            question_count: BadgeThresholds::new(10, 50, 100),
            answer_count: BadgeThresholds::new(10, 50, 100),
            question_upvotes: BadgeThresholds::new(10, 50, 100),
            answer_upvotes: BadgeThresholds::new(10, 50, 100),
            total_views: BadgeThresholds::new(1_000, 10_000, 100_000),
        }
    }
}

impl BadgeCriteria {
    /// Load thresholds layered as defaults, then an optional file, then
    /// `BADGE__<CRITERION>__<TIER>` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(
                Environment::with_prefix("BADGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn thresholds(&self, criterion: BadgeCriterion) -> &BadgeThresholds {
        match criterion {
            BadgeCriterion::QuestionCount => &self.question_count,
            BadgeCriterion::AnswerCount => &self.answer_count,
            BadgeCriterion::QuestionUpvotes => &self.question_upvotes,
            BadgeCriterion::AnswerUpvotes => &self.answer_upvotes,
            BadgeCriterion::TotalViews => &self.total_views,
        }
    }
}

/// Number of criteria satisfied per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeCounts {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl std::ops::Add for BadgeCounts {
    type Output = BadgeCounts;

    fn add(self, rhs: BadgeCounts) -> BadgeCounts {
        BadgeCounts {
            gold: self.gold + rhs.gold,
            silver: self.silver + rhs.silver,
            bronze: self.bronze + rhs.bronze,
        }
    }
}

/// Evaluate each (criterion, count) pair and sum the tiers reached
pub fn assign_badges(criteria: &BadgeCriteria, counts: &[(BadgeCriterion, i64)]) -> BadgeCounts {
    counts
        .iter()
        .map(|&(criterion, count)| criteria.thresholds(criterion).evaluate(count))
        .fold(BadgeCounts::default(), |acc, c| acc + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_zero_contributions_earn_nothing() {
        let counts = [
            (BadgeCriterion::QuestionCount, 0),
            (BadgeCriterion::AnswerCount, 0),
            (BadgeCriterion::QuestionUpvotes, 0),
            (BadgeCriterion::AnswerUpvotes, 0),
            (BadgeCriterion::TotalViews, 0),
        ];
        assert_eq!(
            assign_badges(&BadgeCriteria::default(), &counts),
            BadgeCounts::default()
        );
        assert_eq!(
            assign_badges(&BadgeCriteria::default(), &[]),
            BadgeCounts::default()
        );
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let t = BadgeThresholds::new(10, 50, 100);
        assert_eq!(t.evaluate(9), BadgeCounts::default());
        assert_eq!(
            t.evaluate(10),
            BadgeCounts {
                gold: 0,
                silver: 0,
                bronze: 1
            }
        );
        assert_eq!(
            t.evaluate(100),
            BadgeCounts {
                gold: 1,
                silver: 1,
                bronze: 1
            }
        );
    }

    #[test]
    fn test_tiers_sum_across_criteria() {
        let counts = [
            (BadgeCriterion::QuestionCount, 55),
            (BadgeCriterion::AnswerCount, 12),
            (BadgeCriterion::QuestionUpvotes, 3),
            (BadgeCriterion::AnswerUpvotes, 150),
            (BadgeCriterion::TotalViews, 10_000),
        ];
        assert_eq!(
            assign_badges(&BadgeCriteria::default(), &counts),
            BadgeCounts {
                gold: 1,
                silver: 3,
                bronze: 4
            }
        );
    }

    #[test]
    fn test_small_contributor_stays_below_bronze() {
        let counts = [
            (BadgeCriterion::QuestionCount, 3),
            (BadgeCriterion::AnswerCount, 1),
            (BadgeCriterion::QuestionUpvotes, 3),
            (BadgeCriterion::AnswerUpvotes, 5),
            (BadgeCriterion::TotalViews, 0),
        ];
        assert_eq!(
            assign_badges(&BadgeCriteria::default(), &counts),
            BadgeCounts::default()
        );
    }

    #[test]
    #[serial]
    fn test_load_defaults_without_overrides() {
        let criteria = BadgeCriteria::load(None).unwrap();
        assert_eq!(criteria, BadgeCriteria::default());
    }

    #[test]
    #[serial]
    fn test_load_file_overrides() {
        let path = std::env::temp_dir().join(format!(
            "devflow-badges-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[total_views]\nbronze = 5\nsilver = 50\ngold = 500\n",
        )
        .unwrap();

        let criteria = BadgeCriteria::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(criteria.total_views, BadgeThresholds::new(5, 50, 500));
        assert_eq!(criteria.question_count, BadgeThresholds::new(10, 50, 100));
    }

    #[test]
    #[serial]
    fn test_load_env_overrides_file() {
        let path = std::env::temp_dir().join(format!(
            "devflow-badges-env-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[total_views]\nbronze = 5\nsilver = 50\ngold = 500\n",
        )
        .unwrap();
        unsafe {
            std::env::set_var("BADGE__TOTAL_VIEWS__BRONZE", "7");
        }

        let criteria = BadgeCriteria::load(Some(&path));
        unsafe {
            std::env::remove_var("BADGE__TOTAL_VIEWS__BRONZE");
        }
        std::fs::remove_file(&path).ok();

        let criteria = criteria.unwrap();
        assert_eq!(criteria.total_views, BadgeThresholds::new(7, 50, 500));
        assert_eq!(criteria.answer_count, BadgeThresholds::new(10, 50, 100));
    }
}
