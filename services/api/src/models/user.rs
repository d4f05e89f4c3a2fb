//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::badges::{BadgeCounts, BadgeCriteria, BadgeCriterion, assign_badges};

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    /// Identifier issued by the identity provider
    pub clerk_id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub picture: String,
    pub location: Option<String>,
    pub portfolio_website: Option<String>,
    pub reputation: i32,
    /// Saved question ids, duplicate free
    pub saved: Vec<Uuid>,
    pub joined_at: DateTime<Utc>,
}

/// New user creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub clerk_id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub picture: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub portfolio_website: Option<String>,
}

/// User update payload; absent fields are left untouched
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub picture: Option<String>,
    pub location: Option<String>,
    pub portfolio_website: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.picture.is_none()
            && self.location.is_none()
            && self.portfolio_website.is_none()
    }
}

/// Profile statistics for one user
#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub user: User,
    pub total_questions: i64,
    pub total_answers: i64,
    pub badge_counts: BadgeCounts,
    pub reputation: i32,
    pub contributions: ContributionTotals,
}

/// Raw per-user contribution counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct ContributionTotals {
    pub question_count: i64,
    pub answer_count: i64,
    pub question_upvotes: i64,
    pub answer_upvotes: i64,
    pub total_views: i64,
}

impl ContributionTotals {
    pub fn criteria_counts(&self) -> [(BadgeCriterion, i64); 5] {
        [
            (BadgeCriterion::QuestionCount, self.question_count),
            (BadgeCriterion::AnswerCount, self.answer_count),
            (BadgeCriterion::QuestionUpvotes, self.question_upvotes),
            (BadgeCriterion::AnswerUpvotes, self.answer_upvotes),
            (BadgeCriterion::TotalViews, self.total_views),
        ]
    }

    pub fn badges(&self, criteria: &BadgeCriteria) -> BadgeCounts {
        assign_badges(criteria, &self.criteria_counts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_feed_every_criterion() {
        let totals = ContributionTotals {
            question_count: 3,
            answer_count: 1,
            question_upvotes: 3,
            answer_upvotes: 5,
            total_views: 0,
        };
        let counts = totals.criteria_counts();
        assert_eq!(counts.len(), 5);
        assert_eq!(counts[0], (BadgeCriterion::QuestionCount, 3));
        assert_eq!(counts[3], (BadgeCriterion::AnswerUpvotes, 5));
        assert_eq!(totals.badges(&BadgeCriteria::default()), BadgeCounts::default());
    }

    #[test]
    fn test_badges_from_totals() {
        let totals = ContributionTotals {
            question_count: 100,
            answer_count: 0,
            question_upvotes: 10,
            answer_upvotes: 0,
            total_views: 1_000,
        };
        assert_eq!(
            totals.badges(&BadgeCriteria::default()),
            BadgeCounts {
                gold: 1,
                silver: 1,
                bronze: 3
            }
        );
    }
}
