//! Search terms and sort filters for the listing queries
//!
//! Search terms are matched with PostgreSQL's case-insensitive regex
//! operator (`~*`), so every term is escaped first: callers get literal
//! substring matching and never pattern semantics.
//!
//! Case folding is done by the database and follows the cluster's `LC_CTYPE`.
//! ASCII letters always fold. Non-ASCII letters (`Ü` against `ü`) only fold
//! under a Unicode-aware ctype such as `en_US.UTF-8`; a `C` cluster compares
//! them as distinct.

/// Escape a user supplied search term for `~*`.
///
/// Blank terms mean "no search" and yield `None`. Any other term is kept
/// as typed, surrounding whitespace included.
pub fn literal_pattern(query: Option<&str>) -> Option<String> {
    query
        .filter(|q| !q.trim().is_empty())
        .map(regex::escape)
}

/// Sort order for the user directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFilter {
    NewUsers,
    OldUsers,
    TopContributors,
    Natural,
}

impl UserFilter {
    /// Parse a filter parameter; anything unrecognised keeps natural order
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("new_users") => UserFilter::NewUsers,
            Some("old_users") => UserFilter::OldUsers,
            Some("top_contributors") => UserFilter::TopContributors,
            _ => UserFilter::Natural,
        }
    }

    /// ORDER BY clause over the `users` table
    pub fn order_by(&self) -> &'static str {
        match self {
            UserFilter::NewUsers => "joined_at DESC, id",
            UserFilter::OldUsers => "joined_at ASC, id",
            UserFilter::TopContributors => "reputation DESC, joined_at ASC, id",
            // Rows are appended on sign-up, so join time is insertion order.
            UserFilter::Natural => "joined_at ASC, id",
        }
    }
}

/// Sort order for a user's saved questions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedFilter {
    MostRecent,
    Oldest,
    MostVoted,
    MostViewed,
    MostAnswered,
    Natural,
}

impl SavedFilter {
    /// Parse a filter parameter; anything unrecognised keeps natural order
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("most_recent") => SavedFilter::MostRecent,
            Some("oldest") => SavedFilter::Oldest,
            Some("most_voted") => SavedFilter::MostVoted,
            Some("most_viewed") => SavedFilter::MostViewed,
            Some("most_answered") => SavedFilter::MostAnswered,
            _ => SavedFilter::Natural,
        }
    }

    /// ORDER BY clause over `questions q`; `$1` is the saved id array and
    /// `answers` the per-question answer count column.
    pub fn order_by(&self) -> &'static str {
        match self {
            SavedFilter::MostRecent => "q.created_at DESC, q.id",
            SavedFilter::Oldest => "q.created_at ASC, q.id",
            SavedFilter::MostVoted => "cardinality(q.upvotes) DESC, q.created_at DESC, q.id",
            SavedFilter::MostViewed => "q.views DESC, q.created_at DESC, q.id",
            SavedFilter::MostAnswered => "answers DESC, q.created_at DESC, q.id",
            SavedFilter::Natural => "array_position($1, q.id)",
        }
    }
}
