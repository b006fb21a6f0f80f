// Short URL and visit models

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::{short_urls, url_visits};

// =============================================================================
// DATABASE MODELS
// =============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = short_urls)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShortUrl {
    pub id: Uuid,
    pub original_url: String,
    pub short_code: String,
    pub creator_ip: Option<String>,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub visit_count: i32,
    pub created_at: DateTime<Utc>,
}

impl ShortUrl {
    /// A link stops resolving once it expired or used up its visits
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if matches!(self.expires_at, Some(expires_at) if expires_at < now) {
            return false;
        }
        if matches!(self.max_uses, Some(max_uses) if self.visit_count >= max_uses) {
            return false;
        }
        true
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = short_urls)]
pub struct NewShortUrl {
    pub id: Uuid,
    pub original_url: String,
    pub short_code: String,
    pub creator_ip: Option<String>,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub visit_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = url_visits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecentVisit {
    pub visited_at: DateTime<Utc>,
    pub visitor_ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = url_visits)]
pub struct NewUrlVisit {
    pub id: Uuid,
    pub short_code: String,
    pub visitor_ip: Option<String>,
    pub user_agent: Option<String>,
    pub visited_at: DateTime<Utc>,
}

/// One row of the per-day visit histogram
#[derive(Debug, Clone, QueryableByName, Serialize, ToSchema)]
pub struct DailyVisits {
    #[diesel(sql_type = Date)]
    #[schema(value_type = String, format = Date)]
    pub day: NaiveDate,
    #[diesel(sql_type = BigInt)]
    pub visits: i64,
}

// =============================================================================
// REQUEST/RESPONSE DTOs
// =============================================================================

/// Request to shorten a URL
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[schema(example = json!({
    "url": "https://example.com/a/very/long/path",
    "expires_at": "2030-12-31 23:59:59",
    "max_uses": 100,
    "code_length": 8
}))]
pub struct ShortenRequest {
    pub url: String,
    /// RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (UTC)
    pub expires_at: Option<String>,
    pub max_uses: Option<i64>,
    pub code_length: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortenResponse {
    #[schema(value_type = String, example = "success")]
    pub status: &'static str,
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_uses: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortUrlStats {
    pub short_code: String,
    pub original_url: String,
    pub total_visits: i32,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub visits_by_day: Vec<DailyVisits>,
    pub recent_visits: Vec<RecentVisit>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatsResponse {
    #[schema(value_type = String, example = "success")]
    pub status: &'static str,
    pub data: ShortUrlStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(max_uses: Option<i32>, visit_count: i32, expires_at: Option<DateTime<Utc>>) -> ShortUrl {
        ShortUrl {
            id: Uuid::new_v4(),
            original_url: "https://example.com".to_string(),
            short_code: "abc12".to_string(),
            creator_ip: None,
            max_uses,
            expires_at,
            visit_count,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unlimited_link_is_active() {
        assert!(sample(None, 10_000, None).is_active());
    }

    #[test]
    fn test_usage_limit() {
        assert!(sample(Some(3), 2, None).is_active());
        assert!(!sample(Some(3), 3, None).is_active());
        assert!(!sample(Some(3), 4, None).is_active());
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let link = sample(None, 0, Some(now + Duration::hours(1)));
        assert!(link.is_active_at(now));
        assert!(!link.is_active_at(now + Duration::hours(2)));
        // Expiry is exclusive: a link expiring exactly now still resolves
        assert!(link.is_active_at(now + Duration::hours(1)));
    }
}
