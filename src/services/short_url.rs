// URL shortener service: create, resolve and report on short URLs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    app::AppState,
    db::DieselPool,
    models::short_url::{
        DailyVisits, NewShortUrl, NewUrlVisit, RecentVisit, ShortUrl, ShortUrlStats,
    },
    services::short_code::{clamp_code_length, ShortCodeGenerator},
    utils::{service_error::ServiceError, url_validator::UrlValidator},
};

const RECENT_VISITS_LIMIT: i64 = 5;

/// Validated input for a new short URL
#[derive(Debug, Clone)]
pub struct CreateShortUrl {
    pub original_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_uses: Option<i32>,
    pub code_length: usize,
    pub creator_ip: Option<String>,
}

impl CreateShortUrl {
    /// Validate raw request values.
    ///
    /// `own_host` is the host short URLs are served from, `now` the reference
    /// time for the expiry check.
    pub fn parse(
        url: &str,
        expires_at: Option<&str>,
        max_uses: Option<i64>,
        code_length: Option<i64>,
        own_host: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, ServiceError> {
        UrlValidator::validate_url(url, own_host)?;

        let expires_at = match expires_at.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_expiry(raw, now)?),
            None => None,
        };

        let max_uses = match max_uses {
            Some(n) if n >= 1 => Some(i32::try_from(n).map_err(|_| {
                ServiceError::invalid_field("max_uses", "max_uses is too large")
            })?),
            Some(_) => {
                return Err(ServiceError::invalid_field(
                    "max_uses",
                    "max_uses must be an integer >= 1",
                ))
            },
            None => None,
        };

        Ok(Self {
            original_url: url.trim().to_string(),
            expires_at,
            max_uses,
            code_length: clamp_code_length(code_length),
            creator_ip: None,
        })
    }

    pub fn with_creator_ip(mut self, ip: impl Into<String>) -> Self {
        self.creator_ip = Some(ip.into());
        self
    }
}

/// Parse an expiry timestamp (UTC) and require it to lie after `now`
pub fn parse_expiry(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, ServiceError> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        });

    match parsed {
        Some(expires_at) if expires_at > now => Ok(expires_at),
        _ => Err(ServiceError::invalid_field(
            "expires_at",
            "expires_at must be a valid future date",
        )),
    }
}

pub struct ShortUrlService {
    diesel_pool: DieselPool,
    short_code_generator: ShortCodeGenerator,
}

impl ShortUrlService {
    pub fn new(state: &AppState) -> Self {
        Self {
            diesel_pool: state.diesel_pool.clone(),
            short_code_generator: ShortCodeGenerator::new(),
        }
    }

    /// Store a new short URL under a freshly generated code
    #[instrument(skip(self, request), fields(code_length = request.code_length))]
    pub async fn create(&self, request: CreateShortUrl) -> Result<ShortUrl, ServiceError> {
        let mut conn = self.diesel_pool.get().await?;

        let code = self
            .short_code_generator
            .generate_unique_code(&mut conn, request.code_length)
            .await?;

        let new_short_url = NewShortUrl {
            id: Uuid::new_v4(),
            original_url: request.original_url,
            short_code: code,
            creator_ip: request.creator_ip,
            max_uses: request.max_uses,
            expires_at: request.expires_at,
            visit_count: 0,
            created_at: Utc::now(),
        };

        use crate::schema::short_urls;
        let short_url = diesel::insert_into(short_urls::table)
            .values(&new_short_url)
            .returning(ShortUrl::as_returning())
            .get_result(&mut conn)
            .await?;

        info!("Created short URL {}", short_url.short_code);
        Ok(short_url)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, ServiceError> {
        use crate::schema::short_urls::dsl;

        let mut conn = self.diesel_pool.get().await?;
        let short_url = dsl::short_urls
            .filter(dsl::short_code.eq(code))
            .select(ShortUrl::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(short_url)
    }

    /// Resolve a code for redirection, counting and logging the visit.
    ///
    /// Returns the destination URL.
    #[instrument(skip(self, user_agent))]
    pub async fn process_redirect(
        &self,
        code: &str,
        visitor_ip: &str,
        user_agent: &str,
    ) -> Result<String, ServiceError> {
        let short_url = self
            .find_by_code(code)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Code '{}' does not exist", code)))?;

        if !short_url.is_active() {
            return Err(ServiceError::Gone(
                "This short URL has expired or reached its usage limit".to_string(),
            ));
        }

        let visit = NewUrlVisit {
            id: Uuid::new_v4(),
            short_code: short_url.short_code.clone(),
            visitor_ip: Some(visitor_ip.to_string()),
            user_agent: Some(user_agent.to_string()),
            visited_at: Utc::now(),
        };

        let mut conn = self.diesel_pool.get().await?;

        // Counter and visit log commit together
        conn.build_transaction()
            .run::<_, diesel::result::Error, _>(|conn| {
                Box::pin(async move {
                    use crate::schema::short_urls::dsl;
                    diesel::update(dsl::short_urls.filter(dsl::short_code.eq(&visit.short_code)))
                        .set(dsl::visit_count.eq(dsl::visit_count + 1))
                        .execute(conn)
                        .await?;

                    diesel::insert_into(crate::schema::url_visits::table)
                        .values(&visit)
                        .execute(conn)
                        .await?;

                    Ok(())
                })
            })
            .await?;

        Ok(short_url.original_url)
    }

    /// Visit statistics for a code
    #[instrument(skip(self))]
    pub async fn get_stats(&self, code: &str) -> Result<ShortUrlStats, ServiceError> {
        let short_url = self
            .find_by_code(code)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Code '{}' does not exist", code)))?;

        let mut conn = self.diesel_pool.get().await?;

        let visits_by_day: Vec<DailyVisits> = diesel::sql_query(
            "SELECT DATE(visited_at AT TIME ZONE 'UTC') AS day, COUNT(*) AS visits \
             FROM url_visits \
             WHERE short_code = $1 AND visited_at >= NOW() - INTERVAL '7 days' \
             GROUP BY day \
             ORDER BY day DESC",
        )
        .bind::<Text, _>(code)
        .load(&mut conn)
        .await?;

        let recent_visits: Vec<RecentVisit> = {
            use crate::schema::url_visits::dsl;
            dsl::url_visits
                .filter(dsl::short_code.eq(code))
                .order(dsl::visited_at.desc())
                .limit(RECENT_VISITS_LIMIT)
                .select(RecentVisit::as_select())
                .load(&mut conn)
                .await?
        };

        let is_active = short_url.is_active();
        Ok(ShortUrlStats {
            short_code: short_url.short_code,
            original_url: short_url.original_url,
            total_visits: short_url.visit_count,
            max_uses: short_url.max_uses,
            expires_at: short_url.expires_at,
            created_at: short_url.created_at,
            is_active,
            visits_by_day,
            recent_visits,
        })
    }
}
