use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use predmarket_sdk::{Category, MarketFormData, MarketId, MarketListing};

use crate::conversions::{bool_to_i32, new_market_row};
use crate::error::StoreError;
use crate::models::MarketRow;
use crate::schema::markets;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQL expression for SQLite's `datetime('now')`.
const DATETIME_NOW: &str = "datetime('now')";

// --- Public types ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketInfo {
    pub row_id: i32,
    pub market_id: MarketId,
    pub listing: MarketListing,
    pub creator: Option<String>,
    pub resolved: bool,
    pub winning_outcome: Option<usize>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarketSort {
    /// Most recently ingested first.
    #[default]
    Newest,
    /// Earliest end first.
    EndingSoon,
    /// Largest initial liquidity first.
    MostLiquidity,
}

#[derive(Debug, Clone, Default)]
pub struct MarketFilter {
    pub category: Option<Category>,
    pub resolved: Option<bool>,
    /// Only markets ending strictly after this unix time.
    pub ends_after: Option<i64>,
    /// Only markets ending strictly before this unix time.
    pub ends_before: Option<i64>,
    pub creator: Option<String>,
    pub sort: MarketSort,
    pub limit: Option<i64>,
}

// --- MarketStore ---

/// Persistent storage for created markets.
///
/// All methods take `&mut self` because Diesel's `SqliteConnection` requires
/// `&mut` for all operations, including reads.
pub struct MarketStore {
    conn: SqliteConnection,
}

impl MarketStore {
    /// Open (or create) a store at the given file path. Runs migrations automatically.
    pub fn open(path: &str) -> crate::Result<Self> {
        let mut conn = SqliteConnection::establish(path)?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        Ok(MarketStore { conn })
    }

    /// Open an in-memory store for tests.
    pub fn open_in_memory() -> crate::Result<Self> {
        Self::open(":memory:")
    }

    // ==================== Ingest ====================

    /// Persist a submitted listing. Returns its MarketId. The ID covers the
    /// creator, so only a repeat submission by the same creator is a no-op
    /// returning the existing ID.
    pub fn ingest_listing(
        &mut self,
        listing: &MarketListing,
        creator: Option<&str>,
    ) -> crate::Result<MarketId> {
        let mid = listing.market_id(creator);
        let mid_bytes = mid.as_bytes().to_vec();

        let exists: bool = diesel::select(diesel::dsl::exists(
            markets::table.filter(markets::market_id.eq(&mid_bytes)),
        ))
        .get_result(&mut self.conn)?;

        if exists {
            log::debug!("market {mid} already stored");
            return Ok(mid);
        }

        let row = new_market_row(listing, creator)?;
        diesel::insert_into(markets::table)
            .values(&row)
            .execute(&mut self.conn)?;

        log::info!("stored market {mid}: {}", listing.question.trim());
        Ok(mid)
    }

    /// Convert submitted form data to a listing and persist it.
    pub fn ingest_form(
        &mut self,
        form: &MarketFormData,
        creator: Option<&str>,
    ) -> crate::Result<MarketId> {
        let listing = MarketListing::from_form(form)?;
        self.ingest_listing(&listing, creator)
    }

    // ==================== Market Queries ====================

    pub fn get_market(&mut self, mid: &MarketId) -> crate::Result<Option<MarketInfo>> {
        let row: Option<MarketRow> = markets::table
            .filter(markets::market_id.eq(mid.as_bytes().to_vec()))
            .first(&mut self.conn)
            .optional()?;

        row.as_ref().map(MarketInfo::try_from).transpose()
    }

    pub fn list_markets(&mut self, filter: &MarketFilter) -> crate::Result<Vec<MarketInfo>> {
        let mut query = markets::table.into_boxed();

        if let Some(category) = filter.category {
            query = query.filter(markets::category.eq(category.code()));
        }
        if let Some(resolved) = filter.resolved {
            query = query.filter(markets::resolved.eq(bool_to_i32(resolved)));
        }
        if let Some(after) = filter.ends_after {
            query = query.filter(markets::end_timestamp.gt(after));
        }
        if let Some(before) = filter.ends_before {
            query = query.filter(markets::end_timestamp.lt(before));
        }
        if let Some(ref creator) = filter.creator {
            query = query.filter(markets::creator.eq(creator.clone()));
        }

        query = match filter.sort {
            MarketSort::Newest => query.order(markets::id.desc()),
            MarketSort::EndingSoon => query
                .order(markets::end_timestamp.asc())
                .then_order_by(markets::id.asc()),
            // Wei amounts are stored as decimal text; ordered after loading.
            MarketSort::MostLiquidity => query.order(markets::id.asc()),
        };

        if filter.sort != MarketSort::MostLiquidity
            && let Some(lim) = filter.limit
        {
            query = query.limit(lim);
        }

        let rows: Vec<MarketRow> = query.load(&mut self.conn)?;
        let mut infos = rows
            .iter()
            .map(MarketInfo::try_from)
            .collect::<crate::Result<Vec<_>>>()?;

        if filter.sort == MarketSort::MostLiquidity {
            infos.sort_by(|a, b| b.listing.liquidity_wei.cmp(&a.listing.liquidity_wei));
            if let Some(lim) = filter.limit {
                infos.truncate(usize::try_from(lim).unwrap_or(0));
            }
        }

        Ok(infos)
    }

    pub fn count_markets(&mut self) -> crate::Result<i64> {
        Ok(markets::table.count().get_result::<i64>(&mut self.conn)?)
    }

    // ==================== Resolution ====================

    /// Record the winning outcome of a market. A market resolves once, and
    /// only to an outcome that exists and has a label.
    pub fn resolve_market(
        &mut self,
        mid: &MarketId,
        winning_outcome: usize,
    ) -> crate::Result<MarketInfo> {
        let info = self
            .get_market(mid)?
            .ok_or_else(|| StoreError::NotFound(mid.to_string()))?;

        if info.resolved {
            return Err(StoreError::AlreadyResolved(mid.to_string()));
        }
        let count = info.listing.outcomes.len();
        let is_blank = info
            .listing
            .outcomes
            .get(winning_outcome)
            .is_none_or(|label| label.trim().is_empty());
        if is_blank {
            return Err(StoreError::InvalidOutcome {
                index: winning_outcome,
                count,
            });
        }
        // Outcome lists hold at most MAX_OUTCOMES entries.
        let outcome = winning_outcome as i32;

        diesel::update(markets::table.filter(markets::market_id.eq(mid.as_bytes().to_vec())))
            .set((
                markets::resolved.eq(bool_to_i32(true)),
                markets::winning_outcome.eq(Some(outcome)),
                markets::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(DATETIME_NOW)),
            ))
            .execute(&mut self.conn)?;

        log::info!("resolved market {mid} to outcome {winning_outcome}");
        self.get_market(mid)?
            .ok_or_else(|| StoreError::NotFound(mid.to_string()))
    }
}
