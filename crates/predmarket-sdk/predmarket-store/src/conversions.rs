use predmarket_sdk::{Category, MarketId, MarketListing, Wei};

use crate::error::StoreError;
use crate::models::{MarketRow, NewMarketRow};
use crate::store::MarketInfo;

pub fn vec_to_array32(v: &[u8], field: &str) -> std::result::Result<[u8; 32], StoreError> {
    v.try_into().map_err(|_| {
        StoreError::InvalidData(format!("{field}: expected 32 bytes, got {}", v.len()))
    })
}

pub fn bool_to_i32(v: bool) -> i32 {
    i32::from(v)
}

pub fn bool_from_i32(v: i32, field: &str) -> std::result::Result<bool, StoreError> {
    match v {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!("{field}: invalid flag {other}"))),
    }
}

// --- MarketRow -> SDK types ---

impl TryFrom<&MarketRow> for MarketId {
    type Error = StoreError;

    fn try_from(row: &MarketRow) -> std::result::Result<Self, Self::Error> {
        Ok(MarketId(vec_to_array32(&row.market_id, "market_id")?))
    }
}

impl TryFrom<&MarketRow> for MarketListing {
    type Error = StoreError;

    fn try_from(row: &MarketRow) -> std::result::Result<Self, Self::Error> {
        let category: Category = row
            .category
            .parse()
            .map_err(|e| StoreError::InvalidData(format!("category: {e}")))?;
        let outcomes: Vec<String> = serde_json::from_str(&row.outcomes)
            .map_err(|e| StoreError::InvalidData(format!("outcomes: {e}")))?;
        let liquidity_wei = row
            .liquidity_wei
            .parse::<u128>()
            .map(Wei)
            .map_err(|e| StoreError::InvalidData(format!("liquidity_wei: {e}")))?;

        Ok(MarketListing {
            question: row.question.clone(),
            description: row.description.clone(),
            category,
            outcomes,
            end_date: row.end_date.clone(),
            end_time: row.end_time.clone(),
            end_timestamp: row.end_timestamp,
            initial_liquidity: row.initial_liquidity.clone(),
            liquidity_wei,
        })
    }
}

impl TryFrom<&MarketRow> for MarketInfo {
    type Error = StoreError;

    fn try_from(row: &MarketRow) -> std::result::Result<Self, Self::Error> {
        let winning_outcome = row
            .winning_outcome
            .map(|v| {
                usize::try_from(v).map_err(|_| {
                    StoreError::InvalidData(format!("winning_outcome: negative index {v}"))
                })
            })
            .transpose()?;

        Ok(MarketInfo {
            row_id: row.id,
            market_id: MarketId::try_from(row)?,
            listing: MarketListing::try_from(row)?,
            creator: row.creator.clone(),
            resolved: bool_from_i32(row.resolved, "resolved")?,
            winning_outcome,
            created_at: row.created_at.clone(),
            updated_at: row.updated_at.clone(),
        })
    }
}

// --- SDK types -> NewRow ---

pub fn new_market_row(
    listing: &MarketListing,
    creator: Option<&str>,
) -> std::result::Result<NewMarketRow, StoreError> {
    let outcomes = serde_json::to_string(&listing.outcomes)
        .map_err(|e| StoreError::InvalidData(format!("outcomes: {e}")))?;

    Ok(NewMarketRow {
        market_id: listing.market_id(creator).as_bytes().to_vec(),
        question: listing.question.clone(),
        description: listing.description.clone(),
        category: listing.category.code().to_string(),
        outcomes,
        end_date: listing.end_date.clone(),
        end_time: listing.end_time.clone(),
        end_timestamp: listing.end_timestamp,
        initial_liquidity: listing.initial_liquidity.clone(),
        liquidity_wei: listing.liquidity_wei.to_string(),
        creator: creator.map(str::to_string),
    })
}
