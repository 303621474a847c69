use diesel::prelude::*;

use crate::schema::markets;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = markets)]
pub struct MarketRow {
    pub id: i32,
    pub market_id: Vec<u8>,
    pub question: String,
    pub description: String,
    pub category: String,
    pub outcomes: String,
    pub end_date: String,
    pub end_time: String,
    pub end_timestamp: i64,
    pub initial_liquidity: String,
    pub liquidity_wei: String,
    pub creator: Option<String>,
    pub resolved: i32,
    pub winning_outcome: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = markets)]
pub struct NewMarketRow {
    pub market_id: Vec<u8>,
    pub question: String,
    pub description: String,
    pub category: String,
    pub outcomes: String,
    pub end_date: String,
    pub end_time: String,
    pub end_timestamp: i64,
    pub initial_liquidity: String,
    pub liquidity_wei: String,
    pub creator: Option<String>,
}
