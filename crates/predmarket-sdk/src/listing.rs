use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::amount::{Wei, parse_ether};
use crate::category::Category;
use crate::error::{Error, Result};
use crate::form::MarketFormData;
use crate::schedule::{parse_end_date, parse_end_time, to_unix_timestamp};

/// SHA256 over the listing content; identifies a market independently of
/// where it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketId(pub [u8; 32]);

impl MarketId {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        <[u8; 32]>::try_from(bytes.as_slice()).ok().map(MarketId)
    }
}

impl std::fmt::Display for MarketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl AsRef<[u8]> for MarketId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A submitted market, with the end instant and liquidity resolved to the
/// units a consumer works in. Outcomes are kept verbatim, blanks included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketListing {
    pub question: String,
    pub description: String,
    pub category: Category,
    pub outcomes: Vec<String>,
    pub end_date: String,
    pub end_time: String,
    /// Unix seconds of the end instant in the local zone.
    pub end_timestamp: i64,
    pub initial_liquidity: String,
    pub liquidity_wei: Wei,
}

impl MarketListing {
    /// Build a listing from submitted form data. Expects a form that passed
    /// final-step validation; anything unparseable is reported, not guessed.
    pub fn from_form(form: &MarketFormData) -> Result<Self> {
        let date = parse_end_date(&form.end_date)?;
        let time = parse_end_time(&form.end_time)?;
        let end_timestamp = to_unix_timestamp(date.and_time(time))?;
        let liquidity_wei = parse_ether(&form.initial_liquidity)?;
        if liquidity_wei.is_zero() {
            return Err(Error::InvalidAmount(form.initial_liquidity.clone()));
        }

        Ok(Self {
            question: form.question.clone(),
            description: form.description.clone(),
            category: form.category,
            outcomes: form.outcomes.clone(),
            end_date: form.end_date.clone(),
            end_time: form.end_time.clone(),
            end_timestamp,
            initial_liquidity: form.initial_liquidity.clone(),
            liquidity_wei,
        })
    }

    /// Derive the market ID from question, description, category, outcomes,
    /// end instant, liquidity and creator. Each variable-length part is
    /// length-prefixed, so two accounts submitting the same content get
    /// distinct markets.
    pub fn market_id(&self, creator: Option<&str>) -> MarketId {
        let mut hasher = Sha256::new();
        hash_str(&mut hasher, &self.question);
        hash_str(&mut hasher, &self.description);
        hash_str(&mut hasher, self.category.code());
        hasher.update((self.outcomes.len() as u64).to_be_bytes());
        for outcome in &self.outcomes {
            hash_str(&mut hasher, outcome);
        }
        hasher.update(self.end_timestamp.to_be_bytes());
        hasher.update(self.liquidity_wei.as_u128().to_be_bytes());
        match creator {
            Some(creator) => {
                hasher.update([1u8]);
                hash_str(&mut hasher, creator);
            }
            None => hasher.update([0u8]),
        }
        let result: [u8; 32] = hasher.finalize().into();
        MarketId(result)
    }
}

fn hash_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_be_bytes());
    hasher.update(s.as_bytes());
}
