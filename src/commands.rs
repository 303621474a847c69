use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use predmarket_sdk::{
    Category, MarketId, MarketListing, Network, Transition, WizardAction, WizardView, end_datetime,
    format_end,
};
use predmarket_store::{MarketFilter, MarketInfo, MarketSort};
use serde::{Deserialize, Serialize};

use crate::state::{AppState, AppStateManager};

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSession {
    pub wizard_id: String,
    pub view: WizardView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardActionResponse {
    pub transition: Transition,
    pub view: WizardView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SubmitResponse {
    /// Validation failed; the view carries the field errors.
    Invalid { view: WizardView },
    Created { market: MarketSummary, state: AppState },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub market_id: String,
    pub question: String,
    pub description: String,
    pub category: Category,
    pub category_label: String,
    pub outcomes: Vec<String>,
    pub end_date: String,
    pub end_time: String,
    pub end_timestamp: i64,
    pub ends: String,
    pub has_ended: bool,
    pub time_left: String,
    pub initial_liquidity: String,
    pub liquidity_wei: String,
    pub creator: Option<String>,
    pub resolved: bool,
    pub winning_outcome: Option<usize>,
    pub created_at: String,
}

impl MarketSummary {
    fn from_info(info: &MarketInfo, now_unix: i64) -> Self {
        let listing = &info.listing;
        let ends = end_datetime(&listing.end_date, &listing.end_time)
            .map(format_end)
            .unwrap_or_default();
        Self {
            market_id: info.market_id.to_string(),
            question: listing.question.clone(),
            description: listing.description.clone(),
            category: listing.category,
            category_label: listing.category.label().to_string(),
            outcomes: listing.outcomes.clone(),
            end_date: listing.end_date.clone(),
            end_time: listing.end_time.clone(),
            end_timestamp: listing.end_timestamp,
            ends,
            has_ended: listing.end_timestamp <= now_unix,
            time_left: time_left(listing.end_timestamp - now_unix),
            initial_liquidity: listing.initial_liquidity.clone(),
            liquidity_wei: listing.liquidity_wei.to_string(),
            creator: info.creator.clone(),
            resolved: info.resolved,
            winning_outcome: info.winning_outcome,
            created_at: info.created_at.clone(),
        }
    }
}

/// Countdown label for a market card: "Ended", "2d 5h left", "5h left" or
/// "42m left".
pub fn time_left(remaining_secs: i64) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;

    if remaining_secs <= 0 {
        return "Ended".to_string();
    }
    let days = remaining_secs / DAY;
    let hours = (remaining_secs % DAY) / HOUR;
    if days > 0 {
        return format!("{days}d {hours}h left");
    }
    if hours > 0 {
        return format!("{hours}h left");
    }
    format!("{}m left", (remaining_secs % HOUR) / MINUTE)
}

/// Status tabs of the market list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFilter {
    #[default]
    All,
    Active,
    Resolved,
    MyMarkets,
}

impl FromStr for ListFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(ListFilter::All),
            "active" => Ok(ListFilter::Active),
            "resolved" => Ok(ListFilter::Resolved),
            "my-markets" | "mine" => Ok(ListFilter::MyMarkets),
            _ => Err(format!("Invalid market filter: {}", s)),
        }
    }
}

fn parse_sort(s: &str) -> Result<MarketSort, String> {
    match s.trim().to_lowercase().as_str() {
        "" | "newest" => Ok(MarketSort::Newest),
        "ending-soon" => Ok(MarketSort::EndingSoon),
        "most-liquidity" | "liquidity" => Ok(MarketSort::MostLiquidity),
        _ => Err(format!("Invalid market sort: {}", s)),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListMarketsRequest {
    pub filter: String,
    pub sort: String,
    /// Category code; empty or "all" means every category.
    pub category: String,
    /// Case-insensitive match against question and description.
    pub search: String,
    /// Address of the connected account, required for "my-markets".
    pub account: Option<String>,
    pub limit: Option<i64>,
}

fn build_filter(request: &ListMarketsRequest) -> Result<MarketFilter, String> {
    if let Some(limit) = request.limit.filter(|l| *l < 0) {
        return Err(format!("Invalid limit: {limit}"));
    }
    let mut filter = MarketFilter {
        sort: parse_sort(&request.sort)?,
        limit: request.limit,
        ..Default::default()
    };

    let category = request.category.trim();
    if !category.is_empty() && !category.eq_ignore_ascii_case("all") {
        let category: Category = category.parse().map_err(|e: predmarket_sdk::Error| e.to_string())?;
        filter.category = Some(category);
    }

    match request.filter.parse::<ListFilter>()? {
        ListFilter::All => {}
        ListFilter::Active => filter.resolved = Some(false),
        ListFilter::Resolved => filter.resolved = Some(true),
        ListFilter::MyMarkets => {
            let account = request
                .account
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .ok_or_else(|| "Connect an account to see your markets".to_string())?;
            filter.creator = Some(account.to_string());
        }
    }

    Ok(filter)
}

fn matches_search(info: &MarketInfo, needle: &str) -> bool {
    info.listing.question.to_lowercase().contains(needle)
        || info.listing.description.to_lowercase().contains(needle)
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

fn lock(manager: &Mutex<AppStateManager>) -> Result<MutexGuard<'_, AppStateManager>, String> {
    manager.lock().map_err(|_| "state lock failed".to_string())
}

// ============================================================================
// App State Commands
// ============================================================================

pub fn is_first_launch(manager: &Mutex<AppStateManager>) -> Result<bool, String> {
    let mgr = lock(manager)?;
    Ok(mgr.is_first_launch())
}

pub fn get_app_state(manager: &Mutex<AppStateManager>) -> Result<AppState, String> {
    let mut mgr = lock(manager)?;
    if !mgr.is_initialized() {
        return Err("Not initialized - market store unavailable".to_string());
    }
    Ok(mgr.snapshot())
}

pub fn set_network(manager: &Mutex<AppStateManager>, network: &str) -> Result<AppState, String> {
    let network: Network = network.parse()?;
    let mut mgr = lock(manager)?;
    mgr.set_network(network)
}

// ============================================================================
// Wizard Commands
// ============================================================================

pub fn open_market_wizard(manager: &Mutex<AppStateManager>) -> Result<WizardSession, String> {
    let mut mgr = lock(manager)?;
    let wizard_id = mgr.open_wizard();
    let view = mgr.wizard(&wizard_id)?.view();
    mgr.bump_revision();
    Ok(WizardSession { wizard_id, view })
}

pub fn close_market_wizard(
    manager: &Mutex<AppStateManager>,
    wizard_id: &str,
) -> Result<bool, String> {
    let mut mgr = lock(manager)?;
    let closed = mgr.close_wizard(wizard_id);
    if closed {
        mgr.bump_revision();
    }
    Ok(closed)
}

pub fn get_market_wizard(
    manager: &Mutex<AppStateManager>,
    wizard_id: &str,
) -> Result<WizardView, String> {
    let mgr = lock(manager)?;
    Ok(mgr.wizard(wizard_id)?.view())
}

pub fn dispatch_wizard_action(
    manager: &Mutex<AppStateManager>,
    wizard_id: &str,
    action: WizardAction,
) -> Result<WizardActionResponse, String> {
    let mut mgr = lock(manager)?;
    let wizard = mgr.wizard_mut(wizard_id)?;
    let transition = wizard.dispatch(action).map_err(|e| e.to_string())?;
    Ok(WizardActionResponse {
        transition,
        view: wizard.view(),
    })
}

/// Validate the final step and, when it passes, persist the market and
/// discard the wizard session.
pub fn submit_market_wizard(
    manager: &Mutex<AppStateManager>,
    wizard_id: &str,
    creator: Option<String>,
) -> Result<SubmitResponse, String> {
    let mut mgr = lock(manager)?;
    mgr.store_mut()?;

    let wizard = mgr.wizard_mut(wizard_id)?;
    let submitted = wizard
        .submit(|form| MarketListing::from_form(&form))
        .map_err(|e| e.to_string())?;
    let listing = match submitted {
        Some(listing) => listing.map_err(|e| e.to_string())?,
        None => return Ok(SubmitResponse::Invalid { view: wizard.view() }),
    };

    let creator = creator
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let store = mgr.store_mut()?;
    let mid = store
        .ingest_listing(&listing, creator)
        .map_err(|e| e.to_string())?;
    let info = store
        .get_market(&mid)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("market {mid} missing after insert"))?;

    mgr.close_wizard(wizard_id);
    mgr.bump_revision();
    Ok(SubmitResponse::Created {
        market: MarketSummary::from_info(&info, now_unix()),
        state: mgr.snapshot(),
    })
}

// ============================================================================
// Market Commands
// ============================================================================

pub fn list_markets(
    manager: &Mutex<AppStateManager>,
    request: ListMarketsRequest,
) -> Result<Vec<MarketSummary>, String> {
    let filter = build_filter(&request)?;
    let needle = request.search.trim().to_lowercase();

    let mut mgr = lock(manager)?;
    let store = mgr.store_mut()?;
    let infos = if needle.is_empty() {
        store.list_markets(&filter).map_err(|e| e.to_string())?
    } else {
        // Search runs over loaded rows, so the limit applies afterwards.
        let unlimited = MarketFilter {
            limit: None,
            ..filter.clone()
        };
        let mut infos: Vec<MarketInfo> = store
            .list_markets(&unlimited)
            .map_err(|e| e.to_string())?
            .into_iter()
            .filter(|info| matches_search(info, &needle))
            .collect();
        if let Some(limit) = filter.limit.and_then(|l| usize::try_from(l).ok()) {
            infos.truncate(limit);
        }
        infos
    };

    let now = now_unix();
    Ok(infos
        .iter()
        .map(|info| MarketSummary::from_info(info, now))
        .collect())
}

pub fn get_market(
    manager: &Mutex<AppStateManager>,
    market_id_hex: &str,
) -> Result<Option<MarketSummary>, String> {
    let market_id = MarketId::from_hex(market_id_hex.trim())
        .ok_or_else(|| format!("invalid market id: {market_id_hex}"))?;
    let mut mgr = lock(manager)?;
    let info = mgr
        .store_mut()?
        .get_market(&market_id)
        .map_err(|e| e.to_string())?;
    Ok(info.map(|info| MarketSummary::from_info(&info, now_unix())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_filter_parse() {
        assert_eq!("".parse::<ListFilter>(), Ok(ListFilter::All));
        assert_eq!("Active".parse::<ListFilter>(), Ok(ListFilter::Active));
        assert_eq!("resolved".parse::<ListFilter>(), Ok(ListFilter::Resolved));
        assert_eq!("my-markets".parse::<ListFilter>(), Ok(ListFilter::MyMarkets));
        assert!("trending".parse::<ListFilter>().is_err());
    }

    #[test]
    fn sort_parse() {
        assert_eq!(parse_sort("newest"), Ok(MarketSort::Newest));
        assert_eq!(parse_sort("ending-soon"), Ok(MarketSort::EndingSoon));
        assert_eq!(parse_sort("most-liquidity"), Ok(MarketSort::MostLiquidity));
        assert!(parse_sort("volume").is_err());
    }

    #[test]
    fn build_filter_maps_tabs() {
        let request = ListMarketsRequest {
            filter: "active".into(),
            category: "sports".into(),
            ..Default::default()
        };
        let filter = build_filter(&request).unwrap();
        assert_eq!(filter.resolved, Some(false));
        assert_eq!(filter.category, Some(Category::Sports));

        let request = ListMarketsRequest {
            category: "All".into(),
            ..Default::default()
        };
        assert_eq!(build_filter(&request).unwrap().category, None);
    }

    #[test]
    fn my_markets_needs_account() {
        let mut request = ListMarketsRequest {
            filter: "my-markets".into(),
            ..Default::default()
        };
        assert!(build_filter(&request).is_err());

        request.account = Some(" 0xabc ".into());
        assert_eq!(build_filter(&request).unwrap().creator.as_deref(), Some("0xabc"));
    }

    #[test]
    fn negative_limit_is_rejected() {
        let request = ListMarketsRequest {
            limit: Some(-1),
            ..Default::default()
        };
        assert!(build_filter(&request).is_err());

        let request = ListMarketsRequest {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(build_filter(&request).unwrap().limit, Some(0));
    }

    #[test]
    fn time_left_labels() {
        assert_eq!(time_left(0), "Ended");
        assert_eq!(time_left(-90), "Ended");
        assert_eq!(time_left(59), "0m left");
        assert_eq!(time_left(42 * 60 + 5), "42m left");
        assert_eq!(time_left(3600), "1h left");
        assert_eq!(time_left(5 * 3600 + 59 * 60), "5h left");
        assert_eq!(time_left(86_400), "1d 0h left");
        assert_eq!(time_left(2 * 86_400 + 5 * 3600 + 30 * 60), "2d 5h left");
    }

    #[test]
    fn unknown_category_is_rejected() {
        let request = ListMarketsRequest {
            category: "weather".into(),
            ..Default::default()
        };
        assert!(build_filter(&request).is_err());
    }
}
