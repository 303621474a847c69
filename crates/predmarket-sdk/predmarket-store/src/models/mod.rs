pub mod market;

pub use market::{MarketRow, NewMarketRow};
