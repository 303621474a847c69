pub mod amount;
pub mod category;
pub mod clock;
pub mod error;
pub mod form;
pub mod listing;
pub mod network;
pub mod preview;
pub mod schedule;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod validation;
pub mod wizard;

// Core types
pub use amount::{Wei, format_ether, parse_decimal, parse_ether, to_wei};
pub use category::Category;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use form::{Field, MAX_OUTCOMES, MAX_QUESTION_CHARS, MIN_OUTCOMES, MarketFormData};
pub use listing::{MarketId, MarketListing};
pub use network::Network;

// Wizard state machine
pub use preview::MarketPreview;
pub use validation::{FieldErrors, validate_step};
pub use wizard::{MarketWizard, StepStatus, Transition, WizardAction, WizardStep, WizardView};

// Schedule helpers
pub use schedule::{end_datetime, format_end, min_end_date, to_unix_timestamp};
