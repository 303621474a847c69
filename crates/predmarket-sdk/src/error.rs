use crate::wizard::WizardStep;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid form field: {0}")]
    InvalidField(String),

    #[error("field {0} cannot be set as text")]
    NotATextField(String),

    #[error("outcome index {index} out of range (have {len} outcomes)")]
    OutcomeIndexOutOfRange { index: usize, len: usize },

    #[error("submit is only available on the final step (currently on {0:?})")]
    NotOnFinalStep(WizardStep),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount overflows 128-bit wei")]
    AmountOverflow,

    #[error("invalid end date: {0}")]
    InvalidEndDate(String),

    #[error("invalid end time: {0}")]
    InvalidEndTime(String),

    #[error("end time {0} does not exist in the local time zone")]
    NonexistentLocalTime(String),
}

pub type Result<T> = std::result::Result<T, Error>;
