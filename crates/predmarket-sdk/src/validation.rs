use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::{parse_decimal, to_wei};
use crate::form::{Field, MAX_QUESTION_CHARS, MIN_OUTCOMES, MarketFormData};
use crate::schedule::{parse_end_date, parse_end_time};
use crate::wizard::WizardStep;

pub const QUESTION_REQUIRED: &str = "Question is required";
pub const QUESTION_TOO_LONG: &str = "Question must be 200 characters or less";
pub const DESCRIPTION_REQUIRED: &str = "Description is required";
pub const OUTCOMES_TOO_FEW: &str = "At least 2 outcomes are required";
pub const OUTCOMES_NOT_UNIQUE: &str = "Outcomes must be unique";
pub const END_DATE_REQUIRED: &str = "End date is required";
pub const END_DATE_INVALID: &str = "End date is invalid";
pub const END_DATE_NOT_FUTURE: &str = "End date must be in the future";
pub const END_TIME_REQUIRED: &str = "End time is required";
pub const END_TIME_INVALID: &str = "End time is invalid";
pub const LIQUIDITY_NOT_POSITIVE: &str = "Initial liquidity must be greater than 0";
pub const LIQUIDITY_INVALID: &str = "Initial liquidity must be a valid amount";

/// Per-field validation messages. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Validate the fields owned by `step`. Pure: depends only on the form and `now`.
pub fn validate_step(form: &MarketFormData, step: WizardStep, now: NaiveDateTime) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match step {
        WizardStep::Details => validate_details(form, &mut errors),
        WizardStep::Outcomes => validate_outcomes(form, &mut errors),
        WizardStep::TimelineLiquidity => validate_timeline(form, now, &mut errors),
    }
    errors
}

fn validate_details(form: &MarketFormData, errors: &mut FieldErrors) {
    let question = form.question.trim();
    if question.is_empty() {
        errors.insert(Field::Question, QUESTION_REQUIRED);
    } else if question.chars().count() > MAX_QUESTION_CHARS {
        errors.insert(Field::Question, QUESTION_TOO_LONG);
    }

    if form.description.trim().is_empty() {
        errors.insert(Field::Description, DESCRIPTION_REQUIRED);
    }
}

fn validate_outcomes(form: &MarketFormData, errors: &mut FieldErrors) {
    let filled: Vec<&str> = form.filled_outcomes().collect();
    if filled.len() < MIN_OUTCOMES {
        errors.insert(Field::Outcomes, OUTCOMES_TOO_FEW);
    }

    let mut seen = HashSet::with_capacity(filled.len());
    let unique = filled.iter().all(|o| seen.insert(o.trim().to_lowercase()));
    if !unique {
        errors.insert(Field::Outcomes, OUTCOMES_NOT_UNIQUE);
    }
}

fn validate_timeline(form: &MarketFormData, now: NaiveDateTime, errors: &mut FieldErrors) {
    let date = if form.end_date.trim().is_empty() {
        errors.insert(Field::EndDate, END_DATE_REQUIRED);
        None
    } else {
        let parsed = parse_end_date(&form.end_date).ok();
        if parsed.is_none() {
            errors.insert(Field::EndDate, END_DATE_INVALID);
        }
        parsed
    };

    let time = if form.end_time.trim().is_empty() {
        errors.insert(Field::EndTime, END_TIME_REQUIRED);
        None
    } else {
        let parsed = parse_end_time(&form.end_time).ok();
        if parsed.is_none() {
            errors.insert(Field::EndTime, END_TIME_INVALID);
        }
        parsed
    };

    if let (Some(date), Some(time)) = (date, time)
        && date.and_time(time) <= now
    {
        errors.insert(Field::EndDate, END_DATE_NOT_FUTURE);
    }

    if let Some(message) = liquidity_error(&form.initial_liquidity) {
        errors.insert(Field::InitialLiquidity, message);
    }
}

/// Empty counts as zero. Anything numeric must be positive and expressible
/// in wei.
fn liquidity_error(raw: &str) -> Option<&'static str> {
    if raw.trim().is_empty() {
        return Some(LIQUIDITY_NOT_POSITIVE);
    }
    let Ok(amount) = parse_decimal(raw) else {
        return Some(LIQUIDITY_INVALID);
    };
    if amount <= Decimal::ZERO {
        return Some(LIQUIDITY_NOT_POSITIVE);
    }
    match to_wei(amount) {
        Ok(_) => None,
        Err(_) => Some(LIQUIDITY_INVALID),
    }
}
