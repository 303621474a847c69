//! Three-step market creation wizard.
//!
//! `MarketWizard` owns the form, the current step and the last computed
//! field errors. Forward moves are guarded by validation of the step being
//! left; backward moves are unconditional and never touch field values.
//! Editing a field clears that field's error without revalidating it.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::form::{Field, MAX_OUTCOMES, MAX_QUESTION_CHARS, MIN_OUTCOMES, MarketFormData};
use crate::preview::MarketPreview;
use crate::schedule::min_end_date;
use crate::validation::{FieldErrors, validate_step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum WizardStep {
    Details = 1,
    Outcomes = 2,
    TimelineLiquidity = 3,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [
        WizardStep::Details,
        WizardStep::Outcomes,
        WizardStep::TimelineLiquidity,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Option<Self> {
        match self {
            WizardStep::Details => Some(WizardStep::Outcomes),
            WizardStep::Outcomes => Some(WizardStep::TimelineLiquidity),
            WizardStep::TimelineLiquidity => None,
        }
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            WizardStep::Details => None,
            WizardStep::Outcomes => Some(WizardStep::Details),
            WizardStep::TimelineLiquidity => Some(WizardStep::Outcomes),
        }
    }

    pub fn is_final(self) -> bool {
        self.next().is_none()
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Details => "Create Your Market",
            WizardStep::Outcomes => "Define Outcomes",
            WizardStep::TimelineLiquidity => "Set Timeline & Liquidity",
        }
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> u8 {
        step.number()
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = String;

    fn try_from(v: u8) -> std::result::Result<Self, Self::Error> {
        match v {
            1 => Ok(WizardStep::Details),
            2 => Ok(WizardStep::Outcomes),
            3 => Ok(WizardStep::TimelineLiquidity),
            other => Err(format!("invalid wizard step: {other}")),
        }
    }
}

/// Progress marker for each step, relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepStatus {
    Complete,
    Current,
    Upcoming,
}

/// Result of a navigation or edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "step", rename_all = "camelCase")]
pub enum Transition {
    /// The wizard is now on this step.
    Moved(WizardStep),
    /// Validation of the current step failed; see [`MarketWizard::errors`].
    Blocked,
    /// Nothing to move to (or the action was an edit).
    Stayed,
}

/// User actions the frontend can send, minus submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WizardAction {
    SetField { field: Field, value: String },
    SetCategory { category: Category },
    UpdateOutcome { index: usize, value: String },
    AddOutcome,
    RemoveOutcome { index: usize },
    Next,
    Back,
}

/// Everything the frontend needs to render the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub step: WizardStep,
    pub title: String,
    pub progress: Vec<StepStatus>,
    pub form: MarketFormData,
    pub errors: FieldErrors,
    pub preview: MarketPreview,
    pub question_counter: String,
    pub can_add_outcome: bool,
    pub can_remove_outcome: bool,
    pub min_end_date: String,
}

#[derive(Debug, Clone)]
pub struct MarketWizard<C: Clock = SystemClock> {
    form: MarketFormData,
    errors: FieldErrors,
    step: WizardStep,
    clock: C,
}

impl MarketWizard<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MarketWizard<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MarketWizard<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            form: MarketFormData::default(),
            errors: FieldErrors::new(),
            step: WizardStep::Details,
            clock,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &MarketFormData {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_form(self) -> MarketFormData {
        self.form
    }

    // --- Field edits ---

    /// Set a field from its text value. The category is parsed from its code;
    /// outcomes must be edited through the outcome operations.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        if field == Field::Category {
            let category = value.parse()?;
            self.set_category(category);
            return Ok(());
        }
        let slot = self
            .form
            .text_mut(field)
            .ok_or_else(|| Error::NotATextField(field.to_string()))?;
        *slot = value;
        self.errors.remove(field);
        Ok(())
    }

    pub fn set_category(&mut self, category: Category) {
        self.form.category = category;
        self.errors.remove(Field::Category);
    }

    pub fn update_outcome(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        let len = self.form.outcomes.len();
        let slot = self
            .form
            .outcomes
            .get_mut(index)
            .ok_or(Error::OutcomeIndexOutOfRange { index, len })?;
        *slot = value.into();
        self.errors.remove(Field::Outcomes);
        Ok(())
    }

    /// Append an empty outcome. Returns `false` (and changes nothing) at the maximum.
    pub fn add_outcome(&mut self) -> bool {
        if !self.can_add_outcome() {
            return false;
        }
        self.form.outcomes.push(String::new());
        self.errors.remove(Field::Outcomes);
        true
    }

    /// Remove the outcome at `index`. Returns `Ok(false)` (and changes nothing)
    /// at the minimum.
    pub fn remove_outcome(&mut self, index: usize) -> Result<bool> {
        if !self.can_remove_outcome() {
            return Ok(false);
        }
        let len = self.form.outcomes.len();
        if index >= len {
            return Err(Error::OutcomeIndexOutOfRange { index, len });
        }
        self.form.outcomes.remove(index);
        self.errors.remove(Field::Outcomes);
        Ok(true)
    }

    pub fn can_add_outcome(&self) -> bool {
        self.form.outcomes.len() < MAX_OUTCOMES
    }

    pub fn can_remove_outcome(&self) -> bool {
        self.form.outcomes.len() > MIN_OUTCOMES
    }

    // --- Navigation ---

    /// Validate `step` against the current form without recording the result.
    pub fn validate(&self, step: WizardStep) -> FieldErrors {
        validate_step(&self.form, step, self.clock.now())
    }

    /// Validate the current step and advance if it passes. On the final step
    /// this only validates.
    pub fn next(&mut self) -> Transition {
        self.errors = self.validate(self.step);
        if !self.errors.is_empty() {
            log::debug!(
                "wizard blocked on step {} ({} errors)",
                self.step.number(),
                self.errors.len()
            );
            return Transition::Blocked;
        }
        match self.step.next() {
            Some(next) => {
                log::debug!("wizard step {} -> {}", self.step.number(), next.number());
                self.step = next;
                Transition::Moved(next)
            }
            None => Transition::Stayed,
        }
    }

    pub fn back(&mut self) -> Transition {
        match self.step.prev() {
            Some(prev) => {
                log::debug!("wizard step {} -> {}", self.step.number(), prev.number());
                self.step = prev;
                Transition::Moved(prev)
            }
            None => Transition::Stayed,
        }
    }

    /// Validate the final step and, if it passes, hand a snapshot of the form
    /// to `on_submit` exactly once. Returns `Ok(None)` when validation fails;
    /// the errors are then available from [`errors`](Self::errors).
    pub fn submit<F, T>(&mut self, on_submit: F) -> Result<Option<T>>
    where
        F: FnOnce(MarketFormData) -> T,
    {
        if !self.step.is_final() {
            return Err(Error::NotOnFinalStep(self.step));
        }
        self.errors = self.validate(self.step);
        if !self.errors.is_empty() {
            log::debug!("wizard submit blocked ({} errors)", self.errors.len());
            return Ok(None);
        }
        log::info!("submitting market: {}", self.form.question.trim());
        Ok(Some(on_submit(self.form.clone())))
    }

    pub fn dispatch(&mut self, action: WizardAction) -> Result<Transition> {
        match action {
            WizardAction::SetField { field, value } => self.set_field(field, value)?,
            WizardAction::SetCategory { category } => self.set_category(category),
            WizardAction::UpdateOutcome { index, value } => self.update_outcome(index, value)?,
            WizardAction::AddOutcome => {
                self.add_outcome();
            }
            WizardAction::RemoveOutcome { index } => {
                self.remove_outcome(index)?;
            }
            WizardAction::Next => return Ok(self.next()),
            WizardAction::Back => return Ok(self.back()),
        }
        Ok(Transition::Stayed)
    }

    // --- Derived ---

    pub fn progress(&self) -> Vec<StepStatus> {
        WizardStep::ALL
            .into_iter()
            .map(|s| match s.cmp(&self.step) {
                std::cmp::Ordering::Less => StepStatus::Complete,
                std::cmp::Ordering::Equal => StepStatus::Current,
                std::cmp::Ordering::Greater => StepStatus::Upcoming,
            })
            .collect()
    }

    pub fn preview(&self) -> MarketPreview {
        MarketPreview::from_form(&self.form)
    }

    pub fn question_counter(&self) -> String {
        format!(
            "{}/{} characters",
            self.form.question.chars().count(),
            MAX_QUESTION_CHARS
        )
    }

    pub fn view(&self) -> WizardView {
        WizardView {
            step: self.step,
            title: self.step.title().to_string(),
            progress: self.progress(),
            form: self.form.clone(),
            errors: self.errors.clone(),
            preview: self.preview(),
            question_counter: self.question_counter(),
            can_add_outcome: self.can_add_outcome(),
            can_remove_outcome: self.can_remove_outcome(),
            min_end_date: min_end_date(self.clock.now()),
        }
    }
}
