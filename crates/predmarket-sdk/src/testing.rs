//! Fixtures shared by the SDK, store and app test suites.

use chrono::{Days, NaiveDateTime};

use crate::category::Category;
use crate::clock::FixedClock;
use crate::form::{Field, MarketFormData};
use crate::schedule::{DATE_FORMAT, end_datetime};
use crate::wizard::{MarketWizard, Transition, WizardStep};

/// 2026-10-19 15:30 local time.
pub fn test_now() -> NaiveDateTime {
    end_datetime("2026-10-19", "15:30").expect("valid fixture instant")
}

pub fn test_clock() -> FixedClock {
    FixedClock(test_now())
}

/// `now` shifted by whole days, formatted for the end-date field.
pub fn date_after(now: NaiveDateTime, days: u64) -> String {
    now.date()
        .checked_add_days(Days::new(days))
        .expect("date in range")
        .format(DATE_FORMAT)
        .to_string()
}

/// A form that passes every step when validated at [`test_now`].
pub fn valid_form() -> MarketFormData {
    MarketFormData {
        question: "Will BTC hit 100k?".to_string(),
        description: "Resolves YES if any major exchange prints 100,000 USD.".to_string(),
        category: Category::Crypto,
        outcomes: vec!["Yes".to_string(), "No".to_string()],
        end_date: date_after(test_now(), 1),
        end_time: "12:00".to_string(),
        initial_liquidity: "0.5".to_string(),
    }
}

/// Drive a wizard through all three steps with the values of `form`.
/// Panics if any step is blocked.
pub fn fill_wizard<C: crate::clock::Clock>(wizard: &mut MarketWizard<C>, form: &MarketFormData) {
    wizard.set_field(Field::Question, form.question.clone()).expect("text field");
    wizard
        .set_field(Field::Description, form.description.clone())
        .expect("text field");
    wizard.set_category(form.category);
    assert_eq!(wizard.next(), Transition::Moved(WizardStep::Outcomes));

    while wizard.form().outcomes.len() < form.outcomes.len() {
        wizard.add_outcome();
    }
    while wizard.form().outcomes.len() > form.outcomes.len() {
        let last = wizard.form().outcomes.len() - 1;
        wizard.remove_outcome(last).expect("index in range");
    }
    for (i, outcome) in form.outcomes.iter().enumerate() {
        wizard.update_outcome(i, outcome.clone()).expect("index in range");
    }
    assert_eq!(wizard.next(), Transition::Moved(WizardStep::TimelineLiquidity));

    wizard.set_field(Field::EndDate, form.end_date.clone()).expect("text field");
    wizard.set_field(Field::EndTime, form.end_time.clone()).expect("text field");
    wizard
        .set_field(Field::InitialLiquidity, form.initial_liquidity.clone())
        .expect("text field");
}
