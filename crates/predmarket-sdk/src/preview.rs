use serde::{Deserialize, Serialize};

use crate::form::MarketFormData;
use crate::schedule::{end_datetime, format_end};

pub const QUESTION_PLACEHOLDER: &str = "Your question";
pub const END_NOT_SET: &str = "Not set";

/// Read-only summary shown beside the timeline step. Never fails: partially
/// filled forms fall back to placeholder text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPreview {
    pub question: String,
    pub outcomes: Vec<String>,
    pub category_label: String,
    pub ends: String,
}

impl MarketPreview {
    pub fn from_form(form: &MarketFormData) -> Self {
        let question = if form.question.is_empty() {
            QUESTION_PLACEHOLDER.to_string()
        } else {
            form.question.clone()
        };

        let ends = end_datetime(&form.end_date, &form.end_time)
            .map(format_end)
            .unwrap_or_else(|| END_NOT_SET.to_string());

        Self {
            question,
            outcomes: form.filled_outcomes().map(str::to_string).collect(),
            category_label: form.category.label().to_string(),
            ends,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    #[test]
    fn empty_form_uses_placeholders() {
        let preview = MarketPreview::from_form(&MarketFormData::default());
        assert_eq!(preview.question, QUESTION_PLACEHOLDER);
        assert_eq!(preview.outcomes, vec!["Yes", "No"]);
        assert_eq!(preview.category_label, "Crypto");
        assert_eq!(preview.ends, END_NOT_SET);
    }

    #[test]
    fn filled_form() {
        let form = MarketFormData {
            question: "Will it rain?".into(),
            category: Category::Science,
            outcomes: vec!["Rain".into(), "".into(), "Dry".into()],
            end_date: "2030-03-04".into(),
            end_time: "08:05".into(),
            ..Default::default()
        };
        let preview = MarketPreview::from_form(&form);
        assert_eq!(preview.question, "Will it rain?");
        assert_eq!(preview.outcomes, vec!["Rain", "Dry"]);
        assert_eq!(preview.category_label, "Science");
        assert_eq!(preview.ends, "Mar 4, 2030 at 08:05");
    }

    #[test]
    fn half_set_or_garbled_end_is_not_set() {
        let only_date = MarketFormData {
            end_date: "2030-03-04".into(),
            ..Default::default()
        };
        assert_eq!(MarketPreview::from_form(&only_date).ends, END_NOT_SET);

        let garbled = MarketFormData {
            end_date: "someday".into(),
            end_time: "soon".into(),
            ..Default::default()
        };
        assert_eq!(MarketPreview::from_form(&garbled).ends, END_NOT_SET);
    }
}
