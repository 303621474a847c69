use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::Error;

pub const MAX_QUESTION_CHARS: usize = 200;
pub const MIN_OUTCOMES: usize = 2;
pub const MAX_OUTCOMES: usize = 6;

/// Data collected by the creation wizard and handed to the submission consumer.
///
/// Field values are kept exactly as typed; blank outcome slots are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketFormData {
    pub question: String,
    pub description: String,
    pub category: Category,
    pub outcomes: Vec<String>,
    /// `YYYY-MM-DD`
    pub end_date: String,
    /// `HH:MM`
    pub end_time: String,
    pub initial_liquidity: String,
}

impl Default for MarketFormData {
    fn default() -> Self {
        Self {
            question: String::new(),
            description: String::new(),
            category: Category::default(),
            outcomes: vec!["Yes".to_string(), "No".to_string()],
            end_date: String::new(),
            end_time: String::new(),
            initial_liquidity: String::new(),
        }
    }
}

impl MarketFormData {
    /// Outcome labels that are not blank, as typed.
    pub fn filled_outcomes(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .map(String::as_str)
            .filter(|o| !o.trim().is_empty())
    }

    /// Mutable access to a free-text field. `None` for category and outcomes.
    pub(crate) fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Question => Some(&mut self.question),
            Field::Description => Some(&mut self.description),
            Field::EndDate => Some(&mut self.end_date),
            Field::EndTime => Some(&mut self.end_time),
            Field::InitialLiquidity => Some(&mut self.initial_liquidity),
            Field::Category | Field::Outcomes => None,
        }
    }
}

/// Named form inputs; keys of the field error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Question,
    Description,
    Category,
    Outcomes,
    EndDate,
    EndTime,
    InitialLiquidity,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Question => "question",
            Field::Description => "description",
            Field::Category => "category",
            Field::Outcomes => "outcomes",
            Field::EndDate => "endDate",
            Field::EndTime => "endTime",
            Field::InitialLiquidity => "initialLiquidity",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "question" => Ok(Field::Question),
            "description" => Ok(Field::Description),
            "category" => Ok(Field::Category),
            "outcomes" => Ok(Field::Outcomes),
            "endDate" | "end_date" => Ok(Field::EndDate),
            "endTime" | "end_time" => Ok(Field::EndTime),
            "initialLiquidity" | "initial_liquidity" => Ok(Field::InitialLiquidity),
            other => Err(Error::InvalidField(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_has_yes_no() {
        let form = MarketFormData::default();
        assert_eq!(form.outcomes, vec!["Yes", "No"]);
        assert_eq!(form.category, Category::Crypto);
        assert!(form.question.is_empty());
    }

    #[test]
    fn filled_outcomes_skips_blank() {
        let form = MarketFormData {
            outcomes: vec!["Yes".into(), "  ".into(), "Maybe ".into(), String::new()],
            ..Default::default()
        };
        let filled: Vec<&str> = form.filled_outcomes().collect();
        assert_eq!(filled, vec!["Yes", "Maybe "]);
    }

    #[test]
    fn field_names_parse_back() {
        for field in [
            Field::Question,
            Field::Description,
            Field::Category,
            Field::Outcomes,
            Field::EndDate,
            Field::EndTime,
            Field::InitialLiquidity,
        ] {
            assert_eq!(field.as_str().parse::<Field>().unwrap(), field);
        }
        assert!("title".parse::<Field>().is_err());
    }

    #[test]
    fn serializes_with_submission_keys() {
        let form = MarketFormData {
            question: "Q".into(),
            description: "D".into(),
            category: Category::Science,
            outcomes: vec!["A".into(), "B".into()],
            end_date: "2030-01-02".into(),
            end_time: "12:00".into(),
            initial_liquidity: "0.5".into(),
        };
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["category"], "science");
        assert_eq!(json["endDate"], "2030-01-02");
        assert_eq!(json["endTime"], "12:00");
        assert_eq!(json["initialLiquidity"], "0.5");
        assert_eq!(json["outcomes"][1], "B");
    }

    #[test]
    fn category_and_outcomes_are_not_text() {
        let mut form = MarketFormData::default();
        assert!(form.text_mut(Field::Category).is_none());
        assert!(form.text_mut(Field::Outcomes).is_none());
        assert!(form.text_mut(Field::EndTime).is_some());
    }
}
