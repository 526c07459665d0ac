use async_graphql::SimpleObject;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Number of answer options every generated question must carry.
pub const OPTION_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct QuestionItem {
    #[serde(deserialize_with = "scalar_string")]
    pub question: String,
    #[serde(deserialize_with = "scalar_strings")]
    pub options: Vec<String>,
    #[serde(alias = "answer", deserialize_with = "scalar_string")]
    pub correct_answer: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub explanation: String,
}

/// Generators sometimes emit numbers or booleans where text is expected
/// (`"options": [3, 4, 5, 6]`); those are kept as their JSON text.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(Value::deserialize(deserializer)?)
        .ok_or_else(|| D::Error::custom("expected a string, number or boolean"))
}

fn scalar_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|item| {
            scalar_text(item)
                .ok_or_else(|| D::Error::custom("options must be strings, numbers or booleans"))
        })
        .collect()
}

impl QuestionItem {
    /// Structural check applied to every item recovered from model output.
    pub fn validate_shape(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".to_string());
        }
        if self.options.len() != OPTION_COUNT {
            return Err(format!(
                "expected {} options, got {}",
                OPTION_COUNT,
                self.options.len()
            ));
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err("an option is empty".to_string());
        }
        if self.correct_answer.trim().is_empty() {
            return Err("correct_answer is empty".to_string());
        }
        Ok(())
    }
}
