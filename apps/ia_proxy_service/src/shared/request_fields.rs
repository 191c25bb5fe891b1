use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// String or number as trimmed text; blank strings, null and other JSON
/// types become `None`.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

pub fn optional_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|n| n.trunc() as i64)),
        Some(Value::String(text)) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n.trunc() as i64))
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "optional_text")]
        text: Option<String>,
        #[serde(default, deserialize_with = "optional_integer")]
        count: Option<i64>,
    }

    fn probe(value: Value) -> Probe {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn text_accepts_strings_and_numbers() {
        assert_eq!(probe(json!({ "text": " Piso " })).text.as_deref(), Some("Piso"));
        assert_eq!(probe(json!({ "text": 3 })).text.as_deref(), Some("3"));
        assert_eq!(probe(json!({ "text": 85.5 })).text.as_deref(), Some("85.5"));
    }

    #[test]
    fn blank_null_and_missing_text_are_none() {
        assert_eq!(probe(json!({ "text": "   " })).text, None);
        assert_eq!(probe(json!({ "text": null })).text, None);
        assert_eq!(probe(json!({ "text": ["x"] })).text, None);
        assert_eq!(probe(json!({})).text, None);
    }

    #[test]
    fn integers_accept_numeric_strings() {
        assert_eq!(probe(json!({ "count": 7 })).count, Some(7));
        assert_eq!(probe(json!({ "count": "12" })).count, Some(12));
        assert_eq!(probe(json!({ "count": 7.9 })).count, Some(7));
        assert_eq!(probe(json!({ "count": "-3" })).count, Some(-3));
        assert_eq!(probe(json!({ "count": "muchos" })).count, None);
    }
}
