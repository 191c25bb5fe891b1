use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::shared::request_fields::{optional_integer, optional_text};

pub const DEFAULT_POST_COUNT: u32 = 5;
pub const MAX_POST_COUNT: u32 = 30;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    #[serde(default, deserialize_with = "optional_text")]
    pub business_type: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub business_desc: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub tone: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub network: Option<String>,
    #[serde(default, deserialize_with = "optional_integer")]
    pub post_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBrief {
    pub business_type: String,
    pub business_desc: Option<String>,
    pub tone: Option<String>,
    pub network: Option<String>,
    pub post_count: u32,
}

/// Missing, zero and negative counts fall back to the default; large ones are
/// capped.
pub fn clamp_post_count(requested: Option<i64>) -> u32 {
    match requested {
        Some(count) if count > 0 => count.min(MAX_POST_COUNT as i64) as u32,
        _ => DEFAULT_POST_COUNT,
    }
}

impl ContentRequest {
    pub fn validate(self) -> ApiResult<ContentBrief> {
        let business_type = self.business_type.ok_or_else(|| {
            ApiError::Validation("Faltan campos obligatorios: businessType".to_string())
        })?;

        Ok(ContentBrief {
            business_type,
            business_desc: self.business_desc,
            tone: self.tone,
            network: self.network,
            post_count: clamp_post_count(self.post_count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn post_count_is_clamped() {
        assert_eq!(clamp_post_count(None), 5);
        assert_eq!(clamp_post_count(Some(0)), 5);
        assert_eq!(clamp_post_count(Some(-4)), 5);
        assert_eq!(clamp_post_count(Some(1)), 1);
        assert_eq!(clamp_post_count(Some(7)), 7);
        assert_eq!(clamp_post_count(Some(30)), 30);
        assert_eq!(clamp_post_count(Some(45)), 30);
    }

    #[test]
    fn business_type_is_required() {
        let request: ContentRequest =
            serde_json::from_value(json!({ "tone": "funny", "postCount": 3 })).unwrap();

        let error = request.validate().unwrap_err();

        assert!(matches!(error, ApiError::Validation(_)));
        assert!(error.to_string().contains("businessType"));
    }

    #[test]
    fn string_post_count_is_parsed() {
        let request: ContentRequest =
            serde_json::from_value(json!({ "businessType": "Cafetería", "postCount": "12" }))
                .unwrap();

        assert_eq!(request.validate().unwrap().post_count, 12);
    }
}
