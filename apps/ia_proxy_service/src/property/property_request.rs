use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::shared::request_fields::optional_text;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRequest {
    #[serde(default, deserialize_with = "optional_text")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub rooms: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub bathrooms: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub features: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyBrief {
    pub property_type: String,
    pub location: String,
    pub rooms: Option<String>,
    pub bathrooms: Option<String>,
    pub size: Option<String>,
    pub features: Option<String>,
    pub style: Option<String>,
}

impl PropertyRequest {
    pub fn validate(self) -> ApiResult<PropertyBrief> {
        match (self.property_type, self.location) {
            (Some(property_type), Some(location)) => Ok(PropertyBrief {
                property_type,
                location,
                rooms: self.rooms,
                bathrooms: self.bathrooms,
                size: self.size,
                features: self.features,
                style: self.style,
            }),
            (property_type, location) => {
                let missing: Vec<&str> = [
                    ("propertyType", property_type.is_none()),
                    ("location", location.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();

                Err(ApiError::Validation(format!(
                    "Faltan campos obligatorios: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}
