//! Homestay (lodging facility) model

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;

/// Homestay identifier pattern (HS followed by 4-6 digits, e.g. HS0001)
pub(crate) static HOMESTAY_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^HS\d{4,6}$").expect("invalid homestay id pattern"));

/// Lodging facility. Reference data: loaded once at startup and never
/// mutated by business operations; `max_capacity` bounds the size of any
/// tour held at the facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Homestay {
    #[validate(regex(path = *HOMESTAY_ID_RE, message = "Homestay ID must match HS0001 format"))]
    pub id: String,
    #[validate(length(min = 1, message = "Homestay name cannot be empty"))]
    pub name: String,
    pub room_count: u32,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: String,
    /// Maximum number of guests allowed; used for tour capacity validation
    pub max_capacity: u32,
}

impl Homestay {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        room_count: u32,
        address: impl Into<String>,
        max_capacity: u32,
    ) -> AppResult<Self> {
        let homestay = Self {
            id: id.into(),
            name: name.into(),
            room_count,
            address: address.into(),
            max_capacity,
        };
        homestay.validate()?;
        Ok(homestay)
    }

    /// Whether this facility can host `tourist_count` guests at once
    pub fn can_accommodate(&self, tourist_count: u32) -> bool {
        tourist_count <= self.max_capacity
    }
}
