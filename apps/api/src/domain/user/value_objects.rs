use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    pub static ref ROLL_NUMBER_REGEX: regex::Regex =
        regex::Regex::new(r"(?i)^(2[2-6])(cs|ce|me|ee)\d{2}$").unwrap();
}

/// Campus roll number in the `YYbbNN` form, e.g. `22CS05`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RollNumber {
    #[validate(regex(
        path = *ROLL_NUMBER_REGEX,
        message = "Roll number must be in format: YYbbNN (e.g., 22CS05, 24EE12)"
    ))]
    pub value: String,
}

impl RollNumber {
    /// Validates and upper-cases the roll number.
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let roll = Self {
            value: value.trim().to_string(),
        };
        roll.validate()?;
        Ok(Self {
            value: roll.value.to_uppercase(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Password {
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub value: String,
}

impl Password {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let password = Self { value };
        password.validate()?;
        Ok(password)
    }
}
