use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ComplaintText {
    #[validate(length(min = 1, max = 5000, message = "Complaint text is required"))]
    pub value: String,
}

impl ComplaintText {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let text = Self { value };
        text.validate()?;
        Ok(text)
    }
}
