use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::RemediError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Noon,
    Evening,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodRelationship {
    BeforeFood,
    AfterFood,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Medication {
    pub medicine_name: String,
    pub time_of_day: TimeOfDay,
    pub number_of_days: i64,
    pub food_relationship: FoodRelationship,
    pub dosage: i64,
}

/// Root object of the structured model output: one entry per medicine found
/// on the prescription, in the order the model reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MedicationList {
    pub medications: Vec<Medication>,
}

impl MedicationList {
    /// Parses the raw text returned by the extraction service.
    ///
    /// # Errors
    ///
    /// Returns `RemediError::ParseError` if the text is not JSON or does not
    /// match the declared shape (including out-of-range enum values).
    pub fn from_model_text(text: &str) -> Result<Self, RemediError> {
        serde_json::from_str(text.trim()).map_err(RemediError::from)
    }
}

/// Flat reminder payload as delivered to the notifier lambda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub phone_number: String,
    pub medicine_name: String,
    pub time_of_day: String,
    pub food_relationship: String,
    pub dosage: String,
    pub time: String,
}

impl ReminderRequest {
    /// # Errors
    ///
    /// Returns `RemediError::MissingField` naming the first absent field.
    pub fn from_event(event: &Value) -> Result<Self, RemediError> {
        Ok(Self {
            phone_number: field_text(event, "phoneNumber")?,
            medicine_name: field_text(event, "medicineName")?,
            time_of_day: field_text(event, "time_of_day")?,
            food_relationship: field_text(event, "food_relationship")?,
            dosage: field_text(event, "dosage")?,
            time: field_text(event, "time")?,
        })
    }

    #[must_use]
    pub fn sms_body(&self) -> String {
        format!(
            "Reminder: Take your {} at {} ({}). Dosage: {}. {}",
            self.medicine_name, self.time, self.time_of_day, self.dosage, self.food_relationship
        )
    }
}

fn field_text(event: &Value, key: &str) -> Result<String, RemediError> {
    match event.get(key) {
        None | Some(Value::Null) => Err(RemediError::MissingField(key.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
    }
}
