//! Fixed instruction and output contract for prescription extraction.

use serde_json::{Value, json};

pub const PHARMACIST_INSTRUCTION: &str = "You need to be my pharmacist and extract the important information related to my medicines in the prescription.";

/// Response schema handed to the model in structured-output mode.
///
/// Mirrors [`crate::core::models::MedicationList`]; the enum lists must stay
/// in sync with `TimeOfDay` and `FoodRelationship`.
#[must_use]
pub fn medication_list_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "medications": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "medicine_name": { "type": "STRING" },
                        "time_of_day": {
                            "type": "STRING",
                            "format": "enum",
                            "enum": ["morning", "noon", "evening", "night"]
                        },
                        "number_of_days": { "type": "INTEGER" },
                        "food_relationship": {
                            "type": "STRING",
                            "format": "enum",
                            "enum": ["before_food", "after_food"]
                        },
                        "dosage": { "type": "INTEGER" }
                    },
                    "required": [
                        "medicine_name",
                        "time_of_day",
                        "number_of_days",
                        "food_relationship",
                        "dosage"
                    ],
                    "propertyOrdering": [
                        "medicine_name",
                        "time_of_day",
                        "number_of_days",
                        "food_relationship",
                        "dosage"
                    ]
                }
            }
        },
        "required": ["medications"]
    })
}
