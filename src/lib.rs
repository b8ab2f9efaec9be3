/// Remedi - Lambda backend for prescription scanning and medication reminders.
///
/// This crate implements two independent Lambdas:
/// 1. An extraction Lambda that receives a prescription image, has Gemini
///    extract the medications in structured-output mode, and returns them
/// 2. A reminder Lambda that verifies Twilio credentials and sends a
///    medication reminder by SMS
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - The Gemini Files and `generateContent` APIs for image understanding
/// - The Twilio REST API for SMS delivery
/// - Tokio for async runtime
///
/// Each invocation is stateless: configuration is read from the environment,
/// one vendor API is called, and the outcome is mapped to a response.
///
/// # Example
///
/// ```no_run
/// use remedi::api::reminder_handler::process_reminder;
/// use remedi::core::config::TwilioConfig;
/// use remedi::messaging::TwilioClient;
///
/// #[tokio::main]
/// async fn main() {
///     remedi::setup_logging();
///
///     let event = serde_json::json!({
///         "phoneNumber": "+15551234567",
///         "medicineName": "Amoxicillin",
///         "time_of_day": "morning",
///         "food_relationship": "before_food",
///         "dosage": "500mg",
///         "time": "8:00 AM"
///     });
///
///     let response = process_reminder(&event, TwilioConfig::from_env(), TwilioClient::new).await;
///     println!("{response}");
/// }
/// ```
// Module declarations
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod messaging;
pub mod utils;

pub use errors::{ConfigError, RemediError};

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. It should be called at the start of each Lambda
/// binary. Calling it more than once is a no-op.
///
/// # Example
///
/// ```
/// remedi::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
