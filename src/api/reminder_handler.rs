//! Medication reminder handler.
//!
//! Verifies the Twilio credentials, formats the reminder and sends it as an
//! SMS. The event is the flat reminder object itself, not a proxy envelope.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::{Value, json};
use tracing::{error, info};

use super::helpers::{err_response, json_response};
use crate::core::config::TwilioConfig;
use crate::core::models::ReminderRequest;
use crate::errors::{ConfigError, RemediError};
use crate::messaging::{MessagingProvider, TwilioClient};

pub use self::function_handler as handler;

pub const SMS_SENT_MESSAGE: &str = "SMS sent successfully";

/// Lambda entrypoint for the reminder route.
///
/// # Errors
///
/// Never fails at the runtime level; failures become error responses.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    Ok(process_reminder(&event.payload, TwilioConfig::from_env(), TwilioClient::new).await)
}

/// Sends one reminder and maps the outcome to a response.
///
/// A provider rejection of the credential probe keeps the provider's status
/// code; every other failure is a 500. `connect` is only invoked once all
/// three credentials are present.
pub async fn process_reminder<F, P>(
    payload: &Value,
    config: Result<TwilioConfig, ConfigError>,
    connect: F,
) -> Value
where
    F: FnOnce(&TwilioConfig) -> P,
    P: MessagingProvider,
{
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Error sending SMS: {}", e);
            return err_response(500, &e.to_string());
        }
    };

    let provider = connect(&config);

    if let Err(e) = provider.fetch_account().await {
        if let RemediError::TwilioError { status, message } = &e {
            error!("Twilio authentication failed: {}", message);
            return err_response(
                *status,
                &format!("Twilio authentication failed: {message}"),
            );
        }
        error!("Error sending SMS: {}", e);
        return err_response(500, &e.to_string());
    }

    match send_reminder(payload, &config, &provider).await {
        Ok(()) => json_response(200, &json!({ "message": SMS_SENT_MESSAGE })),
        Err(e) => {
            error!("Error sending SMS: {}", e);
            err_response(500, &e.to_string())
        }
    }
}

async fn send_reminder<P>(
    payload: &Value,
    config: &TwilioConfig,
    provider: &P,
) -> Result<(), RemediError>
where
    P: MessagingProvider,
{
    let request = ReminderRequest::from_event(payload)?;
    info!(
        medicine_name = %request.medicine_name,
        time_of_day = %request.time_of_day,
        food_relationship = %request.food_relationship,
        dosage = %request.dosage,
        time = %request.time,
        "Extracted reminder fields"
    );

    let body = request.sms_body();
    let message = provider
        .send_message(&config.phone_number, &request.phone_number, &body)
        .await?;

    info!(
        to = %request.phone_number,
        message_sid = %message.sid,
        "SMS sent"
    );
    Ok(())
}
