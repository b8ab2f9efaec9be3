//! Prescription upload handler.
//!
//! Decodes the uploaded image, stages it on disk, has Gemini extract the
//! medication list in structured-output mode and returns it to the browser
//! client. Every response carries CORS headers.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::{Value, json};
use tracing::{error, info};

use super::helpers::{cors_err_response, cors_json_response};
use super::parsing::{decode_body, event_header, resolve_filename};
use crate::ai::prompt::{PHARMACIST_INSTRUCTION, medication_list_schema};
use crate::ai::{ExtractionService, GeminiClient};
use crate::core::config::GeminiConfig;
use crate::core::models::MedicationList;
use crate::core::staging::StagedImage;
use crate::errors::{ConfigError, RemediError};
use crate::utils::mime::resolve_image_mime;

pub use self::function_handler as handler;

/// Lambda entrypoint for the prescription upload route.
///
/// # Errors
///
/// Never fails at the runtime level; all failures become a 500 response.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    info!("Lambda function started");

    #[cfg(feature = "debug-logs")]
    info!("Received event: {:?}", event.payload);

    Ok(process_prescription(&event.payload, GeminiConfig::from_env(), GeminiClient::new).await)
}

/// Runs one extraction and maps the outcome to a proxy response.
///
/// `connect` is only invoked once the configuration has been validated.
pub async fn process_prescription<F, S>(
    payload: &Value,
    config: Result<GeminiConfig, ConfigError>,
    connect: F,
) -> Value
where
    F: FnOnce(&GeminiConfig) -> S,
    S: ExtractionService,
{
    match extract_medications(payload, config, connect).await {
        Ok(body) => cors_json_response(200, &body),
        Err(e) => {
            error!("Error processing image: {}", e);
            cors_err_response(500, &e.to_string())
        }
    }
}

async fn extract_medications<F, S>(
    payload: &Value,
    config: Result<GeminiConfig, ConfigError>,
    connect: F,
) -> Result<Value, RemediError>
where
    F: FnOnce(&GeminiConfig) -> S,
    S: ExtractionService,
{
    let image = decode_body(payload)?;
    let filename = resolve_filename(payload);
    let content_type = event_header(payload, "Content-Type");

    info!(
        filename = %filename,
        content_type = content_type.unwrap_or("<none>"),
        bytes = image.len(),
        "Processing image"
    );

    let config = config.inspect_err(|e| error!("{}", e))?;
    info!(model = %config.model, "Initializing Gemini client");
    let service = connect(&config);

    let mime_type = resolve_image_mime(content_type, &filename);
    let staged = StagedImage::stage(&image, &filename, &mime_type)?;

    let uploaded = service.upload_file(&staged, &filename).await?;
    let text = service
        .generate_structured(PHARMACIST_INSTRUCTION, &uploaded, &medication_list_schema())
        .await?;
    drop(staged);

    let medications = MedicationList::from_model_text(&text)?;
    info!(
        count = medications.medications.len(),
        "Parsed medication info"
    );

    Ok(json!({
        "medications": medications,
        "filename": filename
    }))
}
