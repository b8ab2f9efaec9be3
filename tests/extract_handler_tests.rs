use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use remedi::ai::prompt::PHARMACIST_INSTRUCTION;
use remedi::ai::{ExtractionService, UploadedFile};
use remedi::api::extract_handler::process_prescription;
use remedi::api::helpers::response_body;
use remedi::core::config::GeminiConfig;
use remedi::core::staging::StagedImage;
use remedi::errors::{ConfigError, RemediError};
use serde_json::{Value, json};

const MODEL_OUTPUT: &str = r#"{
  "medications": [
    {"medicine_name": "Amoxicillin", "time_of_day": "morning", "number_of_days": 7, "food_relationship": "after_food", "dosage": 1},
    {"medicine_name": "Paracetamol", "time_of_day": "night", "number_of_days": 3, "food_relationship": "before_food", "dosage": 2}
  ]
}"#;

#[derive(Debug, Default)]
struct Observed {
    staged_path: Option<PathBuf>,
    staged_bytes: Option<Vec<u8>>,
    mime_type: Option<String>,
    display_name: Option<String>,
    instruction: Option<String>,
    schema: Option<Value>,
}

/// Outcome the fake service produces for each step.
#[derive(Clone)]
enum Script {
    Text(String),
    FailUpload,
    FailGenerate,
}

struct FakeGemini {
    script: Script,
    observed: Arc<Mutex<Observed>>,
}

#[async_trait]
impl ExtractionService for FakeGemini {
    async fn upload_file(
        &self,
        image: &StagedImage,
        display_name: &str,
    ) -> Result<UploadedFile, RemediError> {
        {
            let mut observed = self.observed.lock().unwrap();
            observed.staged_path = Some(image.path().to_path_buf());
            observed.staged_bytes = Some(std::fs::read(image.path()).unwrap());
            observed.mime_type = Some(image.mime_type().to_string());
            observed.display_name = Some(display_name.to_string());
        }

        if matches!(self.script, Script::FailUpload) {
            return Err(RemediError::GeminiError("upload rejected".to_string()));
        }

        Ok(UploadedFile {
            name: "files/fake".to_string(),
            uri: "https://example.test/files/fake".to_string(),
            mime_type: image.mime_type().to_string(),
        })
    }

    async fn generate_structured(
        &self,
        instruction: &str,
        _file: &UploadedFile,
        schema: &Value,
    ) -> Result<String, RemediError> {
        {
            let mut observed = self.observed.lock().unwrap();
            observed.instruction = Some(instruction.to_string());
            observed.schema = Some(schema.clone());
        }

        match &self.script {
            Script::Text(text) => Ok(text.clone()),
            _ => Err(RemediError::GeminiError("model overloaded".to_string())),
        }
    }
}

fn config() -> Result<GeminiConfig, ConfigError> {
    Ok(GeminiConfig {
        api_key: "test-key".to_string(),
        model: "gemini-test".to_string(),
    })
}

fn upload_event(bytes: &[u8], disposition: Option<&str>) -> Value {
    let mut headers = json!({ "Content-Type": "image/png" });
    if let Some(d) = disposition {
        headers["Content-Disposition"] = json!(d);
    }
    json!({
        "body": STANDARD.encode(bytes),
        "isBase64Encoded": true,
        "headers": headers
    })
}

async fn run(event: &Value, script: Script) -> (Value, Arc<Mutex<Observed>>) {
    let observed = Arc::new(Mutex::new(Observed::default()));
    let shared = observed.clone();
    let response = process_prescription(event, config(), move |_| FakeGemini {
        script,
        observed: shared,
    })
    .await;
    (response, observed)
}

fn assert_cors(response: &Value) {
    assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");
    assert_eq!(response["headers"]["Content-Type"], "application/json");
}

#[tokio::test]
async fn test_medications_round_trip_verbatim() {
    let event = upload_event(b"\x89PNG-bytes", Some("attachment; filename=\"rx.jpg\""));
    let (response, observed) = run(&event, Script::Text(MODEL_OUTPUT.to_string())).await;

    assert_eq!(response["statusCode"], 200);
    assert_cors(&response);

    let body = response_body(&response).unwrap();
    let expected: Value = serde_json::from_str(MODEL_OUTPUT).unwrap();
    assert_eq!(body["medications"], expected);
    assert_eq!(body["filename"], "rx.jpg");

    let observed = observed.lock().unwrap();
    assert_eq!(observed.staged_bytes.as_deref(), Some(&b"\x89PNG-bytes"[..]));
    assert_eq!(observed.display_name.as_deref(), Some("rx.jpg"));
    assert_eq!(observed.mime_type.as_deref(), Some("image/png"));
    assert_eq!(observed.instruction.as_deref(), Some(PHARMACIST_INSTRUCTION));
    assert_eq!(
        observed.schema.as_ref().unwrap()["required"],
        json!(["medications"])
    );
}

#[tokio::test]
async fn test_default_filename_when_header_missing() {
    let event = upload_event(b"img", None);
    let (response, observed) = run(&event, Script::Text(MODEL_OUTPUT.to_string())).await;

    let body = response_body(&response).unwrap();
    assert_eq!(body["filename"], "prescription.png");

    let path = observed.lock().unwrap().staged_path.clone().unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
}

#[tokio::test]
async fn test_empty_medication_list_is_success() {
    let event = upload_event(b"img", None);
    let (response, _) = run(&event, Script::Text("{\"medications\": []}".to_string())).await;

    assert_eq!(response["statusCode"], 200);
    let body = response_body(&response).unwrap();
    assert_eq!(body["medications"], json!({ "medications": [] }));
}

#[tokio::test]
async fn test_temp_file_removed_after_success() {
    let event = upload_event(b"img", None);
    let (response, observed) = run(&event, Script::Text(MODEL_OUTPUT.to_string())).await;

    assert_eq!(response["statusCode"], 200);
    let path = observed.lock().unwrap().staged_path.clone().unwrap();
    assert!(!path.exists(), "staged file should be deleted: {}", path.display());
}

#[tokio::test]
async fn test_temp_file_removed_after_upload_failure() {
    let event = upload_event(b"img", None);
    let (response, observed) = run(&event, Script::FailUpload).await;

    assert_eq!(response["statusCode"], 500);
    assert_cors(&response);
    let path = observed.lock().unwrap().staged_path.clone().unwrap();
    assert!(!path.exists());
}

#[tokio::test]
async fn test_temp_file_removed_after_generation_failure() {
    let event = upload_event(b"img", None);
    let (response, observed) = run(&event, Script::FailGenerate).await;

    assert_eq!(response["statusCode"], 500);
    let body = response_body(&response).unwrap();
    assert!(body["error"].as_str().unwrap().contains("model overloaded"));
    let path = observed.lock().unwrap().staged_path.clone().unwrap();
    assert!(!path.exists());
}

#[tokio::test]
async fn test_temp_file_removed_after_malformed_output() {
    let event = upload_event(b"img", None);
    let (response, observed) = run(&event, Script::Text("not json at all".to_string())).await;

    assert_eq!(response["statusCode"], 500);
    let path = observed.lock().unwrap().staged_path.clone().unwrap();
    assert!(!path.exists());
}

#[tokio::test]
async fn test_out_of_enum_value_is_rejected() {
    let output = r#"{"medications": [{"medicine_name": "Zinc", "time_of_day": "afternoon", "number_of_days": 5, "food_relationship": "after_food", "dosage": 1}]}"#;
    let event = upload_event(b"img", None);
    let (response, _) = run(&event, Script::Text(output.to_string())).await;

    assert_eq!(response["statusCode"], 500);
    let body = response_body(&response).unwrap();
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to parse model output"), "{error}");
    assert!(body.get("medications").is_none());
}

#[tokio::test]
async fn test_missing_api_key_skips_client() {
    let event = upload_event(b"img", None);
    let connected = Arc::new(Mutex::new(false));
    let flag = connected.clone();

    let response = process_prescription(
        &event,
        Err(ConfigError::Missing("GEMINI_API_KEY")),
        move |_| {
            *flag.lock().unwrap() = true;
            FakeGemini {
                script: Script::FailUpload,
                observed: Arc::default(),
            }
        },
    )
    .await;

    assert_eq!(response["statusCode"], 500);
    assert_cors(&response);
    assert_eq!(
        response_body(&response).unwrap(),
        json!({ "error": "GEMINI_API_KEY environment variable not set" })
    );
    assert!(!*connected.lock().unwrap());
}

#[tokio::test]
async fn test_invalid_base64_returns_500() {
    let event = json!({
        "body": "%%%%",
        "isBase64Encoded": true,
        "headers": {}
    });
    let (response, observed) = run(&event, Script::Text(MODEL_OUTPUT.to_string())).await;

    assert_eq!(response["statusCode"], 500);
    assert_cors(&response);
    let body = response_body(&response).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Failed to decode request body"));
    assert!(observed.lock().unwrap().staged_path.is_none());
}

#[tokio::test]
async fn test_raw_body_is_uploaded_as_is() {
    let event = json!({
        "body": "raw-image",
        "headers": { "content-disposition": "inline; filename=photo.webp" }
    });
    let (response, observed) = run(&event, Script::Text(MODEL_OUTPUT.to_string())).await;

    assert_eq!(response["statusCode"], 200);
    let observed = observed.lock().unwrap();
    assert_eq!(observed.staged_bytes.as_deref(), Some(&b"raw-image"[..]));
    assert_eq!(observed.display_name.as_deref(), Some("photo.webp"));
}
