use std::error::Error;
use remedi::errors::{ConfigError, RemediError};

#[test]
fn test_remedi_error_implements_error_trait() {
    fn assert_error<T: Error>(_: &T) {}

    let error = RemediError::ParseError("test error".to_string());
    assert_error(&error);
    assert_error(&ConfigError::Missing("GEMINI_API_KEY"));
}

#[test]
fn test_remedi_error_display() {
    let error = RemediError::Config(ConfigError::Missing("GEMINI_API_KEY"));
    assert_eq!(format!("{error}"), "GEMINI_API_KEY environment variable not set");

    let error = RemediError::MissingField("phoneNumber".to_string());
    assert_eq!(format!("{error}"), "Missing required field: phoneNumber");

    let error = RemediError::HttpError("Connection error".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to send HTTP request: Connection error"
    );
}

#[test]
fn test_remedi_error_from_conversions() {
    let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let err: RemediError = json_err.into();
    assert!(matches!(err, RemediError::ParseError(_)));

    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: RemediError = io_err.into();
    match err {
        RemediError::IoError(msg) => assert!(msg.contains("denied")),
        other => panic!("Unexpected error type: {other:?}"),
    }

    let err: RemediError = ConfigError::Missing("TWILIO_AUTH_TOKEN").into();
    assert!(matches!(err, RemediError::Config(_)));

    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> RemediError {
        RemediError::from(err)
    }
}

#[test]
fn test_provider_status_only_for_twilio_errors() {
    let err = RemediError::TwilioError {
        status: 401,
        message: "Authenticate".to_string(),
    };
    assert_eq!(err.provider_status(), Some(401));
    assert_eq!(RemediError::MissingBody.provider_status(), None);
}
