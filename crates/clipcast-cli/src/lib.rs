use clipcast_core::PublishError;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Render a pipeline failure as the JSON error object printed to stdout.
pub fn error_json(error: &PublishError) -> String {
    let value = serde_json::json!({
        "error": {
            "code": error.error_code(),
            "message": error.to_string(),
        }
    });
    // json! output of plain strings cannot fail to serialize
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
