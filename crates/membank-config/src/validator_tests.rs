use super::*;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_zero_top_k() {
    let mut config = Config::default();
    config.search.top_k = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "search.top_k"));
}

#[test]
fn test_validate_zero_rrf_k() {
    let mut config = Config::default();
    config.search.rrf_k = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "search.rrf_k"));
}

#[test]
fn test_validate_threshold_out_of_range() {
    let mut config = Config::default();
    config.search.threshold = 1.5;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "search.threshold"));
}

#[test]
fn test_validate_zero_threshold_warning() {
    let mut config = Config::default();
    config.search.threshold = 0.0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "search.threshold"));
}

#[test]
fn test_validate_unknown_provider() {
    let mut config = Config::default();
    config.embedding.provider = "onnx".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "embedding.provider"));
}

#[test]
fn test_validate_unknown_metric() {
    let mut config = Config::default();
    config.embedding.metric = "dot".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "embedding.metric"));
}

#[test]
fn test_validate_metric_ignores_case() {
    let mut config = Config::default();
    config.embedding.metric = "Cosine".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.errors.iter().any(|e| e.path == "embedding.metric"));
}

#[test]
fn test_validate_openai_requires_api_key() {
    let mut config = Config::default();
    config.embedding.provider = "openai".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "embedding.api_key"));

    config.embedding.api_key = Some("sk-test".to_string());
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
}

#[test]
fn test_validate_openai_base_url() {
    let mut config = Config::default();
    config.embedding.provider = "openai".to_string();
    config.embedding.api_key = Some("sk-test".to_string());
    config.embedding.base_url = "api.openai.com".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "embedding.base_url"));
}

#[test]
fn test_into_result_reports_first_error() {
    let mut config = Config::default();
    config.search.top_k = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    match result.into_result() {
        Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "search.top_k"),
        other => panic!("expected InvalidValue, got {:?}", other),
    }
}

#[test]
fn test_into_result_passes_warnings() {
    let mut config = Config::default();
    config.search.threshold = 0.0;

    let warnings = ConfigValidator::validate(&config)
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(warnings.len(), 1);
}
