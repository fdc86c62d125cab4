use axon_core::config::*;
use axon_core::errors::ConfigError;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = AxonConfig::from_toml("").unwrap();

    // Retrieval defaults
    assert_eq!(config.retrieval.top_k, 10);
    assert_eq!(config.retrieval.rerank_top_k, 5);
    assert_eq!(config.retrieval.rrf_k, 60);
    assert_eq!(config.retrieval.search_timeout_ms, 2_000);

    // Routing defaults
    assert_eq!(config.routing.confidence_threshold, 0.6);
    assert_eq!(config.routing.clarification_specialist, "clarify");

    // Guardrail defaults
    assert_eq!(config.guardrails.confidence_threshold, 0.7);
    assert_eq!(config.guardrails.min_grounded_ratio, 0.8);
    assert!(config.guardrails.rules.is_empty());

    // Lifecycle defaults
    assert_eq!(config.lifecycle.max_retries, 2);
    assert_eq!(config.lifecycle.request_timeout_ms, 30_000);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[retrieval]
top_k = 20
rerank_top_k = 8

[lifecycle]
max_retries = 1
"#;
    let config = AxonConfig::from_toml(toml).unwrap();
    assert_eq!(config.retrieval.top_k, 20);
    assert_eq!(config.retrieval.rerank_top_k, 8);
    assert_eq!(config.lifecycle.max_retries, 1);
    // Non-overridden fields keep defaults
    assert_eq!(config.retrieval.rrf_k, 60);
    assert_eq!(config.guardrails.confidence_threshold, 0.7);
}

#[test]
fn negative_dense_weight_is_a_contradiction() {
    let toml = r#"
[retrieval]
dense_weight = -0.5
"#;
    let err = AxonConfig::from_toml(toml).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { .. }));
}

#[test]
fn rerank_top_k_must_not_exceed_top_k() {
    let toml = r#"
[retrieval]
top_k = 5
rerank_top_k = 10
"#;
    let err = AxonConfig::from_toml(toml).unwrap_err();
    assert!(matches!(err, ConfigError::Contradiction { .. }));
}

#[test]
fn threshold_outside_unit_range_fails_fast() {
    let toml = r#"
[guardrails]
confidence_threshold = 1.5
"#;
    let err = AxonConfig::from_toml(toml).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { .. }));
}

#[test]
fn unknown_fields_are_rejected() {
    let toml = r#"
[surprise]
value = 1
"#;
    assert!(AxonConfig::from_toml(toml).is_err());
}

#[test]
fn domain_rules_parse_from_toml() {
    let toml = r#"
[[guardrails.rules]]
name = "no-ssn"
kind = "pattern"
pattern = "\\d{3}-\\d{2}-\\d{4}"
action = "reject"

[[guardrails.rules]]
name = "length-cap"
kind = "max_answer_chars"
limit = 4000
action = "flag"
"#;
    let config = AxonConfig::from_toml(toml).unwrap();
    assert_eq!(config.guardrails.rules.len(), 2);
    assert_eq!(config.guardrails.rules[0].action, RuleAction::Reject);
    assert!(matches!(
        config.guardrails.rules[1].kind,
        RuleKind::MaxAnswerChars { limit: 4000 }
    ));
}

#[test]
fn config_serde_roundtrip() {
    let config = AxonConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = AxonConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.retrieval.top_k, config.retrieval.top_k);
    assert_eq!(
        roundtripped.lifecycle.max_retries,
        config.lifecycle.max_retries
    );
}
