use std::time::Duration;

use chrono::NaiveDate;
use reqwest::StatusCode;
use sposync::utils::*;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should not be empty
    assert!(!challenge.is_empty());

    // Should be deterministic - same input produces same output
    let challenge2 = generate_code_challenge(verifier);
    assert_eq!(challenge, challenge2);

    // Different input should produce different output
    let challenge3 = generate_code_challenge("different_verifier");
    assert_ne!(challenge, challenge3);

    // Should be base64-encoded (URL-safe, no padding)
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_match_key_normalizes_case_and_whitespace() {
    assert_eq!(
        match_key("  Test Artist ", "Test Track"),
        "test artist|||test track"
    );
    assert_eq!(
        match_key("Test Artist", "test track"),
        match_key("test artist", "Test Track")
    );

    // Different tracks produce different keys
    assert_ne!(match_key("a", "b"), match_key("a", "c"));
}

#[test]
fn test_parse_added_at() {
    let parsed = parse_added_at("2026-01-28T13:00:00Z").unwrap();
    assert_eq!(parsed.to_rfc3339(), "2026-01-28T13:00:00+00:00");

    // Garbage yields None instead of a default timestamp
    assert!(parse_added_at("not a timestamp").is_none());
    assert!(parse_added_at("").is_none());
}

#[test]
fn test_normalize_release_date() {
    // Year precision counts from January 1st
    assert_eq!(
        normalize_release_date("2023"),
        NaiveDate::from_ymd_opt(2023, 1, 1)
    );

    // Month precision counts from the 1st
    assert_eq!(
        normalize_release_date("2023-05"),
        NaiveDate::from_ymd_opt(2023, 5, 1)
    );

    // Day precision passes through
    assert_eq!(
        normalize_release_date("2023-05-17"),
        NaiveDate::from_ymd_opt(2023, 5, 17)
    );

    assert_eq!(normalize_release_date("someday"), None);
}

#[test]
fn test_retry_policy_delays_grow_exponentially() {
    let policy = RetryPolicy {
        max_attempts: 4,
        base_delay: Duration::from_secs(2),
    };

    assert_eq!(policy.delay_for(0), Duration::from_secs(2));
    assert_eq!(policy.delay_for(1), Duration::from_secs(4));
    assert_eq!(policy.delay_for(2), Duration::from_secs(8));
}

#[test]
fn test_retry_policy_attempt_budget() {
    let policy = RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_secs(1),
    };

    assert!(policy.attempts_left(0));
    assert!(policy.attempts_left(1));
    assert!(!policy.attempts_left(2));
    assert!(!policy.attempts_left(10));
}

#[test]
fn test_retry_policy_retryable_statuses() {
    assert!(RetryPolicy::is_retryable_status(
        StatusCode::TOO_MANY_REQUESTS
    ));
    assert!(RetryPolicy::is_retryable_status(
        StatusCode::INTERNAL_SERVER_ERROR
    ));
    assert!(RetryPolicy::is_retryable_status(StatusCode::BAD_GATEWAY));

    assert!(!RetryPolicy::is_retryable_status(StatusCode::NOT_FOUND));
    assert!(!RetryPolicy::is_retryable_status(StatusCode::UNAUTHORIZED));
}
