use super::*;

fn create_test_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        algorithm: Algorithm::HS256,
        expires_minutes: 15,
    })
}

#[test]
fn test_issue_and_validate() {
    let service = create_test_service();
    let user_id = Uuid::new_v4();

    let token = service.issue(user_id).unwrap();
    let claims = service.validate_token(&token).unwrap();

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.exp - claims.iat, 15 * 60);
}

#[test]
fn test_reissue_slides_expiry_forward() {
    let service = create_test_service();
    let user_id = Uuid::new_v4();
    let t0 = Utc::now() - Duration::minutes(5);

    let original = service.issue_at(user_id, t0).unwrap();
    let claims = service.validate_token(&original).unwrap();
    assert_eq!(claims.exp, (t0 + Duration::minutes(15)).timestamp());

    let refreshed = service.issue(claims.user_id()).unwrap();
    let refreshed_claims = service.validate_token(&refreshed).unwrap();
    let expected = (t0 + Duration::minutes(20)).timestamp();

    assert_ne!(original, refreshed);
    assert!((refreshed_claims.exp - expected).abs() <= 2);
}

#[test]
fn test_expired_token() {
    let service = create_test_service();
    let token = service
        .issue_at(Uuid::new_v4(), Utc::now() - Duration::minutes(20))
        .unwrap();

    assert!(matches!(
        service.validate_token(&token),
        Err(JwtError::Expired)
    ));
}

#[test]
fn test_invalid_token() {
    let service = create_test_service();
    let result = service.validate_token("invalid.token.here");
    assert!(matches!(result, Err(JwtError::DecodingError(_))));
}

#[test]
fn test_token_signed_with_other_secret() {
    let service = create_test_service();
    let other = JwtService::new(JwtConfig {
        secret: "another-secret".to_string(),
        ..JwtConfig::default()
    });

    let token = other.issue(Uuid::new_v4()).unwrap();
    assert!(service.validate_token(&token).is_err());
}

#[test]
fn test_config_conversion_rejects_unknown_algorithm() {
    let config = crate::config::JwtConfig {
        secret: "s".to_string(),
        algorithm: "HS999".to_string(),
        expiration_minutes: 15,
    };
    assert!(matches!(
        JwtConfig::try_from(&config),
        Err(JwtError::UnsupportedAlgorithm(_))
    ));
}

#[test]
fn test_debug_hides_keys() {
    let rendered = format!("{:?}", create_test_service());
    assert!(rendered.contains("[hidden]"));
    assert!(!rendered.contains("test-secret-key-for-testing"));
}
