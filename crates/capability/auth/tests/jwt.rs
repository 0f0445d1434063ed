use locus_auth::{AuthError, JwtManager};

#[test]
fn issue_and_decode_round_trips() {
    let jwt = JwtManager::new("test-secret".to_string(), 3600);
    let token = jwt.issue_access("admin").expect("issue");
    let subject = jwt.decode_access(&token).expect("decode");
    assert_eq!(subject, "admin");
}

#[test]
fn wrong_secret_is_invalid() {
    let issuer = JwtManager::new("secret-a".to_string(), 3600);
    let verifier = JwtManager::new("secret-b".to_string(), 3600);
    let token = issuer.issue_access("admin").expect("issue");
    assert!(matches!(
        verifier.decode_access(&token),
        Err(AuthError::TokenInvalid)
    ));
}

#[test]
fn tampered_token_is_invalid() {
    let jwt = JwtManager::new("test-secret".to_string(), 3600);
    let mut token = jwt.issue_access("admin").expect("issue");
    token.push('x');
    assert!(matches!(
        jwt.decode_access(&token),
        Err(AuthError::TokenInvalid)
    ));
}

#[test]
fn expired_token_is_reported_as_expired() {
    #[derive(serde::Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
    }

    // 直接用同一密钥构造已过期的 token
    let expired = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &Claims {
            sub: "admin".to_string(),
            exp: 1_000,
        },
        &jsonwebtoken::EncodingKey::from_secret(b"test-secret"),
    )
    .expect("encode");

    let jwt = JwtManager::new("test-secret".to_string(), 3600);
    assert!(matches!(
        jwt.decode_access(&expired),
        Err(AuthError::TokenExpired)
    ));
}
