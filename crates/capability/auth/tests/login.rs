use locus_auth::{AuthError, AuthService, JwtManager, OperatorCredentials, hash_password};

fn service() -> AuthService {
    let credentials = OperatorCredentials {
        username: "admin".to_string(),
        password_hash: hash_password("operator-pass").expect("hash"),
    };
    AuthService::new(credentials, JwtManager::new("test-secret".to_string(), 3600))
}

#[test]
fn login_issues_verifiable_token() {
    let auth = service();
    let tokens = auth.login("admin", "operator-pass").expect("login");
    assert_eq!(tokens.expires_in, 3600);

    let subject = auth
        .verify_access_token(&tokens.access_token)
        .expect("verify");
    assert_eq!(subject, "admin");
}

#[test]
fn login_rejects_wrong_password() {
    let auth = service();
    assert!(matches!(
        auth.login("admin", "wrong"),
        Err(AuthError::InvalidCredentials)
    ));
}

#[test]
fn login_rejects_unknown_username() {
    let auth = service();
    assert!(matches!(
        auth.login("root", "operator-pass"),
        Err(AuthError::InvalidCredentials)
    ));
}

#[test]
fn plaintext_credentials_still_log_in() {
    let credentials = OperatorCredentials {
        username: "admin".to_string(),
        password_hash: "operator-pass".to_string(),
    };
    let auth = AuthService::new(credentials, JwtManager::new("test-secret".to_string(), 3600));
    let tokens = auth.login("admin", "operator-pass").expect("login");
    assert!(!tokens.access_token.is_empty());
}
