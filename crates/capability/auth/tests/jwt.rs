use domain::{Role, UserContext};
use vss_auth::{AuthError, JwtManager};

#[test]
fn jwt_issue_and_decode() {
    let jwt = JwtManager::new("secret".to_string(), 3600);
    let ctx = UserContext::new("user-1", "Ana", Role::Junior);

    let token = jwt.issue(&ctx).expect("token");
    let decoded = jwt.decode(&token.token).expect("decode");

    assert_eq!(decoded, ctx);
    assert!(token.expires_at > 0);
}

#[test]
fn jwt_rejects_foreign_signature() {
    let issuer = JwtManager::new("secret-a".to_string(), 3600);
    let verifier = JwtManager::new("secret-b".to_string(), 3600);
    let token = issuer
        .issue(&UserContext::new("user-1", "Ana", Role::Admin))
        .expect("token");

    assert!(matches!(
        verifier.decode(&token.token),
        Err(AuthError::TokenInvalid)
    ));
    assert!(matches!(
        verifier.decode("not-a-jwt"),
        Err(AuthError::TokenInvalid)
    ));
}
