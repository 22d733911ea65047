use super::{Identity, issue_token, verify_token};
use crate::utils::HubError;

const SECRET: &str = "test-secret";

#[test]
fn test_verify_issued_token() {
    let token = issue_token(SECRET, "user-42", Some("alice"), 1).unwrap();
    let identity = verify_token(&token, SECRET).unwrap();

    assert_eq!(identity.user_id.as_deref(), Some("user-42"));
    assert_eq!(identity.display_name.as_deref(), Some("alice"));
    assert!(identity.is_authenticated());
}

#[test]
fn test_display_name_falls_back_to_subject() {
    let token = issue_token(SECRET, "user-42", None, 1).unwrap();
    let identity = verify_token(&token, SECRET).unwrap();

    assert_eq!(identity.display_name_or("anonymous"), "user-42");
}

#[test]
fn test_wrong_secret_is_rejected() {
    let token = issue_token(SECRET, "user-42", Some("alice"), 1).unwrap();
    let result = verify_token(&token, "other-secret");

    assert!(matches!(result, Err(HubError::InvalidToken(_))));
}

#[test]
fn test_expired_token_is_rejected() {
    // well past the default 60s leeway
    let token = issue_token(SECRET, "user-42", None, -2).unwrap();

    assert!(matches!(
        verify_token(&token, SECRET),
        Err(HubError::InvalidToken(_))
    ));
}

#[test]
fn test_garbage_token_is_rejected() {
    assert!(verify_token("invalid.token.here", SECRET).is_err());
}

#[test]
fn test_anonymous_identity() {
    let identity = Identity::anonymous();
    assert!(!identity.is_authenticated());
    assert_eq!(identity.display_name_or("guest"), "guest");
}

#[test]
fn test_blank_name_claim_falls_back_to_subject() {
    for blank in ["", "   "] {
        let token = issue_token(SECRET, "user-42", Some(blank), 1).unwrap();
        let identity = verify_token(&token, SECRET).unwrap();

        assert_eq!(identity.display_name.as_deref(), Some("user-42"));
        assert_eq!(identity.display_name_or("anonymous"), "user-42");
    }
}

#[test]
fn test_blank_display_name_uses_fallback() {
    let identity = Identity {
        user_id: Some("user-42".to_string()),
        display_name: Some(" ".to_string()),
    };
    assert_eq!(identity.display_name_or("anonymous"), "anonymous");
}
