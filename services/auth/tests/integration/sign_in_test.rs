use threads_auth::error::AuthServiceError;
use threads_auth::usecase::sign_in::{SignInInput, SignInUseCase, SignOutUseCase};
use threads_auth_types::cookie::SessionCookies;
use threads_auth_types::token::TokenFormatError;

use crate::helpers::{MockSessionRepo, MockStore, MockTokenRepo, test_context};

fn sign_in(store: &MockStore) -> SignInUseCase<MockTokenRepo, MockSessionRepo> {
    SignInUseCase {
        tokens: store.token_lifecycle(),
        sessions: store.session_manager(),
    }
}

fn input(token: &str) -> SignInInput {
    SignInInput {
        token: token.to_owned(),
        context: test_context(),
    }
}

#[tokio::test]
async fn should_reject_malformed_tokens_without_store_access() {
    let store = MockStore::new();
    let uc = sign_in(&store);
    let too_long = "a".repeat(46);
    let cases = [
        ("", TokenFormatError::Empty),
        ("ABCDEF", TokenFormatError::Charset),
        ("xyz", TokenFormatError::Charset),
        ("abc123", TokenFormatError::Length),
        (too_long.as_str(), TokenFormatError::Length),
    ];

    for (token, expected) in cases {
        let result = uc.execute(input(token)).await;
        assert!(
            matches!(result, Err(AuthServiceError::InvalidTokenFormat(e)) if e == expected),
            "token {token:?} should fail with {expected:?}"
        );
    }
    assert_eq!(store.call_count(), 0, "format errors must not reach the store");
}

#[tokio::test]
async fn should_sign_in_with_issued_token() {
    let store = MockStore::new();
    let user = store.with_user(291, "Ada");
    let issued = store.token_lifecycle().issue(&user.id).await.unwrap();

    let output = sign_in(&store).execute(input(&issued.token)).await.unwrap();

    assert_eq!(output.user, user);
    assert_eq!(output.session.user_id, user.id);
    assert_eq!(output.session.device, test_context().device);
    assert_eq!(store.sessions.lock().unwrap().len(), 1);
    assert!(store.tokens.lock().unwrap().is_empty(), "token is consumed");

    let note = &output.notification;
    assert_eq!(note.chat_id, 291);
    assert!(note.text.contains("successfully logged in to <b>Threads</b>"));
    assert!(note.text.contains("<blockquote expandable><pre>"));
    assert!(note.text.contains("IP: 203.0.113.7"));
    assert!(note.text.contains("Berlin, BE, DE 🇩🇪"));
    assert!(!note.text.contains(&issued.token), "alert must not echo the token");
}

#[tokio::test]
async fn should_reject_replayed_token() {
    let store = MockStore::new();
    let user = store.with_user(291, "Ada");
    let issued = store.token_lifecycle().issue(&user.id).await.unwrap();
    let uc = sign_in(&store);

    uc.execute(input(&issued.token)).await.unwrap();
    let replay = uc.execute(input(&issued.token)).await;

    assert!(matches!(replay, Err(AuthServiceError::InvalidOrExpiredToken)));
    assert_eq!(store.sessions.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_unknown_well_formed_token() {
    let store = MockStore::new();
    let result = sign_in(&store).execute(input(&"0".repeat(45))).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidOrExpiredToken)));
    assert!(store.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_sign_out_only_matching_session() {
    let store = MockStore::new();
    let user = store.with_user(291, "Ada");
    let session = store.session_manager().create(&user.id, "Firefox").await.unwrap();
    let uc = SignOutUseCase {
        sessions: store.session_manager(),
    };

    let forged = SessionCookies {
        id: session.id,
        token: "f".repeat(64),
    };
    assert!(!uc.execute(Some(&forged)).await.unwrap());
    assert_eq!(store.sessions.lock().unwrap().len(), 1);

    let genuine = SessionCookies {
        id: session.id,
        token: session.token.clone(),
    };
    assert!(uc.execute(Some(&genuine)).await.unwrap());
    assert!(store.sessions.lock().unwrap().is_empty());

    assert!(!uc.execute(None).await.unwrap());
}
