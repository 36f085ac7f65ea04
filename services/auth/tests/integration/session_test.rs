use chrono::{Duration, Utc};

use threads_auth::domain::types::Session;
use threads_auth::error::AuthServiceError;
use threads_auth_types::cookie::SessionCookies;

use crate::helpers::MockStore;

fn cookies_for(session: &Session) -> SessionCookies {
    SessionCookies {
        id: session.id,
        token: session.token.clone(),
    }
}

#[tokio::test]
async fn should_skip_store_without_cookies() {
    let store = MockStore::new();
    let current = store.session_manager().current(None).await.unwrap();
    assert!(current.is_none());
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn should_resolve_session_with_matching_secret() {
    let store = MockStore::new();
    let user = store.with_user(291, "Ada");
    let sessions = store.session_manager();
    let session = sessions.create(&user.id, "Firefox").await.unwrap();

    let current = sessions
        .current(Some(&cookies_for(&session)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.user, user);
    assert_eq!(current.session.id, session.id);
}

#[tokio::test]
async fn should_reject_wrong_secret_for_existing_session() {
    let store = MockStore::new();
    let user = store.with_user(291, "Ada");
    let sessions = store.session_manager();
    let session = sessions.create(&user.id, "Firefox").await.unwrap();

    let mut cookies = cookies_for(&session);
    let flipped = if cookies.token.starts_with('0') { "1" } else { "0" };
    cookies.token.replace_range(0..1, flipped);
    assert!(sessions.current(Some(&cookies)).await.unwrap().is_none());
}

#[tokio::test]
async fn should_keep_sessions_of_one_user_independent() {
    let store = MockStore::new();
    let user = store.with_user(291, "Ada");
    let sessions = store.session_manager();
    let laptop = sessions.create(&user.id, "Laptop").await.unwrap();
    let phone = sessions.create(&user.id, "Phone").await.unwrap();

    assert!(sessions.destroy(laptop.id).await.unwrap());

    assert!(sessions.current(Some(&cookies_for(&laptop))).await.unwrap().is_none());
    assert!(sessions.current(Some(&cookies_for(&phone))).await.unwrap().is_some());
    assert!(!sessions.destroy(laptop.id).await.unwrap(), "second destroy is a no-op");
}

#[tokio::test]
async fn should_not_destroy_sessions_of_other_users() {
    let store = MockStore::new();
    let ada = store.with_user(291, "Ada");
    let bob = store.with_user(292, "Bob");
    let sessions = store.session_manager();
    let bobs = sessions.create(&bob.id, "Phone").await.unwrap();

    let result = sessions.destroy_owned(bobs.id, &ada.id).await;

    assert!(matches!(result, Err(AuthServiceError::SessionNotFound)));
    assert!(sessions.current(Some(&cookies_for(&bobs))).await.unwrap().is_some());
    sessions.destroy_owned(bobs.id, &bob.id).await.unwrap();
    assert!(sessions.current(Some(&cookies_for(&bobs))).await.unwrap().is_none());
}

#[tokio::test]
async fn should_list_most_recently_active_first() {
    let store = MockStore::new();
    let user = store.with_user(291, "Ada");
    let sessions = store.session_manager();
    let old = sessions.create(&user.id, "Old").await.unwrap();
    let new = sessions.create(&user.id, "New").await.unwrap();
    store
        .sessions
        .lock()
        .unwrap()
        .iter_mut()
        .find(|s| s.id == old.id)
        .unwrap()
        .last_active = Utc::now() - Duration::hours(1);

    let listed = sessions.list(&user.id).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![new.id, old.id]);
}

#[tokio::test]
async fn should_touch_last_active_and_device() {
    let store = MockStore::new();
    let user = store.with_user(291, "Ada");
    let sessions = store.session_manager();
    let session = sessions.create(&user.id, "Old device").await.unwrap();

    sessions.touch(session.id, "New device").await.unwrap();

    let stored = store.sessions.lock().unwrap()[0].clone();
    assert_eq!(stored.device, "New device");
    assert!(stored.last_active >= session.last_active);
}

#[tokio::test]
async fn should_destroy_all_sessions_of_user() {
    let store = MockStore::new();
    let ada = store.with_user(291, "Ada");
    let bob = store.with_user(292, "Bob");
    let sessions = store.session_manager();
    sessions.create(&ada.id, "A1").await.unwrap();
    sessions.create(&ada.id, "A2").await.unwrap();
    sessions.create(&bob.id, "B1").await.unwrap();

    assert_eq!(sessions.destroy_all(&ada.id).await.unwrap(), 2);
    assert_eq!(sessions.list(&ada.id).await.unwrap().len(), 0);
    assert_eq!(sessions.list(&bob.id).await.unwrap().len(), 1);
}
