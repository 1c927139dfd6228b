use super::*;

// =============================================================
// Helpers
// =============================================================

fn live_user() -> User {
    User {
        access_token: "at".to_owned(),
        token_type: "Bearer".to_owned(),
        expires_at: Some(crate::user::unix_now() + 3_600),
        ..User::default()
    }
}

fn expired_user() -> User {
    User { expires_at: Some(1), ..live_user() }
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn new_state_is_loading_and_signed_out() {
    let snap = SessionState::new().snapshot();
    assert_eq!(
        snap,
        SessionSnapshot { loading: true, authenticated: false, user: None, error: None }
    );
}

#[test]
fn idle_state_is_settled() {
    let snap = SessionState::idle().snapshot();
    assert!(!snap.loading);
    assert!(!snap.authenticated);
}

// =============================================================
// apply_user
// =============================================================

#[test]
fn apply_live_user_authenticates() {
    let state = SessionState::new();
    let user = live_user();
    state.apply_user(Some(user.clone()));

    let snap = state.snapshot();
    assert!(snap.authenticated);
    assert!(!snap.loading);
    assert_eq!(snap.user, Some(user));
}

#[test]
fn apply_expired_user_keeps_user_but_not_authenticated() {
    let state = SessionState::new();
    state.apply_user(Some(expired_user()));

    let snap = state.snapshot();
    assert!(!snap.authenticated);
    assert!(snap.user.is_some());
    assert!(!snap.loading);
}

#[test]
fn authenticated_matches_rule_after_every_apply() {
    let state = SessionState::new();
    for user in [Some(live_user()), None, Some(expired_user()), Some(live_user())] {
        state.apply_user(user.clone());
        assert_eq!(state.snapshot().authenticated, is_authenticated(user.as_ref()));
    }
}

#[test]
fn apply_none_twice_is_idempotent() {
    let state = SessionState::new();
    state.apply_user(Some(live_user()));
    state.apply_user(None);
    let once = state.snapshot();
    state.apply_user(None);
    assert_eq!(state.snapshot(), once);
}

#[test]
fn apply_does_not_touch_error() {
    let state = SessionState::new();
    state.record_error(AuthError::SilentRenew("iframe timeout".into()));
    state.apply_user(None);
    assert_eq!(state.snapshot().error, Some(AuthError::SilentRenew("iframe timeout".into())));
}

// =============================================================
// Observables
// =============================================================

#[test]
fn read_only_signals_track_writes() {
    let state = SessionState::new();
    let loading = state.loading();
    let user = state.user();
    state.apply_user(Some(live_user()));
    assert!(!loading.get_untracked());
    assert!(user.get_untracked().is_some());
    assert!(state.authenticated().get_untracked());
    assert_eq!(state.error().get_untracked(), None);
}

#[test]
fn record_error_leaves_other_fields() {
    let state = SessionState::new();
    state.record_error(AuthError::Provider("down".into()));
    let snap = state.snapshot();
    assert!(snap.loading);
    assert_eq!(snap.error, Some(AuthError::Provider("down".into())));
}
