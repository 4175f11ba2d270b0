use chrono::Utc;
use moviegallery::config::SecurityConfig;
use moviegallery::db::Store;
use moviegallery::domain::{Role, VoteKind};
use moviegallery::models::movie::NewMovie;
use moviegallery::services::{
    AttemptsLeft, AuthError, AuthService, SeaOrmAuthService, SeaOrmVoteService, VoteService,
};

fn relaxed_security() -> SecurityConfig {
    SecurityConfig {
        enforce_credential_policy: false,
        argon2_time_cost: 1,
        ..SecurityConfig::default()
    }
}

async fn setup(security: SecurityConfig) -> (Store, SeaOrmAuthService) {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let auth = SeaOrmAuthService::new(store.clone(), security);
    (store, auth)
}

#[tokio::test]
async fn test_three_failures_remove_bob() {
    let (store, auth) = setup(relaxed_security()).await;
    auth.register("bob", "secret").await.unwrap();

    for expected in [2, 1] {
        match auth.login("bob", "wrong").await {
            Err(AuthError::InvalidPassword { remaining }) => {
                assert_eq!(remaining, AttemptsLeft(expected));
            }
            other => panic!("unexpected login result: {other:?}"),
        }
    }

    match auth.login("bob", "wrong").await {
        Err(AuthError::AccountLockedAndRemoved { username, attempts }) => {
            assert_eq!(username, "bob");
            assert_eq!(attempts, 3);
        }
        other => panic!("unexpected login result: {other:?}"),
    }

    assert!(store.get_account("bob").await.unwrap().is_none());
    assert_eq!(auth.remaining_attempts("bob"), 3);
    assert!(matches!(
        auth.login("bob", "secret").await,
        Err(AuthError::InvalidUsername)
    ));
}

#[tokio::test]
async fn test_lockout_messages() {
    let (_, auth) = setup(SecurityConfig {
        argon2_time_cost: 1,
        ..SecurityConfig::default()
    })
    .await;
    auth.register("a@x.com", "Aa1!aaaa").await.unwrap();

    let first = auth.login("a@x.com", "nope").await.unwrap_err();
    assert!(first.to_string().contains("2 attempts remaining"));

    let second = auth.login("a@x.com", "nope").await.unwrap_err();
    assert!(second.to_string().contains("1 attempt remaining"));

    let third = auth.login("a@x.com", "nope").await.unwrap_err();
    assert_eq!(
        third.to_string(),
        "You have used all 3 attempts.\nAccount with username a@x.com has been removed."
    );

    let fourth = auth.login("a@x.com", "Aa1!aaaa").await.unwrap_err();
    assert!(matches!(fourth, AuthError::InvalidUsername));
}

#[tokio::test]
async fn test_reregistered_username_gets_new_account_id() {
    let (_, auth) = setup(relaxed_security()).await;
    let first = auth.register("bob", "secret").await.unwrap();
    let stale = auth.open_session(&first);

    for _ in 0..3 {
        auth.login("bob", "wrong").await.unwrap_err();
    }

    let second = auth.register("bob", "other").await.unwrap();
    assert_ne!(second.id, first.id);
    assert_ne!(auth.account("bob").await.unwrap().id, stale.account_id);
    assert_eq!(auth.open_session(&second).account_id, second.id);
}

#[tokio::test]
async fn test_unknown_username_does_not_count() {
    let (_, auth) = setup(relaxed_security()).await;
    auth.register("bob", "secret").await.unwrap();

    assert!(matches!(
        auth.login("alice", "secret").await,
        Err(AuthError::InvalidUsername)
    ));
    assert_eq!(auth.remaining_attempts("alice"), 3);
    assert_eq!(auth.remaining_attempts("bob"), 3);
}

#[tokio::test]
async fn test_success_resets_attempts() {
    let (_, auth) = setup(relaxed_security()).await;
    auth.register("bob", "secret").await.unwrap();

    auth.login("bob", "wrong").await.unwrap_err();
    auth.login("bob", "wrong").await.unwrap_err();
    assert_eq!(auth.remaining_attempts("bob"), 1);

    let account = auth.login("bob", "secret").await.unwrap();
    assert_eq!(account.username, "bob");
    assert_eq!(auth.remaining_attempts("bob"), 3);
}

#[tokio::test]
async fn test_attempts_are_tracked_per_username() {
    let (_, auth) = setup(relaxed_security()).await;
    auth.register("bob", "secret").await.unwrap();
    auth.register("carol", "secret").await.unwrap();

    auth.login("bob", "wrong").await.unwrap_err();
    auth.login("bob", "wrong").await.unwrap_err();
    auth.login("carol", "wrong").await.unwrap_err();

    assert_eq!(auth.remaining_attempts("bob"), 1);
    assert_eq!(auth.remaining_attempts("carol"), 2);
}

#[tokio::test]
async fn test_register_rules() {
    let (_, auth) = setup(relaxed_security()).await;

    assert!(matches!(
        auth.register("", "secret").await,
        Err(AuthError::Validation(_))
    ));
    assert!(matches!(
        auth.register("bob", "").await,
        Err(AuthError::Validation(_))
    ));

    let account = auth.register("bob", "secret").await.unwrap();
    assert_eq!(account.roles, vec![Role::Viewer]);

    assert!(matches!(
        auth.register("bob", "other").await,
        Err(AuthError::DuplicateAccount(name)) if name == "bob"
    ));
}

#[tokio::test]
async fn test_credential_policy_when_enforced() {
    let (_, auth) = setup(SecurityConfig {
        argon2_time_cost: 1,
        ..SecurityConfig::default()
    })
    .await;

    assert!(matches!(
        auth.register("bob", "Aa1!aaaa").await,
        Err(AuthError::Validation(_))
    ));
    assert!(matches!(
        auth.register("a@x.com", "password").await,
        Err(AuthError::Validation(_))
    ));
    assert!(auth.register("a@x.com", "Aa1!aaaa").await.is_ok());
}

#[tokio::test]
async fn test_open_session_uses_first_role_and_ttl() {
    let (_, auth) = setup(relaxed_security()).await;
    auth.register("bob", "secret").await.unwrap();
    auth.grant_role("bob", Role::MarketingManager).await.unwrap();

    let account = auth.login("bob", "secret").await.unwrap();
    let session = auth.open_session(&account);

    assert_eq!(session.username, "bob");
    assert_eq!(session.current_role, Role::Viewer);
    assert_eq!(session.roles, vec![Role::Viewer, Role::MarketingManager]);
    assert_eq!(
        (session.expires_at - session.logged_in_at).num_hours(),
        24
    );
    assert!(!session.is_expired(Utc::now()));
}

#[tokio::test]
async fn test_grant_and_revoke_roles() {
    let (_, auth) = setup(relaxed_security()).await;
    auth.register("bob", "secret").await.unwrap();

    let account = auth.grant_role("bob", Role::ContentEditor).await.unwrap();
    assert_eq!(account.roles, vec![Role::Viewer, Role::ContentEditor]);

    // Granting twice keeps a single entry.
    let account = auth.grant_role("bob", Role::ContentEditor).await.unwrap();
    assert_eq!(account.roles.len(), 2);

    let account = auth.revoke_role("bob", Role::Viewer).await.unwrap();
    assert_eq!(account.roles, vec![Role::ContentEditor]);

    assert!(matches!(
        auth.revoke_role("bob", Role::ContentEditor).await,
        Err(AuthError::LastRole)
    ));
    assert!(matches!(
        auth.revoke_role("bob", Role::MarketingManager).await,
        Err(AuthError::RoleNotGranted(Role::MarketingManager))
    ));
    assert!(matches!(
        auth.grant_role("nobody", Role::Viewer).await,
        Err(AuthError::AccountNotFound(_))
    ));
}

#[tokio::test]
async fn test_lockout_releases_votes() {
    let (store, auth) = setup(relaxed_security()).await;
    let votes = SeaOrmVoteService::new(store.clone());

    let movie = store
        .add_movie(&NewMovie {
            title: "Heat".to_string(),
            video_url: "v".to_string(),
            image_path: "i".to_string(),
            description: "d".to_string(),
            genre: "g".to_string(),
        })
        .await
        .unwrap();

    auth.register("bob", "secret").await.unwrap();
    auth.register("carol", "secret").await.unwrap();
    votes.apply_vote("bob", movie.id, VoteKind::Like).await.unwrap();
    votes
        .apply_vote("carol", movie.id, VoteKind::Dislike)
        .await
        .unwrap();

    for _ in 0..3 {
        auth.login("bob", "wrong").await.unwrap_err();
    }

    let movie = store.get_movie(movie.id).await.unwrap().unwrap();
    assert_eq!((movie.likes, movie.dislikes), (0, 1));

    let tally = store.tally_votes(movie.id).await.unwrap();
    assert_eq!((tally.likes, tally.dislikes), (0, 1));
}
