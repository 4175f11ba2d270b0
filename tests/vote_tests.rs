use std::sync::Arc;

use moviegallery::config::SecurityConfig;
use moviegallery::db::Store;
use moviegallery::domain::{AccountId, MovieId, Role, VoteKind, VoteRelation};
use moviegallery::models::movie::{Movie, NewMovie};
use moviegallery::services::{
    CatalogService, SeaOrmCatalogService, SeaOrmVoteService, VoteError, VoteService,
};

fn security() -> SecurityConfig {
    SecurityConfig {
        enforce_credential_policy: false,
        argon2_time_cost: 1,
        argon2_memory_cost_kib: 1024,
        ..SecurityConfig::default()
    }
}

async fn add_account(store: &Store, username: &str) -> AccountId {
    store
        .create_account(username, "secret", &[Role::Viewer], &security())
        .await
        .unwrap()
        .unwrap()
        .id
}

async fn add_movie(store: &Store, title: &str) -> Movie {
    store
        .add_movie(&NewMovie {
            title: title.to_string(),
            video_url: format!("https://videos.example.com/{title}.mp4"),
            image_path: format!("/images/{title}.jpg"),
            description: "description".to_string(),
            genre: "Action".to_string(),
        })
        .await
        .unwrap()
}

/// Counters must equal the number of vote rows of each kind.
async fn assert_counters_match_votes(store: &Store, movie: MovieId) {
    let stored = store.get_movie(movie).await.unwrap().unwrap();
    let tally = store.tally_votes(movie).await.unwrap();
    assert_eq!(
        (stored.likes, stored.dislikes),
        (tally.likes, tally.dislikes),
        "counters diverged from votes for movie {movie}"
    );
}

#[tokio::test]
async fn test_like_then_dislike() {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let votes = SeaOrmVoteService::new(store.clone());
    let user = add_account(&store, "u").await;
    let movie = add_movie(&store, "Heat").await;
    assert_eq!((movie.likes, movie.dislikes), (0, 0));

    let updated = votes.apply_vote("u", movie.id, VoteKind::Like).await.unwrap();
    assert_eq!((updated.likes, updated.dislikes), (1, 0));
    assert_eq!(
        store.vote_relation(user, movie.id).await.unwrap(),
        VoteRelation::Liked
    );
    let liked = votes.liked_movies("u").await.unwrap();
    assert_eq!(liked.iter().map(|m| m.id).collect::<Vec<_>>(), vec![movie.id]);

    let updated = votes
        .apply_vote("u", movie.id, VoteKind::Dislike)
        .await
        .unwrap();
    assert_eq!((updated.likes, updated.dislikes), (0, 1));
    assert!(votes.liked_movies("u").await.unwrap().is_empty());
    assert_eq!(votes.disliked_movies("u").await.unwrap().len(), 1);
    assert_eq!(
        store.vote_relation(user, movie.id).await.unwrap(),
        VoteRelation::Disliked
    );
}

#[tokio::test]
async fn test_repeated_vote_is_idempotent() {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let votes = SeaOrmVoteService::new(store.clone());
    add_account(&store, "u").await;
    let movie = add_movie(&store, "Heat").await;

    votes.apply_vote("u", movie.id, VoteKind::Like).await.unwrap();
    let again = votes.apply_vote("u", movie.id, VoteKind::Like).await.unwrap();
    assert_eq!((again.likes, again.dislikes), (1, 0));

    votes.apply_vote("u", movie.id, VoteKind::Dislike).await.unwrap();
    let again = votes
        .apply_vote("u", movie.id, VoteKind::Dislike)
        .await
        .unwrap();
    assert_eq!((again.likes, again.dislikes), (0, 1));
}

#[tokio::test]
async fn test_counters_track_votes_across_users() {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let votes = SeaOrmVoteService::new(store.clone());
    let users = ["ann", "ben", "cat"];
    for user in users {
        add_account(&store, user).await;
    }
    let heat = add_movie(&store, "Heat").await.id;
    let ronin = add_movie(&store, "Ronin").await.id;

    let script = [
        ("ann", heat, VoteKind::Like),
        ("ben", heat, VoteKind::Like),
        ("cat", heat, VoteKind::Dislike),
        ("ann", ronin, VoteKind::Dislike),
        ("ben", heat, VoteKind::Dislike),
        ("cat", heat, VoteKind::Like),
        ("ann", heat, VoteKind::Like),
        ("cat", ronin, VoteKind::Like),
        ("ann", ronin, VoteKind::Like),
    ];

    for (user, movie, kind) in script {
        votes.apply_vote(user, movie, kind).await.unwrap();
        assert_counters_match_votes(&store, heat).await;
        assert_counters_match_votes(&store, ronin).await;
    }

    let heat = store.get_movie(heat).await.unwrap().unwrap();
    assert_eq!((heat.likes, heat.dislikes), (2, 1));
    let ronin = store.get_movie(ronin).await.unwrap().unwrap();
    assert_eq!((ronin.likes, ronin.dislikes), (2, 0));
}

#[tokio::test]
async fn test_liked_movies_ordered_by_title() {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let votes = SeaOrmVoteService::new(store.clone());
    add_account(&store, "u").await;
    let zodiac = add_movie(&store, "Zodiac").await;
    let alien = add_movie(&store, "Alien").await;
    let heat = add_movie(&store, "Heat").await;

    for movie in [&zodiac, &alien, &heat] {
        votes.apply_vote("u", movie.id, VoteKind::Like).await.unwrap();
    }

    let titles: Vec<String> = votes
        .liked_movies("u")
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(titles, vec!["Alien", "Heat", "Zodiac"]);
}

#[tokio::test]
async fn test_vote_errors() {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let votes = SeaOrmVoteService::new(store.clone());
    add_account(&store, "u").await;
    let movie = add_movie(&store, "Heat").await;

    assert!(matches!(
        votes.apply_vote("u", MovieId::new(999), VoteKind::Like).await,
        Err(VoteError::MovieNotFound(id)) if id == MovieId::new(999)
    ));
    assert!(matches!(
        votes.apply_vote("ghost", movie.id, VoteKind::Like).await,
        Err(VoteError::AccountNotFound(_))
    ));
    assert!(matches!(
        votes.liked_movies("ghost").await,
        Err(VoteError::AccountNotFound(_))
    ));
}

#[tokio::test]
async fn test_removing_movie_drops_its_votes() {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let votes = SeaOrmVoteService::new(store.clone());
    let catalog = SeaOrmCatalogService::new(store.clone());
    let user = add_account(&store, "u").await;
    let movie = add_movie(&store, "Heat").await;

    votes.apply_vote("u", movie.id, VoteKind::Like).await.unwrap();
    catalog.remove_movie(movie.id).await.unwrap();

    assert!(votes.liked_movies("u").await.unwrap().is_empty());
    assert_eq!(
        store.vote_relation(user, movie.id).await.unwrap(),
        VoteRelation::None
    );
}

#[tokio::test]
async fn test_edit_only_touches_supplied_fields() {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let votes = SeaOrmVoteService::new(store.clone());
    let catalog = SeaOrmCatalogService::new(store.clone());
    add_account(&store, "u").await;
    let movie = add_movie(&store, "Heat").await;
    votes.apply_vote("u", movie.id, VoteKind::Like).await.unwrap();

    let edited = catalog
        .edit_movie(
            movie.id,
            moviegallery::models::movie::MovieUpdate {
                genre: Some("Drama".to_string()),
                title: Some("  ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.genre, "Drama");
    assert_eq!(edited.title, movie.title);
    assert_eq!(edited.video_url, movie.video_url);
    assert_eq!(edited.image_path, movie.image_path);
    assert_eq!(edited.description, movie.description);
    assert_eq!(edited.comment, movie.comment);
    assert_eq!((edited.likes, edited.dislikes), (1, 0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_votes_keep_counters_consistent() {
    let path = std::env::temp_dir().join(format!("moviegallery-{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite://{}", path.display());
    let store = Store::with_pool_options(&url, 4, 1).await.unwrap();
    let votes = Arc::new(SeaOrmVoteService::new(store.clone()));

    let users: Vec<String> = (0..8).map(|i| format!("user{i}")).collect();
    for user in &users {
        add_account(&store, user).await;
    }
    let movie = add_movie(&store, "Heat").await.id;

    let mut handles = Vec::new();
    for (i, user) in users.iter().enumerate() {
        for round in 0..6 {
            let votes = Arc::clone(&votes);
            let user = user.clone();
            let kind = if (i + round) % 2 == 0 {
                VoteKind::Like
            } else {
                VoteKind::Dislike
            };
            handles.push(tokio::spawn(async move {
                votes.apply_vote(&user, movie, kind).await
            }));
        }
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_counters_match_votes(&store, movie).await;
    let stored = store.get_movie(movie).await.unwrap().unwrap();
    assert_eq!(stored.likes + stored.dislikes, 8);

    drop(store);
    let _ = std::fs::remove_file(&path);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_account_removal_racing_its_votes_keeps_counters_consistent() {
    let path = std::env::temp_dir().join(format!("moviegallery-{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite://{}", path.display());
    let store = Store::with_pool_options(&url, 4, 1).await.unwrap();
    let votes = Arc::new(SeaOrmVoteService::new(store.clone()));

    add_account(&store, "leaving").await;
    add_account(&store, "staying").await;
    let mut movies = Vec::new();
    for title in ["Alien", "Heat", "Ronin", "Zodiac"] {
        movies.push(add_movie(&store, title).await.id);
    }
    for movie in &movies {
        votes.apply_vote("staying", *movie, VoteKind::Like).await.unwrap();
    }

    let mut handles = Vec::new();
    for round in 0..5 {
        for (i, movie) in movies.iter().copied().enumerate() {
            let votes = Arc::clone(&votes);
            let kind = if (i + round) % 2 == 0 {
                VoteKind::Like
            } else {
                VoteKind::Dislike
            };
            // Votes landing after the removal fail; only consistency matters.
            handles.push(tokio::spawn(async move {
                let _ = votes.apply_vote("leaving", movie, kind).await;
            }));
        }
    }
    let removal = {
        let store = store.clone();
        tokio::spawn(async move { store.remove_account("leaving").await })
    };

    for handle in handles {
        handle.await.unwrap();
    }
    assert!(removal.await.unwrap().unwrap());
    assert!(store.get_account("leaving").await.unwrap().is_none());

    for movie in &movies {
        assert_counters_match_votes(&store, *movie).await;
        let stored = store.get_movie(*movie).await.unwrap().unwrap();
        assert_eq!((stored.likes, stored.dislikes), (1, 0));
    }

    drop(store);
    let _ = std::fs::remove_file(&path);
}
