//! Gameplay flow E2E tests.
//!
//! # Test Scenarios
//!
//! ## Rendering
//! - Placeholders resolve consistently within one task
//! - The current player is never chosen as the "other" player
//! - Timers render as seconds
//! - Locale variants are used when present, fallback otherwise
//!
//! ## Queue lifecycle
//! - Generation expands entries by frequency and replaces older pools
//! - Repeat policies decide what happens after `advance`
//! - `current` is stable until `advance`

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

use taskgame_domain::{GameTaskState, Locale, RepeatPolicy, ResolutionError};

use crate::infrastructure::catalog::load_catalog_file;
use crate::infrastructure::clock::FixedRandom;
use crate::use_cases::game_task::{GameTaskError, TaskSource};

use super::*;

const PLAYERS: [&str; 3] = ["p1", "p2", "p3"];

// =============================================================================
// Rendering
// =============================================================================

#[tokio::test]
async fn test_repeated_player_placeholder_names_one_player() {
    let ctx = E2EContext::new(
        vec![task("{player_c} dares {player_1}, then {player_1} picks {player_2}")],
        &PLAYERS,
    );

    for _ in 0..25 {
        ctx.generate().await;
        let text = ctx.current("p1").await.unwrap().text;

        let rest = text.strip_prefix("p1 dares ").unwrap();
        let (first, rest) = rest.split_once(", then ").unwrap();
        let (again, second) = rest.split_once(" picks ").unwrap();
        assert_eq!(first, again, "player_1 must resolve to one player in {:?}", text);
        assert_ne!(first, second);
        assert!(["p2", "p3"].contains(&first));
        assert!(["p2", "p3"].contains(&second));
    }
}

#[tokio::test]
async fn test_dare_never_targets_current_player() {
    let ctx = E2EContext::new(vec![task("{player_c} dares {player_1}")], &PLAYERS);

    for _ in 0..25 {
        ctx.generate().await;
        let text = ctx.current("p1").await.unwrap().text;
        assert!(
            text == "p1 dares p2" || text == "p1 dares p3",
            "unexpected text {:?}",
            text
        );
    }
}

#[tokio::test]
async fn test_timer_renders_seconds() {
    let ctx = E2EContext::new(vec![task("wait {timer_30}")], &PLAYERS);
    ctx.generate().await;
    let rendered = ctx.current("p2").await.unwrap();
    assert_eq!(rendered.text, "wait 30s");
    assert_eq!(rendered.locale.as_str(), "en");
}

#[tokio::test]
async fn test_rendered_task_carries_metadata() {
    let entry = task("simple task");
    let key = entry.key();
    let ctx = E2EContext::new(vec![entry], &PLAYERS);
    ctx.generate().await;

    let rendered = ctx.current("p1").await.unwrap();
    assert_eq!(rendered.key, key);
    assert!(rendered.key.as_str().starts_with("task_"));

    let json = serde_json::to_value(&rendered).unwrap();
    assert_eq!(json["text"], "simple task");
    assert_eq!(json["locale"], "en");
    assert_eq!(json["price"]["cost"], 1);
    assert_eq!(json["timer"]["durationSeconds"], 60);
}

#[tokio::test]
async fn test_locale_variant_and_fallback() {
    let entry = task("{player_c} sings");
    let entry_id = entry.id;
    let ctx = E2EContext::new(vec![entry], &PLAYERS);
    ctx.generate().await;
    ctx.catalog
        .create_locale(
            entry_id,
            Locale::new("sk").unwrap(),
            vec!["{player_c} spieva".to_string()],
        )
        .await
        .unwrap();

    let sk = ctx
        .try_current(ctx.request("p1").with_locale(Locale::new("sk").unwrap()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sk.text, "p1 spieva");
    assert_eq!(sk.locale.as_str(), "sk");

    // Same task, same people, asked for in a language without a variant
    let de = ctx
        .try_current(ctx.request("p2").with_locale(Locale::new("de").unwrap()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(de.instance_id, sk.instance_id);
    assert_eq!(de.text, "p1 sings");
    assert_eq!(de.locale.as_str(), "en");
}

#[tokio::test]
async fn test_insufficient_players_is_reported() {
    let ctx = E2EContext::new(vec![task("{player_1} hugs {player_2}")], &["p1", "p2"]);
    ctx.generate().await;

    let result = ctx.try_current(ctx.request("p1")).await;
    match result {
        Err(err @ GameTaskError::Resolution(ResolutionError::InsufficientPlayers { .. })) => {
            assert!(err.is_client_error())
        }
        other => panic!("expected InsufficientPlayers, got {:?}", other),
    }
    assert_eq!(ctx.pool_size().await, 1);
}

#[tokio::test]
async fn test_unknown_player_is_rejected() {
    let ctx = E2EContext::new(vec![task("anything")], &PLAYERS);
    ctx.generate().await;
    let result = ctx.try_current(ctx.request("p9")).await;
    assert!(matches!(
        result,
        Err(GameTaskError::Resolution(ResolutionError::PlayerNotInRoster { .. }))
    ));
}

// =============================================================================
// Queue lifecycle
// =============================================================================

#[tokio::test]
async fn test_empty_generate_has_no_content() {
    let ctx = E2EContext::new(vec![], &PLAYERS);
    assert_eq!(ctx.generate().await, 0);
    assert_eq!(ctx.current("p1").await, None);
    assert_eq!(ctx.advance("p1").await, None);
}

#[tokio::test]
async fn test_generate_expands_frequency_and_replaces_pool() {
    let old = task_with("old", RepeatPolicy::Never, 2);
    let fresh = task_with("fresh", RepeatPolicy::Never, 3);
    let (old_id, fresh_id) = (old.id, fresh.id);
    let ctx = E2EContext::new(vec![old, fresh], &PLAYERS);

    ctx.generate().await;
    ctx.current("p1").await.unwrap();

    let created = ctx
        .app
        .use_cases
        .game_tasks
        .generate
        .execute(&ctx.game_id, TaskSource::Ids(vec![fresh_id]))
        .await
        .unwrap();
    assert_eq!(created, 3);

    let snapshot = ctx.app.use_cases.game_tasks.snapshot(&ctx.game_id).await;
    assert_eq!(snapshot.current, None);
    assert_eq!(snapshot.instances.len(), 3);
    assert!(snapshot
        .instances
        .iter()
        .all(|i| i.task_id == fresh_id && i.state == GameTaskState::Unresolved));
    assert!(snapshot.instances.iter().all(|i| i.task_id != old_id));
}

#[tokio::test]
async fn test_game_catalog_selection() {
    let chosen = task("chosen");
    let chosen_id = chosen.id;
    let ctx = E2EContext::new(vec![task("ignored"), chosen], &PLAYERS);
    ctx.catalog
        .assign_to_game(ctx.game_id.clone(), vec![chosen_id])
        .await
        .unwrap();

    assert_eq!(ctx.generate().await, 1);
    assert_eq!(ctx.current("p1").await.unwrap().text, "chosen");
}

#[tokio::test]
async fn test_current_is_stable_until_advance() {
    let ctx = E2EContext::new(
        vec![
            task("{player_c} dares {player_1}"),
            task("{player_1} and {player_2} trade places"),
            task("{player_c} picks {player_2}"),
        ],
        &PLAYERS,
    );
    ctx.generate().await;

    let first = ctx.current("p1").await.unwrap();
    for player in ["p1", "p2", "p3", "p1", "p2"] {
        let again = ctx.current(player).await.unwrap();
        assert_eq!(again.text, first.text);
        assert_eq!(again.locale, first.locale);
        assert_eq!(again.instance_id, first.instance_id);
    }

    let next = ctx.advance("p1").await.unwrap();
    assert_ne!(next.instance_id, first.instance_id);
}

#[tokio::test]
async fn test_never_task_is_gone_after_advance() {
    let one_shot = task_with("one shot", RepeatPolicy::Never, 1);
    let one_shot_id = one_shot.id;
    let filler = task_with("filler", RepeatPolicy::Always, 2);
    // Index 0 always wins, so the one-shot task (generated first) is served first
    let ctx = E2EContext::with_random(
        vec![one_shot, filler],
        &PLAYERS,
        Arc::new(FixedRandom::new(0)),
    );
    ctx.generate().await;

    assert_eq!(ctx.advance("p1").await.unwrap().text, "one shot");
    for round in 0..20 {
        let player = PLAYERS[round % PLAYERS.len()];
        assert_eq!(ctx.advance(player).await.unwrap().text, "filler");
        assert_eq!(ctx.current(player).await.unwrap().text, "filler");
    }

    let snapshot = ctx.app.use_cases.game_tasks.snapshot(&ctx.game_id).await;
    assert!(snapshot.instances.iter().all(|i| i.task_id != one_shot_id));
    assert_eq!(snapshot.instances.len(), 2);
}

#[tokio::test]
async fn test_never_task_is_deleted_after_next() {
    let ctx = E2EContext::new(vec![task("simple task")], &PLAYERS);
    ctx.generate().await;

    assert_eq!(ctx.current("p1").await.unwrap().text, "simple task");
    assert_eq!(ctx.advance("p1").await, None);
    assert_eq!(ctx.pool_size().await, 0);
    for player in PLAYERS {
        assert_eq!(ctx.current(player).await, None);
    }
}

#[tokio::test]
async fn test_per_player_task_reaches_every_player_once() {
    let ctx = E2EContext::new(
        vec![task_with("{player_c} shares a story", RepeatPolicy::PerPlayer, 1)],
        &PLAYERS,
    );
    ctx.generate().await;

    let for_a = ctx.current("p1").await.unwrap();
    assert_eq!(for_a.text, "p1 shares a story");
    assert_eq!(ctx.advance("p1").await, None);
    assert_eq!(ctx.pool_size().await, 1);

    // p1 has seen it; p2 and p3 still can
    assert_eq!(ctx.current("p1").await, None);
    let for_b = ctx.current("p2").await.unwrap();
    assert_eq!(for_b.instance_id, for_a.instance_id);
    assert_eq!(for_b.text, "p2 shares a story");
    assert_eq!(ctx.advance("p2").await, None);

    assert_eq!(ctx.current("p1").await, None);
    assert_eq!(ctx.current("p2").await, None);
    let for_c = ctx.current("p3").await.unwrap();
    assert_eq!(for_c.instance_id, for_a.instance_id);

    // Everyone has seen it now
    assert_eq!(ctx.advance("p3").await, None);
    assert_eq!(ctx.pool_size().await, 0);
    for player in PLAYERS {
        assert_eq!(ctx.current(player).await, None);
    }
}

#[tokio::test]
async fn test_fixed_random_makes_selection_deterministic() {
    let ctx = E2EContext::with_random(
        vec![task("first"), task("second"), task("third")],
        &PLAYERS,
        Arc::new(FixedRandom::new(0)),
    );
    ctx.generate().await;

    let texts: Vec<String> = [
        ctx.advance("p1").await,
        ctx.advance("p2").await,
        ctx.advance("p3").await,
        ctx.advance("p1").await,
    ]
    .into_iter()
    .map(|t| t.map(|t| t.text).unwrap_or_default())
    .collect();
    assert_eq!(texts, vec!["first", "second", "third", ""]);
}

#[tokio::test]
async fn test_catalog_file_drives_a_game() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"task": "{{player_c}} starts", "repeat": "ALWAYS"}},
            {{"task": "{{broken", "frequency": 2}},
            {{"task": ["count to", "{{timer_10}}"], "frequency": 2}}
        ]"#
    )
    .unwrap();

    let entries = load_catalog_file(file.path(), &Locale::default()).await.unwrap();
    assert_eq!(entries.len(), 2);

    let ctx = E2EContext::new(entries, &PLAYERS);
    assert_eq!(ctx.generate().await, 3);

    let mut seen = HashSet::new();
    for round in 0..6 {
        let player = PLAYERS[round % PLAYERS.len()];
        if let Some(task) = ctx.advance(player).await {
            seen.insert(task.text);
        }
    }
    assert!(seen.iter().all(|t| t == "count to 10s" || t.ends_with(" starts")));
}
