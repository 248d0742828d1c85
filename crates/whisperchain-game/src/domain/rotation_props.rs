//! Property tests for rotation assignment and phase derivation.
//!
//! Drives whole games for small rosters and checks the structural
//! guarantees of the rotation: no two players ever share a target round,
//! reads and writes agree on the target, the derived phase is a fixpoint,
//! and a game terminates after exactly one cycle per player.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;
use whisperchain_core::player::Player;
use whisperchain_test_support::FixedClock;

use super::aggregates::{Game, GamePhase, Turn, TurnKind};

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
}

fn roster(n: usize) -> Vec<Player> {
    (0..n)
        .map(|i| Player::new(Uuid::new_v4(), format!("player-{i}")))
        .collect()
}

fn new_game(players: &[Player]) -> Game {
    Game::new(Uuid::new_v4(), players.to_vec(), &clock()).unwrap()
}

fn turn(author: &Player, kind: TurnKind, content: &str) -> Turn {
    Turn::new(author.id, kind, content, &clock())
}

proptest! {
    /// For any reachable state, the player→round mapping is a bijection
    /// over `0..N`.
    #[test]
    fn rotation_is_a_bijection_at_every_step(n in 1usize..6) {
        let players = roster(n);
        let mut game = new_game(&players);

        let assert_bijection = |game: &Game| {
            let offsets: HashSet<usize> = players
                .iter()
                .map(|p| game.round_index_for(p.id).unwrap())
                .collect();
            offsets.len() == n
        };

        prop_assert!(assert_bijection(&game));
        for cycle in 0..n {
            for player in &players {
                game = game
                    .with_turn(turn(player, TurnKind::Prompt, &format!("c{cycle}")))
                    .unwrap();
                prop_assert!(assert_bijection(&game));
            }
            for player in &players {
                game = game.with_turn(turn(player, TurnKind::Image, "img.png")).unwrap();
                prop_assert!(assert_bijection(&game));
            }
        }
    }

    /// The round a player is shown is the round their next turn extends.
    #[test]
    fn reads_and_writes_agree_on_the_target_round(n in 1usize..6) {
        let players = roster(n);
        let mut game = new_game(&players);

        for cycle in 0..n {
            for kind in [TurnKind::Prompt, TurnKind::Image] {
                for player in &players {
                    let index = game.round_index_for(player.id).unwrap();
                    let shown = game.round_for_player(player.id).unwrap();
                    prop_assert_eq!(&game.rounds[index], &shown);

                    game = game
                        .with_turn(turn(player, kind, &format!("c{cycle}")))
                        .unwrap();

                    // The appended turn landed in the round that was shown.
                    let extended = &game.rounds[index];
                    prop_assert_eq!(extended.turns.len(), shown.turns.len() + 1);
                    prop_assert_eq!(&extended.turns[..shown.turns.len()], &shown.turns[..]);
                }
            }
        }
    }

    /// The persisted phase is always the phase recomputed from the snapshot.
    #[test]
    fn derived_phase_is_a_fixpoint_at_every_step(n in 1usize..6) {
        let players = roster(n);
        let mut game = new_game(&players);
        prop_assert_eq!(game.derived_phase(), game.phase);

        for _ in 0..n {
            for kind in [TurnKind::Prompt, TurnKind::Image] {
                for player in &players {
                    game = game.with_turn(turn(player, kind, "x")).unwrap();
                    prop_assert_eq!(game.derived_phase(), game.phase);
                }
            }
        }
    }

    /// A game of N players finishes after exactly N cycles, never earlier.
    #[test]
    fn game_finishes_after_exactly_n_cycles(n in 1usize..6) {
        let players = roster(n);
        let mut game = new_game(&players);

        for cycle in 0..n {
            prop_assert_ne!(game.phase, GamePhase::Finished);
            for player in &players {
                game = game
                    .with_turn(turn(player, TurnKind::Prompt, &format!("c{cycle}")))
                    .unwrap();
                prop_assert_ne!(game.phase, GamePhase::Finished);
            }
            for (i, player) in players.iter().enumerate() {
                game = game.with_turn(turn(player, TurnKind::Image, "img.png")).unwrap();
                let last_image_of_last_cycle = cycle == n - 1 && i == n - 1;
                prop_assert_eq!(
                    game.phase == GamePhase::Finished,
                    last_image_of_last_cycle
                );
            }
            prop_assert_eq!(game.completed_cycles(), cycle + 1);
        }

        // Terminal and absorbing.
        prop_assert_eq!(game.phase, GamePhase::Finished);
        let rejected = game.with_turn(turn(&players[0], TurnKind::Prompt, "late"));
        prop_assert!(rejected.is_err());
    }
}
