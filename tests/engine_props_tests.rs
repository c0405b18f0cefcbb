//! Property tests for the uno reducer.
//!
//! Properties tested:
//! - Card conservation after start
//! - Replaying the log yields an identical aggregate
//! - Event ids are contiguous; stale/future ids are rejected without change
//! - Nothing changes once a winner is set

use proptest::prelude::*;

use uno_engine::domain::{Color, Game};
use uno_engine::engine::validation::is_legal_move;
use uno_engine::engine::{apply, build_deck, EventKind, GameError, GameEvent, RandomSource, Replica};
use uno_engine::infra::DeterministicRng;

/// Прогон партии ботами. Возвращает реплику и размер колоды при старте.
fn simulate(seed: u64, players: usize, max_steps: usize) -> (Replica, usize) {
    let mut rng = DeterministicRng::from_seed(seed);
    let mut replica = Replica::new();
    replica
        .submit(EventKind::Create {
            game_id: format!("P{seed}"),
            player_count: players,
        })
        .unwrap();
    for i in 0..players {
        replica
            .submit(EventKind::Join {
                player: format!("bot{i}"),
            })
            .unwrap();
    }

    let deck = build_deck(players, rng.next_seed());
    let total = deck.len();
    let start_player = format!("bot{}", rng.pick_index(players).unwrap());
    replica
        .submit(EventKind::Start { deck, start_player })
        .unwrap();

    for _ in 0..max_steps {
        let Some(game) = replica.game() else { break };
        if game.is_over() || game.error.is_some() {
            break;
        }
        let kind = bot_move(game, &mut rng);
        match replica.submit(kind) {
            Ok(_) => {}
            Err(GameError::InfiniteDraw) => break,
            Err(other) => panic!("bot produced an illegal move: {other}"),
        }
    }

    (replica, total)
}

fn bot_move(game: &Game, rng: &mut DeterministicRng) -> EventKind {
    let current = game.current_player.clone().unwrap();

    // иногда кто-то кричит "уно" на случайного игрока
    if rng.pick_index(8) == Some(0) {
        let caller = &game.players[rng.pick_index(game.players.len()).unwrap()].name;
        let target = &game.players[rng.pick_index(game.players.len()).unwrap()].name;
        return EventKind::Uno {
            caller: caller.clone(),
            target: target.clone(),
        };
    }

    // изредка кто-то уходит, пока за столом больше двоих
    if game.players.len() > 2 && rng.pick_index(60) == Some(0) {
        let leaver = &game.players[rng.pick_index(game.players.len()).unwrap()].name;
        return EventKind::Leave {
            player: leaver.clone(),
            seed: rng.next_seed(),
        };
    }

    let hand = &game.player(&current).unwrap().hand;
    match hand.iter().find(|c| is_legal_move(game.top_card(), c)) {
        Some(card) => EventKind::Play {
            player: current.clone(),
            card: *card,
            chosen_color: (card.color() == Color::Wild)
                .then(|| Color::PLAYABLE[rng.pick_index(4).unwrap()]),
        },
        None => EventKind::Draw {
            player: current,
            count: 1,
        },
    }
}

fn config() -> ProptestConfig {
    ProptestConfig::with_cases(24)
}

proptest! {
    #![proptest_config(config())]

    /// Property: deck + pile + hands is constant after start
    #[test]
    fn prop_cards_are_conserved(seed in any::<u64>(), players in 2usize..6, steps in 1usize..300) {
        let (replica, total) = simulate(seed, players, steps);
        let game = replica.game().unwrap();
        prop_assert_eq!(game.total_cards(), total);

        let mut ids: Vec<u32> = game
            .deck
            .cards
            .iter()
            .chain(game.pile.iter())
            .chain(game.players.iter().flat_map(|p| p.hand.iter()))
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), total, "every physical card exists exactly once");
    }

    /// Property: replaying the log on a fresh replica gives the same aggregate
    #[test]
    fn prop_replay_is_deterministic(seed in any::<u64>(), players in 2usize..5, steps in 1usize..200) {
        let (host, _) = simulate(seed, players, steps);

        let mut client = Replica::new();
        for event in host.events() {
            client.replay(event).unwrap();
        }

        let a = host.game().unwrap();
        let b = client.game().unwrap();
        prop_assert_eq!(a, b);
        prop_assert_eq!(
            serde_json::to_string(a).unwrap(),
            serde_json::to_string(b).unwrap()
        );
    }

    /// Property: ids are contiguous; wrong ids are rejected and change nothing
    #[test]
    fn prop_ids_are_monotonic(seed in any::<u64>(), steps in 1usize..150, skew in 2u64..50) {
        let (replica, _) = simulate(seed, 3, steps);
        let game = replica.game().unwrap();

        for (idx, event) in game.events.iter().enumerate() {
            prop_assert_eq!(event.id, idx as u64);
        }
        prop_assert_eq!(game.last_event_id + 1, game.events.len() as u64);

        if game.error.is_none() {
            let before = game.clone();
            let future = GameEvent::new(game.last_event_id + skew, EventKind::Shuffle { seed });
            let stale = GameEvent::new(game.last_event_id, EventKind::Shuffle { seed });

            let is_out_of_order = |r: Result<_, GameError>| matches!(r, Err(GameError::OutOfOrder { .. }));
            prop_assert!(is_out_of_order(apply(Some(game), &future)));
            prop_assert!(is_out_of_order(apply(Some(game), &stale)));
            prop_assert_eq!(game, &before);
        }
    }

    /// Property: after the winner is set the table is frozen
    #[test]
    fn prop_finished_game_is_frozen(seed in any::<u64>(), players in 2usize..4) {
        let (mut replica, _) = simulate(seed, players, 2_000);
        let game = replica.game().unwrap().clone();
        prop_assume!(game.is_over());

        let someone = game.players[0].name.clone();
        for kind in [
            EventKind::Draw { player: someone.clone(), count: 1 },
            EventKind::Shuffle { seed },
            EventKind::Leave { player: someone.clone(), seed },
        ] {
            prop_assert_eq!(replica.submit(kind), Err(GameError::GameOver));
        }

        let after = replica.game().unwrap();
        prop_assert_eq!(&after.players, &game.players);
        prop_assert_eq!(&after.deck, &game.deck);
        prop_assert_eq!(&after.pile, &game.pile);
        prop_assert_eq!(&after.current_player, &game.current_player);
    }
}
