// src/bin/uno_dev_cli.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use uno_engine::api::build_game_view;
use uno_engine::domain::{Card, Color, EventId, Game};
use uno_engine::engine::validation::is_legal_move;
use uno_engine::engine::{EventKind, GameError, Sound};
use uno_engine::infra::{room_code, DeterministicRng, SystemRng};
use uno_engine::net::{
    spawn_client, spawn_host, ClientConfig, ClientHandle, HostConfig, MemoryNetwork, UiHooks,
};
use uno_engine::time_ctrl::{LivenessProfile, LivenessRules};

const BOT_NAMES: [&str; 10] = [
    "Ann", "Bo", "Cid", "Dee", "Eli", "Fay", "Gus", "Hal", "Ivy", "Jo",
];

/// UI для консоли: звуки и ошибки уходят в лог.
struct ConsoleHooks;

impl UiHooks for ConsoleHooks {
    fn play_sound(&self, sound: Sound) {
        debug!(asset = sound.asset_path(), "sound");
    }

    fn show_error(&self, error: &GameError) {
        warn!(%error, "game error");
    }

    fn spectate(&self) {
        info!("spectating");
    }
}

/// Dev-симуляция: хост и N ботов в одной комнате поверх транспорта в памяти.
#[derive(Parser, Debug)]
#[command(name = "uno_dev_cli")]
struct Args {
    /// Сколько ботов сядет за стол.
    #[arg(long, default_value_t = 3)]
    players: usize,

    /// Seed хоста (колода и первый игрок). Без него системный RNG.
    #[arg(long)]
    seed: Option<u64>,

    /// Код комнаты. Без него случайный.
    #[arg(long)]
    room: Option<String>,

    /// Предел ходов ботов.
    #[arg(long, default_value_t = 1000)]
    max_turns: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let players = args.players.clamp(2, BOT_NAMES.len());
    let room = args.room.unwrap_or_else(room_code);
    let rules = LivenessRules::from_profile(LivenessProfile::Lan);

    println!("uno_dev_cli: комната {room}, ботов {players}");

    let network = MemoryNetwork::new();
    let transport = network.listen(&room)?;
    let hooks: Arc<dyn UiHooks> = Arc::new(ConsoleHooks);
    let config = HostConfig::new(&room)
        .with_max_players(players)
        .with_rules(rules);

    let (host, host_task) = match args.seed {
        Some(seed) => spawn_host(config, transport, DeterministicRng::from_seed(seed), hooks.clone())?,
        None => spawn_host(config, transport, SystemRng, hooks.clone())?,
    };

    // 1. Боты подключаются и садятся
    let mut bots: Vec<ClientHandle> = Vec::with_capacity(players);
    let mut tasks = Vec::with_capacity(players);
    for name in BOT_NAMES.iter().take(players) {
        let connector = Arc::new(network.connector(&room));
        let (bot, task) = spawn_client(ClientConfig::new(rules), connector, hooks.clone());
        bot.join(name)?;
        bots.push(bot);
        tasks.push(task);
    }

    let mut lobby = host.subscribe();
    timeout(
        Duration::from_secs(5),
        lobby.wait_for(|g| g.as_ref().is_some_and(|g| g.players.len() == players)),
    )
    .await??;

    // 2. Старт
    host.start_game().await?;
    println!("================ GAME STARTED =================");

    // 3. Боты ходят, пока кто-то не выиграет
    let mut acted: HashMap<usize, EventId> = HashMap::new();
    let mut turns = 0;
    while turns < args.max_turns {
        if let Some(game) = host.snapshot() {
            if game.is_over() || game.error.is_some() {
                break;
            }
        }

        for (idx, bot) in bots.iter().enumerate() {
            let view = bot.view();
            let (Some(game), Some(me)) = (view.game, view.identity) else {
                continue;
            };
            if acted.get(&idx) == Some(&game.last_event_id) {
                continue;
            }
            if let Some(kind) = choose_move(&game, &me) {
                acted.insert(idx, game.last_event_id);
                if matches!(kind, EventKind::Play { .. } | EventKind::Draw { .. }) {
                    turns += 1;
                }
                bot.submit(kind)?;
            }
        }

        sleep(Duration::from_millis(5)).await;
    }

    // 4. Итог
    match host.snapshot() {
        Some(game) => print_summary(&game),
        None => warn!("host has no game"),
    }

    for bot in &bots {
        bot.shutdown();
    }
    for task in tasks {
        let _ = task.await;
    }
    host.shutdown().await;
    let _ = host_task.await;

    info!("uno_dev_cli: done");
    Ok(())
}

/// Простая стратегия бота.
///
/// Свой ход: первая легальная карта, иначе тянуть. Не свой ход:
/// снять свой флаг уно или поймать соседа.
fn choose_move(game: &Game, me: &str) -> Option<EventKind> {
    if !game.is_started() || game.is_over() || game.error.is_some() {
        return None;
    }
    let hand = &game.player(me)?.hand;

    if game.current_player.as_deref() == Some(me) {
        let playable = hand.iter().find(|c| is_legal_move(game.top_card(), c));
        return Some(match playable {
            Some(card) => EventKind::Play {
                player: me.to_string(),
                card: *card,
                chosen_color: (card.color() == Color::Wild).then(|| favourite_color(hand)),
            },
            None => EventKind::Draw {
                player: me.to_string(),
                count: 1,
            },
        });
    }

    game.players
        .iter()
        .find(|p| p.uno)
        .map(|p| EventKind::Uno {
            caller: me.to_string(),
            target: p.name.clone(),
        })
}

/// Самый частый цвет в руке (для дикой карты).
fn favourite_color(hand: &[Card]) -> Color {
    Color::PLAYABLE
        .into_iter()
        .max_by_key(|color| hand.iter().filter(|c| c.color() == *color).count())
        .unwrap_or(Color::Red)
}

fn print_summary(game: &Game) {
    let view = build_game_view(game, None);
    println!();
    println!("================ GAME SUMMARY =================");
    println!("events: {}", view.last_event_id + 1);
    match (&view.winner, &game.error) {
        (Some(winner), _) => println!("winner: {winner}"),
        (None, Some(err)) => println!("halted: {err}"),
        (None, None) => println!("no winner (turn limit reached)"),
    }
    for p in &view.players {
        println!("  {:<6} cards={:<3} uno={}", p.name, p.hand_size, p.uno);
    }
    if let Some(top) = view.top_card {
        println!("top card: {top}");
    }
    println!("deck={} pile={}", view.deck_size, view.pile_size);
}
