//! Редьюсер: `apply(state, event) -> (next_state, cascade) | GameError`.
//!
//! Чистая функция: вход не мутируется (работаем с клоном), I/O нет,
//! случайность только через seed'ы, записанные в самих событиях.

use crate::domain::card::{Card, CardFace, Color};
use crate::domain::deck::Deck;
use crate::domain::game::Game;
use crate::domain::player::Player;
use crate::domain::{GameId, Seed};
use crate::engine::dealing::{shuffle_deck, STARTING_HAND};
use crate::engine::effects::{Effect, Sound};
use crate::engine::errors::GameError;
use crate::engine::events::{EventKind, GameEvent};
use crate::engine::positions::{player_after, seat_after};
use crate::engine::validation::validate_play;
use crate::infra::rng_seed::RngSeed;

/// Причина победы, когда игрок сбросил последнюю карту.
pub const EMPTY_HAND_REASON: &str = "Empty hand!";

/// Результат успешного применения события.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub game: Game,
    /// Каскадные события в порядке применения (без id).
    pub cascade: Vec<EventKind>,
    pub effects: Vec<Effect>,
}

/// Промежуточный результат одной ветки до общей пост-обработки.
struct Step {
    game: Game,
    cascade: Vec<EventKind>,
    effects: Vec<Effect>,
}

impl Step {
    fn new(game: Game) -> Self {
        Self {
            game,
            cascade: Vec::new(),
            effects: Vec::new(),
        }
    }

    fn sound(mut self, sound: Sound) -> Self {
        self.effects.push(Effect::PlaySound(sound));
        self
    }
}

/// Применить событие к состоянию.
///
/// Порядок проверок до логики конкретного типа:
/// 1. липкая ошибка реплики;
/// 2. `event.id == last_event_id + 1`;
/// 3. игра не окончена.
pub fn apply(state: Option<&Game>, event: &GameEvent) -> Result<Transition, GameError> {
    let game = match state {
        Some(game) => game,
        None => {
            return match &event.kind {
                EventKind::Create {
                    game_id,
                    player_count,
                } if event.id == 0 => Ok(finish(create(game_id, *player_count), event)),
                EventKind::Create { .. } => Err(GameError::AlreadyCreated),
                _ => Err(GameError::NotCreated),
            };
        }
    };

    if let Some(err) = &game.error {
        return Err(err.clone());
    }
    let expected = game.last_event_id + 1;
    if event.id != expected {
        return Err(GameError::OutOfOrder {
            expected,
            received: event.id,
        });
    }
    if game.is_over() {
        return Err(GameError::GameOver);
    }

    let step = match &event.kind {
        EventKind::Create { .. } => return Err(GameError::AlreadyCreated),
        EventKind::Join { player } => join(game, player)?,
        EventKind::Leave { player, seed } => leave(game, player, *seed),
        EventKind::Start { deck, start_player } => start(game, deck, start_player)?,
        EventKind::Draw { player, count } => draw(game, player, *count)?,
        EventKind::Play {
            player,
            card,
            chosen_color,
        } => play(game, player, card, *chosen_color)?,
        EventKind::Uno { caller, target } => uno(game, caller, target)?,
        EventKind::Shuffle { seed } => shuffle(game, *seed)?,
        EventKind::End { winner, .. } => {
            // Конец игры: без пост-обработки и без каскадов.
            let mut next = game.clone();
            next.winner = Some(winner.clone());
            next.last_event_id = event.id;
            next.events.push(event.clone());
            return Ok(Transition {
                game: next,
                cascade: Vec::new(),
                effects: Vec::new(),
            });
        }
    };

    Ok(finish(step, event))
}

/// Общая пост-обработка: если колода кончилась в начатой игре, сначала
/// перемешать сброс; затем записать событие в лог.
fn finish(mut step: Step, event: &GameEvent) -> Transition {
    if step.game.is_started() && step.game.deck.is_empty() {
        let seed = RngSeed::derive(&step.game.id, event.id).as_seed();
        step.cascade.insert(0, EventKind::Shuffle { seed });
    }

    step.game.last_event_id = event.id;
    step.game.events.push(event.clone());

    Transition {
        game: step.game,
        cascade: step.cascade,
        effects: step.effects,
    }
}

fn create(game_id: &GameId, player_count: usize) -> Step {
    Step::new(Game::new(game_id.clone(), player_count))
}

fn join(game: &Game, requested: &str) -> Result<Step, GameError> {
    if game.is_started() {
        return Err(GameError::AlreadyStarted);
    }
    if game.players.len() >= game.player_count {
        return Err(GameError::GameFull {
            capacity: game.player_count,
        });
    }

    let mut next = game.clone();
    let name = unique_name(game, requested);
    next.players.push(Player::new(name));
    Ok(Step::new(next))
}

/// Имя, не занятое в игре: "Ann" -> "Ann II" -> "Ann III" -> ...
fn unique_name(game: &Game, requested: &str) -> String {
    let mut name = requested.to_string();
    let mut first = true;
    while game.player(&name).is_some() {
        if first {
            name.push_str(" I");
            first = false;
        }
        name.push('I');
    }
    name
}

fn leave(game: &Game, player: &str, seed: Seed) -> Step {
    let mut next = game.clone();
    let Some(seat) = next.seat_of(player) else {
        return Step::new(next);
    };

    if next.current_player.as_deref() == Some(player) {
        next.current_player = player_after(&next, player, 1);
    }

    let leaver = next.players.remove(seat);

    if game.is_started() {
        next.deck.extend(leaver.hand);
        next.deck = shuffle_deck(&next.deck, seed);
    }

    if next.players.is_empty() {
        next.current_player = None;
    }

    Step::new(next)
}

fn start(game: &Game, deck: &Deck, start_player: &str) -> Result<Step, GameError> {
    if game.is_started() {
        return Err(GameError::AlreadyStarted);
    }
    if game.player(start_player).is_none() {
        return Err(GameError::UnknownPlayer {
            player: start_player.to_string(),
        });
    }

    let mut next = game.clone();
    next.deck = deck.clone();
    next.current_player = Some(start_player.to_string());

    let mut step = Step::new(next).sound(Sound::Shuffle);
    // Раздача: по STARTING_HAND карт каждому, по порядку мест.
    step.cascade = game
        .players
        .iter()
        .map(|p| EventKind::Draw {
            player: p.name.clone(),
            count: STARTING_HAND,
        })
        .collect();
    Ok(step)
}

fn draw(game: &Game, player: &str, count: usize) -> Result<Step, GameError> {
    if !game.is_started() {
        return Err(GameError::NotStarted);
    }

    let mut next = game.clone();
    let drawn = next.deck.draw_n(count);
    let remaining = count - drawn.len();

    let holder = next.player_mut(player).ok_or_else(|| GameError::InvalidDraw {
        player: player.to_string(),
    })?;
    holder.hand.extend(drawn);
    holder.refresh_uno();

    if remaining > 0 {
        // Колода кончилась: остаток дотянем после перемешивания.
        let mut step = Step::new(next);
        step.cascade.push(EventKind::Draw {
            player: player.to_string(),
            count: remaining,
        });
        return Ok(step);
    }

    Ok(Step::new(next).sound(Sound::Draw))
}

fn play(
    game: &Game,
    player: &str,
    card: &Card,
    chosen_color: Option<Color>,
) -> Result<Step, GameError> {
    if !game.is_started() {
        return Err(GameError::NotStarted);
    }
    validate_play(game, player, card, chosen_color)?;

    let seat = game.seat_of(player).ok_or_else(|| GameError::Unknown {
        message: format!("validated player {player} has no seat"),
    })?;
    let seats = game.players.len();

    let mut next = game.clone();
    let mut cascade = Vec::new();
    let mut next_seat = seat_after(seat, 1, game.direction, seats);

    match card.face {
        CardFace::Skip { .. } => {
            next_seat = seat_after(seat, 2, game.direction, seats);
        }
        CardFace::Reverse { .. } => {
            next.direction = game.direction.flipped();
            next_seat = seat_after(seat, 1, next.direction, seats);
        }
        CardFace::Draw { amount, .. } => {
            cascade.push(EventKind::Draw {
                player: game.players[next_seat].name.clone(),
                count: amount as usize,
            });
        }
        CardFace::Normal { .. } | CardFace::Wild { .. } => {}
    }

    let holder = &mut next.players[seat];
    holder.hand.retain(|c| c != card);
    holder.refresh_uno();
    let emptied = holder.hand.is_empty();

    let pile_card = match chosen_color {
        Some(color) if card.color() == Color::Wild => card.with_color(color),
        _ => *card,
    };
    next.pile.push(pile_card);
    next.last_player = Some(player.to_string());
    next.current_player = Some(next.players[next_seat].name.clone());

    if emptied {
        // Победа важнее штрафа следующему.
        cascade.clear();
        cascade.push(EventKind::End {
            winner: player.to_string(),
            reason: EMPTY_HAND_REASON.to_string(),
        });
    }

    let mut step = Step::new(next).sound(Sound::Play);
    step.cascade = cascade;
    Ok(step)
}

/// Объявление "уно". Если у цели флаг уже снят, это гонка сообщений,
/// а не ошибка: событие принимается, состояние не меняется.
fn uno(game: &Game, caller: &str, target: &str) -> Result<Step, GameError> {
    if !game.is_started() {
        return Err(GameError::NotStarted);
    }

    let mut next = game.clone();
    let Some(player) = next.player_mut(target) else {
        return Ok(Step::new(next));
    };
    if !player.uno {
        return Ok(Step::new(next));
    }

    player.uno = false;
    let mut step = Step::new(next);
    if caller != target {
        step.cascade.push(EventKind::Draw {
            player: target.to_string(),
            count: 2,
        });
    }
    Ok(step)
}

fn shuffle(game: &Game, seed: Seed) -> Result<Step, GameError> {
    // Верхняя карта сброса должна остаться, значит нужно хотя бы две.
    if game.pile.len() < 2 {
        return Err(GameError::InfiniteDraw);
    }

    let mut next = game.clone();
    let top_idx = next.pile.len() - 1;
    let rest: Vec<_> = next.pile.drain(..top_idx).collect();
    next.deck.extend(rest);
    next.deck.normalize_wilds();
    next.deck = shuffle_deck(&next.deck, seed);

    Ok(Step::new(next).sound(Sound::Shuffle))
}
