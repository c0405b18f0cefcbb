use crate::domain::{Direction, Game};

/// Индекс места через `steps` шагов в направлении `direction`, по кругу.
pub fn seat_after(seat: usize, steps: usize, direction: Direction, seats: usize) -> usize {
    if seats == 0 {
        return 0;
    }
    let n = seats as isize;
    let offset = direction.step() * steps as isize;
    ((seat as isize + offset).rem_euclid(n)) as usize
}

/// Имя игрока через `steps` мест от `name` по текущему направлению игры.
pub fn player_after(game: &Game, name: &str, steps: usize) -> Option<String> {
    let seat = game.seat_of(name)?;
    let next = seat_after(seat, steps, game.direction, game.players.len());
    game.players.get(next).map(|p| p.name.clone())
}
