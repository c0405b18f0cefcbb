//! Многопользовательское уно: детерминированный движок на журнале событий
//! и протокол репликации "хост решает, клиенты реплеят".
//!
//! Слои:
//! - `domain` — карты, колода, игроки, агрегат игры;
//! - `engine` — события, редьюсер, каскады, реплика;
//! - `infra` — RNG, seed'ы перемешиваний, коды комнат;
//! - `time_ctrl` — heartbeat и переподключение;
//! - `api` — сообщения по проводу и DTO для UI;
//! - `net` — хост, клиент, транспорт.

pub mod api;
pub mod domain;
pub mod engine;
pub mod infra;
pub mod net;
pub mod time_ctrl;
