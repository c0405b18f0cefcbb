//! Инфраструктурный слой вокруг движка:
//! - RNG-реализации (детерминированная для реплея и системная);
//! - вывод seed'ов для каскадных перемешиваний;
//! - генерация кодов комнат.

pub mod ids;
pub mod rng;
pub mod rng_seed;

pub use ids::*;
pub use rng::*;
pub use rng_seed::RngSeed;
