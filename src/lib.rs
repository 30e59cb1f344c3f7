// Slotgrid Library
// Scheduling core for a half-hour day/week calendar grid

pub mod models;
pub mod services;
pub mod utils;
