pub mod board;
pub mod capture;
pub mod eval_constants;
pub mod game;
pub mod generator;
pub mod history;
pub mod rules;
pub mod variants;
