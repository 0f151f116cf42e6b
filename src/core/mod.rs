pub mod client_gen;
pub mod config;
pub mod content;
pub mod deck;
pub mod engine;
pub mod evaluator;
pub mod generator;
pub mod persist;
pub mod random;
pub mod session;
pub mod setback;
pub mod taxonomy;
pub mod turn;
