//! Plain data types shared by the engine: levels, events, setbacks,
//! client profiles and the game state.

pub mod client;
pub mod event;
pub mod level;
pub mod setback;
pub mod state;
