//! Language-model features: quest generation, trip ideas and hotel price
//! estimates.
//!
//! All are optional enrichment. Without an API key, or when the model is
//! slow or talks nonsense, callers get an empty quest list or fallback
//! prices instead of an error.

mod client;
mod error;
mod parse;
mod prompt;
mod types;

pub use client::{LlmClient, LlmConfig};
pub use error::LlmError;
pub use parse::{
    DEFAULT_DETOUR_MINUTES, DEFAULT_XP, DETOUR_RANGE, XP_RANGE, fallback_prices, parse_prices,
    parse_quests, parse_trip_ideas, strip_code_fences,
};
pub use prompt::{price_prompt, quest_prompt, trip_ideas_prompt};
