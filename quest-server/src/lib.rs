//! Side-quest trip planner server.
//!
//! Finds curated and AI-generated "side quests" along a driving route and
//! turns them into multi-day itineraries with overnight stops, hotels and
//! a cost estimate.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod cost;
pub mod discovery;
pub mod domain;
pub mod geocode;
pub mod geometry;
pub mod itinerary;
pub mod llm;
pub mod lodging;
pub mod matcher;
pub mod overpass;
pub mod retry;
pub mod routing;
pub mod suggest;
pub mod web;
