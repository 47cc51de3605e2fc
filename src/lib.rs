// Core game logic modules
pub mod core;

// Wire protocol (commands and events)
pub mod models;

// Services (broadcast routing, round flow, command handling)
pub mod services;

// HTTP routes
pub mod routes;

// Application state
pub mod state;
