//! WorldWise - a terminal client for a visited-cities journal
//!
//! The city store is a `tui-dispatch` reducer with async effects. It runs
//! either inside the terminal runtime (`main.rs`) or headless through
//! [`store::CityStore`].

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod logging;
pub mod reducer;
pub mod state;
pub mod store;
pub mod ui;
