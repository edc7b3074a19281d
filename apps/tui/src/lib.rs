//! Terminal front-end for the adapt forms service: public form filling and
//! event sign-up, plus admin triage of what comes in.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod event;
pub mod form;
pub mod terminal;
pub mod ui;
