//! # Emergency Department Finder Bot
//!
//! A LINE chat bot that answers emergency department location queries for
//! Taipei, New Taipei and Keelung, either from free text
//! (`查詢 北投區 醫院`) or through a city → district → facility menu whose
//! state travels inside the buttons' action tokens.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod line;
pub mod localization;
pub mod menu_action;
pub mod query;
pub mod reply;
pub mod server;
