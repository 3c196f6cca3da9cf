//! Terminal reader for technology headlines from The Guardian open platform.
//!
//! A fetch cycle builds a search URL from the saved settings, performs one
//! blocking GET on a background thread, parses `response.results` into
//! [`domain::Article`]s and hands them to a presenter exactly once.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod presenter;
pub mod services;
pub mod sources;
pub mod storage;
