// Library root: re-exports all modules so integration tests and the
// `sixaside` binary can access the crate's public API.

pub mod catalog;
pub mod command;
pub mod config;
pub mod db;
pub mod draft;
pub mod league;
pub mod service;
