//! Bitbucket pull request tools for AI agents.
//!
//! Exposes a small set of read-only pull-request operations twice: as an
//! agent-invokable tool registry ([`tools`]) and as plain HTTP GET routes
//! ([`server`]). Every call is a stateless read-through to the Bitbucket
//! REST API over one shared pooled client — nothing is cached or persisted.

pub mod auth;
pub mod bitbucket;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod server;
pub mod tools;
