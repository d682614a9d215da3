//! Meetdash - analytics backend for a business meetup dashboard
//!
//! This library provides the core functionality for the Meetdash service:
//! event tracking, per-meetup summary aggregation, business-level metric
//! roll-ups, and the dashboard HTTP API.
//!
//! # Architecture
//! - `analytics`: event recorder, summary aggregator, metric roll-ups
//! - `store`: document store trait and backends (memory, file)
//! - `api`: HTTP endpoints and response envelope
//! - `services`: meetup and business profile services
//! - `middleware`: dashboard authentication
//! - `config`: environment-driven configuration

pub mod analytics;
pub mod api;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod services;
pub mod store;
pub mod utils;
