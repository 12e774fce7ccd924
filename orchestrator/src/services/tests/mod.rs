//! Tests for orchestrator services

pub mod record_store;
