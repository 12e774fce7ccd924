//! Tests for scorer services
//!
//! The Groq client is exercised against a local wiremock server.
