//! HTTP surface: route handlers

pub mod handlers;
