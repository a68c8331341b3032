//! HTTP middleware for Janus

pub mod auth;
