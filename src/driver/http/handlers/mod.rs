//! HTTP Handlers

pub mod admin;
pub mod auth;
pub mod teams;
