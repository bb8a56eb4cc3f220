//! Postboard: a server-rendered frontend for a remote social posts API.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
