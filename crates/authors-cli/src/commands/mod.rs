//! Command handlers

pub mod alias;
pub mod author;
pub mod config;
pub mod follow;
