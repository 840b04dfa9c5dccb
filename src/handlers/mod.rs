//! Request handlers

pub mod check;
pub mod health;
pub mod update;
