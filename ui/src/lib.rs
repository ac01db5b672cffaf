//! Shared UI crate for Styleshift. Cross-platform logic and views live here.

pub mod api;
pub mod components;
pub mod core;
pub mod results;
pub mod studio;
pub mod views;
