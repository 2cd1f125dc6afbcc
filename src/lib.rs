// src/lib.rs

//! Contest Tracker Library

pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod services;
pub mod utils;
