// src/shared/mod.rs

pub mod config;
pub mod erros;
pub mod logging;
pub mod shared_structs;
