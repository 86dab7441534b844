// src/sacola/mod.rs

pub mod sacola_router;
pub mod sacola_store;
pub mod sacola_structs;
