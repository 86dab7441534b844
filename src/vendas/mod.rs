// src/vendas/mod.rs

pub mod checkout;
pub mod vendas_erros;
pub mod vendas_repositorio;
pub mod vendas_router;
pub mod vendas_servico;
pub mod vendas_structs;
