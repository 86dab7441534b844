// src/usuarios/mod.rs

// Declara o submódulo que contém as definições das structs de usuários
pub mod usuario_structs;
// Declara o submódulo com os erros de cadastro e login
pub mod usuario_erros;
// Declara o submódulo de acesso aos usuários persistidos
pub mod usuario_repositorio;
// Declara o submódulo que contém as funções de rota relacionadas a usuários
pub mod usuario_router;
// Declara o submódulo de emissão e validação de tokens JWT
pub mod token;
// Declara o submódulo para o middleware de autenticação
pub mod auth_middleware;
// Declara o submódulo das sessões encerradas por logout
pub mod sessao_store;
