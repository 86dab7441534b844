// src/usuarios/usuario_structs.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estrutura que representa um usuário no banco de dados.
/// A senha será armazenada como um hash.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Usuario {
    pub id: i32,
    pub nome: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub senha_hash: String, // Armazenará o hash da senha
}

/// Estrutura para receber dados de um novo usuário na requisição de cadastro.
#[derive(Deserialize)]
pub struct NovoUsuario {
    pub nome: String,
    pub email: String,
    pub senha: String, // Senha em texto claro (será hashed antes de salvar)
}

/// Dados do usuário já prontos para gravação (senha com hash).
#[derive(Debug, Clone)]
pub struct UsuarioParaGravar {
    pub nome: String,
    pub email: String,
    pub senha_hash: String,
}

/// Estrutura para receber dados de login do usuário.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String, // Senha em texto claro
}

/// Estrutura para o payload do JWT (Claims).
/// Contém informações sobre o usuário, a sessão e a expiração do token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,      // Subject (ID do usuário)
    pub sid: Uuid,     // ID da sessão, usado para isolar a sacola
    pub name: String,  // Nome do usuário
    pub email: String, // Email do usuário
    pub exp: i64,      // Expiration Time (timestamp Unix)
}

/// Sessão autenticada. A sacola de compras vive apenas enquanto a sessão é válida.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sessao {
    pub id: Uuid,
    pub expira_em: DateTime<Utc>,
}

/// Estrutura para a resposta de sucesso do login.
#[derive(Serialize)]
pub struct AuthResponse {
    pub status: String,
    pub message: String,
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub token: String,
    pub expira_em: DateTime<Utc>,
}
