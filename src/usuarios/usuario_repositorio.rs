// src/usuarios/usuario_repositorio.rs

use async_trait::async_trait;
use sqlx::{query_as, Pool, Postgres, Row};

use super::usuario_structs::{Usuario, UsuarioParaGravar};
use crate::shared::erros::ErroArmazem;

/// Acesso aos usuários cadastrados.
#[async_trait]
pub trait RepositorioUsuarios: Send + Sync {
    /// Busca um usuário pelo e-mail.
    async fn buscar_por_email(&self, email: &str) -> Result<Option<Usuario>, ErroArmazem>;

    /// Grava um novo usuário e retorna o ID gerado.
    /// Falha com [`ErroArmazem::Duplicado`] se o e-mail já estiver em uso.
    async fn inserir(&self, usuario: UsuarioParaGravar) -> Result<i32, ErroArmazem>;
}

/// Repositório de usuários no PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgUsuarios {
    db_pool: Pool<Postgres>,
}

impl PgUsuarios {
    pub fn new(db_pool: Pool<Postgres>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RepositorioUsuarios for PgUsuarios {
    async fn buscar_por_email(&self, email: &str) -> Result<Option<Usuario>, ErroArmazem> {
        let usuario = query_as::<_, Usuario>("SELECT id, nome, email, senha_hash FROM usuarios WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(usuario)
    }

    async fn inserir(&self, usuario: UsuarioParaGravar) -> Result<i32, ErroArmazem> {
        // A restrição UNIQUE do e-mail resolve cadastros simultâneos
        let row = sqlx::query("INSERT INTO usuarios (nome, email, senha_hash) VALUES ($1, $2, $3) RETURNING id")
            .bind(&usuario.nome)
            .bind(&usuario.email)
            .bind(&usuario.senha_hash)
            .fetch_one(&self.db_pool)
            .await?;

        Ok(row.try_get::<i32, _>("id")?)
    }
}
