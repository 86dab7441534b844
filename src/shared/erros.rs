// src/shared/erros.rs

use actix_web::{http::StatusCode, HttpResponse};
use serde_json::Value;
use thiserror::Error;

use super::shared_structs::GenericResponse;

/// Código do Postgres para violação de restrição UNIQUE.
const UNIQUE_VIOLATION: &str = "23505";

/// Falhas da camada de persistência (Postgres ou armazenamento em memória).
#[derive(Debug, Error)]
pub enum ErroArmazem {
    #[error("registro duplicado")]
    Duplicado,

    #[error("erro de banco de dados: {0}")]
    Sql(#[source] sqlx::Error),
}

impl From<sqlx::Error> for ErroArmazem {
    fn from(erro: sqlx::Error) -> Self {
        let duplicado = erro
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == UNIQUE_VIOLATION);

        if duplicado {
            ErroArmazem::Duplicado
        } else {
            ErroArmazem::Sql(erro)
        }
    }
}

/// Monta a resposta de erro padrão da API.
///
/// `kind` identifica o tipo do erro de forma estável para o cliente; os
/// campos de `detalhes` (se for um objeto) são copiados para o corpo.
pub fn resposta_erro(status: StatusCode, kind: &str, message: String, detalhes: Value) -> HttpResponse {
    let mut body = serde_json::Map::new();
    body.insert("kind".to_string(), Value::String(kind.to_string()));

    if let Value::Object(campos) = detalhes {
        body.extend(campos);
    }

    HttpResponse::build(status).json(GenericResponse::erro(message, Some(Value::Object(body))))
}
