// src/usuarios/usuario_erros.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::shared::erros::{resposta_erro, ErroArmazem};

/// Erros de cadastro e login.
#[derive(Debug, Error)]
pub enum ErroUsuario {
    #[error("Dados de cadastro inválidos: {0}")]
    DadosInvalidos(String),

    #[error("E-mail já cadastrado.")]
    EmailEmUso,

    #[error("Credenciais inválidas.")]
    CredenciaisInvalidas,

    #[error("Erro interno ao processar a requisição.")]
    Interno(String),
}

impl From<ErroArmazem> for ErroUsuario {
    fn from(erro: ErroArmazem) -> Self {
        match erro {
            ErroArmazem::Duplicado => ErroUsuario::EmailEmUso,
            ErroArmazem::Sql(e) => ErroUsuario::Interno(e.to_string()),
        }
    }
}

impl ResponseError for ErroUsuario {
    fn status_code(&self) -> StatusCode {
        match self {
            ErroUsuario::DadosInvalidos(_) | ErroUsuario::EmailEmUso => StatusCode::BAD_REQUEST,
            ErroUsuario::CredenciaisInvalidas => StatusCode::UNAUTHORIZED,
            ErroUsuario::Interno(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let kind = match self {
            ErroUsuario::DadosInvalidos(_) => "DadosInvalidos",
            ErroUsuario::EmailEmUso => "EmailEmUso",
            ErroUsuario::CredenciaisInvalidas => "CredenciaisInvalidas",
            ErroUsuario::Interno(_) => "Interno",
        };

        resposta_erro(self.status_code(), kind, self.to_string(), json!({}))
    }
}
