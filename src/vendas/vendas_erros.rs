// src/vendas/vendas_erros.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::shared::erros::{resposta_erro, ErroArmazem};

/// Falhas da revisão e da confirmação de compra.
///
/// Em qualquer uma delas nada é gravado e a sacola permanece como estava.
#[derive(Debug, Error)]
pub enum ErroCheckout {
    #[error("A sacola está vazia. Adicione itens antes de realizar a venda.")]
    SacolaVazia,

    #[error("Produto com ID {0} não encontrado.")]
    ProdutoNaoEncontrado(i32),

    #[error("Estoque insuficiente para o produto {produto_id}: solicitado {solicitado}, disponível {disponivel}.")]
    EstoqueInsuficiente {
        produto_id: i32,
        solicitado: i32,
        disponivel: i32,
    },

    #[error("Não foi possível concluir a venda. Tente novamente.")]
    FalhaTransacao(#[source] ErroArmazem),
}

impl ErroCheckout {
    /// Nome estável do tipo de erro, exposto no corpo da resposta.
    pub fn kind(&self) -> &'static str {
        match self {
            ErroCheckout::SacolaVazia => "SacolaVazia",
            ErroCheckout::ProdutoNaoEncontrado(_) => "ProdutoNaoEncontrado",
            ErroCheckout::EstoqueInsuficiente { .. } => "EstoqueInsuficiente",
            ErroCheckout::FalhaTransacao(_) => "FalhaTransacao",
        }
    }
}

impl From<ErroArmazem> for ErroCheckout {
    fn from(erro: ErroArmazem) -> Self {
        ErroCheckout::FalhaTransacao(erro)
    }
}

impl From<sqlx::Error> for ErroCheckout {
    fn from(erro: sqlx::Error) -> Self {
        ErroCheckout::FalhaTransacao(ErroArmazem::from(erro))
    }
}

impl ResponseError for ErroCheckout {
    fn status_code(&self) -> StatusCode {
        match self {
            ErroCheckout::SacolaVazia => StatusCode::BAD_REQUEST,
            ErroCheckout::ProdutoNaoEncontrado(_) | ErroCheckout::EstoqueInsuficiente { .. } => StatusCode::CONFLICT,
            ErroCheckout::FalhaTransacao(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detalhes = match self {
            ErroCheckout::ProdutoNaoEncontrado(produto_id) => json!({ "produto_id": produto_id }),
            ErroCheckout::EstoqueInsuficiente {
                produto_id,
                solicitado,
                disponivel,
            } => json!({
                "produto_id": produto_id,
                "solicitado": solicitado,
                "disponivel": disponivel,
            }),
            ErroCheckout::FalhaTransacao(_) => json!({ "retentavel": true }),
            ErroCheckout::SacolaVazia => json!({}),
        };

        resposta_erro(self.status_code(), self.kind(), self.to_string(), detalhes)
    }
}

/// Falha ao consultar o histórico ou o resumo de compras.
#[derive(Debug, Error)]
#[error("Não foi possível consultar as compras. Tente novamente.")]
pub struct ErroConsulta(#[from] pub ErroArmazem);

impl ResponseError for ErroConsulta {
    fn status_code(&self) -> StatusCode {
        StatusCode::SERVICE_UNAVAILABLE
    }

    fn error_response(&self) -> HttpResponse {
        resposta_erro(self.status_code(), "FalhaConsulta", self.to_string(), json!({ "retentavel": true }))
    }
}
