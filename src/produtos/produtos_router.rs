// src/produtos/produtos_router.rs

use actix_web::{get, web, HttpResponse};
use serde_json::json;
use tracing::error;

// Importa as structs definidas no módulo `produtos_structs` dentro da mesma pasta `produtos`
use super::produtos_structs::{Pagina, Paginacao, ProdutoResponse};
use crate::shared::erros::resposta_erro;
use crate::shared::shared_structs::GenericResponse;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

fn erro_interno(contexto: &str, e: impl std::fmt::Display) -> HttpResponse {
    error!("{contexto}: {e}");
    resposta_erro(
        actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        "Interno",
        format!("Erro ao {contexto}"),
        json!({}),
    )
}

/// Rota para listar os produtos disponíveis (com estoque), paginados.
#[get("/produtos")]
pub async fn buscar_produtos(data: web::Data<AppState>, paginacao: web::Query<Paginacao>) -> HttpResponse {
    match data.catalogo.listar_em_estoque(paginacao.into_inner()).await {
        Ok(pagina) => {
            // Converte cada 'Produto' para 'ProdutoResponse'
            let response = Pagina {
                itens: pagina.itens.into_iter().map(ProdutoResponse::from).collect(),
                pagina: pagina.pagina,
                por_pagina: pagina.por_pagina,
                total: pagina.total,
            };
            HttpResponse::Ok().json(GenericResponse::sucesso("Produtos disponíveis", response))
        }
        Err(e) => erro_interno("buscar produtos", e),
    }
}

/// Rota para buscar um produto pelo ID.
#[get("/produtos/{id}")]
pub async fn buscar_produto_por_id(data: web::Data<AppState>, id: web::Path<i32>) -> HttpResponse {
    let id = id.into_inner();

    match data.catalogo.buscar_produto(id).await {
        Ok(Some(produto)) => {
            HttpResponse::Ok().json(GenericResponse::sucesso("Produto encontrado", ProdutoResponse::from(produto)))
        }
        Ok(None) => resposta_erro(
            actix_web::http::StatusCode::NOT_FOUND,
            "ProdutoNaoEncontrado",
            format!("Produto com ID {id} não encontrado."),
            json!({ "produto_id": id }),
        ),
        Err(e) => erro_interno("buscar produto", e),
    }
}
