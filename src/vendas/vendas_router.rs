// src/vendas/vendas_router.rs

use actix_web::{get, routes, web, HttpResponse};
use tracing::error;

// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;
// Importa GenericResponse do módulo shared_structs
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
// Importa as structs e o serviço de vendas
use super::vendas_erros::{ErroCheckout, ErroConsulta};
use super::vendas_servico::ServicoCheckout;
use super::vendas_structs::VendaResponse;

fn servico(data: &AppState) -> ServicoCheckout<'_> {
    ServicoCheckout {
        catalogo: data.catalogo.as_ref(),
        vendas: data.vendas.as_ref(),
        sacolas: data.sacolas.as_ref(),
    }
}

/// Rota de revisão: precifica a sacola da sessão e confere o estoque.
///
/// Nada é gravado. O resultado é apenas informativo; o estoque pode mudar
/// até a confirmação.
#[routes]
#[post("/checkout/revisao")]
#[post("/checkout/review")]
pub async fn revisar_compra(data: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse, ErroCheckout> {
    let orcamento = servico(&data).revisar(&user.sessao).await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Revisão da compra", orcamento)))
}

/// Rota para realizar a venda dos itens da sacola.
///
/// Passos:
/// 1. Lê a sacola da sessão (sem esvaziá-la).
/// 2. Precifica os itens.
/// 3. Registra as vendas numa transação que bloqueia, confere e decrementa o estoque.
/// 4. Só depois do commit esvazia a sacola.
///
/// Em qualquer falha nada é gravado e a sacola é mantida para nova tentativa.
#[routes]
#[post("/checkout/confirmacao")]
#[post("/checkout/confirm")]
pub async fn realizar_venda(data: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse, ErroCheckout> {
    let confirmada = servico(&data).confirmar(user.user_id, &user.sessao).await?;

    Ok(HttpResponse::Created().json(GenericResponse::sucesso(
        "Venda realizada com sucesso!",
        VendaResponse::from(&confirmada),
    )))
}

/// Histórico de compras do usuário autenticado.
#[get("/vendas")]
pub async fn historico_compras(data: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse, ErroConsulta> {
    let historico = data.vendas.historico(user.user_id).await.map_err(|e| {
        error!("erro ao buscar histórico do usuário {}: {e}", user.user_id);
        ErroConsulta::from(e)
    })?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Histórico de compras", historico)))
}

/// Totais comprados por produto pelo usuário autenticado (dados do painel).
#[get("/vendas/resumo")]
pub async fn resumo_compras(data: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse, ErroConsulta> {
    let resumo = data.vendas.resumo(user.user_id).await.map_err(|e| {
        error!("erro ao buscar resumo do usuário {}: {e}", user.user_id);
        ErroConsulta::from(e)
    })?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Resumo de compras", resumo)))
}
