// src/sacola/sacola_router.rs

use actix_web::{delete, http::StatusCode, routes, web, HttpResponse};
use serde_json::json;
use tracing::{debug, warn};

use super::sacola_structs::{Sacola, SacolaResponse, SelecaoRequest};
use crate::shared::erros::resposta_erro;
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Rota para definir a sacola de compras da sessão.
///
/// A sacola é substituída inteira pelas entradas válidas. Entradas com
/// quantidade inválida são descartadas e listadas na resposta (400); as
/// válidas continuam gravadas.
#[routes]
#[post("/sacola")]
#[post("/cart")]
pub async fn definir_sacola(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    selecao: web::Json<SelecaoRequest>,
) -> HttpResponse {
    let (sacola, descartadas) = Sacola::interpretar(&selecao.selecoes);
    let view = SacolaResponse::from(&sacola);

    data.sacolas.definir(&user.sessao, sacola).await;

    if descartadas.is_empty() {
        debug!(usuario_id = user.user_id, itens = view.itens.len(), "sacola atualizada");
        return HttpResponse::Ok().json(GenericResponse::sucesso("Sacola atualizada.", view));
    }

    warn!(
        usuario_id = user.user_id,
        descartadas = descartadas.len(),
        "sacola atualizada com entradas descartadas"
    );

    resposta_erro(
        StatusCode::BAD_REQUEST,
        "QuantidadeInvalida",
        "Algumas quantidades são inválidas e foram descartadas.".to_string(),
        json!({ "descartadas": descartadas, "sacola": view }),
    )
}

/// Rota para visualizar o conteúdo atual da sacola de compras.
#[routes]
#[get("/sacola")]
#[get("/cart")]
pub async fn ver_sacola(data: web::Data<AppState>, user: AuthenticatedUser) -> HttpResponse {
    let sacola = data.sacolas.obter(&user.sessao).await;

    HttpResponse::Ok().json(GenericResponse::sucesso("Conteúdo da sacola", SacolaResponse::from(&sacola)))
}

/// Rota para esvaziar a sacola. Esvaziar uma sacola vazia não é erro.
#[delete("/sacola")]
pub async fn limpar_sacola(data: web::Data<AppState>, user: AuthenticatedUser) -> HttpResponse {
    data.sacolas.limpar(&user.sessao).await;

    HttpResponse::Ok().json(GenericResponse::mensagem("Sacola esvaziada."))
}
