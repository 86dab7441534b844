// src/usuarios/auth_middleware.rs

use actix_web::{dev::Payload, error::ErrorUnauthorized, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use jsonwebtoken::errors::ErrorKind;
use tracing::{error, warn};

use super::token::validar_token;
use super::usuario_structs::Sessao;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Struct que representa o usuário autenticado, contendo as claims do JWT.
/// Será extraída das requisições protegidas.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub sessao: Sessao,
}

/// Extrator de autenticação para Actix Web.
/// Valida o token JWT presente no cabeçalho Authorization (`Bearer <token>`).
impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { extrair(&req).await })
    }
}

async fn extrair(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let Some(app_state) = req.app_data::<web::Data<AppState>>() else {
        error!("AppState não disponível no extrator de autenticação");
        return Err(ErrorUnauthorized("Erro de configuração do servidor."));
    };

    let header_str = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| ErrorUnauthorized("Token de autenticação ausente."))?
        .to_str()
        .map_err(|_| ErrorUnauthorized("Token de autenticação inválido."))?;

    let token = header_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| ErrorUnauthorized("Formato de token inválido. Esperado 'Bearer <token>'."))?;

    let claims = validar_token(token, &app_state.jwt_secret).map_err(|e| {
        warn!("token rejeitado: {e}");
        let error_message = match e.kind() {
            ErrorKind::ExpiredSignature => "Token expirado.",
            ErrorKind::InvalidSignature => "Assinatura do token inválida.",
            ErrorKind::InvalidToken => "Token malformado.",
            _ => "Token de autenticação inválido.",
        };
        ErrorUnauthorized(error_message)
    })?;

    // Token íntegro, mas a sessão foi encerrada por logout
    let sessao = claims.sessao();
    if app_state.sessoes_encerradas.esta_encerrada(&sessao).await {
        warn!(usuario_id = claims.sub, sessao = %sessao.id, "token de sessão encerrada");
        return Err(ErrorUnauthorized("Sessão encerrada. Faça login novamente."));
    }

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        sessao,
        user_name: claims.name,
        user_email: claims.email,
    })
}
