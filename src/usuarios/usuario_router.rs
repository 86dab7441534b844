// src/usuarios/usuario_router.rs

use actix_web::{post, web, HttpResponse};
use bcrypt::{hash, verify};
use chrono::Duration;
use tracing::{error, info};

// Importa as structs do módulo de usuários
use super::auth_middleware::AuthenticatedUser;
use super::token::emitir_token;
use super::usuario_erros::ErroUsuario;
use super::usuario_structs::{AuthResponse, LoginRequest, NovoUsuario, UsuarioParaGravar};
// Importa GenericResponse do módulo shared_structs
use crate::shared::shared_structs::GenericResponse;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Tamanho mínimo aceito para a senha.
const SENHA_MINIMA: usize = 6;

fn validar_cadastro(novo_usuario: &NovoUsuario) -> Result<(), ErroUsuario> {
    if novo_usuario.nome.trim().is_empty() {
        return Err(ErroUsuario::DadosInvalidos("o nome é obrigatório".to_string()));
    }
    if !novo_usuario.email.contains('@') {
        return Err(ErroUsuario::DadosInvalidos("e-mail inválido".to_string()));
    }
    if novo_usuario.senha.chars().count() < SENHA_MINIMA {
        return Err(ErroUsuario::DadosInvalidos(format!(
            "a senha deve ter pelo menos {SENHA_MINIMA} caracteres"
        )));
    }
    Ok(())
}

/// Rota para cadastrar um novo usuário.
#[post("/usuarios/cadastro")]
pub async fn cadastrar_usuario(
    data: web::Data<AppState>,
    novo_usuario: web::Json<NovoUsuario>,
) -> Result<HttpResponse, ErroUsuario> {
    let novo_usuario = novo_usuario.into_inner();
    validar_cadastro(&novo_usuario)?;

    // 1. Verificar se o e-mail já está em uso
    if data.usuarios.buscar_por_email(&novo_usuario.email).await?.is_some() {
        return Err(ErroUsuario::EmailEmUso);
    }

    // 2. Hash da senha (bcrypt é custoso, roda fora do worker)
    let custo = data.bcrypt_custo;
    let senha = novo_usuario.senha;
    let senha_hash = web::block(move || hash(senha, custo))
        .await
        .map_err(|e| ErroUsuario::Interno(e.to_string()))?
        .map_err(|e| {
            error!("erro ao fazer hash da senha: {e}");
            ErroUsuario::Interno(e.to_string())
        })?;

    // 3. Inserir o novo usuário
    let id = data
        .usuarios
        .inserir(UsuarioParaGravar {
            nome: novo_usuario.nome,
            email: novo_usuario.email,
            senha_hash,
        })
        .await?;

    info!(usuario_id = id, "usuário cadastrado");

    Ok(HttpResponse::Created().json(GenericResponse::sucesso(
        format!("Usuário cadastrado com sucesso! ID: {id}"),
        serde_json::json!({ "id": id }),
    )))
}

/// Rota para login de usuário. Retorna um JWT que identifica o usuário e a sessão.
#[post("/usuarios/login")]
pub async fn login_usuario(
    data: web::Data<AppState>,
    login_request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ErroUsuario> {
    let login_request = login_request.into_inner();

    // 1. Buscar o usuário pelo e-mail
    let user = data
        .usuarios
        .buscar_por_email(&login_request.email)
        .await?
        .ok_or(ErroUsuario::CredenciaisInvalidas)?;

    // 2. Verificar a senha
    let senha_hash = user.senha_hash.clone();
    let password_matches = web::block(move || verify(login_request.senha, &senha_hash))
        .await
        .map_err(|e| ErroUsuario::Interno(e.to_string()))?
        .map_err(|e| {
            error!("erro ao verificar senha: {e}");
            ErroUsuario::Interno(e.to_string())
        })?;

    if !password_matches {
        return Err(ErroUsuario::CredenciaisInvalidas);
    }

    // 3. Gerar o token, abrindo uma nova sessão
    let (token, claims) = emitir_token(&user, &data.jwt_secret, Duration::hours(data.jwt_validade_horas))
        .map_err(|e| {
            error!("erro ao gerar token: {e}");
            ErroUsuario::Interno(e.to_string())
        })?;

    info!(usuario_id = user.id, sessao = %claims.sid, "login realizado");

    Ok(HttpResponse::Ok().json(AuthResponse {
        status: "success".to_string(),
        message: "Login bem-sucedido!".to_string(),
        user_id: user.id,
        user_name: user.nome,
        user_email: user.email,
        token,
        expira_em: claims.sessao().expira_em,
    }))
}

/// Rota de logout. Descarta a sacola e encerra a sessão: o token deixa de
/// autenticar mesmo antes de expirar.
#[post("/usuarios/logout")]
pub async fn logout_usuario(data: web::Data<AppState>, user: AuthenticatedUser) -> HttpResponse {
    data.sacolas.limpar(&user.sessao).await;
    data.sessoes_encerradas.encerrar(&user.sessao).await;

    info!(
        usuario_id = user.user_id,
        nome = %user.user_name,
        email = %user.user_email,
        sessao = %user.sessao.id,
        "logout realizado"
    );

    HttpResponse::Ok().json(GenericResponse::mensagem("Sessão encerrada."))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use testresult::TestResult;

    use crate::sacola::sacola_router::{definir_sacola, ver_sacola};
    use crate::test_helpers::{estado_de_teste, token_para};

    use super::*;

    #[actix_web::test]
    async fn cadastro_e_login() -> TestResult {
        let (state, _) = estado_de_teste(vec![]);
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(cadastrar_usuario)
                .service(login_usuario),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/usuarios/cadastro")
            .set_json(json!({ "nome": "Laura", "email": "laura@lopez.com", "senha": "123456" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/usuarios/login")
            .set_json(json!({ "email": "laura@lopez.com", "senha": "123456" }))
            .to_request();
        let corpo: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(corpo["status"], "success");
        assert!(corpo["token"].as_str().is_some_and(|t| !t.is_empty()));

        Ok(())
    }

    #[actix_web::test]
    async fn email_duplicado_e_rejeitado() -> TestResult {
        let (state, _) = estado_de_teste(vec![]);
        let app = test::init_service(App::new().app_data(state).service(cadastrar_usuario)).await;

        for esperado in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
            let req = test::TestRequest::post()
                .uri("/usuarios/cadastro")
                .set_json(json!({ "nome": "Elena", "email": "elena@perez.com", "senha": "segredo" }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), esperado);
        }

        Ok(())
    }

    #[actix_web::test]
    async fn senha_curta_e_rejeitada() -> TestResult {
        let (state, _) = estado_de_teste(vec![]);
        let app = test::init_service(App::new().app_data(state).service(cadastrar_usuario)).await;

        let req = test::TestRequest::post()
            .uri("/usuarios/cadastro")
            .set_json(json!({ "nome": "Juan", "email": "juan@sanchez.com", "senha": "123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[actix_web::test]
    async fn login_com_senha_errada() -> TestResult {
        let (state, _) = estado_de_teste(vec![]);
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(cadastrar_usuario)
                .service(login_usuario),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/usuarios/cadastro")
            .set_json(json!({ "nome": "Carlos", "email": "carlos@ramirez.com", "senha": "123456" }))
            .to_request();
        let _cadastro = test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/usuarios/login")
            .set_json(json!({ "email": "carlos@ramirez.com", "senha": "errada" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        Ok(())
    }

    #[actix_web::test]
    async fn logout_exige_token() -> TestResult {
        let (state, _) = estado_de_teste(vec![]);
        let token = token_para(&state, 1)?;
        let app = test::init_service(App::new().app_data(state).service(logout_usuario)).await;

        let req = test::TestRequest::post().uri("/usuarios/logout").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/usuarios/logout")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        Ok(())
    }

    #[actix_web::test]
    async fn token_nao_autentica_depois_do_logout() -> TestResult {
        let (state, _) = estado_de_teste(vec![]);
        let token = token_para(&state, 1)?;
        let auth = ("Authorization", format!("Bearer {token}"));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(logout_usuario)
                .service(definir_sacola)
                .service(ver_sacola),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/sacola")
            .insert_header(auth.clone())
            .set_json(json!({ "selecoes": { "1": 2 } }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/usuarios/logout")
            .insert_header(auth.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // O mesmo token não monta uma nova sacola nem lê a anterior
        let req = test::TestRequest::post()
            .uri("/sacola")
            .insert_header(auth.clone())
            .set_json(json!({ "selecoes": { "1": 3 } }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/sacola").insert_header(auth).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        Ok(())
    }

    #[actix_web::test]
    async fn logout_nao_afeta_outras_sessoes() -> TestResult {
        let (state, _) = estado_de_teste(vec![]);
        let encerrada = token_para(&state, 1)?;
        let ativa = token_para(&state, 1)?;
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(logout_usuario)
                .service(ver_sacola),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/usuarios/logout")
            .insert_header(("Authorization", format!("Bearer {encerrada}")))
            .to_request();
        let _logout = test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/sacola")
            .insert_header(("Authorization", format!("Bearer {ativa}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        Ok(())
    }
}
