// src/test_helpers.rs

use std::str::FromStr;
use std::sync::Arc;

use actix_web::web;
use bigdecimal::BigDecimal;
use chrono::Duration;

use crate::memoria::ArmazemMemoria;
use crate::produtos::produtos_structs::Produto;
use crate::sacola::sacola_store::SacolaMemoria;
use crate::usuarios::sessao_store::SessoesEncerradasMemoria;
use crate::usuarios::token::emitir_token;
use crate::usuarios::usuario_structs::Usuario;
use crate::AppState;

pub fn produto(id: i32, nome: &str, preco: &str, estoque: i32) -> Produto {
    Produto {
        id,
        nome: nome.to_string(),
        descricao: format!("{nome} de teste"),
        categoria: "Otros".to_string(),
        preco: BigDecimal::from_str(preco).expect("preço de teste inválido"),
        estoque,
    }
}

/// Estado da aplicação sobre o armazenamento em memória.
pub fn estado_de_teste(produtos: Vec<Produto>) -> (web::Data<AppState>, Arc<ArmazemMemoria>) {
    let armazem = Arc::new(ArmazemMemoria::com_produtos(produtos));

    let state = web::Data::new(AppState {
        catalogo: armazem.clone(),
        vendas: armazem.clone(),
        usuarios: armazem.clone(),
        sacolas: Arc::new(SacolaMemoria::new()),
        sessoes_encerradas: Arc::new(SessoesEncerradasMemoria::new()),
        jwt_secret: "segredo-de-teste".to_string(),
        jwt_validade_horas: 1,
        // Custo mínimo aceito pelo bcrypt
        bcrypt_custo: 4,
    });

    (state, armazem)
}

/// Token válido para o usuário informado, com uma sessão nova.
pub fn token_para(state: &AppState, usuario_id: i32) -> Result<String, jsonwebtoken::errors::Error> {
    let usuario = Usuario {
        id: usuario_id,
        nome: format!("Usuário {usuario_id}"),
        email: format!("usuario{usuario_id}@teste.com"),
        senha_hash: String::new(),
    };

    let (token, _) = emitir_token(&usuario, &state.jwt_secret, Duration::hours(state.jwt_validade_horas))?;

    Ok(token)
}
