// src/usuarios/sessao_store.rs

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::usuario_structs::Sessao;

/// Sessões encerradas por logout antes da expiração do token.
///
/// Um token cuja sessão foi encerrada deixa de autenticar, mesmo que a
/// assinatura e o `exp` ainda sejam válidos.
#[async_trait]
pub trait SessoesEncerradas: Send + Sync {
    /// Marca a sessão como encerrada até a sua expiração.
    async fn encerrar(&self, sessao: &Sessao);

    async fn esta_encerrada(&self, sessao: &Sessao) -> bool;
}

/// Sessões encerradas em memória. Entradas saem do mapa quando o token expira.
#[derive(Debug, Default)]
pub struct SessoesEncerradasMemoria {
    encerradas: RwLock<HashMap<Uuid, DateTime<Utc>>>,
}

impl SessoesEncerradasMemoria {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn quantidade(&self) -> usize {
        self.encerradas.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl SessoesEncerradas for SessoesEncerradasMemoria {
    async fn encerrar(&self, sessao: &Sessao) {
        let agora = Utc::now();
        let mut encerradas = self.encerradas.write().unwrap_or_else(PoisonError::into_inner);

        // Tokens expirados já são recusados pela validação do JWT
        encerradas.retain(|_, expira_em| *expira_em > agora);

        if sessao.expira_em > agora {
            encerradas.insert(sessao.id, sessao.expira_em);
        }
    }

    async fn esta_encerrada(&self, sessao: &Sessao) -> bool {
        self.encerradas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&sessao.id)
    }
}
