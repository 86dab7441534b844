// src/sacola/sacola_store.rs

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::sacola_structs::Sacola;
use crate::usuarios::usuario_structs::Sessao;

/// Armazena a sacola de cada sessão.
///
/// Toda operação recebe a sessão autenticada; não há como ler ou gravar a
/// sacola de outra sessão. Gravações substituem a sacola inteira.
#[async_trait]
pub trait SacolaStore: Send + Sync {
    /// Substitui a sacola da sessão.
    async fn definir(&self, sessao: &Sessao, sacola: Sacola);

    /// Sacola atual da sessão, ou uma sacola vazia.
    async fn obter(&self, sessao: &Sessao) -> Sacola;

    /// Remove a sacola da sessão. Idempotente.
    async fn limpar(&self, sessao: &Sessao);
}

#[derive(Debug)]
struct SacolaArmazenada {
    sacola: Sacola,
    expira_em: DateTime<Utc>,
}

/// Sacolas em memória, válidas até a expiração da sessão.
#[derive(Debug, Default)]
pub struct SacolaMemoria {
    sacolas: RwLock<HashMap<Uuid, SacolaArmazenada>>,
}

impl SacolaMemoria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantidade de sessões com sacola armazenada (inclui expiradas ainda não removidas).
    #[cfg(test)]
    pub fn sessoes(&self) -> usize {
        self.sacolas.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl SacolaStore for SacolaMemoria {
    async fn definir(&self, sessao: &Sessao, sacola: Sacola) {
        let agora = Utc::now();
        let mut sacolas = self.sacolas.write().unwrap_or_else(PoisonError::into_inner);

        // Aproveita a escrita para descartar sacolas de sessões expiradas
        sacolas.retain(|_, armazenada| armazenada.expira_em > agora);

        if sessao.expira_em <= agora {
            return;
        }

        if sacola.is_empty() {
            sacolas.remove(&sessao.id);
        } else {
            sacolas.insert(
                sessao.id,
                SacolaArmazenada {
                    sacola,
                    expira_em: sessao.expira_em,
                },
            );
        }
    }

    async fn obter(&self, sessao: &Sessao) -> Sacola {
        let agora = Utc::now();

        {
            let sacolas = self.sacolas.read().unwrap_or_else(PoisonError::into_inner);
            match sacolas.get(&sessao.id) {
                None => return Sacola::default(),
                Some(armazenada) if armazenada.expira_em > agora => return armazenada.sacola.clone(),
                Some(_) => {}
            }
        }

        // Expirada: remove e devolve vazia
        self.sacolas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&sessao.id);

        Sacola::default()
    }

    async fn limpar(&self, sessao: &Sessao) {
        self.sacolas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&sessao.id);
    }
}
