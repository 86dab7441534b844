// src/shared/shared_structs.rs

use serde::Serialize;

/// Estrutura genérica para padronizar as respostas da API.
/// 'T' é o tipo do corpo da resposta, que pode ser opcional.
#[derive(Debug, Serialize)]
pub struct GenericResponse<T> {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")] // Não serializa 'body' se for None
    pub body: Option<T>,
}

impl<T> GenericResponse<T> {
    /// Resposta de sucesso com corpo.
    pub fn sucesso(message: impl Into<String>, body: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            body: Some(body),
        }
    }

    /// Resposta de erro, com detalhes opcionais no corpo.
    pub fn erro(message: impl Into<String>, body: Option<T>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            body,
        }
    }
}

impl GenericResponse<()> {
    /// Resposta de sucesso sem corpo.
    pub fn mensagem(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            body: None,
        }
    }
}
