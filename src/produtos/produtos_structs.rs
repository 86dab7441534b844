// src/produtos/produtos_structs.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Quantidade padrão de produtos por página na listagem.
pub const POR_PAGINA_PADRAO: u32 = 10;
/// Limite superior de itens por página.
pub const POR_PAGINA_MAXIMO: u32 = 100;

/// Estrutura que representa um produto no banco de dados
/// Deriva FromRow para mapeamento direto de resultados de query SQL.
/// `Deserialize` permite carregar um catálogo inicial de um arquivo JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Produto {
    pub id: i32,
    pub nome: String,
    pub descricao: String,
    pub categoria: String,
    pub preco: BigDecimal,
    pub estoque: i32,
}

/// Estrutura para a resposta da API ao buscar produtos
/// Usada para serializar os dados do produto para JSON
#[derive(Debug, Serialize)]
pub struct ProdutoResponse {
    pub id: i32,
    pub nome: String,
    pub descricao: String,
    pub categoria: String,
    pub preco: BigDecimal,
    pub estoque: i32,
}

impl From<Produto> for ProdutoResponse {
    fn from(p: Produto) -> Self {
        ProdutoResponse {
            id: p.id,
            nome: p.nome,
            descricao: p.descricao,
            categoria: p.categoria,
            preco: p.preco,
            estoque: p.estoque,
        }
    }
}

/// Parâmetros de paginação recebidos na query string (`?pagina=2&por_pagina=10`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Paginacao {
    pub pagina: Option<u32>,
    pub por_pagina: Option<u32>,
}

impl Paginacao {
    /// Página atual, começando em 1.
    pub fn pagina(&self) -> u32 {
        self.pagina.unwrap_or(1).max(1)
    }

    pub fn por_pagina(&self) -> u32 {
        self.por_pagina
            .unwrap_or(POR_PAGINA_PADRAO)
            .clamp(1, POR_PAGINA_MAXIMO)
    }

    /// Quantidade de registros a pular.
    pub fn deslocamento(&self) -> u64 {
        u64::from(self.pagina() - 1) * u64::from(self.por_pagina())
    }
}

/// Uma página de resultados.
#[derive(Debug, Serialize)]
pub struct Pagina<T> {
    pub itens: Vec<T>,
    pub pagina: u32,
    pub por_pagina: u32,
    pub total: u64,
}
