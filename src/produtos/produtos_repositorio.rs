// src/produtos/produtos_repositorio.rs

use async_trait::async_trait;
use sqlx::{query_as, query_scalar, Pool, Postgres};

use super::produtos_structs::{Pagina, Paginacao, Produto};
use crate::shared::erros::ErroArmazem;

/// Leitura do catálogo de produtos.
///
/// O catálogo é mantido pela administração; aqui só há consultas. O estoque
/// só é alterado pelo registro de vendas, dentro de uma transação.
#[async_trait]
pub trait Catalogo: Send + Sync {
    /// Busca um produto pelo ID.
    async fn buscar_produto(&self, id: i32) -> Result<Option<Produto>, ErroArmazem>;

    /// Busca vários produtos de uma vez. IDs inexistentes são simplesmente omitidos.
    async fn buscar_produtos(&self, ids: &[i32]) -> Result<Vec<Produto>, ErroArmazem>;

    /// Lista os produtos com estoque disponível, ordenados por ID.
    async fn listar_em_estoque(&self, paginacao: Paginacao) -> Result<Pagina<Produto>, ErroArmazem>;
}

/// Catálogo no PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgCatalogo {
    db_pool: Pool<Postgres>,
}

impl PgCatalogo {
    pub fn new(db_pool: Pool<Postgres>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl Catalogo for PgCatalogo {
    async fn buscar_produto(&self, id: i32) -> Result<Option<Produto>, ErroArmazem> {
        let produto = query_as::<_, Produto>(
            "SELECT id, nome, descricao, categoria, preco, estoque FROM produtos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(produto)
    }

    async fn buscar_produtos(&self, ids: &[i32]) -> Result<Vec<Produto>, ErroArmazem> {
        let produtos = query_as::<_, Produto>(
            "SELECT id, nome, descricao, categoria, preco, estoque FROM produtos WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(produtos)
    }

    async fn listar_em_estoque(&self, paginacao: Paginacao) -> Result<Pagina<Produto>, ErroArmazem> {
        let total = query_scalar::<_, i64>("SELECT COUNT(*) FROM produtos WHERE estoque > 0")
            .fetch_one(&self.db_pool)
            .await?;

        let itens = query_as::<_, Produto>(
            "SELECT id, nome, descricao, categoria, preco, estoque FROM produtos \
             WHERE estoque > 0 ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(paginacao.por_pagina()))
        .bind(i64::try_from(paginacao.deslocamento()).unwrap_or(i64::MAX))
        .fetch_all(&self.db_pool)
        .await?;

        Ok(Pagina {
            itens,
            pagina: paginacao.pagina(),
            por_pagina: paginacao.por_pagina(),
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}
