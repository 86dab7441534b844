// src/vendas/vendas_repositorio.rs

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::{query_as, Pool, Postgres, Transaction};
use tracing::{error, warn};

use super::checkout::subtotal;
use super::vendas_erros::ErroCheckout;
use super::vendas_structs::{HistoricoVenda, ResumoProduto, Venda, VendaConfirmada};
use crate::produtos::produtos_structs::Produto;
use crate::sacola::sacola_structs::Sacola;
use crate::shared::erros::ErroArmazem;

/// Registro transacional de vendas.
#[async_trait]
pub trait RegistroVendas: Send + Sync {
    /// Registra uma venda por item da sacola, de forma atômica.
    ///
    /// Cada produto é relido dentro da transação; se algum não existir ou não
    /// tiver estoque suficiente, nada é gravado. Em caso de sucesso o estoque
    /// de cada produto é decrementado e uma [`Venda`] é criada por item.
    async fn registrar_venda(&self, usuario_id: i32, sacola: &Sacola) -> Result<VendaConfirmada, ErroCheckout>;

    /// Compras do usuário, das mais recentes para as mais antigas.
    async fn historico(&self, usuario_id: i32) -> Result<Vec<HistoricoVenda>, ErroArmazem>;

    /// Quantidade e valor comprados por produto, ordenados por produto.
    async fn resumo(&self, usuario_id: i32) -> Result<Vec<ResumoProduto>, ErroArmazem>;
}

/// Registro de vendas no PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgRegistroVendas {
    db_pool: Pool<Postgres>,
}

impl PgRegistroVendas {
    pub fn new(db_pool: Pool<Postgres>) -> Self {
        Self { db_pool }
    }
}

/// Desfaz a transação e devolve o erro que causou o cancelamento.
async fn abortar(transaction: Transaction<'static, Postgres>, erro: ErroCheckout) -> ErroCheckout {
    if let Err(e) = transaction.rollback().await {
        // A conexão é descartada pelo pool; o Postgres desfaz a transação de qualquer forma
        warn!("erro ao desfazer transação: {e}");
    }
    erro
}

#[async_trait]
impl RegistroVendas for PgRegistroVendas {
    async fn registrar_venda(&self, usuario_id: i32, sacola: &Sacola) -> Result<VendaConfirmada, ErroCheckout> {
        if sacola.is_empty() {
            return Err(ErroCheckout::SacolaVazia);
        }

        // Inicia uma transação no banco de dados para garantir atomicidade
        let mut transaction = self.db_pool.begin().await.map_err(|e| {
            error!("erro ao iniciar transação: {e}");
            ErroCheckout::from(e)
        })?;

        let mut total = BigDecimal::from(0);
        let mut vendas = Vec::with_capacity(sacola.len());

        // Os itens vêm em ordem crescente de ID: duas compras com produtos em
        // comum sempre bloqueiam as linhas na mesma ordem, sem deadlock.
        for (produto_id, quantidade) in sacola.itens() {
            // FOR UPDATE bloqueia a linha até o fim da transação
            let produto_result = query_as::<_, Produto>(
                "SELECT id, nome, descricao, categoria, preco, estoque FROM produtos WHERE id = $1 FOR UPDATE",
            )
            .bind(produto_id)
            .fetch_optional(&mut *transaction)
            .await;

            let produto = match produto_result {
                Ok(Some(p)) => p,
                Ok(None) => {
                    return Err(abortar(transaction, ErroCheckout::ProdutoNaoEncontrado(produto_id)).await);
                }
                Err(e) => {
                    error!("erro ao buscar produto {produto_id}: {e}");
                    return Err(abortar(transaction, e.into()).await);
                }
            };

            if produto.estoque < quantidade {
                warn!(
                    produto_id,
                    solicitado = quantidade,
                    disponivel = produto.estoque,
                    "estoque insuficiente na confirmação"
                );
                let erro = ErroCheckout::EstoqueInsuficiente {
                    produto_id,
                    solicitado: quantidade,
                    disponivel: produto.estoque,
                };
                return Err(abortar(transaction, erro).await);
            }

            // A condição no WHERE repete a verificação na própria escrita
            let atualizado = sqlx::query("UPDATE produtos SET estoque = estoque - $1 WHERE id = $2 AND estoque >= $1")
                .bind(quantidade)
                .bind(produto_id)
                .execute(&mut *transaction)
                .await;

            match atualizado {
                Ok(resultado) if resultado.rows_affected() == 1 => {}
                Ok(_) => {
                    let erro = ErroCheckout::EstoqueInsuficiente {
                        produto_id,
                        solicitado: quantidade,
                        disponivel: produto.estoque,
                    };
                    return Err(abortar(transaction, erro).await);
                }
                Err(e) => {
                    error!("erro ao atualizar estoque do produto {produto_id}: {e}");
                    return Err(abortar(transaction, e.into()).await);
                }
            }

            let venda = query_as::<_, Venda>(
                "INSERT INTO vendas (produto_id, usuario_id, quantidade, preco_unitario, data_venda) \
                 VALUES ($1, $2, $3, $4, NOW()) \
                 RETURNING id, produto_id, usuario_id, quantidade, preco_unitario, data_venda",
            )
            .bind(produto_id)
            .bind(usuario_id)
            .bind(quantidade)
            .bind(&produto.preco)
            .fetch_one(&mut *transaction)
            .await;

            match venda {
                Ok(venda) => vendas.push(venda),
                Err(e) => {
                    error!("erro ao registrar venda do produto {produto_id}: {e}");
                    return Err(abortar(transaction, e.into()).await);
                }
            }

            total += subtotal(&produto.preco, quantidade);
        }

        // Se todas as operações foram bem-sucedidas, comita a transação
        transaction.commit().await.map_err(|e| {
            error!("erro ao comitar transação: {e}");
            ErroCheckout::from(e)
        })?;

        Ok(VendaConfirmada { vendas, total })
    }

    async fn historico(&self, usuario_id: i32) -> Result<Vec<HistoricoVenda>, ErroArmazem> {
        let historico = query_as::<_, HistoricoVenda>(
            "SELECT v.id, v.produto_id, p.nome AS nome_produto, v.quantidade, v.preco_unitario, v.data_venda \
             FROM vendas v JOIN produtos p ON p.id = v.produto_id \
             WHERE v.usuario_id = $1 ORDER BY v.data_venda DESC, v.id DESC",
        )
        .bind(usuario_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(historico)
    }

    async fn resumo(&self, usuario_id: i32) -> Result<Vec<ResumoProduto>, ErroArmazem> {
        let resumo = query_as::<_, ResumoProduto>(
            "SELECT v.produto_id, p.nome AS nome_produto, \
                    SUM(v.quantidade)::BIGINT AS quantidade_total, \
                    SUM(v.quantidade * v.preco_unitario) AS valor_total \
             FROM vendas v JOIN produtos p ON p.id = v.produto_id \
             WHERE v.usuario_id = $1 GROUP BY v.produto_id, p.nome ORDER BY v.produto_id",
        )
        .bind(usuario_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(resumo)
    }
}
