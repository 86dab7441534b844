// src/vendas/vendas_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Uma linha de venda registrada. Imutável depois de gravada.
///
/// `preco_unitario` guarda o preço praticado no momento da venda, para que o
/// histórico não mude quando o catálogo for reajustado.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Venda {
    pub id: i32,
    pub produto_id: i32,
    pub usuario_id: i32,
    pub quantidade: i32,
    pub preco_unitario: BigDecimal,
    pub data_venda: DateTime<Utc>,
}

/// Linha da sacola já com preço.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPrecificado {
    pub produto_id: i32,
    pub nome: String,
    pub preco_unitario: BigDecimal,
    pub quantidade: i32,
    pub subtotal: BigDecimal,
}

/// Resultado da precificação de uma sacola (etapa de revisão).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Orcamento {
    pub itens: Vec<ItemPrecificado>,
    pub total: BigDecimal,
}

/// Resultado de uma venda confirmada: uma `Venda` por item da sacola.
#[derive(Debug, Clone, PartialEq)]
pub struct VendaConfirmada {
    pub vendas: Vec<Venda>,
    pub total: BigDecimal,
}

/// Estrutura para a resposta de sucesso da venda.
/// Contém os IDs das vendas criadas e o valor total da compra.
#[derive(Debug, Serialize)]
pub struct VendaResponse {
    pub vendas_ids: Vec<i32>,
    pub total_compra: BigDecimal,
    pub mensagem: String,
}

impl From<&VendaConfirmada> for VendaResponse {
    fn from(confirmada: &VendaConfirmada) -> Self {
        VendaResponse {
            vendas_ids: confirmada.vendas.iter().map(|v| v.id).collect(),
            total_compra: confirmada.total.clone(),
            mensagem: "Venda processada e sacola limpa.".to_string(),
        }
    }
}

/// Linha do histórico de compras de um usuário.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct HistoricoVenda {
    pub id: i32,
    pub produto_id: i32,
    pub nome_produto: String,
    pub quantidade: i32,
    pub preco_unitario: BigDecimal,
    pub data_venda: DateTime<Utc>,
}

/// Totais por produto comprados por um usuário (dados do painel).
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ResumoProduto {
    pub produto_id: i32,
    pub nome_produto: String,
    pub quantidade_total: i64,
    pub valor_total: BigDecimal,
}
