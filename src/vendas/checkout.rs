// src/vendas/checkout.rs

//! Precificação e conferência de estoque de uma sacola.
//!
//! Tudo aqui é somente leitura: pode ser chamado quantas vezes for preciso
//! sem alterar o catálogo nem a sacola. A conferência de estoque é apenas
//! informativa; a verificação que vale é a feita dentro da transação da venda.

use std::collections::HashMap;

use bigdecimal::BigDecimal;

use super::vendas_erros::ErroCheckout;
use super::vendas_structs::{ItemPrecificado, Orcamento};
use crate::produtos::produtos_repositorio::Catalogo;
use crate::produtos::produtos_structs::Produto;
use crate::sacola::sacola_structs::Sacola;

/// Valor de uma linha: preço unitário × quantidade, em decimal exato.
pub fn subtotal(preco: &BigDecimal, quantidade: i32) -> BigDecimal {
    preco * &BigDecimal::from(quantidade)
}

/// Busca os produtos da sacola, falhando no primeiro ID (em ordem crescente) inexistente.
async fn carregar_produtos(catalogo: &dyn Catalogo, sacola: &Sacola) -> Result<HashMap<i32, Produto>, ErroCheckout> {
    let produtos: HashMap<i32, Produto> = catalogo
        .buscar_produtos(&sacola.produtos())
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    if let Some(faltando) = sacola.produtos().into_iter().find(|id| !produtos.contains_key(id)) {
        return Err(ErroCheckout::ProdutoNaoEncontrado(faltando));
    }

    Ok(produtos)
}

/// Calcula o valor de cada item e o total da sacola.
///
/// Se algum produto não existir mais, a operação inteira falha com
/// [`ErroCheckout::ProdutoNaoEncontrado`]; não há precificação parcial.
pub async fn precificar_sacola(catalogo: &dyn Catalogo, sacola: &Sacola) -> Result<Orcamento, ErroCheckout> {
    let produtos = carregar_produtos(catalogo, sacola).await?;

    let mut total = BigDecimal::from(0);
    let mut itens = Vec::with_capacity(sacola.len());

    for (produto_id, quantidade) in sacola.itens() {
        let Some(produto) = produtos.get(&produto_id) else {
            return Err(ErroCheckout::ProdutoNaoEncontrado(produto_id));
        };

        let valor = subtotal(&produto.preco, quantidade);
        total += valor.clone();

        itens.push(ItemPrecificado {
            produto_id,
            nome: produto.nome.clone(),
            preco_unitario: produto.preco.clone(),
            quantidade,
            subtotal: valor,
        });
    }

    Ok(Orcamento { itens, total })
}

/// Confere cada item contra o estoque atual do catálogo.
pub async fn validar_estoque(catalogo: &dyn Catalogo, sacola: &Sacola) -> Result<(), ErroCheckout> {
    let produtos = carregar_produtos(catalogo, sacola).await?;

    for (produto_id, quantidade) in sacola.itens() {
        let disponivel = produtos.get(&produto_id).map_or(0, |p| p.estoque);

        if quantidade > disponivel {
            return Err(ErroCheckout::EstoqueInsuficiente {
                produto_id,
                solicitado: quantidade,
                disponivel,
            });
        }
    }

    Ok(())
}
