// src/sacola/sacola_structs.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Seleção pendente de um comprador: produto -> quantidade.
///
/// Toda quantidade armazenada é positiva; a única forma de inserir itens é
/// por [`Sacola::com_item`] ou [`Sacola::interpretar`], que validam a entrada.
/// Os itens são percorridos em ordem crescente de ID de produto.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sacola {
    itens: BTreeMap<i32, i32>,
}

/// Entrada descartada ao montar a sacola.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("Quantidade inválida para o produto '{produto}': {valor}")]
pub struct QuantidadeInvalida {
    /// Chave recebida, como veio do cliente.
    pub produto: String,
    /// Valor recebido para a quantidade.
    pub valor: Value,
}

/// Corpo do `POST /sacola`: `{"selecoes": {"6": 2, "7": 1}}`.
#[derive(Debug, Deserialize)]
pub struct SelecaoRequest {
    pub selecoes: Map<String, Value>,
}

/// Item da sacola como exibido ao cliente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSacola {
    pub produto_id: i32,
    pub quantidade: i32,
}

/// Visão da sacola retornada pela API.
#[derive(Debug, Clone, Serialize)]
pub struct SacolaResponse {
    pub itens: Vec<ItemSacola>,
}

impl From<&Sacola> for SacolaResponse {
    fn from(sacola: &Sacola) -> Self {
        SacolaResponse {
            itens: sacola
                .itens()
                .map(|(produto_id, quantidade)| ItemSacola { produto_id, quantidade })
                .collect(),
        }
    }
}

impl Sacola {
    pub fn is_empty(&self) -> bool {
        self.itens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.itens.len()
    }

    /// Pares (produto, quantidade) em ordem crescente de produto.
    pub fn itens(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.itens.iter().map(|(&produto, &quantidade)| (produto, quantidade))
    }

    /// IDs dos produtos selecionados, em ordem crescente.
    pub fn produtos(&self) -> Vec<i32> {
        self.itens.keys().copied().collect()
    }

    pub fn quantidade(&self, produto_id: i32) -> Option<i32> {
        self.itens.get(&produto_id).copied()
    }

    /// Adiciona (ou substitui) um item. Quantidades não positivas são rejeitadas.
    pub fn com_item(mut self, produto_id: i32, quantidade: i64) -> Result<Self, QuantidadeInvalida> {
        let quantidade = validar_quantidade(&Value::from(quantidade)).ok_or_else(|| QuantidadeInvalida {
            produto: produto_id.to_string(),
            valor: Value::from(quantidade),
        })?;
        self.itens.insert(produto_id, quantidade);
        Ok(self)
    }

    /// Converte o mapa não confiável enviado pelo cliente em uma sacola.
    ///
    /// Entradas com ID de produto ou quantidade inválidos (não inteiros, zero,
    /// negativos ou fora do intervalo de `i32`) são descartadas e devolvidas
    /// na lista de erros; as demais compõem a sacola.
    pub fn interpretar(selecoes: &Map<String, Value>) -> (Sacola, Vec<QuantidadeInvalida>) {
        let mut sacola = Sacola::default();
        let mut descartadas = Vec::new();

        for (chave, valor) in selecoes {
            let produto_id = chave.trim().parse::<i32>().ok().filter(|id| *id > 0);

            match (produto_id, validar_quantidade(valor)) {
                (Some(produto_id), Some(quantidade)) => {
                    sacola.itens.insert(produto_id, quantidade);
                }
                _ => descartadas.push(QuantidadeInvalida {
                    produto: chave.clone(),
                    valor: valor.clone(),
                }),
            }
        }

        (sacola, descartadas)
    }
}

/// Aceita inteiros JSON e strings numéricas (formulários enviam texto).
fn validar_quantidade(valor: &Value) -> Option<i32> {
    let bruto = match valor {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };

    i32::try_from(bruto).ok().filter(|q| *q > 0)
}
