// src/memoria/mod.rs

//! Armazenamento em memória do catálogo, das vendas e dos usuários.
//!
//! Um único `Mutex` protege todo o estado, então cada operação equivale a
//! uma transação serializável.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;
use thiserror::Error;

use crate::produtos::produtos_repositorio::Catalogo;
use crate::produtos::produtos_structs::{Pagina, Paginacao, Produto};
use crate::sacola::sacola_structs::Sacola;
use crate::shared::erros::ErroArmazem;
use crate::usuarios::usuario_repositorio::RepositorioUsuarios;
use crate::usuarios::usuario_structs::{Usuario, UsuarioParaGravar};
use crate::vendas::checkout::subtotal;
use crate::vendas::vendas_erros::ErroCheckout;
use crate::vendas::vendas_repositorio::RegistroVendas;
use crate::vendas::vendas_structs::{HistoricoVenda, ResumoProduto, Venda, VendaConfirmada};

#[derive(Debug, Default)]
struct Estado {
    produtos: BTreeMap<i32, Produto>,
    vendas: Vec<Venda>,
    usuarios: Vec<Usuario>,
}

#[derive(Debug, Default)]
pub struct ArmazemMemoria {
    estado: Mutex<Estado>,
}

impl ArmazemMemoria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Armazém com o catálogo informado.
    pub fn com_produtos(produtos: Vec<Produto>) -> Self {
        let estado = Estado {
            produtos: produtos.into_iter().map(|p| (p.id, p)).collect(),
            ..Estado::default()
        };

        Self {
            estado: Mutex::new(estado),
        }
    }

    /// Quantidade total de vendas registradas.
    #[cfg(test)]
    pub fn total_vendas(&self) -> usize {
        self.estado().vendas.len()
    }

    fn estado(&self) -> MutexGuard<'_, Estado> {
        self.estado.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Falhas ao carregar o catálogo inicial.
#[derive(Debug, Error)]
pub enum ErroCatalogo {
    #[error("não foi possível ler {caminho}: {source}")]
    Leitura {
        caminho: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON inválido em {caminho}: {source}")]
    Formato {
        caminho: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("produto {0} inválido no catálogo inicial")]
    ProdutoInvalido(i32),
}

/// Lê um catálogo inicial de um arquivo JSON (lista de produtos).
pub fn carregar_catalogo(caminho: &Path) -> Result<Vec<Produto>, ErroCatalogo> {
    let conteudo = std::fs::read_to_string(caminho).map_err(|source| ErroCatalogo::Leitura {
        caminho: caminho.to_path_buf(),
        source,
    })?;

    let produtos: Vec<Produto> = serde_json::from_str(&conteudo).map_err(|source| ErroCatalogo::Formato {
        caminho: caminho.to_path_buf(),
        source,
    })?;

    if let Some(invalido) = produtos
        .iter()
        .find(|p| p.nome.trim().is_empty() || p.estoque < 0 || p.preco < BigDecimal::from(0))
    {
        return Err(ErroCatalogo::ProdutoInvalido(invalido.id));
    }

    Ok(produtos)
}

#[async_trait]
impl Catalogo for ArmazemMemoria {
    async fn buscar_produto(&self, id: i32) -> Result<Option<Produto>, ErroArmazem> {
        Ok(self.estado().produtos.get(&id).cloned())
    }

    async fn buscar_produtos(&self, ids: &[i32]) -> Result<Vec<Produto>, ErroArmazem> {
        let estado = self.estado();

        Ok(ids.iter().filter_map(|id| estado.produtos.get(id).cloned()).collect())
    }

    async fn listar_em_estoque(&self, paginacao: Paginacao) -> Result<Pagina<Produto>, ErroArmazem> {
        let estado = self.estado();
        let em_estoque = estado.produtos.values().filter(|p| p.estoque > 0);

        let total = em_estoque.clone().count();
        let itens = em_estoque
            .skip(usize::try_from(paginacao.deslocamento()).unwrap_or(usize::MAX))
            .take(paginacao.por_pagina() as usize)
            .cloned()
            .collect();

        Ok(Pagina {
            itens,
            pagina: paginacao.pagina(),
            por_pagina: paginacao.por_pagina(),
            total: total as u64,
        })
    }
}

#[async_trait]
impl RegistroVendas for ArmazemMemoria {
    async fn registrar_venda(&self, usuario_id: i32, sacola: &Sacola) -> Result<VendaConfirmada, ErroCheckout> {
        if sacola.is_empty() {
            return Err(ErroCheckout::SacolaVazia);
        }

        let mut estado = self.estado();

        // Valida todos os itens antes de qualquer alteração
        for (produto_id, quantidade) in sacola.itens() {
            let produto = estado
                .produtos
                .get(&produto_id)
                .ok_or(ErroCheckout::ProdutoNaoEncontrado(produto_id))?;

            if produto.estoque < quantidade {
                return Err(ErroCheckout::EstoqueInsuficiente {
                    produto_id,
                    solicitado: quantidade,
                    disponivel: produto.estoque,
                });
            }
        }

        let agora = Utc::now();
        let mut total = BigDecimal::from(0);
        let mut vendas = Vec::with_capacity(sacola.len());
        let mut proximo_id = estado.vendas.last().map_or(1, |v| v.id + 1);

        for (produto_id, quantidade) in sacola.itens() {
            let Some(produto) = estado.produtos.get_mut(&produto_id) else {
                return Err(ErroCheckout::ProdutoNaoEncontrado(produto_id));
            };

            produto.estoque -= quantidade;
            total += subtotal(&produto.preco, quantidade);

            vendas.push(Venda {
                id: proximo_id,
                produto_id,
                usuario_id,
                quantidade,
                preco_unitario: produto.preco.clone(),
                data_venda: agora,
            });
            proximo_id += 1;
        }

        estado.vendas.extend(vendas.iter().cloned());

        Ok(VendaConfirmada { vendas, total })
    }

    async fn historico(&self, usuario_id: i32) -> Result<Vec<HistoricoVenda>, ErroArmazem> {
        let estado = self.estado();

        let mut historico: Vec<HistoricoVenda> = estado
            .vendas
            .iter()
            .filter(|v| v.usuario_id == usuario_id)
            .map(|v| HistoricoVenda {
                id: v.id,
                produto_id: v.produto_id,
                nome_produto: estado
                    .produtos
                    .get(&v.produto_id)
                    .map(|p| p.nome.clone())
                    .unwrap_or_default(),
                quantidade: v.quantidade,
                preco_unitario: v.preco_unitario.clone(),
                data_venda: v.data_venda,
            })
            .collect();

        historico.sort_by(|a, b| b.data_venda.cmp(&a.data_venda).then(b.id.cmp(&a.id)));

        Ok(historico)
    }

    async fn resumo(&self, usuario_id: i32) -> Result<Vec<ResumoProduto>, ErroArmazem> {
        let estado = self.estado();
        let mut por_produto: BTreeMap<i32, ResumoProduto> = BTreeMap::new();

        for venda in estado.vendas.iter().filter(|v| v.usuario_id == usuario_id) {
            let resumo = por_produto.entry(venda.produto_id).or_insert_with(|| ResumoProduto {
                produto_id: venda.produto_id,
                nome_produto: estado
                    .produtos
                    .get(&venda.produto_id)
                    .map(|p| p.nome.clone())
                    .unwrap_or_default(),
                quantidade_total: 0,
                valor_total: BigDecimal::from(0),
            });

            resumo.quantidade_total += i64::from(venda.quantidade);
            resumo.valor_total += subtotal(&venda.preco_unitario, venda.quantidade);
        }

        Ok(por_produto.into_values().collect())
    }
}

#[async_trait]
impl RepositorioUsuarios for ArmazemMemoria {
    async fn buscar_por_email(&self, email: &str) -> Result<Option<Usuario>, ErroArmazem> {
        Ok(self.estado().usuarios.iter().find(|u| u.email == email).cloned())
    }

    async fn inserir(&self, usuario: UsuarioParaGravar) -> Result<i32, ErroArmazem> {
        let mut estado = self.estado();

        if estado.usuarios.iter().any(|u| u.email == usuario.email) {
            return Err(ErroArmazem::Duplicado);
        }

        let id = estado.usuarios.last().map_or(1, |u| u.id + 1);
        estado.usuarios.push(Usuario {
            id,
            nome: usuario.nome,
            email: usuario.email,
            senha_hash: usuario.senha_hash,
        });

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Arc;
    use std::thread;

    use testresult::TestResult;

    use crate::test_helpers::produto;

    use super::*;

    #[actix_web::test]
    async fn cenario_a_venda_concluida() -> TestResult {
        let armazem = ArmazemMemoria::com_produtos(vec![produto(1, "Laptop", "10.00", 5)]);
        let sacola = Sacola::default().com_item(1, 2)?;

        let confirmada = armazem.registrar_venda(42, &sacola).await?;

        assert_eq!(confirmada.vendas.len(), 1);
        assert_eq!(confirmada.vendas[0].quantidade, 2);
        assert_eq!(confirmada.vendas[0].usuario_id, 42);
        assert_eq!(confirmada.total, BigDecimal::from(20));
        assert_eq!(armazem.buscar_produto(1).await?.map(|p| p.estoque), Some(3));

        Ok(())
    }

    #[actix_web::test]
    async fn cenario_b_produto_inexistente_nao_altera_nada() -> TestResult {
        let armazem = ArmazemMemoria::com_produtos(vec![produto(1, "Laptop", "10.00", 5)]);
        let sacola = Sacola::default().com_item(1, 2)?.com_item(99, 1)?;

        let resultado = armazem.registrar_venda(42, &sacola).await;

        assert!(matches!(resultado, Err(ErroCheckout::ProdutoNaoEncontrado(99))));
        assert_eq!(armazem.buscar_produto(1).await?.map(|p| p.estoque), Some(5));
        assert_eq!(armazem.total_vendas(), 0);

        Ok(())
    }

    #[actix_web::test]
    async fn cenario_c_estoque_insuficiente() -> TestResult {
        let armazem = ArmazemMemoria::com_produtos(vec![produto(1, "Laptop", "10.00", 1)]);
        let sacola = Sacola::default().com_item(1, 5)?;

        let resultado = armazem.registrar_venda(42, &sacola).await;

        assert!(matches!(
            resultado,
            Err(ErroCheckout::EstoqueInsuficiente {
                produto_id: 1,
                solicitado: 5,
                disponivel: 1
            })
        ));
        assert_eq!(armazem.buscar_produto(1).await?.map(|p| p.estoque), Some(1));
        assert_eq!(armazem.total_vendas(), 0);

        Ok(())
    }

    #[actix_web::test]
    async fn falha_no_ultimo_item_desfaz_os_anteriores() -> TestResult {
        let armazem = ArmazemMemoria::com_produtos(vec![
            produto(1, "Laptop", "10.00", 5),
            produto(2, "Mouse", "2.00", 5),
            produto(3, "Monitor", "50.00", 1),
        ]);
        let sacola = Sacola::default().com_item(1, 1)?.com_item(2, 1)?.com_item(3, 2)?;

        assert!(armazem.registrar_venda(42, &sacola).await.is_err());

        let estoques: Vec<i32> = armazem
            .buscar_produtos(&[1, 2, 3])
            .await?
            .into_iter()
            .map(|p| p.estoque)
            .collect();
        assert_eq!(estoques, vec![5, 5, 1]);
        assert_eq!(armazem.total_vendas(), 0);

        Ok(())
    }

    #[test]
    fn compras_concorrentes_nao_vendem_alem_do_estoque() -> TestResult {
        let armazem = Arc::new(ArmazemMemoria::com_produtos(vec![produto(1, "Laptop", "10.00", 5)]));
        let sacola = Sacola::default().com_item(1, 3)?;

        let handles: Vec<_> = (0..2)
            .map(|usuario_id| {
                let armazem = Arc::clone(&armazem);
                let sacola = sacola.clone();
                thread::spawn(move || futures::executor::block_on(armazem.registrar_venda(usuario_id, &sacola)))
            })
            .collect();

        let mut sucessos = 0;
        let mut sem_estoque = 0;
        for handle in handles {
            match handle.join() {
                Ok(Ok(_)) => sucessos += 1,
                Ok(Err(ErroCheckout::EstoqueInsuficiente { .. })) => sem_estoque += 1,
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err("thread de compra entrou em pânico".into()),
            }
        }

        assert_eq!((sucessos, sem_estoque), (1, 1));
        let estoque = futures::executor::block_on(armazem.buscar_produto(1))?.map(|p| p.estoque);
        assert_eq!(estoque, Some(2));

        Ok(())
    }

    #[actix_web::test]
    async fn historico_e_resumo_do_usuario() -> TestResult {
        let armazem = ArmazemMemoria::com_produtos(vec![
            produto(1, "Laptop", "10.00", 10),
            produto(2, "Mouse", "2.50", 10),
        ]);

        armazem.registrar_venda(7, &Sacola::default().com_item(1, 1)?.com_item(2, 2)?).await?;
        armazem.registrar_venda(7, &Sacola::default().com_item(2, 1)?).await?;
        armazem.registrar_venda(8, &Sacola::default().com_item(1, 3)?).await?;

        let historico = armazem.historico(7).await?;
        assert_eq!(historico.len(), 3);
        assert_eq!(historico[0].id, 3);

        let resumo = armazem.resumo(7).await?;
        assert_eq!(resumo.len(), 2);
        assert_eq!(resumo[1].quantidade_total, 3);
        assert_eq!(resumo[1].valor_total, BigDecimal::from_str("7.50")?);

        Ok(())
    }

    #[actix_web::test]
    async fn email_duplicado() -> TestResult {
        let armazem = ArmazemMemoria::new();
        let usuario = UsuarioParaGravar {
            nome: "Isabel".to_string(),
            email: "isabel@martinez.com".to_string(),
            senha_hash: "hash".to_string(),
        };

        assert_eq!(armazem.inserir(usuario.clone()).await?, 1);
        assert!(matches!(armazem.inserir(usuario).await, Err(ErroArmazem::Duplicado)));

        Ok(())
    }

    #[test]
    fn catalogo_inicial_de_exemplo_e_valido() -> TestResult {
        let caminho = Path::new(env!("CARGO_MANIFEST_DIR")).join("dados/produtos_exemplo.json");

        let produtos = carregar_catalogo(&caminho)?;

        assert!(!produtos.is_empty());

        Ok(())
    }

    #[test]
    fn catalogo_inexistente_informa_o_caminho() {
        let caminho = Path::new(env!("CARGO_MANIFEST_DIR")).join("dados/nao_existe.json");

        let erro = carregar_catalogo(&caminho);

        assert!(matches!(&erro, Err(ErroCatalogo::Leitura { caminho: c, .. }) if *c == caminho));
    }
}
