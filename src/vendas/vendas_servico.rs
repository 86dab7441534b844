// src/vendas/vendas_servico.rs

use std::fmt;

use tracing::{info, warn};

use super::checkout::{precificar_sacola, validar_estoque};
use super::vendas_erros::ErroCheckout;
use super::vendas_repositorio::RegistroVendas;
use super::vendas_structs::{Orcamento, VendaConfirmada};
use crate::produtos::produtos_repositorio::Catalogo;
use crate::sacola::sacola_store::SacolaStore;
use crate::usuarios::usuario_structs::Sessao;

/// Etapas de uma tentativa de compra.
///
/// `Revisando` -> `Confirmando` -> `Concluido` | `Rejeitado`. De `Rejeitado`
/// o comprador volta a `Revisando` com a sacola intacta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstadoCheckout {
    Revisando,
    Confirmando,
    Concluido,
    Rejeitado,
}

impl fmt::Display for EstadoCheckout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nome = match self {
            EstadoCheckout::Revisando => "revisando",
            EstadoCheckout::Confirmando => "confirmando",
            EstadoCheckout::Concluido => "concluido",
            EstadoCheckout::Rejeitado => "rejeitado",
        };
        f.write_str(nome)
    }
}

/// Orquestra revisão e confirmação de compra sobre a sacola da sessão.
pub struct ServicoCheckout<'a> {
    pub catalogo: &'a dyn Catalogo,
    pub vendas: &'a dyn RegistroVendas,
    pub sacolas: &'a dyn SacolaStore,
}

impl ServicoCheckout<'_> {
    /// Precifica a sacola e confere o estoque (apenas informativo).
    pub async fn revisar(&self, sessao: &Sessao) -> Result<Orcamento, ErroCheckout> {
        let sacola = self.sacolas.obter(sessao).await;
        if sacola.is_empty() {
            return Err(ErroCheckout::SacolaVazia);
        }

        let orcamento = precificar_sacola(self.catalogo, &sacola).await?;
        validar_estoque(self.catalogo, &sacola).await?;

        info!(estado = %EstadoCheckout::Revisando, itens = orcamento.itens.len(), total = %orcamento.total, "sacola revisada");

        Ok(orcamento)
    }

    /// Confirma a compra da sacola da sessão.
    ///
    /// A revisão anterior não é levada em conta: o registro da venda confere
    /// tudo de novo dentro da transação. A sacola só é esvaziada depois que a
    /// venda foi gravada; em qualquer falha ela continua como estava.
    pub async fn confirmar(&self, usuario_id: i32, sessao: &Sessao) -> Result<VendaConfirmada, ErroCheckout> {
        let sacola = self.sacolas.obter(sessao).await;
        if sacola.is_empty() {
            return Err(ErroCheckout::SacolaVazia);
        }

        info!(estado = %EstadoCheckout::Confirmando, usuario_id, itens = sacola.len(), "confirmando compra");

        let resultado = match precificar_sacola(self.catalogo, &sacola).await {
            Ok(_) => self.vendas.registrar_venda(usuario_id, &sacola).await,
            Err(e) => Err(e),
        };

        match resultado {
            Ok(confirmada) => {
                self.sacolas.limpar(sessao).await;

                let ids: Vec<i32> = confirmada.vendas.iter().map(|v| v.id).collect();
                info!(estado = %EstadoCheckout::Concluido, usuario_id, vendas = ?ids, total = %confirmada.total, "venda concluída");

                Ok(confirmada)
            }
            Err(e) => {
                warn!(estado = %EstadoCheckout::Rejeitado, usuario_id, kind = e.kind(), "venda rejeitada: {e}");

                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::memoria::ArmazemMemoria;
    use crate::sacola::sacola_store::SacolaMemoria;
    use crate::sacola::sacola_structs::Sacola;
    use crate::test_helpers::produto;

    use super::*;

    fn sessao() -> Sessao {
        Sessao {
            id: Uuid::new_v4(),
            expira_em: Utc::now() + Duration::hours(1),
        }
    }

    #[actix_web::test]
    async fn confirmacao_limpa_a_sacola() -> TestResult {
        let armazem = ArmazemMemoria::com_produtos(vec![produto(1, "Laptop", "10.00", 5)]);
        let sacolas = SacolaMemoria::new();
        let s = sessao();
        sacolas.definir(&s, Sacola::default().com_item(1, 2)?).await;

        let servico = ServicoCheckout {
            catalogo: &armazem,
            vendas: &armazem,
            sacolas: &sacolas,
        };

        let confirmada = servico.confirmar(1, &s).await?;

        assert_eq!(confirmada.vendas.len(), 1);
        assert!(sacolas.obter(&s).await.is_empty());
        assert_eq!(armazem.buscar_produto(1).await?.map(|p| p.estoque), Some(3));

        Ok(())
    }

    #[actix_web::test]
    async fn rejeicao_mantem_a_sacola() -> TestResult {
        let armazem = ArmazemMemoria::com_produtos(vec![produto(1, "Laptop", "10.00", 1)]);
        let sacolas = SacolaMemoria::new();
        let s = sessao();
        let sacola = Sacola::default().com_item(1, 5)?;
        sacolas.definir(&s, sacola.clone()).await;

        let servico = ServicoCheckout {
            catalogo: &armazem,
            vendas: &armazem,
            sacolas: &sacolas,
        };

        assert!(matches!(
            servico.confirmar(1, &s).await,
            Err(ErroCheckout::EstoqueInsuficiente { .. })
        ));
        assert_eq!(sacolas.obter(&s).await, sacola);

        Ok(())
    }

    #[actix_web::test]
    async fn confirmacao_reconfere_estoque_depois_da_revisao() -> TestResult {
        let armazem = ArmazemMemoria::com_produtos(vec![produto(1, "Laptop", "10.00", 3)]);
        let sacolas = SacolaMemoria::new();
        let ana = sessao();
        let juan = sessao();
        sacolas.definir(&ana, Sacola::default().com_item(1, 2)?).await;
        sacolas.definir(&juan, Sacola::default().com_item(1, 2)?).await;

        let servico = ServicoCheckout {
            catalogo: &armazem,
            vendas: &armazem,
            sacolas: &sacolas,
        };

        // As duas revisões passam; só uma confirmação cabe no estoque
        servico.revisar(&ana).await?;
        servico.revisar(&juan).await?;

        servico.confirmar(1, &ana).await?;
        let segunda = servico.confirmar(2, &juan).await;

        assert!(matches!(
            segunda,
            Err(ErroCheckout::EstoqueInsuficiente {
                produto_id: 1,
                solicitado: 2,
                disponivel: 1
            })
        ));
        assert_eq!(sacolas.obter(&juan).await.quantidade(1), Some(2));

        Ok(())
    }

    #[actix_web::test]
    async fn sacola_vazia() {
        let armazem = ArmazemMemoria::new();
        let sacolas = SacolaMemoria::new();
        let servico = ServicoCheckout {
            catalogo: &armazem,
            vendas: &armazem,
            sacolas: &sacolas,
        };

        assert!(matches!(servico.revisar(&sessao()).await, Err(ErroCheckout::SacolaVazia)));
        assert!(matches!(servico.confirmar(1, &sessao()).await, Err(ErroCheckout::SacolaVazia)));
    }
}
