// src/main.rs

use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use sqlx::{Pool, Postgres};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::util::TryInitError;

// Importa os módulos
mod memoria; // Armazenamento em memória
mod produtos; // Módulo de produtos
mod sacola; // Sacola de compras por sessão
mod shared; // Módulo shared
mod usuarios; // Módulo de usuários
mod vendas; // Módulo de vendas (checkout)

#[cfg(test)]
mod test_helpers;

use memoria::{carregar_catalogo, ArmazemMemoria, ErroCatalogo};
use produtos::produtos_repositorio::{Catalogo, PgCatalogo};
use sacola::sacola_store::{SacolaMemoria, SacolaStore};
use shared::config::{Armazenamento, Config};
use usuarios::sessao_store::{SessoesEncerradas, SessoesEncerradasMemoria};
use usuarios::usuario_repositorio::{PgUsuarios, RepositorioUsuarios};
use vendas::vendas_repositorio::{PgRegistroVendas, RegistroVendas};

// Estado compartilhado entre as rotas: repositórios, sacolas das sessões e
// parâmetros de autenticação.
pub struct AppState {
    pub catalogo: Arc<dyn Catalogo>,
    pub vendas: Arc<dyn RegistroVendas>,
    pub usuarios: Arc<dyn RepositorioUsuarios>,
    pub sacolas: Arc<dyn SacolaStore>,
    pub sessoes_encerradas: Arc<dyn SessoesEncerradas>,
    pub jwt_secret: String, //Chave secreta para JWT
    pub jwt_validade_horas: i64,
    pub bcrypt_custo: u32,
}

/// Falhas que impedem a API de subir.
#[derive(Debug, Error)]
enum ErroInicializacao {
    #[error("falha ao inicializar o log: {0}")]
    Logging(#[source] TryInitError),
    #[error("DATABASE_URL é obrigatória com o armazenamento postgres")]
    SemDatabaseUrl,
    #[error("falha ao conectar ao banco PostgreSQL: {0}")]
    Conexao(#[source] sqlx::Error),
    #[error("falha ao executar as migrações: {0}")]
    Migracao(#[source] sqlx::migrate::MigrateError),
    #[error("falha ao carregar o catálogo inicial: {0}")]
    Catalogo(#[source] ErroCatalogo),
}

impl From<ErroInicializacao> for std::io::Error {
    fn from(erro: ErroInicializacao) -> Self {
        std::io::Error::new(std::io::ErrorKind::Other, erro)
    }
}

async fn montar_estado(config: &Config) -> Result<AppState, ErroInicializacao> {
    let (catalogo, vendas, usuarios): (Arc<dyn Catalogo>, Arc<dyn RegistroVendas>, Arc<dyn RepositorioUsuarios>) =
        match config.armazenamento {
            Armazenamento::Postgres => {
                let database_url = config.database_url.as_deref().ok_or(ErroInicializacao::SemDatabaseUrl)?;

                // A coluna 'preco' é NUMERIC, compatível com bigdecimal::BigDecimal
                let db_pool = Pool::<Postgres>::connect(database_url)
                    .await
                    .map_err(ErroInicializacao::Conexao)?;

                if config.executar_migracoes {
                    sqlx::migrate!("./migrations")
                        .run(&db_pool)
                        .await
                        .map_err(ErroInicializacao::Migracao)?;
                    info!("migrações aplicadas");
                }

                (
                    Arc::new(PgCatalogo::new(db_pool.clone())),
                    Arc::new(PgRegistroVendas::new(db_pool.clone())),
                    Arc::new(PgUsuarios::new(db_pool)),
                )
            }
            Armazenamento::Memoria => {
                let armazem = match &config.catalogo_inicial {
                    Some(caminho) => {
                        let produtos = carregar_catalogo(caminho).map_err(ErroInicializacao::Catalogo)?;
                        info!(produtos = produtos.len(), catalogo = %caminho.display(), "catálogo inicial carregado");
                        ArmazemMemoria::com_produtos(produtos)
                    }
                    None => ArmazemMemoria::new(),
                };
                info!("usando armazenamento em memória");

                let armazem = Arc::new(armazem);
                (armazem.clone(), armazem.clone(), armazem)
            }
        };

    Ok(AppState {
        catalogo,
        vendas,
        usuarios,
        sacolas: Arc::new(SacolaMemoria::new()),
        sessoes_encerradas: Arc::new(SessoesEncerradasMemoria::new()),
        jwt_secret: config.jwt_secret.clone(),
        jwt_validade_horas: config.jwt_validade_horas,
        bcrypt_custo: config.bcrypt_custo,
    })
}

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::carregar();

    shared::logging::inicializar(&config.log_level).map_err(ErroInicializacao::Logging)?;

    // web::Data é usado para compartilhar o estado entre as rotas.
    let app_state = web::Data::new(montar_estado(&config).await?);

    let endereco = config.endereco();
    info!(%endereco, armazenamento = ?config.armazenamento, "iniciando API Maria Online Store");

    // Configura e inicia o servidor HTTP.
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            // Módulo de Produtos
            .service(produtos::produtos_router::buscar_produtos)
            .service(produtos::produtos_router::buscar_produto_por_id)
            // Sacola da sessão
            .service(sacola::sacola_router::definir_sacola)
            .service(sacola::sacola_router::ver_sacola)
            .service(sacola::sacola_router::limpar_sacola)
            // Checkout e histórico
            .service(vendas::vendas_router::revisar_compra)
            .service(vendas::vendas_router::realizar_venda)
            .service(vendas::vendas_router::historico_compras)
            .service(vendas::vendas_router::resumo_compras)
            // Módulo de Usuários
            .service(usuarios::usuario_router::cadastrar_usuario)
            .service(usuarios::usuario_router::login_usuario)
            .service(usuarios::usuario_router::logout_usuario)
    })
    .bind(endereco)?
    .run()
    .await
}
