// src/shared/config.rs

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Onde os produtos, vendas e usuários são persistidos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Armazenamento {
    /// Banco PostgreSQL (produção).
    Postgres,
    /// Armazenamento em memória (desenvolvimento e demonstração).
    Memoria,
}

/// Configuração da API, lida da linha de comando e de variáveis de ambiente.
#[derive(Debug, Parser)]
#[command(name = "maria-store", about = "API da Maria Online Store", long_about = None)]
pub struct Config {
    /// Endereço em que o servidor escuta
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Porta do servidor
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Nível de log (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Backend de persistência
    #[arg(long, env = "ARMAZENAMENTO", value_enum, default_value_t = Armazenamento::Postgres)]
    pub armazenamento: Armazenamento,

    /// String de conexão do PostgreSQL (obrigatória com `--armazenamento postgres`)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Executa as migrações do diretório `migrations/` ao iniciar
    #[arg(long, env = "EXECUTAR_MIGRACOES", default_value_t = true, action = ArgAction::Set)]
    pub executar_migracoes: bool,

    /// Arquivo JSON com os produtos iniciais (apenas no armazenamento em memória)
    #[arg(long, env = "CATALOGO_INICIAL")]
    pub catalogo_inicial: Option<PathBuf>,

    /// Chave secreta usada para assinar os tokens JWT
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Validade dos tokens (e da sessão/sacola) em horas
    #[arg(long, env = "JWT_VALIDADE_HORAS", default_value_t = 24)]
    pub jwt_validade_horas: i64,

    /// Custo do bcrypt para o hash das senhas
    #[arg(long, env = "BCRYPT_CUSTO", default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_custo: u32,
}

impl Config {
    /// Carrega a configuração. O arquivo `.env`, se existir, é lido antes.
    pub fn carregar() -> Self {
        _ = dotenvy::dotenv();

        Self::parse()
    }

    /// Endereço para o `bind` do servidor.
    pub fn endereco(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn valores_padrao() -> TestResult {
        let config = Config::try_parse_from([
            "maria-store",
            "--jwt-secret",
            "segredo",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
        ])?;

        assert_eq!(config.endereco(), "0.0.0.0:9000");
        assert_eq!(config.armazenamento, Armazenamento::Postgres);
        assert!(config.executar_migracoes);
        assert_eq!(config.jwt_validade_horas, 24);

        Ok(())
    }

    #[test]
    fn armazenamento_em_memoria() -> TestResult {
        let config = Config::try_parse_from([
            "maria-store",
            "--jwt-secret",
            "segredo",
            "--armazenamento",
            "memoria",
            "--executar-migracoes",
            "false",
        ])?;

        assert_eq!(config.armazenamento, Armazenamento::Memoria);
        assert!(!config.executar_migracoes);

        Ok(())
    }
}
