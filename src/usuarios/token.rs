// src/usuarios/token.rs

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, errors::Error as JwtError, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use super::usuario_structs::{Claims, Sessao, Usuario};

/// Emite um token HS256 para o usuário, abrindo uma nova sessão.
///
/// Cada login gera um `sid` novo, de modo que a sacola de uma sessão anterior
/// não é reaproveitada.
pub fn emitir_token(usuario: &Usuario, segredo: &str, validade: Duration) -> Result<(String, Claims), JwtError> {
    let expira_em = Utc::now() + validade;

    let claims = Claims {
        sub: usuario.id,
        sid: Uuid::new_v4(),
        name: usuario.nome.clone(),
        email: usuario.email.clone(),
        exp: expira_em.timestamp(),
    };

    let token = encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(segredo.as_bytes()))?;

    Ok((token, claims))
}

/// Decodifica e valida (assinatura e expiração) um token.
pub fn validar_token(token: &str, segredo: &str) -> Result<Claims, JwtError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &DecodingKey::from_secret(segredo.as_bytes()), &validation)
        .map(|dados| dados.claims)
}

impl Claims {
    /// Sessão descrita pelas claims. Um `exp` fora do intervalo representável
    /// é tratado como já expirado.
    pub fn sessao(&self) -> Sessao {
        let expira_em: DateTime<Utc> = Utc
            .timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        Sessao { id: self.sid, expira_em }
    }
}
