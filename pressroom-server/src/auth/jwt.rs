//! JWT token service
//!
//! Token generation, validation and the [`CurrentUser`] context extracted
//! from claims.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::workflow::{Role, Substage};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: load_jwt_secret(),
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(720),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "pressroom-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "pressroom-clients".to_string()),
        }
    }
}

fn load_jwt_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret,
        Ok(_) => {
            tracing::warn!("JWT_SECRET shorter than 32 bytes, generating a session key");
            generate_session_secret()
        }
        Err(_) => {
            tracing::warn!("JWT_SECRET not set, generating a session key (tokens will not survive restarts)");
            generate_session_secret()
        }
    }
}

/// Random 64-char printable secret, used when no JWT_SECRET is configured
fn generate_session_secret() -> String {
    const CHARS: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*-_=+";
    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect()
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Profile record id (subject)
    pub sub: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    /// Production specialty, if any
    #[serde(default)]
    pub specialty: Option<Substage>,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        display_name: &str,
        role: Role,
        specialty: Option<Substage>,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            role,
            specialty,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Current user context, parsed from JWT claims by the auth middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Profile record id ("profile:xyz")
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub specialty: Option<Substage>,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            display_name: claims.display_name,
            role: claims.role,
            specialty: claims.specialty,
        }
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Permission check against the role's static grant list. Admin passes
    /// everything; others match exact strings or "area:*" wildcards.
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }
        super::permissions::permissions_for(self.role)
            .iter()
            .any(|p| {
                if *p == permission {
                    return true;
                }
                if let Some(prefix) = p.strip_suffix(":*") {
                    permission.starts_with(&format!("{}:", prefix))
                } else {
                    false
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-test-secret-test-secret!".to_string(),
            expiration_minutes: 60,
            issuer: "pressroom-server".to_string(),
            audience: "pressroom-clients".to_string(),
        })
    }

    #[test]
    fn token_roundtrip() {
        let svc = service();
        let token = svc
            .generate_token("profile:abc", "meera", "Meera", Role::Sales, None)
            .unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "profile:abc");
        assert_eq!(claims.role, Role::Sales);
        assert!(claims.specialty.is_none());
    }

    #[test]
    fn specialty_survives_the_token() {
        let svc = service();
        let token = svc
            .generate_token(
                "profile:p1",
                "ravi",
                "Ravi",
                Role::Production,
                Some(Substage::Foiling),
            )
            .unwrap();
        let user = CurrentUser::from(svc.validate_token(&token).unwrap());
        assert_eq!(user.specialty, Some(Substage::Foiling));
    }

    #[test]
    fn garbage_token_rejected() {
        let svc = service();
        assert!(svc.validate_token("not.a.token").is_err());
    }

    #[test]
    fn admin_has_all_permissions() {
        let admin = CurrentUser {
            id: "profile:a".to_string(),
            username: "admin".to_string(),
            display_name: "Admin".to_string(),
            role: Role::Admin,
            specialty: None,
        };
        assert!(admin.has_permission("orders:import"));
        assert!(admin.has_permission("hr:manage"));
    }

    #[test]
    fn design_cannot_import() {
        let designer = CurrentUser {
            id: "profile:d".to_string(),
            username: "dee".to_string(),
            display_name: "Dee".to_string(),
            role: Role::Design,
            specialty: None,
        };
        assert!(!designer.has_permission("orders:import"));
        assert!(designer.has_permission("items:process"));
    }
}
