use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{FromRequest, HttpRequest, web};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;

/// Cookie set by the external auth service when the identity session is absent.
pub const AUTH_COOKIE_NAME: &str = "auth_token";

/// Claims of the JWT issued by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Subject identifier assigned by the auth service.
    pub sub: String,
    /// Email address of the employee.
    pub email: String,
    /// Display name shown in the navigation bar.
    pub name: String,
    /// Roles granted to the employee.
    pub roles: Vec<String>,
    /// Expiration timestamp of the token.
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Decode and verify a JWT with the shared secret.
    pub fn from_token(token: &str, secret: &str) -> Option<Self> {
        let key = DecodingKey::from_secret(secret.as_bytes());
        decode::<AuthenticatedUser>(token, &key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .ok()
    }
}

/// Returns true when `role` is present in the granted role list.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|granted| granted == role)
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            return ready(Err(ErrorInternalServerError("server config not loaded")));
        };

        let token = req
            .get_identity()
            .ok()
            .and_then(|identity| identity.id().ok())
            .or_else(|| {
                req.cookie(AUTH_COOKIE_NAME)
                    .map(|cookie| cookie.value().to_string())
            });

        match token.and_then(|token| Self::from_token(&token, &config.secret)) {
            Some(user) => ready(Ok(user)),
            None => ready(Err(ErrorUnauthorized("authentication required"))),
        }
    }
}
