use axum::http::{HeaderMap, header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{
    entity::canteens,
    error::{AppError, AppResult},
};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

/// Identity resolved once per request from a verified token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i32,
    pub email: String,
    pub role: String,
}

impl Identity {
    /// Vendor capability check: the canteen's registered contact email or its
    /// owning user id must match the requesting identity.
    pub fn can_manage(&self, canteen: &canteens::Model) -> bool {
        canteen.email == self.email || canteen.user_id == self.user_id
    }
}

/// The identity attached to a GraphQL request, if any. Stored in the schema
/// context; anonymous requests carry `None`.
#[derive(Debug, Clone)]
pub struct RequestIdentity(pub Option<Identity>);

impl RequestIdentity {
    pub fn require(&self) -> AppResult<&Identity> {
        self.0
            .as_ref()
            .ok_or_else(|| AppError::Forbidden("missing or invalid access token".into()))
    }
}

/// Extract and verify the caller's token from the `accessToken` cookie or the
/// `Authorization: Bearer` header. Tokens that fail signature verification
/// yield no identity.
pub fn identity_from_headers(headers: &HeaderMap, secret: &str) -> Option<Identity> {
    let token = bearer_token(headers).or_else(|| cookie_token(headers))?;

    let decoded = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    let user_id = decoded.claims.sub.parse::<i32>().ok()?;
    Some(Identity {
        user_id,
        email: decoded.claims.email,
        role: decoded.claims.role,
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in cookies.split(';') {
        let (key, value) = cookie.trim().split_once('=')?;
        if key == ACCESS_TOKEN_COOKIE {
            return Some(value.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn make_token(secret: &str) -> String {
        let claims = Claims {
            sub: "7".into(),
            email: "vendor@campus.edu".into(),
            role: "vendor".into(),
            exp: 4_000_000_000,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn cookie_token_is_verified() {
        let mut headers = HeaderMap::new();
        let token = make_token("s3cret");
        headers.insert(
            header::COOKIE,
            format!("theme=dark; accessToken={token}").parse().unwrap(),
        );

        let identity = identity_from_headers(&headers, "s3cret").expect("identity");
        assert_eq!(identity.user_id, 7);
        assert_eq!(identity.email, "vendor@campus.edu");
    }

    #[test]
    fn forged_token_yields_no_identity() {
        let mut headers = HeaderMap::new();
        let token = make_token("wrong-secret");
        headers.insert(
            header::COOKIE,
            format!("accessToken={token}").parse().unwrap(),
        );

        assert!(identity_from_headers(&headers, "s3cret").is_none());
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        let token = make_token("s3cret");
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        headers.insert(header::COOKIE, "accessToken=garbage".parse().unwrap());

        assert!(identity_from_headers(&headers, "s3cret").is_some());
    }
}
