// Authentication strategies for crawdad
// Rows either carry basic auth credentials or go out unauthenticated

use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderValue, AUTHORIZATION};

use crate::models::Credentials;

pub trait AuthStrategy {
    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder;
}

/// No Authorization header
pub struct NoAuth;

impl AuthStrategy for NoAuth {
    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req
    }
}

impl Credentials {
    /// `Basic` Authorization header value for these credentials
    pub fn basic_header(&self) -> String {
        let token = general_purpose::STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }
}

impl AuthStrategy for Credentials {
    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match HeaderValue::from_str(&self.basic_header()) {
            Ok(mut value) => {
                value.set_sensitive(true);
                req.header(AUTHORIZATION, value)
            }
            Err(_) => req.basic_auth(&self.username, Some(&self.password)),
        }
    }
}

/// Pick the strategy for an optional credential pair
pub fn strategy_for(credentials: Option<&Credentials>) -> &dyn AuthStrategy {
    match credentials {
        Some(creds) => creds as &dyn AuthStrategy,
        None => &NoAuth,
    }
}
