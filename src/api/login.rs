//! Login

use super::models::LoginData;
use crate::auth::TokenStore;
use crate::error::{Error, Result};
use crate::graphql::{GraphQlClient, Operation, OperationKind};
use crate::types::JsonValue;
use serde_json::json;
use tracing::{info, warn};

/// Exchange an email address for a session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginMutation {
    pub email: String,
}

impl Operation for LoginMutation {
    type Data = LoginData;
    const NAME: &'static str = "Login";
    const DOCUMENT: &'static str = "mutation Login($email: String!) { login(email: $email) { token } }";
    const KIND: OperationKind = OperationKind::Mutation;

    fn variables(&self) -> JsonValue {
        json!({ "email": self.email })
    }
}

/// Log in and store the returned token
///
/// The store is left untouched unless the server returns a token.
pub async fn login(client: &GraphQlClient, tokens: &dyn TokenStore, email: &str) -> Result<String> {
    let mutation = LoginMutation {
        email: email.to_string(),
    };

    let response = client.execute(&mutation).await.map_err(|e| {
        warn!("Failed to login: {e}");
        e
    })?;

    if let Some(message) = response.first_error_message() {
        warn!("Failed to login: {message}");
        return Err(Error::auth(message));
    }

    let token = response
        .data
        .and_then(|data| data.login)
        .and_then(|session| session.token)
        .ok_or_else(|| {
            warn!("Failed to login: no token returned by the backend");
            Error::auth("no token returned by the backend")
        })?;

    tokens.set_token(token.clone());
    info!("Logged in as {email}");
    Ok(token)
}
