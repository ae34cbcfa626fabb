use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

use crate::validation::{EMPTY_IDENTIFIER_MESSAGE, validate_identifier};

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("{}", EMPTY_IDENTIFIER_MESSAGE)]
    EmptyIdentifier,
    #[error("{0}")]
    Rejected(String),
    #[error("{}", TRANSPORT_FAILURE_MESSAGE)]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub token: String,
    pub profile_photo: Option<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    identifier: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginReply {
    token: Option<String>,
    error: Option<String>,
    profile_photo: Option<String>,
}

/// Client for the membership authentication backend.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn login_url(&self) -> String {
        format!("{}/auth/login", self.base_url.as_str().trim_end_matches('/'))
    }

    /// Single attempt, no retry. An empty identifier never reaches the network.
    pub async fn login(&self, identifier: &str) -> Result<LoginSuccess, LoginError> {
        validate_identifier(identifier)?;

        let url = self.login_url();
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { identifier })
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, url = %url, "login request failed");
                err
            })?;

        let status = response.status();
        let reply: LoginReply = response.json().await.map_err(|err| {
            error!(error = %err, %status, "login response is not valid JSON");
            err
        })?;

        if !status.is_success() {
            warn!(%status, "login rejected by backend");
            return Err(LoginError::Rejected(
                reply.error.unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string()),
            ));
        }

        match reply.token {
            Some(token) if !token.is_empty() => {
                info!("login accepted by backend");
                Ok(LoginSuccess {
                    token,
                    profile_photo: reply.profile_photo,
                })
            }
            _ => {
                warn!(%status, "login response carried no token");
                Err(LoginError::Rejected(LOGIN_FAILED_MESSAGE.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_joins_base_path() {
        let client = BackendClient::new(Url::parse("http://localhost:5000/api").unwrap());
        assert_eq!(client.login_url(), "http://localhost:5000/api/auth/login");

        let client = BackendClient::new(Url::parse("http://127.0.0.1:9000").unwrap());
        assert_eq!(client.login_url(), "http://127.0.0.1:9000/auth/login");
    }

    #[tokio::test]
    async fn test_empty_identifier_short_circuits() {
        // unroutable base: any network attempt would surface as Transport
        let client = BackendClient::new(Url::parse("http://127.0.0.1:1").unwrap());
        let err = client.login("").await.unwrap_err();
        assert!(matches!(err, LoginError::EmptyIdentifier));
        assert_eq!(
            err.to_string(),
            "Please enter Membership No, Email, or Mobile No."
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let client = BackendClient::new(Url::parse("http://127.0.0.1:1").unwrap());
        let err = client.login("USI1234").await.unwrap_err();
        assert!(matches!(err, LoginError::Transport(_)));
        assert_eq!(err.to_string(), TRANSPORT_FAILURE_MESSAGE);
    }

    #[test]
    fn test_reply_reads_camel_case_photo() {
        let reply: LoginReply =
            serde_json::from_str(r#"{"token":"abc","profilePhoto":"/uploads/me.png"}"#).unwrap();
        assert_eq!(reply.token.as_deref(), Some("abc"));
        assert_eq!(reply.profile_photo.as_deref(), Some("/uploads/me.png"));
        assert!(reply.error.is_none());
    }
}
