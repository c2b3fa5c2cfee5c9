//! OneDrive upload through Microsoft Graph.
//!
//! Two requests per run:
//! 1. `POST {login}/{tenant}/oauth2/v2.0/token`: client-credentials grant
//! 2. `PUT {graph}/{owner}/drive/root:{folder}/{file}:/content`: raw bytes
//!
//! Uses the simple upload endpoint, which Graph accepts for files up to 250 MB.

use std::time::Duration;

use serde::Deserialize;

use super::{Delivery, DeliveryArtifact, DeliveryError, DeliveryReceipt};
use crate::config::{DriveOwner, GraphCredentials};

pub const DEFAULT_LOGIN_BASE: &str = "https://login.microsoftonline.com";
pub const DEFAULT_GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0";
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Uploads the artifact to a OneDrive folder.
pub struct GraphUploadDelivery {
    client: reqwest::blocking::Client,
    credentials: GraphCredentials,
    owner: DriveOwner,
    folder: String,
    login_base: String,
    graph_base: String,
}

impl GraphUploadDelivery {
    pub fn new(
        credentials: GraphCredentials,
        owner: DriveOwner,
        folder: &str,
    ) -> Result<Self, DeliveryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self::with_client(client, credentials, owner, folder))
    }

    pub fn with_client(
        client: reqwest::blocking::Client,
        credentials: GraphCredentials,
        owner: DriveOwner,
        folder: &str,
    ) -> Self {
        Self {
            client,
            credentials,
            owner,
            folder: normalize_folder(folder),
            login_base: DEFAULT_LOGIN_BASE.to_string(),
            graph_base: DEFAULT_GRAPH_BASE.to_string(),
        }
    }

    /// Point both requests at other hosts (sovereign clouds, tests).
    pub fn with_endpoints(mut self, login_base: &str, graph_base: &str) -> Self {
        self.login_base = login_base.trim_end_matches('/').to_string();
        self.graph_base = graph_base.trim_end_matches('/').to_string();
        self
    }

    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.login_base, self.credentials.tenant_id
        )
    }

    /// Upload target for `file_name`. Each path segment is percent-encoded,
    /// so spaces, `#` or `?` in folder and file names stay inside the path.
    pub fn upload_url(&self, file_name: &str) -> Result<String, DeliveryError> {
        let mut url = reqwest::Url::parse(&self.graph_base).map_err(|e| {
            DeliveryError::Message(format!("bad Graph base '{}': {e}", self.graph_base))
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                DeliveryError::Message(format!("Graph base '{}' cannot hold a path", self.graph_base))
            })?;
            segments.pop_if_empty();
            segments.extend(self.owner.path_segment().split('/'));
            segments.push("drive");
            segments.push("root:");
            segments.extend(self.folder.split('/').filter(|s| !s.is_empty()));
            segments.push(&format!("{file_name}:"));
            segments.push("content");
        }
        Ok(url.into())
    }

    /// Exchange the client credentials for a bearer token.
    ///
    /// A response without `access_token` is fatal; its status and body are
    /// printed to stderr before the error is returned.
    pub fn acquire_token(&self) -> Result<String, DeliveryError> {
        let form = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
            ("grant_type", "client_credentials"),
        ];
        let resp = self.client.post(self.token_url()).form(&form).send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;

        let token = parse_token_response(status, &body);
        if token.is_err() {
            eprintln!("Token request failed: HTTP {status}");
            eprintln!("{body}");
        }
        token
    }

    fn upload(&self, token: &str, file_name: &str, bytes: Vec<u8>) -> Result<String, DeliveryError> {
        let url = self.upload_url(file_name)?;
        log::info!("uploading {} bytes to {url}", bytes.len());

        let resp = self
            .client
            .put(&url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(DeliveryError::UploadFailed {
                status: status.as_u16(),
                body,
            });
        }
        Ok(url)
    }
}

impl Delivery for GraphUploadDelivery {
    fn name(&self) -> &str {
        "cloud"
    }

    fn deliver(&self, artifact: &DeliveryArtifact) -> Result<DeliveryReceipt, DeliveryError> {
        let file_name = artifact.file_name()?;
        let bytes = artifact.read_bytes()?;

        let token = self.acquire_token()?;
        let url = self.upload(&token, file_name, bytes)?;

        Ok(DeliveryReceipt { location: url })
    }
}

/// Pull `access_token` out of a token endpoint response.
///
/// Any body without one (an `error` payload, HTML from a proxy, an empty
/// string) becomes [`DeliveryError::TokenRejected`] carrying the raw body.
pub fn parse_token_response(status: u16, body: &str) -> Result<String, DeliveryError> {
    let token = serde_json::from_str::<TokenResponse>(body)
        .ok()
        .and_then(|r| r.access_token)
        .filter(|t| !t.is_empty());

    token.ok_or_else(|| DeliveryError::TokenRejected {
        status,
        body: body.to_string(),
    })
}

/// Drive paths are addressed from the root: always one leading slash, no
/// trailing slash. An empty folder means the drive root.
fn normalize_folder(folder: &str) -> String {
    let trimmed = folder.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> GraphCredentials {
        GraphCredentials {
            tenant_id: "contoso-tenant".into(),
            client_id: "app".into(),
            client_secret: "secret".into(),
        }
    }

    #[test]
    fn token_url_embeds_tenant() {
        let d = GraphUploadDelivery::new(creds(), DriveOwner::Me, "Reports").unwrap();
        assert_eq!(
            d.token_url(),
            "https://login.microsoftonline.com/contoso-tenant/oauth2/v2.0/token"
        );
    }

    #[test]
    fn upload_url_for_named_user() {
        let d = GraphUploadDelivery::new(
            creds(),
            DriveOwner::User("ops@contoso.com".into()),
            "/Adjusted Close Tickers/",
        )
        .unwrap();
        assert_eq!(
            d.upload_url("Adjusted_Close_2024-06-05.xlsx").unwrap(),
            "https://graph.microsoft.com/v1.0/users/ops@contoso.com/drive/root:/Adjusted%20Close%20Tickers/Adjusted_Close_2024-06-05.xlsx:/content"
        );
    }

    #[test]
    fn upload_url_for_own_drive_root() {
        let d = GraphUploadDelivery::new(creds(), DriveOwner::Me, "").unwrap();
        assert_eq!(
            d.upload_url("f.xlsx").unwrap(),
            "https://graph.microsoft.com/v1.0/me/drive/root:/f.xlsx:/content"
        );
    }

    #[test]
    fn upload_url_escapes_reserved_characters() {
        let d = GraphUploadDelivery::new(creds(), DriveOwner::Me, "Desk #2/Q?A").unwrap();
        assert_eq!(
            d.upload_url("Close#1_2024-06-05.xlsx").unwrap(),
            "https://graph.microsoft.com/v1.0/me/drive/root:/Desk%20%232/Q%3FA/Close%231_2024-06-05.xlsx:/content"
        );
    }

    #[test]
    fn token_response_with_access_token() {
        let body = r#"{"token_type":"Bearer","expires_in":3599,"access_token":"eyJ0eXAi"}"#;
        assert_eq!(parse_token_response(200, body).unwrap(), "eyJ0eXAi");
    }

    #[test]
    fn invalid_client_is_token_rejected() {
        let body = r#"{"error": "invalid_client"}"#;
        match parse_token_response(401, body) {
            Err(DeliveryError::TokenRejected { status, body: raw }) => {
                assert_eq!(status, 401);
                assert!(raw.contains("invalid_client"));
            }
            other => panic!("expected TokenRejected, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_token_rejected() {
        assert!(matches!(
            parse_token_response(502, "<html>Bad Gateway</html>"),
            Err(DeliveryError::TokenRejected { status: 502, .. })
        ));
    }
}
