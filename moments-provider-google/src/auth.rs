//! Google sign-in: OAuth consent through a localhost redirect.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Context, Result};
use google_calendar::Client;
use google_calendar::types::MinAccessRole;
use moments_core::error::{MomentsError, MomentsResult};
use moments_core::source::AuthProvider;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use url::Url;

use crate::app_config::AppConfig;
use crate::session::{Session, SessionData};

pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/calendar.calendarlist.readonly",
    "https://www.googleapis.com/auth/calendar.events",
];

pub const DEFAULT_REDIRECT_PORT: u16 = 8085;

pub struct GoogleAuth {
    account: Mutex<Option<String>>,
    port: u16,
}

impl GoogleAuth {
    /// `account` is the Google account remembered from an earlier sign-in.
    pub fn new(account: Option<String>) -> Self {
        GoogleAuth {
            account: Mutex::new(account),
            port: DEFAULT_REDIRECT_PORT,
        }
    }

    pub fn account(&self) -> Option<String> {
        self.account
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.port)
    }

    /// Run the consent flow in the browser and store the new session.
    pub async fn connect(&self) -> Result<Session> {
        let app_config = AppConfig::load()?;
        let redirect_uri = self.redirect_uri();

        let mut client = Client::new(
            app_config.client_id.clone(),
            app_config.client_secret.clone(),
            redirect_uri.clone(),
            String::new(),
            String::new(),
        );

        let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();
        let authorization_url = client.user_consent_url(&scopes);
        let expected_state = state_param(&authorization_url)?;

        eprintln!("Open this URL in your browser to authenticate:\n");
        eprintln!("{}\n", authorization_url);

        if open::that(&authorization_url).is_err() {
            eprintln!("(Could not open browser automatically, please copy the URL above)");
        }

        let params = wait_for_callback(self.port).await?;

        let code = params
            .get("code")
            .ok_or_else(|| anyhow::anyhow!("No code in callback"))?;
        let state = params
            .get("state")
            .ok_or_else(|| anyhow::anyhow!("No state in callback"))?;

        if state != &expected_state {
            anyhow::bail!("OAuth state mismatch - possible CSRF attack");
        }

        let tokens = client
            .get_access_token(code, state)
            .await
            .context("Failed to exchange authorization code for tokens")?;

        let session_data: SessionData = (&tokens).into();

        let client = Client::new(
            app_config.client_id,
            app_config.client_secret,
            redirect_uri,
            tokens.access_token.clone(),
            tokens.refresh_token.clone(),
        );

        // The primary calendar's summary is the account email
        let calendars = client
            .calendar_list()
            .list_all(MinAccessRole::default(), false, false)
            .await
            .context("Failed to fetch calendars")?
            .body;

        let account_email = calendars
            .iter()
            .find(|cal| cal.primary)
            .map(|cal| cal.summary.clone())
            .ok_or_else(|| anyhow::anyhow!("No primary calendar found"))?;

        let session = Session::new(&account_email, session_data);
        session.save()?;

        tracing::info!(account = %account_email, "signed in to Google");
        *self.account.lock().unwrap_or_else(|e| e.into_inner()) = Some(account_email);

        Ok(session)
    }
}

impl AuthProvider for GoogleAuth {
    async fn sign_in(&self) -> MomentsResult<String> {
        if let Some(account) = self.account() {
            match Session::load_valid(&account).await {
                Ok(session) => return Ok(session.access_token().to_string()),
                Err(e) => {
                    tracing::warn!(account = %account, error = %format!("{:#}", e), "stored session unusable, signing in again");
                }
            }
        }

        let session = self
            .connect()
            .await
            .map_err(|e| MomentsError::Auth(format!("{:#}", e)))?;

        Ok(session.access_token().to_string())
    }

    fn is_authenticated(&self) -> bool {
        self.account()
            .map(|account| Session::exists(&account))
            .unwrap_or(false)
    }
}

fn state_param(authorization_url: &str) -> Result<String> {
    Url::parse(authorization_url)?
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.to_string())
        .ok_or_else(|| anyhow::anyhow!("No state parameter in authorization URL"))
}

/// Query parameters of an HTTP request line such as `GET /callback?code=x HTTP/1.1`.
fn callback_params(request_line: &str) -> Result<HashMap<String, String>> {
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Invalid HTTP request"))?;

    let url = Url::parse(&format!("http://localhost{}", url_part))?;

    Ok(url.query_pairs().into_owned().collect())
}

/// Wait for an HTTP callback on localhost and return all query parameters.
async fn wait_for_callback(port: u16) -> Result<HashMap<String, String>> {
    let address = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&address)
        .await
        .context("Failed to bind OAuth callback listener")?;

    let (stream, _) = listener
        .accept()
        .await
        .context("Failed to accept OAuth callback")?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .context("Failed to read OAuth callback request line")?;

    let params = callback_params(&request_line)?;

    let response = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>\
        <h1>Signed in to moments</h1>\
        <p>You can close this window and return to the terminal.</p>\
        </body></html>";

    let mut stream = reader.into_inner();
    stream
        .write_all(response.as_bytes())
        .await
        .context("Failed to write OAuth callback response")?;
    stream.flush().await?;

    Ok(params)
}
