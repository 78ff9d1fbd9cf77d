//! HTTP implementation of [`GameService`].

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::chess::{BoardSnapshot, GameInfo, GameSnapshot, Square};
use crate::config::{ClientConfig, ConfigError};

use super::wire::{BoardBody, ErrorBody, HistoryBody, MovesBody, MutationBody};
use super::{GameService, MOVE_REJECTED_FALLBACK, ServiceError};

/// Client for the chess service's JSON endpoints.
///
/// The service keeps one game per HTTP session, so the client holds a cookie
/// jar for its whole lifetime. Clones share the same connection pool and
/// cookies. The jar can be saved to a file and restored by a later process
/// to keep playing the same game.
#[derive(Debug, Clone)]
pub struct RestChessClient {
    base_url: reqwest::Url,
    client: reqwest::Client,
    jar: Arc<Jar>,
}

impl RestChessClient {
    /// Builds a client from configuration.
    #[instrument(skip(config), fields(base_url = %config.base_url()))]
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base_url = config.service_url()?;
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        info!(base_url = %base_url, "Chess service client ready");
        Ok(Self {
            base_url,
            client,
            jar,
        })
    }

    /// Session cookies the service has set, as a `Cookie` header value.
    pub fn session_cookies(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Re-installs cookies previously read with [`Self::session_cookies`].
    #[instrument(skip(self, cookies))]
    pub fn restore_session(&self, cookies: &str) {
        let mut restored = 0;
        for pair in cookies.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar
                .add_cookie_str(&format!("{}; Path=/", pair), &self.base_url);
            restored += 1;
        }
        debug!(restored, "Session cookies restored");
    }

    /// Restores the session saved in `path`. Returns `false` when there is
    /// no saved session.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_session(&self, path: impl AsRef<Path>) -> Result<bool, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No saved session");
            return Ok(false);
        }
        let cookies = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read session file: {}", e)))?;
        let cookies = cookies.trim();
        if cookies.is_empty() {
            return Ok(false);
        }
        self.restore_session(cookies);
        info!("Resumed saved session");
        Ok(true)
    }

    /// Writes the current session cookies to `path`. Does nothing when the
    /// service has not set any.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save_session(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let Some(cookies) = self.session_cookies() else {
            debug!("No session cookies to save");
            return Ok(());
        };
        std::fs::write(path.as_ref(), format!("{}\n", cookies))
            .map_err(|e| ConfigError::new(format!("Failed to write session file: {}", e)))?;
        debug!("Session saved");
        Ok(())
    }

    /// Base URL the endpoints are resolved against.
    pub fn base_url(&self) -> &reqwest::Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|e| ServiceError::network(format!("Bad endpoint {}: {}", path, e)))
    }

    /// Reads a response body, mapping HTTP failures and bad JSON.
    ///
    /// A non-2xx status whose body carries an `error` string is a rejection
    /// with that reason; any other non-2xx status is a network failure.
    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        operation: &str,
    ) -> Result<T, ServiceError> {
        let status = response.status();
        let text = response.text().await?;
        debug!(operation, status = %status, body_len = text.len(), "Response received");

        if !status.is_success() {
            if let Ok(ErrorBody { error: Some(reason) }) = serde_json::from_str::<ErrorBody>(&text)
            {
                warn!(operation, status = %status, reason = %reason, "Service rejected request");
                return Err(ServiceError::rejected(reason));
            }
            warn!(operation, status = %status, "Service returned error status");
            return Err(ServiceError::network(format!(
                "{} returned HTTP {}",
                operation, status
            )));
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!(operation, error = %e, "Unparseable response body");
            ServiceError::malformed(format!("{}: {}", operation, e))
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let response = self.client.get(self.endpoint(path)?).send().await?;
        self.read_json(response, path).await
    }

    async fn post_mutation(
        &self,
        path: &str,
        form: Option<&[(&str, String)]>,
        fallback: &str,
    ) -> Result<GameSnapshot, ServiceError> {
        let mut request = self.client.post(self.endpoint(path)?);
        if let Some(form) = form {
            request = request.form(form);
        }
        let response = request.send().await?;
        let body: MutationBody = self.read_json(response, path).await?;
        body.into_snapshot(fallback)
    }
}

#[async_trait::async_trait]
impl GameService for RestChessClient {
    #[instrument(skip(self))]
    async fn fetch_board(&self) -> Result<BoardSnapshot, ServiceError> {
        let body: BoardBody = self.get("chess/board").await?;
        debug!("Board fetched");
        Ok(body.board)
    }

    #[instrument(skip(self))]
    async fn fetch_info(&self) -> Result<GameInfo, ServiceError> {
        let info: GameInfo = self.get("chess/info").await?;
        debug!(
            current_player = %info.current_player(),
            game_state = %info.game_state(),
            "Info fetched"
        );
        Ok(info)
    }

    #[instrument(skip(self), fields(square = %square))]
    async fn fetch_legal_moves(&self, square: Square) -> Result<HashSet<Square>, ServiceError> {
        let response = self
            .client
            .get(self.endpoint("chess/moves")?)
            .query(&[("position", square.to_algebraic())])
            .send()
            .await?;
        let body: MovesBody = self.read_json(response, "chess/moves").await?;

        match (body.valid_moves, body.error) {
            (Some(moves), _) => {
                debug!(count = moves.len(), "Legal moves fetched");
                Ok(moves.into_iter().collect())
            }
            (None, Some(reason)) => Err(ServiceError::rejected(reason)),
            (None, None) => Err(ServiceError::malformed("moves response without validMoves")),
        }
    }

    #[instrument(skip(self), fields(from = %from, to = %to))]
    async fn submit_move(&self, from: Square, to: Square) -> Result<GameSnapshot, ServiceError> {
        info!("Submitting move");
        let form = [("from", from.to_algebraic()), ("to", to.to_algebraic())];
        self.post_mutation("chess/move", Some(&form), MOVE_REJECTED_FALLBACK)
            .await
    }

    #[instrument(skip(self))]
    async fn new_game(&self) -> Result<GameSnapshot, ServiceError> {
        info!("Requesting new game");
        self.post_mutation("chess/new", None, "New game was refused")
            .await
    }

    #[instrument(skip(self))]
    async fn reset_game(&self) -> Result<GameSnapshot, ServiceError> {
        info!("Requesting game reset");
        self.post_mutation("chess/reset", None, "Reset was refused")
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_history(&self) -> Result<Vec<(Square, Square)>, ServiceError> {
        let body: HistoryBody = self.get("chess/history").await?;
        body.into_moves()
    }
}
