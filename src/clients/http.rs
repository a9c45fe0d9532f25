//! HTTP client implementations for remote team and game services

use crate::clients::{GameCatalog, TeamDirectory};
use crate::error::{AscenderError, Result};
use crate::metrics::MetricsCollector;
use crate::types::{GameId, TeamId, UserId};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Subset of the remote team representation needed for authorization
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteTeam {
    creator_id: Uuid,
}

/// Shared plumbing for JSON GET requests against one upstream service
#[derive(Clone)]
struct Upstream {
    service: &'static str,
    base_url: String,
    client: Client,
    metrics: Option<Arc<MetricsCollector>>,
}

impl Upstream {
    fn new(service: &'static str, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            AscenderError::ConfigurationError {
                message: format!("Failed to build {} client: {}", service, e),
            }
        })?;

        Ok(Self {
            service,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            metrics: None,
        })
    }

    fn upstream_error(&self, message: impl ToString) -> anyhow::Error {
        if let Some(metrics) = &self.metrics {
            metrics.record_upstream_call(self.service, false);
        }
        AscenderError::Upstream {
            service: self.service.to_string(),
            message: message.to_string(),
        }
        .into()
    }

    /// Fetch a resource, mapping 404 to `None`
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Calling {} at {}", self.service, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.upstream_error(e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            self.record_success();
            return Ok(None);
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("{} returned {}: {}", self.service, status, body);
            return Err(self.upstream_error(format!("{} - {}", status, body)));
        }

        let value = response
            .json::<T>()
            .await
            .map_err(|e| self.upstream_error(e))?;
        self.record_success();
        Ok(Some(value))
    }

    fn record_success(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.record_upstream_call(self.service, true);
        }
    }
}

/// Team directory that queries a remote team service (`GET /api/teams/{id}`)
#[derive(Clone)]
pub struct HttpTeamDirectory {
    upstream: Upstream,
}

impl HttpTeamDirectory {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            upstream: Upstream::new("team-service", base_url, timeout)?,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.upstream.metrics = Some(metrics);
        self
    }

    async fn fetch(&self, team_id: TeamId) -> Result<Option<RemoteTeam>> {
        self.upstream
            .get_json(&format!("/api/teams/{}", team_id))
            .await
    }
}

#[async_trait]
impl TeamDirectory for HttpTeamDirectory {
    async fn team_exists(&self, team_id: TeamId) -> Result<bool> {
        Ok(self.fetch(team_id).await?.is_some())
    }

    async fn is_team_creator(&self, team_id: TeamId, user_id: UserId) -> Result<bool> {
        Ok(self
            .fetch(team_id)
            .await?
            .is_some_and(|team| team.creator_id == user_id))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Game catalog that queries a remote game service (`GET /api/games/{id}`)
#[derive(Clone)]
pub struct HttpGameCatalog {
    upstream: Upstream,
}

impl HttpGameCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            upstream: Upstream::new("game-service", base_url, timeout)?,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.upstream.metrics = Some(metrics);
        self
    }
}

#[async_trait]
impl GameCatalog for HttpGameCatalog {
    async fn game_exists(&self, game_id: GameId) -> Result<bool> {
        let game: Option<serde_json::Value> = self
            .upstream
            .get_json(&format!("/api/games/{}", game_id))
            .await?;
        Ok(game.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let directory =
            HttpTeamDirectory::new("http://teams.local:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(directory.upstream.base_url, "http://teams.local:8080");
    }

    #[test]
    fn test_remote_team_parsing() {
        let creator = Uuid::new_v4();
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "Heroic",
            "creatorId": creator,
            "playerIds": [creator],
        });

        let team: RemoteTeam = serde_json::from_value(json).unwrap();
        assert_eq!(team.creator_id, creator);
    }

    /// Ids the fake team service knows about
    #[derive(Clone)]
    struct FakeTeams {
        team_id: Uuid,
        creator: Uuid,
        broken_team_id: Uuid,
        game_id: Uuid,
    }

    async fn fake_team(
        axum::extract::State(fake): axum::extract::State<FakeTeams>,
        axum::extract::Path(id): axum::extract::Path<Uuid>,
    ) -> axum::response::Response {
        use axum::response::IntoResponse;

        if id == fake.team_id {
            axum::Json(serde_json::json!({
                "id": id,
                "name": "Team Liquid",
                "creatorId": fake.creator,
                "playerIds": [fake.creator],
            }))
            .into_response()
        } else if id == fake.broken_team_id {
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "database unavailable",
            )
                .into_response()
        } else {
            axum::http::StatusCode::NOT_FOUND.into_response()
        }
    }

    async fn fake_game(
        axum::extract::State(fake): axum::extract::State<FakeTeams>,
        axum::extract::Path(id): axum::extract::Path<Uuid>,
    ) -> axum::response::Response {
        use axum::response::IntoResponse;

        if id == fake.game_id {
            axum::Json(serde_json::json!({ "id": id, "name": "Dota 2" })).into_response()
        } else {
            axum::http::StatusCode::NOT_FOUND.into_response()
        }
    }

    /// Serve the fake services on an ephemeral port and return the base URL
    async fn spawn_fake_services(fake: FakeTeams) -> String {
        let app = axum::Router::new()
            .route("/api/teams/{id}", axum::routing::get(fake_team))
            .route("/api/games/{id}", axum::routing::get(fake_game))
            .with_state(fake);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fake_teams() -> FakeTeams {
        FakeTeams {
            team_id: Uuid::new_v4(),
            creator: Uuid::new_v4(),
            broken_team_id: Uuid::new_v4(),
            game_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_team_directory_against_live_service() {
        let fake = fake_teams();
        let base_url = spawn_fake_services(fake.clone()).await;
        let metrics = Arc::new(MetricsCollector::new().unwrap());
        let directory = HttpTeamDirectory::new(&base_url, Duration::from_secs(5))
            .unwrap()
            .with_metrics(metrics.clone());

        // 200: the body decides creatorship
        assert!(directory.team_exists(fake.team_id).await.unwrap());
        assert!(directory
            .is_team_creator(fake.team_id, fake.creator)
            .await
            .unwrap());
        assert!(!directory
            .is_team_creator(fake.team_id, Uuid::new_v4())
            .await
            .unwrap());

        // 404: an unknown team, not a failure
        let missing = Uuid::new_v4();
        assert!(!directory.team_exists(missing).await.unwrap());
        assert!(!directory
            .is_team_creator(missing, fake.creator)
            .await
            .unwrap());

        // 500: surfaced as an upstream error carrying the status
        let err = directory
            .team_exists(fake.broken_team_id)
            .await
            .unwrap_err();
        match err.downcast_ref::<AscenderError>() {
            Some(AscenderError::Upstream { service, message }) => {
                assert_eq!(service, "team-service");
                assert!(message.contains("500"));
                assert!(message.contains("database unavailable"));
            }
            other => panic!("expected upstream error, got {:?}", other),
        }

        let text = crate::metrics::HealthEndpoints::get_metrics_text(metrics)
            .await
            .unwrap();
        assert!(text.contains(
            "ascender_upstream_calls_total{service=\"team-service\",status=\"success\"} 5"
        ));
        assert!(text.contains(
            "ascender_upstream_calls_total{service=\"team-service\",status=\"error\"} 1"
        ));
    }

    #[tokio::test]
    async fn test_game_catalog_against_live_service() {
        let fake = fake_teams();
        let base_url = spawn_fake_services(fake.clone()).await;
        let catalog = HttpGameCatalog::new(&base_url, Duration::from_secs(5)).unwrap();

        assert!(catalog.game_exists(fake.game_id).await.unwrap());
        assert!(!catalog.game_exists(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_upstream_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let catalog = HttpGameCatalog::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let err = catalog.game_exists(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AscenderError>(),
            Some(AscenderError::Upstream { .. })
        ));
    }
}
