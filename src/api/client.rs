//! reqwest implementation of [`CommunityApi`]

use super::models::{
    CommentId, EntityKey, GuestGrant, GuestLoginRequest, LeaderboardEntry, LikeResponse,
    LikeStatus, NewComment, NewPost, Post, PostDetail, PostId, UserDetails,
};
use super::{ApiError, CommunityApi};
use crate::session::Credential;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the community API
///
/// Cloning is cheap: the underlying `reqwest::Client` is reference counted,
/// so background tasks take their own clone.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client rooted at `base_url` (e.g. `http://127.0.0.1:8000/api`)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::debug!("Community API client rooted at {}", base_url);

        Ok(Self { client, base_url })
    }

    fn request(&self, method: Method, path: &str, credential: Option<&Credential>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self.client.request(method, url);
        match credential {
            Some(cred) => req.header(AUTHORIZATION, cred.header_value()),
            None => req,
        }
    }

    /// Send and turn non-2xx into [`ApiError::Status`]
    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("API responded {} ({} bytes)", status, body.len());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(req).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CommunityApi for HttpApi {
    async fn list_posts(&self, credential: Option<&Credential>) -> Result<Vec<Post>, ApiError> {
        self.fetch_json(self.request(Method::GET, "/posts/", credential))
            .await
    }

    async fn get_post(
        &self,
        id: PostId,
        credential: Option<&Credential>,
    ) -> Result<PostDetail, ApiError> {
        let path = format!("/posts/{}/", id);
        self.fetch_json(self.request(Method::GET, &path, credential))
            .await
    }

    async fn create_post(&self, content: &str, credential: &Credential) -> Result<(), ApiError> {
        let req = self
            .request(Method::POST, "/posts/", Some(credential))
            .json(&NewPost { content });
        self.send(req).await?;
        Ok(())
    }

    async fn delete_post(&self, id: PostId, credential: &Credential) -> Result<(), ApiError> {
        let path = format!("/posts/{}/", id);
        self.send(self.request(Method::DELETE, &path, Some(credential)))
            .await?;
        Ok(())
    }

    async fn toggle_like(
        &self,
        target: EntityKey,
        credential: &Credential,
    ) -> Result<LikeStatus, ApiError> {
        let req = self.request(Method::POST, &target.like_path(), Some(credential));
        let body: LikeResponse = self.fetch_json(req).await?;
        Ok(body.status)
    }

    async fn create_comment(
        &self,
        post: PostId,
        parent: Option<CommentId>,
        content: &str,
        credential: &Credential,
    ) -> Result<(), ApiError> {
        let path = format!("/posts/{}/comments/", post);
        let req = self
            .request(Method::POST, &path, Some(credential))
            .json(&NewComment { content, parent });
        self.send(req).await?;
        Ok(())
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        self.fetch_json(self.request(Method::GET, "/leaderboard/", None))
            .await
    }

    async fn me(&self, credential: &Credential) -> Result<UserDetails, ApiError> {
        self.fetch_json(self.request(Method::GET, "/me/", Some(credential)))
            .await
    }

    async fn guest_login(&self, username: &str) -> Result<GuestGrant, ApiError> {
        let req = self
            .request(Method::POST, "/guest-login/", None)
            .json(&GuestLoginRequest { username });
        self.fetch_json(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::Router;
    use std::sync::{Arc, Mutex};

    /// One request as the stub server saw it
    #[derive(Debug, Clone)]
    struct Seen {
        method: String,
        path: String,
        authorization: Option<String>,
        body: String,
    }

    type Log = Arc<Mutex<Vec<Seen>>>;

    async fn stub(
        State(log): State<Log>,
        method: axum::http::Method,
        uri: Uri,
        headers: HeaderMap,
        body: String,
    ) -> (StatusCode, String) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let path = uri.path().to_string();
        log.lock().unwrap().push(Seen {
            method: method.to_string(),
            path: path.clone(),
            authorization: authorization.clone(),
            body,
        });

        let post = r#"{"id": 3, "author": {"id": 1, "username": "ana", "is_staff": false},
                       "content": "hi", "created_at": "2024-05-01T10:00:00Z",
                       "likes_count": 1, "is_liked": false}"#;

        match (method.as_str(), path.as_str()) {
            ("GET", "/api/posts/") => (StatusCode::OK, format!("[{}]", post)),
            ("GET", "/api/posts/404/") => (StatusCode::NOT_FOUND, r#"{"detail":"Not found."}"#.into()),
            ("DELETE", "/api/posts/3/") if authorization.is_some() => {
                (StatusCode::NO_CONTENT, String::new())
            }
            ("DELETE", _) => (StatusCode::UNAUTHORIZED, String::new()),
            ("POST", "/api/posts/3/like/") => (StatusCode::CREATED, r#"{"status":"liked"}"#.into()),
            ("POST", "/api/comments/8/like/") => (StatusCode::OK, r#"{"status":"unliked"}"#.into()),
            ("POST", "/api/posts/3/comments/") => {
                (StatusCode::CREATED, r#"{"content":"yo","parent":null}"#.into())
            }
            ("POST", "/api/guest-login/") => (
                StatusCode::OK,
                r#"{"username":"Maverick","is_staff":false,"auth_token":"Basic TWF2ZXJpY2s6eA=="}"#
                    .into(),
            ),
            ("GET", "/api/me/") => (StatusCode::UNAUTHORIZED, r#"{"detail":"Invalid"}"#.into()),
            ("GET", "/api/leaderboard/") => (StatusCode::OK, "not json".into()),
            _ => (StatusCode::NOT_FOUND, String::new()),
        }
    }

    async fn spawn_stub() -> (HttpApi, Log) {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(stub).with_state(log.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let api = HttpApi::new(format!("http://{}/api/", addr), Duration::from_secs(5)).unwrap();
        (api, log)
    }

    #[tokio::test]
    async fn test_reads_attach_optional_credential() {
        let (api, log) = spawn_stub().await;
        let cred = Credential::from_header("Basic abc");

        let anonymous = api.list_posts(None).await.unwrap();
        let signed_in = api.list_posts(Some(&cred)).await.unwrap();
        assert_eq!(anonymous[0].id, 3);
        assert_eq!(signed_in.len(), 1);

        let seen = log.lock().unwrap().clone();
        assert_eq!(seen[0].authorization, None);
        assert_eq!(seen[1].authorization.as_deref(), Some("Basic abc"));
    }

    #[tokio::test]
    async fn test_status_errors_carry_code() {
        let (api, _log) = spawn_stub().await;

        let err = api.get_post(404, None).await.unwrap_err();
        assert_eq!(err.status(), Some(404));

        let err = api
            .me(&Credential::basic("ana", "wrong"))
            .await
            .unwrap_err();
        assert!(err.is_auth_rejection());
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let (api, log) = spawn_stub().await;
        api.delete_post(3, &Credential::from_header("Token t"))
            .await
            .unwrap();

        let seen = log.lock().unwrap().clone();
        assert_eq!(seen[0].method, "DELETE");
        assert_eq!(seen[0].path, "/api/posts/3/");
    }

    #[tokio::test]
    async fn test_like_endpoints_per_entity() {
        let (api, log) = spawn_stub().await;
        let cred = Credential::from_header("Token t");

        assert_eq!(
            api.toggle_like(EntityKey::Post(3), &cred).await.unwrap(),
            LikeStatus::Liked
        );
        assert_eq!(
            api.toggle_like(EntityKey::Comment(8), &cred).await.unwrap(),
            LikeStatus::Unliked
        );

        let paths: Vec<String> = log.lock().unwrap().iter().map(|s| s.path.clone()).collect();
        assert_eq!(paths, vec!["/api/posts/3/like/", "/api/comments/8/like/"]);
    }

    #[tokio::test]
    async fn test_comment_body_includes_parent() {
        let (api, log) = spawn_stub().await;
        let cred = Credential::from_header("Token t");

        api.create_comment(3, Some(5), "yo", &cred).await.unwrap();
        api.create_comment(3, None, "top", &cred).await.unwrap();

        let seen = log.lock().unwrap().clone();
        let first: serde_json::Value = serde_json::from_str(&seen[0].body).unwrap();
        let second: serde_json::Value = serde_json::from_str(&seen[1].body).unwrap();
        assert_eq!(first, serde_json::json!({"content": "yo", "parent": 5}));
        assert_eq!(second, serde_json::json!({"content": "top", "parent": null}));
    }

    #[tokio::test]
    async fn test_guest_login_is_unauthenticated() {
        let (api, log) = spawn_stub().await;
        let grant = api.guest_login("Maverick").await.unwrap();
        assert_eq!(grant.username, "Maverick");
        assert_eq!(grant.auth_token, "Basic TWF2ZXJpY2s6eA==");

        let seen = log.lock().unwrap().clone();
        assert_eq!(seen[0].authorization, None);
        let body: serde_json::Value = serde_json::from_str(&seen[0].body).unwrap();
        assert_eq!(body, serde_json::json!({"username": "Maverick"}));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let (api, _log) = spawn_stub().await;
        let err = api.leaderboard().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let api = HttpApi::new("http://127.0.0.1:9/api", Duration::from_millis(500)).unwrap();
        let err = api.leaderboard().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
