//! HTTP client for the comments backend

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::models::{Comment, Forest, ListQuery, NewComment};

/// Thin typed wrapper over the comments REST API
#[derive(Clone, Debug)]
pub struct CommentsClient {
    http: reqwest::Client,
    base: String,
}

impl CommentsClient {
    /// `base` is the API root, e.g. `http://localhost:8080/api`
    pub fn new(base: impl Into<String>, timeout: Duration) -> Self {
        CommentsClient {
            http: create_client(timeout),
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// `GET /comments`
    pub async fn list(&self, query: &ListQuery) -> Result<Forest, ClientError> {
        let mut req = self.http.get(self.url("/comments"));
        if !query.is_default() {
            req = req.query(&query.to_pairs());
        }
        let resp = check(req.send().await?).await?;
        json_body(resp).await
    }

    /// `POST /comments`; returns the created comment when the backend echoes it
    pub async fn create(&self, comment: &NewComment) -> Result<Option<Comment>, ClientError> {
        let resp = self
            .http
            .post(self.url("/comments"))
            .json(comment)
            .send()
            .await?;
        let resp = check(resp).await?;
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body).ok())
    }

    /// `DELETE /comments/{id}?user_id={user_id}`
    pub async fn delete(&self, comment_id: i64, user_id: i64) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(self.url(&format!("/comments/{}", comment_id)))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// `GET /comments/search?query=..&limit=..`
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Comment>, ClientError> {
        let resp = self
            .http
            .get(self.url("/comments/search"))
            .query(&[("query", query.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;
        let resp = check(resp).await?;
        let mut comments: Vec<Comment> = json_body(resp).await?;
        comments.truncate(limit);
        Ok(comments)
    }
}

/// Turn non-2xx responses into backend errors
async fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::from_response(status, &body))
}

/// Decode a JSON body; an empty body or `null` yields the default value
async fn json_body<T: DeserializeOwned + Default>(resp: Response) -> Result<T, ClientError> {
    if resp.status() == StatusCode::NO_CONTENT {
        return Ok(T::default());
    }
    let body = resp.text().await?;
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str::<Option<T>>(&body)
        .map(Option::unwrap_or_default)
        .map_err(|e| ClientError::Network(format!("Invalid response body: {}", e)))
}

/// Create an HTTP client with the given request timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
