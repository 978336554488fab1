//! REST client for the coordination service.
//!
//! Async HTTP client using `reqwest`. The credential token travels as a
//! `Token` header when present; trace continuation headers returned by
//! Init are forwarded on subsequent calls.

use futures_util::future::BoxFuture;
use partflow_protocol::{
    AbortUploadRequest, CompleteUploadRequest, InitUploadRequest, InitUploadResponse,
    ListFilesResponse, PresignPartRequest, PresignPartResponse, UploadedFile,
};
use partflow_upload::{CallContext, CoordinationService, ServiceError, TraceContext};
use reqwest::StatusCode;
use tracing::debug;

use crate::config::ClientConfig;

/// Credential token header name.
const TOKEN_HEADER: &str = "Token";

/// HTTP client for the upload coordination service.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the service at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Creates a client from an environment-sourced [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ServiceError> {
        Self::new(config.base_url.clone())
    }

    fn post_json<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
        ctx: &CallContext,
    ) -> reqwest::RequestBuilder {
        let mut req = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body);
        if let Some(token) = &ctx.token {
            req = req.header(TOKEN_HEADER, token);
        }
        for (name, value) in ctx.trace.headers() {
            req = req.header(name, value);
        }
        req
    }

    /// Starts a multipart session: `POST /upload/init`.
    ///
    /// Besides the session identifiers, captures any `traceparent` and
    /// `tracestate` response headers so later calls can continue the trace.
    pub async fn init_upload(
        &self,
        req: &InitUploadRequest,
        ctx: &CallContext,
    ) -> Result<(InitUploadResponse, TraceContext), ServiceError> {
        let resp = self
            .post_json("/upload/init", req, ctx)
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(classify(status, resp.text().await.unwrap_or_default()));
        }

        let trace = TraceContext {
            traceparent: header_string(resp.headers(), "traceparent"),
            tracestate: header_string(resp.headers(), "tracestate"),
        };
        let parsed: InitUploadResponse = resp.json().await.map_err(transport)?;
        debug!(upload_id = %parsed.upload_id, file_id = %parsed.file_id, "upload initialized");
        Ok((parsed, trace))
    }

    /// Requests a presigned part target: `POST /upload/get-presigned-url`.
    pub async fn get_presigned_url(
        &self,
        req: &PresignPartRequest,
        ctx: &CallContext,
    ) -> Result<String, ServiceError> {
        let resp = self
            .post_json("/upload/get-presigned-url", req, ctx)
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(classify(status, resp.text().await.unwrap_or_default()));
        }
        let parsed: PresignPartResponse = resp.json().await.map_err(transport)?;
        Ok(parsed.url)
    }

    /// Transmits one part's bytes to its presigned target with `PUT` and
    /// reads the completion token from the `ETag` response header.
    ///
    /// The target is presigned; no token or trace headers are attached.
    pub async fn upload_part(&self, url: &str, body: Vec<u8>) -> Result<String, ServiceError> {
        let resp = self
            .http
            .put(url)
            .body(body)
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(classify(status, resp.text().await.unwrap_or_default()));
        }
        header_string(resp.headers(), "etag").ok_or(ServiceError::MissingField("ETag"))
    }

    /// Finalizes the session: `POST /upload/complete`.
    pub async fn complete_upload(
        &self,
        req: &CompleteUploadRequest,
        ctx: &CallContext,
    ) -> Result<(), ServiceError> {
        let resp = self
            .post_json("/upload/complete", req, ctx)
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(classify(status, resp.text().await.unwrap_or_default()));
        }
        Ok(())
    }

    /// Releases an incomplete session: `POST /upload/abort`. Idempotent.
    pub async fn abort_upload(
        &self,
        req: &AbortUploadRequest,
        ctx: &CallContext,
    ) -> Result<(), ServiceError> {
        let resp = self
            .post_json("/upload/abort", req, ctx)
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(classify(status, resp.text().await.unwrap_or_default()));
        }
        Ok(())
    }

    /// Lists previously completed uploads: `GET /files`.
    ///
    /// Returned as-is for the listing UI collaborator.
    pub async fn list_files(&self) -> Result<Vec<UploadedFile>, ServiceError> {
        let resp = self
            .http
            .get(format!("{}/files", self.base_url))
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(classify(status, resp.text().await.unwrap_or_default()));
        }
        let parsed: ListFilesResponse = resp.json().await.map_err(transport)?;
        Ok(parsed.result)
    }
}

impl CoordinationService for ApiClient {
    fn init_upload(
        &self,
        req: InitUploadRequest,
        ctx: CallContext,
    ) -> BoxFuture<'_, Result<(InitUploadResponse, TraceContext), ServiceError>> {
        Box::pin(async move { ApiClient::init_upload(self, &req, &ctx).await })
    }

    fn presign_part(
        &self,
        req: PresignPartRequest,
        ctx: CallContext,
    ) -> BoxFuture<'_, Result<String, ServiceError>> {
        Box::pin(async move { self.get_presigned_url(&req, &ctx).await })
    }

    fn put_part(&self, url: String, body: Vec<u8>) -> BoxFuture<'_, Result<String, ServiceError>> {
        Box::pin(async move { self.upload_part(&url, body).await })
    }

    fn complete_upload(
        &self,
        req: CompleteUploadRequest,
        ctx: CallContext,
    ) -> BoxFuture<'_, Result<(), ServiceError>> {
        Box::pin(async move { ApiClient::complete_upload(self, &req, &ctx).await })
    }

    fn abort_upload(
        &self,
        req: AbortUploadRequest,
        ctx: CallContext,
    ) -> BoxFuture<'_, Result<(), ServiceError>> {
        Box::pin(async move { ApiClient::abort_upload(self, &req, &ctx).await })
    }
}

fn transport(err: reqwest::Error) -> ServiceError {
    ServiceError::Transport(err.to_string())
}

fn classify(status: StatusCode, body: String) -> ServiceError {
    if status == StatusCode::UNAUTHORIZED {
        ServiceError::Unauthorized
    } else {
        ServiceError::Status {
            status: status.as_u16(),
            body,
        }
    }
}

fn header_string(headers: &reqwest::header::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
