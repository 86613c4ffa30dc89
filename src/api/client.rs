//! REST client for the education platform API
//!
//! JSON over HTTP. Responses may be bare or wrapped as `{"data": ...}`;
//! error bodies are expected as `{"code": "...", "message": "..."}` but any
//! text is accepted.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::traits::ApiClientTrait;
use crate::state::{Class, LookupOption, NewClass, NewStudent, Student, StudentPatch};

/// Client for the platform's REST API
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Body<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Body<T> {
    fn into_inner(self) -> T {
        match self {
            Body::Wrapped { data } => data,
            Body::Bare(value) => value,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseSummary {
    id: String,
    title: String,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstructorSummary {
    id: String,
    first_name: String,
    last_name: String,
}

impl RestClient {
    /// Create a new client. No request is made until the first call.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .request(method, self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(transport_error)?;

    if status.is_success() {
        return serde_json::from_slice::<Body<T>>(&bytes)
            .map(Body::into_inner)
            .map_err(|e| ApiError::Decode(e.to_string()));
    }

    Err(rejection(status, &bytes))
}

fn rejection(status: StatusCode, bytes: &[u8]) -> ApiError {
    let body: ErrorBody = serde_json::from_slice(bytes).unwrap_or_default();
    let message = body
        .message
        .or(body.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let text = String::from_utf8_lossy(bytes).trim().to_string();
            if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                text
            }
        });

    ApiError::Rejected {
        status: Some(status.as_u16()),
        code: body.code,
        message,
    }
}

#[async_trait]
impl ApiClientTrait for RestClient {
    async fn list_courses(&self) -> Result<Vec<LookupOption>, ApiError> {
        let courses: Vec<CourseSummary> = self.get_json("courses").await?;
        Ok(courses
            .into_iter()
            .map(|c| {
                let label = match c.code {
                    Some(code) if !code.is_empty() => format!("{code} · {}", c.title),
                    _ => c.title,
                };
                LookupOption::new(c.id, label)
            })
            .collect())
    }

    async fn list_instructors(&self) -> Result<Vec<LookupOption>, ApiError> {
        let instructors: Vec<InstructorSummary> = self.get_json("instructors").await?;
        Ok(instructors
            .into_iter()
            .map(|i| LookupOption::new(i.id, format!("{} {}", i.first_name, i.last_name)))
            .collect())
    }

    async fn list_students(&self) -> Result<Vec<Student>, ApiError> {
        self.get_json("students").await
    }

    async fn create_class(&self, payload: &NewClass) -> Result<Class, ApiError> {
        self.send_json(Method::POST, "classes", payload).await
    }

    async fn create_student(&self, payload: &NewStudent) -> Result<Student, ApiError> {
        self.send_json(Method::POST, "students", payload).await
    }

    async fn update_student(&self, id: &str, patch: &StudentPatch) -> Result<Student, ApiError> {
        self.send_json(Method::PATCH, &format!("students/{id}"), patch)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = RestClient::new("http://localhost:8080/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/students"), "http://localhost:8080/api/students");
        assert_eq!(client.url("courses"), "http://localhost:8080/api/courses");
    }

    #[test]
    fn test_body_accepts_wrapped_and_bare() {
        let wrapped: Body<Vec<u32>> = serde_json::from_str(r#"{"data": [1, 2]}"#).unwrap();
        assert_eq!(wrapped.into_inner(), vec![1, 2]);
        let bare: Body<Vec<u32>> = serde_json::from_str("[3]").unwrap();
        assert_eq!(bare.into_inner(), vec![3]);
    }

    #[test]
    fn test_rejection_reads_structured_body() {
        let err = rejection(
            StatusCode::CONFLICT,
            br#"{"code": "duplicate_email", "message": "Email already in use"}"#,
        );
        assert_eq!(
            err,
            ApiError::Rejected {
                status: Some(409),
                code: Some("duplicate_email".into()),
                message: "Email already in use".into(),
            }
        );
    }

    #[test]
    fn test_rejection_falls_back_to_text() {
        let err = rejection(StatusCode::BAD_REQUEST, b"bad things");
        assert_eq!(err.to_string(), "bad things");
    }

    #[test]
    fn test_rejection_empty_body_uses_reason() {
        let err = rejection(StatusCode::INTERNAL_SERVER_ERROR, b"");
        assert_eq!(err.to_string(), "Internal Server Error");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // port 9 (discard) on localhost is closed on CI machines
        let client = RestClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = client.list_courses().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
