use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{AvitologError, AvitologResult};
use crate::models::{Ad, AdList, AuthResponse, Comment, Identity, SiteSettings};

#[derive(Debug, Serialize)]
pub(crate) struct ResolveRequestDto<'a> {
    pub(crate) url: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentRequestDto<'a> {
    pub(crate) text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CredentialsDto<'a> {
    pub(crate) username: &'a str,
    pub(crate) password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdDto {
    id: String,
    title: Option<String>,
    category: String,
    view_count: i64,
    published_at: Option<DateTime<Utc>>,
    image_url: Option<String>,
    source_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdListDto {
    results: Vec<AdDto>,
    count: i64,
    limit: u32,
    offset: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentDto {
    id: String,
    username: String,
    text: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponseDto {
    username: String,
    token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdentityDto {
    username: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SettingsDto {
    header_title: String,
}

impl From<AdDto> for Ad {
    fn from(value: AdDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            category: value.category,
            view_count: value.view_count.max(0) as u64,
            published_at: value.published_at,
            image_url: value.image_url,
            source_url: value.source_url,
        }
    }
}

impl From<AdListDto> for AdList {
    fn from(value: AdListDto) -> Self {
        Self {
            results: value.results.into_iter().map(Ad::from).collect(),
            count: value.count.max(0) as u64,
            limit: value.limit,
            offset: value.offset,
        }
    }
}

impl From<CommentDto> for Comment {
    fn from(value: CommentDto) -> Self {
        Self {
            id: value.id,
            username: value.username,
            text: value.text,
            created_at: value.created_at,
        }
    }
}

impl From<AuthResponseDto> for AuthResponse {
    fn from(value: AuthResponseDto) -> Self {
        Self {
            username: value.username,
            token: value.token,
        }
    }
}

impl From<IdentityDto> for Identity {
    fn from(value: IdentityDto) -> Self {
        Self {
            username: value.username,
        }
    }
}

impl From<SettingsDto> for SiteSettings {
    fn from(value: SettingsDto) -> Self {
        Self {
            header_title: value.header_title,
        }
    }
}

#[derive(Debug, Clone)]
/// HTTP-транспорт: базовый URL, таймауты и подстановка токена в заголовок.
pub(crate) struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let mut request = self.client.request(method, self.endpoint(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn decode_error(response: reqwest::Response) -> AvitologError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body
                .detail
                .unwrap_or_else(|| format!("http status {status}")),
            Err(_) => format!("http status {status}"),
        };
        AvitologError::from_http_status(status, Some(message))
    }

    async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> AvitologResult<T> {
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        response.json::<T>().await.map_err(AvitologError::from_reqwest)
    }

    pub(crate) async fn get_json<TRes>(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: Option<&str>,
    ) -> AvitologResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let mut request = self.request(Method::GET, path, token);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(AvitologError::from_reqwest)?;
        Self::decode_json(response).await
    }

    pub(crate) async fn post_json<TReq, TRes>(
        &self,
        path: &str,
        body: &TReq,
        token: Option<&str>,
    ) -> AvitologResult<TRes>
    where
        TReq: Serialize,
        TRes: DeserializeOwned,
    {
        let request = self.request(Method::POST, path, token).json(body);

        let response = request.send().await.map_err(AvitologError::from_reqwest)?;
        Self::decode_json(response).await
    }

    /// Загружает тело ответа как текст (используется для `/api_schema.yaml`).
    pub(crate) async fn get_text(&self, path: &str) -> AvitologResult<String> {
        let request = self.request(Method::GET, path, None);

        let response = request.send().await.map_err(AvitologError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response.text().await.map_err(AvitologError::from_reqwest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_slashes() {
        let transport = HttpTransport::new("http://localhost:8000/");
        let full = transport.endpoint("/api/ads");
        assert_eq!(full, "http://localhost:8000/api/ads");
    }

    #[test]
    fn ad_dto_clamps_negative_view_count() {
        let dto = AdDto {
            id: "a1".to_string(),
            title: None,
            category: "Без категории".to_string(),
            view_count: -3,
            published_at: None,
            image_url: None,
            source_url: "https://example.com/item".to_string(),
        };

        let ad = Ad::from(dto);
        assert_eq!(ad.view_count, 0);
        assert!(ad.title.is_none());
    }

    #[test]
    fn ad_list_dto_clamps_negative_count() {
        let dto = AdListDto {
            results: vec![],
            count: -1,
            limit: 20,
            offset: 0,
        };

        let list = AdList::from(dto);
        assert_eq!(list.count, 0);
        assert!(list.results.is_empty());
    }

    #[test]
    fn ad_dto_parses_server_json() {
        let raw = r#"{
            "id": "6f1c",
            "title": "iPhone 13",
            "category": "Электроника",
            "view_count": 17,
            "published_at": "2026-03-01T10:00:00Z",
            "image_url": null,
            "source_url": "https://www.avito.ru/item/6f1c"
        }"#;

        let dto: AdDto = serde_json::from_str(raw).expect("ad json must parse");
        let ad = Ad::from(dto);
        assert_eq!(ad.id, "6f1c");
        assert_eq!(ad.title.as_deref(), Some("iPhone 13"));
        assert_eq!(ad.view_count, 17);
        assert!(ad.published_at.is_some());
    }
}
