//! Клиентская библиотека агрегатора объявлений «Авитолог».
//!
//! Оборачивает REST API сервера: список объявлений с фильтрами и
//! пагинацией, распознавание вставленной ссылки, комментарии и
//! авторизация по токену.
//!
//! Клиент хранит токен после `register`/`login` и подставляет его
//! в заголовок каждого запроса. Описание API (`/api_schema.yaml`)
//! загружается лениво один раз на процесс и используется только для
//! мягкой самопроверки; настройки сайта кэшируются после первого
//! успешного ответа.
#![warn(missing_docs)]

mod error;
mod http;
mod models;
mod schema;
mod settings;

pub use error::{AvitologError, AvitologResult};
pub use models::{
    Ad, AdList, AuthResponse, CATEGORY_ALL, Comment, Identity, ListQuery, SiteSettings, Sort,
    effective_category,
};
pub use schema::SchemaCache;
pub use settings::{DEFAULT_HEADER_TITLE, SettingsCache};

use std::sync::Arc;

use http::{
    AdDto, AdListDto, AuthResponseDto, CommentDto, CommentRequestDto, CredentialsDto,
    HttpTransport, IdentityDto, ResolveRequestDto, SettingsDto,
};
use schema::SCHEMA_PATH;

#[derive(Debug, Clone)]
/// Клиент REST API «Авитолога».
///
/// Клоны разделяют кэш описания API и кэш настроек, но не токен:
/// токен — часть состояния конкретного экземпляра.
pub struct AvitologClient {
    transport: HttpTransport,
    token: Option<String>,
    schema: Arc<SchemaCache>,
    settings: Arc<SettingsCache>,
}

impl AvitologClient {
    /// Создаёт клиент с базовым URL сервера, например `http://127.0.0.1:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            transport: HttpTransport::new(base_url),
            token: None,
            schema: Arc::new(SchemaCache::default()),
            settings: Arc::new(SettingsCache::default()),
        }
    }

    /// Устанавливает токен авторизации вручную (например, прочитанный с диска).
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает токен (выход из учётной записи на стороне клиента).
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Кэш описания API.
    pub fn schema(&self) -> &SchemaCache {
        &self.schema
    }

    /// Регистрирует пользователя и сохраняет полученный токен в клиенте.
    pub async fn register(
        &mut self,
        username: &str,
        password: &str,
    ) -> AvitologResult<AuthResponse> {
        let payload = CredentialsDto { username, password };
        let dto: AuthResponseDto = self
            .transport
            .post_json("/api/auth/register", &payload, None)
            .await?;
        let auth = AuthResponse::from(dto);
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    /// Выполняет вход пользователя и сохраняет полученный токен в клиенте.
    pub async fn login(&mut self, username: &str, password: &str) -> AvitologResult<AuthResponse> {
        let payload = CredentialsDto { username, password };
        let dto: AuthResponseDto = self
            .transport
            .post_json("/api/auth/login", &payload, None)
            .await?;
        let auth = AuthResponse::from(dto);
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    /// Возвращает логин владельца текущего токена (`GET /api/auth/me`).
    pub async fn me(&self) -> AvitologResult<Identity> {
        let dto: IdentityDto = self
            .transport
            .get_json("/api/auth/me", &[], self.token.as_deref())
            .await?;
        Ok(dto.into())
    }

    /// Возвращает страницу списка объявлений.
    ///
    /// Пустая категория и «Все» (без учёта регистра) означают отсутствие
    /// фильтра: параметр `category` не отправляется вовсе.
    pub async fn list_ads(&self, query: &ListQuery) -> AvitologResult<AdList> {
        self.ensure_schema().await;
        let params = query.to_params();
        let dto: AdListDto = self
            .transport
            .get_json("/api/ads", &params, self.token.as_deref())
            .await?;
        Ok(dto.into())
    }

    /// Распознаёт вставленную ссылку: сервер находит существующее объявление
    /// или создаёт новое.
    ///
    /// Форму ссылки (`http://`/`https://`) проверяет вызывающий код до
    /// обращения сюда; эта функция строку не валидирует.
    pub async fn resolve_ad(&self, url: &str) -> AvitologResult<Ad> {
        self.ensure_schema().await;
        let payload = ResolveRequestDto { url };
        let dto: AdDto = self
            .transport
            .post_json("/api/ads/resolve", &payload, self.token.as_deref())
            .await?;
        Ok(dto.into())
    }

    /// Возвращает объявление по идентификатору.
    ///
    /// Любая ошибка пробрасывается как есть; вызывающий код показывает
    /// «не найдено» на любую из них, не только на 404.
    pub async fn get_ad(&self, id: &str) -> AvitologResult<Ad> {
        self.ensure_schema().await;
        let dto: AdDto = self
            .transport
            .get_json(&format!("/api/ads/{id}"), &[], self.token.as_deref())
            .await?;
        Ok(dto.into())
    }

    /// Возвращает комментарии объявления в порядке создания.
    pub async fn list_comments(&self, ad_id: &str) -> AvitologResult<Vec<Comment>> {
        self.ensure_schema().await;
        let dtos: Vec<CommentDto> = self
            .transport
            .get_json(
                &format!("/api/ads/{ad_id}/comments"),
                &[],
                self.token.as_deref(),
            )
            .await?;
        Ok(dtos.into_iter().map(Comment::from).collect())
    }

    /// Оставляет комментарий под объявлением.
    ///
    /// Без токена возвращает [`AvitologError::Unauthorized`] локально,
    /// не обращаясь к сети; серверная проверка остаётся подстраховкой.
    pub async fn post_comment(&self, ad_id: &str, text: &str) -> AvitologResult<Comment> {
        let token = self.require_token()?;
        self.ensure_schema().await;
        let payload = CommentRequestDto { text };
        let dto: CommentDto = self
            .transport
            .post_json(&format!("/api/ads/{ad_id}/comments"), &payload, Some(token))
            .await?;
        Ok(dto.into())
    }

    /// Возвращает настройки сайта.
    ///
    /// Успешный ответ кэшируется на время жизни клиента; при ошибке или
    /// пустом заголовке возвращается запасное значение без записи в кэш.
    pub async fn get_settings(&self) -> SiteSettings {
        self.ensure_schema().await;
        if let Some(cached) = self.settings.cached() {
            return cached;
        }

        let fetched = self
            .transport
            .get_json::<SettingsDto>("/api/settings", &[], self.token.as_deref())
            .await
            .map(SiteSettings::from);
        self.settings.resolve(fetched)
    }

    async fn ensure_schema(&self) {
        let transport = &self.transport;
        self.schema
            .ensure_loaded_with(|| async move { transport.get_text(SCHEMA_PATH).await })
            .await;
    }

    fn require_token(&self) -> AvitologResult<&str> {
        self.token.as_deref().ok_or(AvitologError::Unauthorized)
    }
}
