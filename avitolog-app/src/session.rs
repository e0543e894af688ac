//! Сессия пользователя: долговременное хранение токена и вход/выход.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use avitolog_client::AvitologClient;

use crate::validate::{self, FormError};

/// Имя файла с токеном по умолчанию.
pub const DEFAULT_TOKEN_FILE: &str = ".avitolog_token";

fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[derive(Debug, Clone)]
/// Долговременное хранилище токена: один файл с фиксированным именем.
pub struct TokenStore {
    path: PathBuf,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_FILE)
    }
}

impl TokenStore {
    /// Создаёт хранилище с заданным путём к файлу токена.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Путь к файлу токена.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Читает токен; отсутствующий файл и пустое содержимое — не ошибка.
    pub fn load(&self) -> io::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)?;
        Ok(parse_token(&raw))
    }

    /// Записывает токен.
    pub fn save(&self, token: &str) -> io::Result<()> {
        fs::write(&self.path, token)
    }

    /// Удаляет сохранённый токен; отсутствие файла — не ошибка.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Текущая сессия пользователя.
pub struct Session {
    /// Логин, если пользователь вошёл.
    pub username: Option<String>,
}

impl Session {
    /// Вошёл ли пользователь.
    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }
}

/// Восстанавливает сессию при старте.
///
/// Сохранённый токен ставится в клиент, личность проверяется через
/// `/api/auth/me`. Протухший токен не стирается: он просто даст отказ
/// на последующих защищённых вызовах, а сессия остаётся анонимной.
pub async fn restore(store: &TokenStore, client: &mut AvitologClient) -> Session {
    let token = match store.load() {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!(error = %err, path = %store.path().display(), "не удалось прочитать файл токена");
            None
        }
    };

    let Some(token) = token else {
        return Session::default();
    };
    client.set_token(token);

    match client.me().await {
        Ok(identity) => Session {
            username: Some(identity.username),
        },
        Err(err) => {
            tracing::debug!(error = %err, "токен не прошёл проверку /api/auth/me");
            Session::default()
        }
    }
}

/// Вход: проверка полей, запрос, сохранение токена.
pub async fn login(
    store: &TokenStore,
    client: &mut AvitologClient,
    username: &str,
    password: &str,
) -> Result<Session, FormError> {
    let (username, password) = validate::credentials(username, password)?;

    let auth = client.login(username, password).await.map_err(|err| {
        tracing::warn!(error = %err, "вход отклонён");
        FormError::AuthFailed
    })?;

    if let Err(err) = store.save(&auth.token) {
        tracing::warn!(error = %err, "не удалось сохранить токен");
    }
    Ok(Session {
        username: Some(auth.username),
    })
}

/// Регистрация: проверка полей, запрос, сохранение токена.
pub async fn register(
    store: &TokenStore,
    client: &mut AvitologClient,
    username: &str,
    password: &str,
) -> Result<Session, FormError> {
    let (username, password) = validate::credentials(username, password)?;

    let auth = client.register(username, password).await.map_err(|err| {
        tracing::warn!(error = %err, "регистрация отклонена");
        FormError::AuthFailed
    })?;

    if let Err(err) = store.save(&auth.token) {
        tracing::warn!(error = %err, "не удалось сохранить токен");
    }
    Ok(Session {
        username: Some(auth.username),
    })
}

/// Выход: токен очищается и в клиенте, и в хранилище.
pub fn logout(store: &TokenStore, client: &mut AvitologClient) -> io::Result<()> {
    client.clear_token();
    store.clear()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> TokenStore {
        TokenStore::new(dir.path().join(DEFAULT_TOKEN_FILE))
    }

    #[test]
    fn load_returns_none_for_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn save_then_load_round_trips_trimmed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.save("  opaque-token  ").expect("save");
        assert_eq!(store.load().expect("load").as_deref(), Some("opaque-token"));
    }

    #[test]
    fn blank_file_counts_as_absent_token() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.save("   ").expect("save");
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.save("token").expect("save");
        store.clear().expect("first clear");
        store.clear().expect("second clear");
        assert_eq!(store.load().expect("load"), None);
    }

    #[tokio::test]
    async fn login_rejects_short_credentials_before_network() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        // Адрес заведомо не используется: валидация срабатывает раньше.
        let mut client = AvitologClient::new("http://unreachable.invalid");

        let result = login(&store, &mut client, "ab", "12345").await;
        assert_eq!(result.unwrap_err(), FormError::BadCredentials);
        assert!(client.get_token().is_none());
        assert_eq!(store.load().expect("load"), None);
    }

    #[tokio::test]
    async fn restore_without_stored_token_is_anonymous() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let mut client = AvitologClient::new("http://unreachable.invalid");

        let session = restore(&store, &mut client).await;
        assert!(!session.is_authenticated());
        assert!(client.get_token().is_none());
    }

    #[tokio::test]
    async fn logout_clears_both_client_and_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let mut client = AvitologClient::new("http://127.0.0.1:8000");

        store.save("token").expect("save");
        client.set_token("token");

        logout(&store, &mut client).expect("logout");
        assert!(client.get_token().is_none());
        assert_eq!(store.load().expect("load"), None);
    }
}
