use std::future::Future;

use tokio::sync::OnceCell;

use crate::error::AvitologResult;

/// Путь описания API на сервере.
pub(crate) const SCHEMA_PATH: &str = "/api_schema.yaml";

/// Пути, которые обязаны присутствовать в описании API.
pub(crate) const REQUIRED_PATHS: [&str; 3] =
    ["/api/ads:", "/api/ads/resolve:", "/api/ads/{id}:"];

#[derive(Debug, Default)]
/// Кэш описания API на время жизни процесса.
///
/// Документ загружается не более одного раза; параллельные вызовы ждут один
/// общий запрос. Неудачная загрузка тоже фиксируется, чтобы не устраивать
/// шторм повторных попыток: проверка целостности тогда просто не выполняется
/// до конца работы процесса.
pub struct SchemaCache {
    cell: OnceCell<Option<String>>,
}

impl SchemaCache {
    /// Гарантирует, что загрузка описания была выполнена ровно один раз.
    ///
    /// Ошибки загрузки проглатываются: вызывающему коду описание API не
    /// нужно для корректной работы.
    pub(crate) async fn ensure_loaded_with<F, Fut>(&self, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AvitologResult<String>>,
    {
        self.cell
            .get_or_init(|| async move {
                match fetch().await {
                    Ok(text) => {
                        for path in missing_paths(&text) {
                            tracing::warn!(path, "в api_schema.yaml нет ожидаемого пути");
                        }
                        Some(text)
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "не удалось загрузить api_schema.yaml");
                        None
                    }
                }
            })
            .await;
    }

    /// Была ли выполнена попытка загрузки (успешная или нет).
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Текст описания API, если загрузка удалась.
    pub fn text(&self) -> Option<&str> {
        self.cell.get().and_then(|text| text.as_deref())
    }
}

/// Ожидаемые пути, которых нет в тексте описания.
pub(crate) fn missing_paths(text: &str) -> Vec<&'static str> {
    REQUIRED_PATHS
        .iter()
        .copied()
        .filter(|path| !text.contains(path))
        .collect()
}
