use std::sync::Mutex;

use crate::error::AvitologResult;
use crate::models::SiteSettings;

/// Заголовок шапки по умолчанию, если `/api/settings` недоступен.
pub const DEFAULT_HEADER_TITLE: &str = "Авитолог";

#[derive(Debug, Default)]
/// Кэш настроек сайта в рамках сессии клиента.
///
/// Политика несимметричная: успешный ответ кэшируется, запасное значение —
/// нет, поэтому следующий успешный запрос всё ещё может заполнить кэш.
pub struct SettingsCache {
    slot: Mutex<Option<SiteSettings>>,
}

impl SettingsCache {
    /// Возвращает закэшированные настройки, если они есть.
    pub fn cached(&self) -> Option<SiteSettings> {
        self.slot.lock().expect("settings cache lock poisoned").clone()
    }

    /// Применяет результат загрузки `/api/settings`.
    ///
    /// Непустой заголовок обрезается и кэшируется; пустой заголовок и любая
    /// ошибка дают запасное значение без записи в кэш.
    pub(crate) fn resolve(&self, fetched: AvitologResult<SiteSettings>) -> SiteSettings {
        match fetched {
            Ok(settings) => {
                let title = settings.header_title.trim();
                if title.is_empty() {
                    tracing::warn!("пустой header_title в /api/settings, берём запасной");
                    return SiteSettings::fallback();
                }

                let settings = SiteSettings {
                    header_title: title.to_string(),
                };
                *self.slot.lock().expect("settings cache lock poisoned") =
                    Some(settings.clone());
                settings
            }
            Err(err) => {
                tracing::warn!(error = %err, "не удалось получить /api/settings, берём запасной");
                SiteSettings::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AvitologError;

    fn settings(title: &str) -> SiteSettings {
        SiteSettings {
            header_title: title.to_string(),
        }
    }

    #[test]
    fn success_is_cached() {
        let cache = SettingsCache::default();

        let resolved = cache.resolve(Ok(settings("  Барахолка  ")));
        assert_eq!(resolved.header_title, "Барахолка");
        assert_eq!(cache.cached(), Some(settings("Барахолка")));
    }

    #[test]
    fn failure_returns_fallback_without_caching() {
        let cache = SettingsCache::default();

        let resolved = cache.resolve(Err(AvitologError::NotFound));
        assert_eq!(resolved.header_title, DEFAULT_HEADER_TITLE);
        assert!(cache.cached().is_none());

        // Последующий успех всё ещё заполняет кэш.
        let resolved = cache.resolve(Ok(settings("Авитолог 2.0")));
        assert_eq!(resolved.header_title, "Авитолог 2.0");
        assert_eq!(cache.cached(), Some(settings("Авитолог 2.0")));
    }

    #[test]
    fn blank_title_is_not_cached() {
        let cache = SettingsCache::default();

        let resolved = cache.resolve(Ok(settings("   ")));
        assert_eq!(resolved.header_title, DEFAULT_HEADER_TITLE);
        assert!(cache.cached().is_none());
    }
}
