use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Отображаемое значение категории «Все» — отсутствие фильтра.
pub const CATEGORY_ALL: &str = "Все";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Порядок сортировки списка объявлений.
pub enum Sort {
    /// По числу просмотров, по убыванию.
    #[default]
    Popular,
    /// По дате публикации, по убыванию.
    Date,
}

impl Sort {
    /// Значение query-параметра `sort`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::Date => "date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Параметры запроса списка объявлений.
pub struct ListQuery {
    /// Порядок сортировки.
    pub sort: Sort,
    /// Категория в отображаемом виде; пустая строка или «Все» — без фильтра.
    pub category: String,
    /// Размер страницы.
    pub limit: u32,
    /// Смещение от начала выборки; при пролистывании всегда кратно `limit`.
    pub offset: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            sort: Sort::default(),
            category: CATEGORY_ALL.to_string(),
            limit: 20,
            offset: 0,
        }
    }
}

impl ListQuery {
    /// Пары query-параметров исходящего запроса.
    ///
    /// Пустая категория и «все» (без учёта регистра) означают отсутствие
    /// фильтра: параметр `category` в запрос не попадает вовсе.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sort", self.sort.as_str().to_string()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(category) = effective_category(&self.category) {
            params.push(("category", category.to_string()));
        }
        params
    }
}

/// Возвращает значение фильтра категории или `None`, если фильтра нет.
///
/// Регистронезависимое сравнение действует только для сторожевого
/// значения «все», а не для произвольных категорий.
pub fn effective_category(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.to_lowercase() == "все" {
        return None;
    }
    Some(trimmed)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Объявление, собранное с маркетплейса.
pub struct Ad {
    /// Идентификатор объявления.
    pub id: String,
    /// Заголовок; у только что распознанных объявлений может отсутствовать.
    pub title: Option<String>,
    /// Категория.
    pub category: String,
    /// Число просмотров.
    pub view_count: u64,
    /// Дата публикации на источнике (UTC), если известна.
    pub published_at: Option<DateTime<Utc>>,
    /// Ссылка на изображение, если есть.
    pub image_url: Option<String>,
    /// Исходная ссылка на объявление.
    pub source_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Комментарий под объявлением.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: String,
    /// Логин автора.
    pub username: String,
    /// Текст комментария, не длиннее 2000 символов.
    pub text: String,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Страница списка объявлений.
pub struct AdList {
    /// Объявления текущей страницы; их не больше `limit`.
    pub results: Vec<Ad>,
    /// Общее число объявлений, подходящих под фильтр.
    pub count: u64,
    /// Размер страницы, который применил сервер.
    pub limit: u32,
    /// Смещение, которое применил сервер.
    pub offset: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ после успешной регистрации или входа.
pub struct AuthResponse {
    /// Логин пользователя.
    pub username: String,
    /// Токен авторизации.
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ `GET /api/auth/me`.
pub struct Identity {
    /// Логин текущего пользователя.
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Настройки сайта.
pub struct SiteSettings {
    /// Заголовок шапки сайта.
    pub header_title: String,
}

impl SiteSettings {
    /// Запасное значение на случай недоступности `/api/settings`.
    pub fn fallback() -> Self {
        Self {
            header_title: crate::settings::DEFAULT_HEADER_TITLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_category_skips_empty_and_whitespace() {
        assert_eq!(effective_category(""), None);
        assert_eq!(effective_category("   "), None);
    }

    #[test]
    fn effective_category_skips_sentinel_in_any_case() {
        assert_eq!(effective_category("Все"), None);
        assert_eq!(effective_category("все"), None);
        assert_eq!(effective_category("ВСЕ"), None);
        assert_eq!(effective_category("  вСе  "), None);
    }

    #[test]
    fn effective_category_keeps_real_categories() {
        assert_eq!(effective_category("Авто"), Some("Авто"));
        assert_eq!(effective_category("  Недвижимость "), Some("Недвижимость"));
    }

    #[test]
    fn to_params_omits_category_for_sentinel() {
        let query = ListQuery {
            sort: Sort::Date,
            category: "ВСЕ".to_string(),
            limit: 20,
            offset: 40,
        };

        let params = query.to_params();
        assert!(params.iter().all(|(name, _)| *name != "category"));
        assert!(params.contains(&("sort", "date".to_string())));
        assert!(params.contains(&("limit", "20".to_string())));
        assert!(params.contains(&("offset", "40".to_string())));
    }

    #[test]
    fn to_params_sends_trimmed_category() {
        let query = ListQuery {
            category: " Авто ".to_string(),
            ..ListQuery::default()
        };

        let params = query.to_params();
        assert!(params.contains(&("category", "Авто".to_string())));
    }

    #[test]
    fn default_query_has_no_filter() {
        let query = ListQuery::default();
        assert_eq!(query.sort, Sort::Popular);
        assert_eq!(query.category, CATEGORY_ALL);
        assert!(query.to_params().iter().all(|(name, _)| *name != "category"));
    }
}
