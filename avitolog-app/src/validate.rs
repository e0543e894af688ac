//! Проверки форм до обращения к сети.
//!
//! Ошибка — короткая строка для пользователя; некорректный ввод никогда
//! не уходит на сервер.

use thiserror::Error;

/// Максимальная длина комментария в символах.
pub const MAX_COMMENT_LEN: usize = 2000;

/// Минимальная длина логина.
pub const MIN_USERNAME_LEN: usize = 3;

/// Минимальная длина пароля.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
/// Ошибка пользовательской операции; текст показывается как есть.
pub enum FormError {
    /// Строка не похожа на ссылку `http://`/`https://`.
    #[error("Введите корректную ссылку")]
    InvalidUrl,

    /// Комментарий пуст после обрезки пробелов.
    #[error("Введите текст комментария")]
    EmptyComment,

    /// Комментарий длиннее допустимого.
    #[error("Комментарий слишком длинный")]
    CommentTooLong,

    /// Логин или пароль короче допустимого.
    #[error("Проверьте логин и пароль")]
    BadCredentials,

    /// Операция требует входа в учётную запись.
    #[error("Необходимо войти")]
    LoginRequired,

    /// Сервер отклонил вход или регистрацию.
    #[error("Ошибка авторизации")]
    AuthFailed,

    /// Сервер не смог распознать ссылку.
    #[error("Не удалось распознать объявление")]
    ResolveFailed,

    /// Комментарий не отправился или список не обновился.
    #[error("Не удалось отправить комментарий")]
    CommentFailed,
}

/// Проверяет вставленную ссылку: `http://` или `https://` без учёта
/// регистра и непустой остаток. Возвращает обрезанную строку.
pub fn resolve_url(raw: &str) -> Result<&str, FormError> {
    let url = raw.trim();
    let lower = url.to_lowercase();
    let rest = lower
        .strip_prefix("http://")
        .or_else(|| lower.strip_prefix("https://"));
    match rest {
        Some(rest) if !rest.is_empty() => Ok(url),
        _ => Err(FormError::InvalidUrl),
    }
}

/// Проверяет текст комментария: непустой после обрезки и не длиннее
/// [`MAX_COMMENT_LEN`] символов. Возвращает обрезанный текст.
pub fn comment_text(raw: &str) -> Result<&str, FormError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(FormError::EmptyComment);
    }
    if text.chars().count() > MAX_COMMENT_LEN {
        return Err(FormError::CommentTooLong);
    }
    Ok(text)
}

/// Проверяет пару логин/пароль по минимальным длинам.
/// Возвращает обрезанные значения — на сервер уходят именно они.
pub fn credentials<'a>(
    username: &'a str,
    password: &'a str,
) -> Result<(&'a str, &'a str), FormError> {
    let username = username.trim();
    let password = password.trim();
    if username.chars().count() < MIN_USERNAME_LEN || password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormError::BadCredentials);
    }
    Ok((username, password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_url_accepts_http_and_https_in_any_case() {
        assert_eq!(
            resolve_url("https://www.avito.ru/item/1"),
            Ok("https://www.avito.ru/item/1")
        );
        assert_eq!(resolve_url("HTTP://example.com"), Ok("HTTP://example.com"));
        assert_eq!(
            resolve_url("  https://example.com  "),
            Ok("https://example.com")
        );
    }

    #[test]
    fn resolve_url_rejects_other_schemes_and_bare_prefix() {
        assert_eq!(resolve_url("ftp://example.com"), Err(FormError::InvalidUrl));
        assert_eq!(resolve_url("avito.ru/item/1"), Err(FormError::InvalidUrl));
        assert_eq!(resolve_url("https://"), Err(FormError::InvalidUrl));
        assert_eq!(resolve_url(""), Err(FormError::InvalidUrl));
    }

    #[test]
    fn comment_text_trims_and_checks_length() {
        assert_eq!(comment_text("  привет  "), Ok("привет"));
        assert_eq!(comment_text("   "), Err(FormError::EmptyComment));

        let exact = "я".repeat(MAX_COMMENT_LEN);
        assert_eq!(comment_text(&exact), Ok(exact.as_str()));

        let long = "я".repeat(MAX_COMMENT_LEN + 1);
        assert_eq!(comment_text(&long), Err(FormError::CommentTooLong));
    }

    #[test]
    fn credentials_enforce_minimum_lengths() {
        assert_eq!(credentials("ab", "password"), Err(FormError::BadCredentials));
        assert_eq!(credentials("user", "12345"), Err(FormError::BadCredentials));
        assert_eq!(credentials(" user ", " 123456 "), Ok(("user", "123456")));
    }
}
