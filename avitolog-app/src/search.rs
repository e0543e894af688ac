//! Распознавание вставленной ссылки на объявление.

use avitolog_client::{Ad, AvitologClient};

use crate::validate::{self, FormError};

/// Проверяет ссылку и просит сервер распознать её в объявление.
///
/// Некорректная ссылка отклоняется до сетевого вызова; любая серверная
/// ошибка сворачивается в короткое сообщение.
pub async fn resolve_link(client: &AvitologClient, raw: &str) -> Result<Ad, FormError> {
    let url = validate::resolve_url(raw)?;

    client.resolve_ad(url).await.map_err(|err| {
        tracing::warn!(error = %err, "ссылка не распозналась");
        FormError::ResolveFailed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_link_is_rejected_before_network() {
        // Адрес заведомо не используется: валидация срабатывает раньше.
        let client = AvitologClient::new("http://unreachable.invalid");

        let result = resolve_link(&client, "avito.ru/item/1").await;
        assert_eq!(result.unwrap_err(), FormError::InvalidUrl);
        assert!(!client.schema().is_loaded());
    }
}
