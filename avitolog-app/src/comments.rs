//! Отправка комментария под объявлением.

use avitolog_client::{AvitologClient, AvitologError, Comment};

use crate::validate::{self, FormError};

/// Отправляет комментарий и возвращает обновлённый список.
///
/// Порядок жёсткий: сначала проверка текста, затем локальная проверка
/// токена — обе срабатывают до какого-либо сетевого вызова. Список после
/// успешной отправки перечитывается с сервера, без оптимистичного
/// добавления.
pub async fn submit_comment(
    client: &AvitologClient,
    ad_id: &str,
    text: &str,
) -> Result<Vec<Comment>, FormError> {
    let text = validate::comment_text(text)?;

    if client.get_token().is_none() {
        return Err(FormError::LoginRequired);
    }

    match client.post_comment(ad_id, text).await {
        Ok(_) => {}
        // Серверный отказ в авторизации — подстраховка локальной проверки.
        Err(AvitologError::Unauthorized) => return Err(FormError::LoginRequired),
        Err(err) => {
            tracing::warn!(error = %err, ad_id, "комментарий не отправился");
            return Err(FormError::CommentFailed);
        }
    }

    client.list_comments(ad_id).await.map_err(|err| {
        tracing::warn!(error = %err, ad_id, "список комментариев не обновился");
        FormError::CommentFailed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn anonymous_submit_short_circuits_without_network() {
        // Адрес заведомо не используется: до сети дело не доходит.
        let client = AvitologClient::new("http://unreachable.invalid");

        let result = submit_comment(&client, "a1", "нормальный текст").await;
        assert_eq!(result.unwrap_err(), FormError::LoginRequired);
        assert!(!client.schema().is_loaded());
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_token_check() {
        let mut client = AvitologClient::new("http://unreachable.invalid");
        client.set_token("token");

        let result = submit_comment(&client, "a1", "   ").await;
        assert_eq!(result.unwrap_err(), FormError::EmptyComment);
    }
}
