//! Загрузка данных страницы объявления.

use avitolog_client::{Ad, AvitologClient, Comment};

#[derive(Debug, Clone)]
/// Данные страницы объявления: само объявление и его комментарии.
pub struct AdPage {
    /// Объявление.
    pub ad: Ad,
    /// Комментарии в порядке создания.
    pub comments: Vec<Comment>,
}

/// Загружает объявление и его комментарии.
///
/// Любая ошибка загрузки самого объявления трактуется как «не найдено»,
/// без разбора кода ответа. Ошибка загрузки комментариев страницу не
/// ломает: объявление показывается с пустым списком. Отмена — сброс
/// (drop) возвращаемого future, вместе с ним обрывается и сам запрос.
pub async fn load_ad_page(client: &AvitologClient, id: &str) -> Option<AdPage> {
    let ad = match client.get_ad(id).await {
        Ok(ad) => ad,
        Err(err) => {
            tracing::debug!(error = %err, id, "объявление не загрузилось");
            return None;
        }
    };

    let comments = match client.list_comments(id).await {
        Ok(comments) => comments,
        Err(err) => {
            tracing::warn!(error = %err, id, "комментарии не загрузились");
            Vec::new()
        }
    };

    Some(AdPage { ad, comments })
}
