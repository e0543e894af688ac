use std::time::{SystemTime, UNIX_EPOCH};

use avitolog_client::{AvitologClient, AvitologError, CATEGORY_ALL, ListQuery, Sort};

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock must be after unix epoch")
        .as_nanos();
    format!("{nanos}")
}

#[tokio::test]
#[ignore = "requires running API server"]
async fn http_smoke_flow() {
    let base_url =
        std::env::var("AVITOLOG_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    let mut client = AvitologClient::new(base_url);

    let suffix = unique_suffix();
    let username = format!("smoke_user_{suffix}");
    let password = "password123";

    let register = client
        .register(&username, password)
        .await
        .expect("register must succeed");
    assert!(!register.token.is_empty());
    assert_eq!(register.username, username);
    assert!(client.get_token().is_some());

    let login = client
        .login(&username, password)
        .await
        .expect("login must succeed");
    assert!(!login.token.is_empty());

    let me = client.me().await.expect("me must succeed");
    assert_eq!(me.username, username);

    // Сторожевая категория «Все» не должна попадать в запрос.
    let query = ListQuery {
        sort: Sort::Date,
        category: CATEGORY_ALL.to_string(),
        limit: 20,
        offset: 0,
    };
    let list = client.list_ads(&query).await.expect("list_ads must succeed");
    assert!(list.results.len() as u64 <= u64::from(list.limit));
    assert!(client.schema().is_loaded());

    if let Some(ad) = list.results.first() {
        let fetched = client.get_ad(&ad.id).await.expect("get_ad must succeed");
        assert_eq!(fetched.id, ad.id);

        let before = client
            .list_comments(&ad.id)
            .await
            .expect("list_comments must succeed");

        let text = format!("smoke comment {suffix}");
        let posted = client
            .post_comment(&ad.id, &text)
            .await
            .expect("post_comment must succeed");
        assert_eq!(posted.text, text);
        assert_eq!(posted.username, username);

        let after = client
            .list_comments(&ad.id)
            .await
            .expect("list_comments must succeed");
        assert_eq!(after.len(), before.len() + 1);
    }

    // Настройки кэшируются после первого успешного ответа.
    let first = client.get_settings().await;
    let second = client.get_settings().await;
    assert!(!first.header_title.is_empty());
    assert_eq!(first, second);

    client.clear_token();
    let denied = client.post_comment("any", "должно отклониться").await;
    assert!(matches!(denied, Err(AvitologError::Unauthorized)));
}
