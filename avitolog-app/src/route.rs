//! Отображение адресной строки на экран приложения.

use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Экран, однозначно вычисляемый из строки адреса.
pub enum Route {
    /// Главная страница со списком объявлений.
    Home,
    /// Страница объявления.
    Detail(String),
    /// Неизвестный адрес.
    NotFound,
}

impl Route {
    /// Разбирает строку адреса.
    ///
    /// Канонический разбор — по фрагменту после `#`: он делится по `/`,
    /// пустые сегменты отбрасываются. Ноль сегментов (или одинокий `ad`
    /// без идентификатора) — главная, `ad/<id>` — страница объявления,
    /// всё остальное — «не найдено». Строка без `#` разбирается как
    /// голый путь по тем же правилам.
    pub fn parse(location: &str) -> Self {
        let fragment = match location.split_once('#') {
            Some((_, fragment)) => fragment,
            None => location,
        };

        let segments: Vec<&str> = fragment.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | ["ad"] => Self::Home,
            ["ad", id, ..] => Self::Detail((*id).to_string()),
            _ => Self::NotFound,
        }
    }
}

/// Подписывается на изменения адреса и выдаёт поток экранов.
///
/// Каждое новое значение адреса немедленно превращается в [`Route`].
/// Отписка — сброс возвращённого приёмника: когда все приёмники
/// сброшены, фоновая задача завершается.
pub fn watch_routes(mut location: watch::Receiver<String>) -> watch::Receiver<Route> {
    let initial = Route::parse(&location.borrow());
    let (tx, rx) = watch::channel(initial);

    tokio::spawn(async move {
        while location.changed().await.is_ok() {
            let route = Route::parse(&location.borrow_and_update());
            if tx.send(route).is_err() {
                break;
            }
        }
    });

    rx
}
