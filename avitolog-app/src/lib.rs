//! Слой состояния приложения «Авитолог».
//!
//! Всё, что стоит между HTTP-клиентом ([`avitolog_client`]) и слоем
//! отрисовки: контроллер списка с фильтрами и пагинацией, разбор адреса
//! в экран, сессия с долговременным токеном, проверки форм и сценарии
//! «распознать ссылку», «страница объявления», «отправить комментарий».
//! Отрисовка получает отсюда простые данные и колбэки.
#![warn(missing_docs)]

mod comments;
mod controller;
mod detail;
mod route;
mod search;
pub mod session;
pub mod validate;

pub use comments::submit_comment;
pub use controller::{AdsBackend, ListController, ListState};
pub use detail::{AdPage, load_ad_page};
pub use route::{Route, watch_routes};
pub use search::resolve_link;
pub use session::{DEFAULT_TOKEN_FILE, Session, TokenStore};
pub use validate::FormError;
