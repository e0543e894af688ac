use std::io::BufRead;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, anyhow, bail};
use avitolog_app::{
    ListController, Route, Session, TokenStore, load_ad_page, resolve_link, session,
    submit_comment,
};
use avitolog_client::{
    Ad, AvitologClient, AvitologError, CATEGORY_ALL, Comment, ListQuery, Sort,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

#[derive(Debug, Parser)]
#[command(name = "avitolog-cli", version, about = "CLI клиент агрегатора объявлений «Авитолог»")]
struct Cli {
    /// Адрес сервера API (также переменная окружения AVITOLOG_URL).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Файл с токеном авторизации.
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    /// По числу просмотров.
    Popular,
    /// По дате публикации.
    Date,
}

impl From<SortArg> for Sort {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Popular => Sort::Popular,
            SortArg::Date => Sort::Date,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Список объявлений.
    List {
        #[arg(long, value_enum, default_value_t = SortArg::Popular)]
        sort: SortArg,
        /// Категория; «Все» — без фильтра.
        #[arg(long, default_value = CATEGORY_ALL)]
        category: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Интерактивный просмотр списка: next/prev/sort/category.
    Browse {
        #[arg(long, value_enum, default_value_t = SortArg::Popular)]
        sort: SortArg,
        #[arg(long, default_value = CATEGORY_ALL)]
        category: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Распознать вставленную ссылку на объявление.
    Resolve { url: String },
    /// Показать объявление и его комментарии.
    Show { id: String },
    /// Оставить комментарий (требует входа).
    Comment { id: String, text: String },
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Выход: удаляет сохранённый токен.
    Logout,
    /// Текущий пользователь.
    Me,
    /// Настройки сайта.
    Settings,
    /// Определить экран по строке адреса и показать его.
    Open { location: String },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let cli = Cli::parse();

    let server = resolve_server(cli.server);
    let mut client = AvitologClient::new(server);
    let store = cli.token_file.map(TokenStore::new).unwrap_or_default();

    if let Some(token) = store.load().context("не удалось прочитать файл токена")? {
        client.set_token(token);
    }

    match cli.command {
        Command::List {
            sort,
            category,
            limit,
            offset,
        } => {
            let query = ListQuery {
                sort: sort.into(),
                category,
                limit,
                offset,
            };
            let list = client.list_ads(&query).await.map_err(map_client_error)?;
            println!(
                "Объявлений: {} (limit={}, offset={}, всего={})",
                list.results.len(),
                list.limit,
                list.offset,
                list.count
            );
            for ad in &list.results {
                print_ad_line(ad);
            }
        }
        Command::Browse {
            sort,
            category,
            limit,
        } => {
            let query = ListQuery {
                sort: sort.into(),
                category,
                limit,
                offset: 0,
            };
            browse(client, query).await?;
        }
        Command::Resolve { url } => {
            let ad = resolve_link(&client, &url).await?;
            println!("Объявление распознано");
            print_ad(&ad);
            println!("адрес: #/ad/{}", ad.id);
        }
        Command::Show { id } => {
            show_ad(&client, &id).await?;
        }
        Command::Comment { id, text } => {
            let comments = submit_comment(&client, &id, &text).await?;
            println!("Комментарий отправлен");
            print_comments(&comments);
        }
        Command::Register { username, password } => {
            let session = session::register(&store, &mut client, &username, &password).await?;
            print_session("Регистрация успешна", &session);
        }
        Command::Login { username, password } => {
            let session = session::login(&store, &mut client, &username, &password).await?;
            print_session("Вход выполнен", &session);
        }
        Command::Logout => {
            session::logout(&store, &mut client).context("не удалось удалить токен")?;
            println!("Выход выполнен");
        }
        Command::Me => {
            let session = session::restore(&store, &mut client).await;
            match session.username {
                Some(username) => println!("Вы вошли как {username}"),
                None => println!("Вы не вошли"),
            }
        }
        Command::Settings => {
            let settings = client.get_settings().await;
            println!("header_title: {}", settings.header_title);
        }
        Command::Open { location } => match Route::parse(&location) {
            Route::Home => {
                let list = client
                    .list_ads(&ListQuery::default())
                    .await
                    .map_err(map_client_error)?;
                println!("Главная: объявлений {} из {}", list.results.len(), list.count);
                for ad in &list.results {
                    print_ad_line(ad);
                }
            }
            Route::Detail(id) => show_ad(&client, &id).await?,
            Route::NotFound => println!("Страница не найдена"),
        },
    }

    Ok(())
}

/// Интерактивный цикл над контроллером списка.
async fn browse(client: AvitologClient, query: ListQuery) -> Result<()> {
    let mut controller = ListController::new(client, query);
    controller.reload().await;
    print_page(&controller);

    println!("Команды: n (вперёд), p (назад), s popular|date, c <категория>, r (обновить), q (выход)");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("не удалось прочитать команду")?;
        let line = line.trim();
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "q" | "quit" => break,
            "n" | "next" => {
                if !controller.next().await {
                    println!("Дальше страниц нет");
                    continue;
                }
            }
            "p" | "prev" => {
                if !controller.prev().await {
                    println!("Это первая страница");
                    continue;
                }
            }
            "s" | "sort" => match arg {
                "popular" => controller.set_sort(Sort::Popular).await,
                "date" => controller.set_sort(Sort::Date).await,
                _ => {
                    println!("Сортировка: popular или date");
                    continue;
                }
            },
            "c" | "category" => {
                let category = if arg.is_empty() { CATEGORY_ALL } else { arg };
                controller.set_category(category).await;
            }
            "r" | "reload" => controller.reload().await,
            other => {
                println!("Неизвестная команда: {other}");
                continue;
            }
        }

        print_page(&controller);
    }

    Ok(())
}

async fn show_ad(client: &AvitologClient, id: &str) -> Result<()> {
    match load_ad_page(client, id).await {
        Some(page) => {
            print_ad(&page.ad);
            println!("Комментарии:");
            print_comments(&page.comments);
            Ok(())
        }
        None => bail!("Объявление не найдено"),
    }
}

fn resolve_server(server: Option<String>) -> String {
    let raw = server
        .or_else(|| std::env::var("AVITOLOG_URL").ok())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    normalize_server(raw)
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

fn map_client_error(err: AvitologError) -> anyhow::Error {
    let message = match err {
        AvitologError::Unauthorized => {
            "требуется авторизация: выполните `avitolog-cli login ...` или `avitolog-cli register ...`"
                .to_string()
        }
        AvitologError::NotFound => "ресурс не найден".to_string(),
        AvitologError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        AvitologError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow!(message)
}

fn print_session(title: &str, session: &Session) {
    println!("{title}");
    if let Some(username) = &session.username {
        println!("пользователь: {username}");
    }
}

fn print_ad_line(ad: &Ad) {
    println!(
        "- [{}] {} (категория: {}, просмотры: {})",
        ad.id,
        ad.title.as_deref().unwrap_or("Без названия"),
        ad.category,
        ad.view_count
    );
}

fn print_ad(ad: &Ad) {
    println!("id: {}", ad.id);
    println!("заголовок: {}", ad.title.as_deref().unwrap_or("Без названия"));
    println!("категория: {}", ad.category);
    println!("просмотры: {}", ad.view_count);
    match ad.published_at {
        Some(published_at) => println!("опубликовано: {published_at}"),
        None => println!("опубликовано: —"),
    }
    println!("исходник: {}", ad.source_url);
}

fn print_comments(comments: &[Comment]) {
    if comments.is_empty() {
        println!("(пока пусто)");
        return;
    }
    for comment in comments {
        println!("- {} [{}]: {}", comment.username, comment.created_at, comment.text);
    }
}

fn print_page(controller: &ListController<AvitologClient>) {
    let state = controller.state();
    if let Some(error) = &state.error {
        println!("{error}");
        return;
    }

    println!(
        "Сортировка: {}, категория: {}, страница {} из {} (всего {})",
        state.sort.as_str(),
        state.category,
        controller.page(),
        controller.page_count().max(1),
        state.total_count
    );
    if state.results.is_empty() {
        println!("(объявлений нет)");
        return;
    }
    for ad in &state.results {
        print_ad_line(ad);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://example.com:8000".to_string());
        assert_eq!(s, "https://example.com:8000");
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        let s = normalize_server("127.0.0.1:8000".to_string());
        assert_eq!(s, "http://127.0.0.1:8000");
    }

    #[test]
    fn resolve_server_prefers_explicit_flag() {
        let s = resolve_server(Some("localhost:9999".to_string()));
        assert_eq!(s, "http://localhost:9999");
    }
}
