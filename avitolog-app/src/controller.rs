//! Контроллер списка объявлений: фильтры, пагинация и перезагрузка.

use async_trait::async_trait;
use avitolog_client::{Ad, AdList, AvitologClient, AvitologResult, ListQuery, Sort};

/// Источник данных для контроллера списка.
///
/// Шов для тестов: боевой реализацией служит [`AvitologClient`].
#[async_trait]
pub trait AdsBackend {
    /// Загружает страницу объявлений по параметрам запроса.
    async fn list_ads(&self, query: &ListQuery) -> AvitologResult<AdList>;
}

#[async_trait]
impl AdsBackend for AvitologClient {
    async fn list_ads(&self, query: &ListQuery) -> AvitologResult<AdList> {
        AvitologClient::list_ads(self, query).await
    }
}

#[derive(Debug, Clone)]
/// Наблюдаемое состояние списка объявлений.
pub struct ListState {
    /// Порядок сортировки.
    pub sort: Sort,
    /// Категория в отображаемом виде; «Все» — без фильтра.
    pub category: String,
    /// Размер страницы.
    pub limit: u32,
    /// Смещение текущей страницы; меняется только шагами `next`/`prev`
    /// и сбросом при смене фильтров, поэтому остаётся кратным `limit`.
    pub offset: u32,
    /// Объявления текущей страницы.
    pub results: Vec<Ad>,
    /// Общее число объявлений под текущим фильтром.
    pub total_count: u64,
    /// Идёт ли загрузка.
    pub loading: bool,
    /// Короткое сообщение об ошибке последней загрузки.
    pub error: Option<String>,
}

/// Контроллер списка объявлений.
///
/// Смена сортировки или категории сбрасывает смещение в ноль и
/// перезагружает данные. Каждая перезагрузка несёт возрастающий номер
/// поколения; ответ устаревшего поколения отбрасывается, так что при
/// пересекающихся загрузках более старый ответ не затирает новый.
pub struct ListController<B> {
    backend: B,
    state: ListState,
    generation: u64,
}

impl<B: AdsBackend> ListController<B> {
    /// Создаёт контроллер с начальными параметрами запроса.
    ///
    /// Данные не загружаются до первого вызова [`reload`](Self::reload).
    pub fn new(backend: B, query: ListQuery) -> Self {
        Self {
            backend,
            state: ListState {
                sort: query.sort,
                category: query.category,
                limit: query.limit.max(1),
                offset: query.offset,
                results: Vec::new(),
                total_count: 0,
                loading: false,
                error: None,
            },
            generation: 0,
        }
    }

    /// Текущее состояние списка.
    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Параметры запроса, соответствующие текущему состоянию.
    pub fn query(&self) -> ListQuery {
        ListQuery {
            sort: self.state.sort,
            category: self.state.category.clone(),
            limit: self.state.limit,
            offset: self.state.offset,
        }
    }

    /// Начинает перезагрузку: включает флаг загрузки и выдаёт номер
    /// поколения вместе с параметрами запроса.
    ///
    /// Для потребителей, которые выполняют запросы сами (и могут иметь
    /// несколько незавершённых); [`reload`](Self::reload) — готовая связка.
    pub fn begin_reload(&mut self) -> (u64, ListQuery) {
        self.generation += 1;
        self.state.loading = true;
        self.state.error = None;
        (self.generation, self.query())
    }

    /// Применяет результат перезагрузки.
    ///
    /// Ответ с номером поколения, отличным от текущего, устарел и
    /// отбрасывается целиком: состояние не меняется, возвращается `false`.
    pub fn finish_reload(
        &mut self,
        generation: u64,
        outcome: AvitologResult<AdList>,
    ) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "устаревший ответ отброшен");
            return false;
        }

        match outcome {
            Ok(list) => {
                self.state.results = list.results;
                self.state.total_count = list.count;
            }
            Err(err) => {
                tracing::warn!(error = %err, "не удалось загрузить список объявлений");
                self.state.error = Some("Не удалось загрузить объявления".to_string());
            }
        }
        self.state.loading = false;
        true
    }

    /// Перезагружает текущую страницу.
    pub async fn reload(&mut self) {
        let (generation, query) = self.begin_reload();
        let outcome = self.backend.list_ads(&query).await;
        self.finish_reload(generation, outcome);
    }

    /// Меняет сортировку; при фактической смене сбрасывает смещение
    /// в ноль и перезагружает данные.
    pub async fn set_sort(&mut self, sort: Sort) {
        if self.state.sort == sort {
            return;
        }
        self.state.sort = sort;
        self.state.offset = 0;
        self.reload().await;
    }

    /// Меняет категорию; при фактической смене сбрасывает смещение
    /// в ноль и перезагружает данные.
    pub async fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        if self.state.category == category {
            return;
        }
        self.state.category = category;
        self.state.offset = 0;
        self.reload().await;
    }

    /// Листает вперёд, если впереди есть данные. Возвращает, был ли шаг.
    pub async fn next(&mut self) -> bool {
        if u64::from(self.state.offset) + u64::from(self.state.limit) >= self.state.total_count {
            return false;
        }
        self.state.offset += self.state.limit;
        self.reload().await;
        true
    }

    /// Листает назад, если есть куда. Возвращает, был ли шаг.
    pub async fn prev(&mut self) -> bool {
        if self.state.offset < self.state.limit {
            return false;
        }
        self.state.offset -= self.state.limit;
        self.reload().await;
        true
    }

    /// Номер текущей страницы, с единицы.
    pub fn page(&self) -> u32 {
        self.state.offset / self.state.limit + 1
    }

    /// Число страниц под текущим фильтром.
    pub fn page_count(&self) -> u64 {
        self.state.total_count.div_ceil(u64::from(self.state.limit))
    }
}
