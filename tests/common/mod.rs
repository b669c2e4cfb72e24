use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use tokio::sync::mpsc::UnboundedReceiver;

use verrow::infrastructure::cache::InMemoryRecordCache;
use verrow::infrastructure::notifier::ChannelConflictNotifier;
use verrow::infrastructure::store::SqliteRecordStore;
use verrow::{
    CacheKey, CachedValue, ConflictInfo, OptimisticUpdateService, RecordId, RecordRow,
    TableBinding,
};

pub async fn memory_pool() -> Pool<Sqlite> {
    // A single connection keeps the in-memory database alive for the whole
    // test.
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

pub async fn create_products_table(pool: &Pool<Sqlite>) {
    sqlx::query(
        r#"
        CREATE TABLE products (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            price INTEGER NOT NULL,
            version INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await
    .unwrap();
}

pub async fn seed_product(pool: &Pool<Sqlite>, id: &str, name: &str, price: i64, version: i64) {
    sqlx::query("INSERT INTO products (id, name, price, version) VALUES (?1, ?2, ?3, ?4)")
        .bind(id)
        .bind(name)
        .bind(price)
        .bind(version)
        .execute(pool)
        .await
        .unwrap();
}

pub fn products_binding() -> TableBinding {
    TableBinding::new("products", "id", "version").unwrap()
}

pub fn list_key() -> CacheKey {
    CacheKey::list("products").unwrap()
}

pub fn detail_key(id: &str) -> CacheKey {
    let id = RecordId::new(id.to_string()).unwrap();
    CacheKey::detail("products", &id).unwrap()
}

pub struct Harness {
    pub service: OptimisticUpdateService,
    pub cache: Arc<InMemoryRecordCache>,
    pub conflicts: UnboundedReceiver<ConflictInfo>,
}

/// Engine over a real SQLite store, an in-memory cache and a channel
/// notifier, with the products list and p-1 detail keys registered and
/// pre-populated.
pub async fn build_harness(pool: &Pool<Sqlite>) -> Harness {
    let store = Arc::new(SqliteRecordStore::new(pool.clone()));
    let cache = Arc::new(InMemoryRecordCache::new());
    let (notifier, conflicts) = ChannelConflictNotifier::new();

    let service = OptimisticUpdateService::new(
        store,
        cache.clone(),
        Arc::new(notifier),
        products_binding(),
    );
    service.register_cache_key(list_key()).await;
    service.register_cache_key(detail_key("p-1")).await;

    Harness {
        service,
        cache,
        conflicts,
    }
}

pub fn product_row(id: &str, name: &str, price: i64, version: i64) -> RecordRow {
    RecordRow::new(serde_json::json!({
        "id": id,
        "name": name,
        "price": price,
        "version": version,
    }))
    .unwrap()
}

pub async fn seed_cache(harness: &Harness, rows: Vec<RecordRow>, detail: RecordRow) {
    use verrow::RecordCache;

    harness
        .cache
        .set(&list_key(), CachedValue::Collection(rows))
        .await;
    harness
        .cache
        .set(&detail_key("p-1"), CachedValue::Detail(detail))
        .await;
}
