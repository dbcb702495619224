use redis::aio::ConnectionManager;
use std::env;

pub async fn get_redis() -> anyhow::Result<ConnectionManager> {
    let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let client = redis::Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;
    Ok(manager)
}
