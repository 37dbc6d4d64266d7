use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use tracing::info;

use super::LocalStorage;
use crate::error::StorageError;

/// Хранилище поверх Redis. Ключи префиксуются пространством имён,
/// чтобы несколько клиентов могли жить в одном инстансе.
#[derive(Clone)]
pub struct RedisStorage {
    conn: MultiplexedConnection,
    namespace: String,
}

impl RedisStorage {
    pub async fn connect(redis_url: &str, namespace: &str) -> Result<Self, StorageError> {
        let client = Client::open(redis_url)?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        info!("Redis storage connected (namespace={:?})", namespace);
        Ok(Self { conn, namespace: namespace.to_string() })
    }

    fn key(&self, key: &str) -> String {
        if self.namespace.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.namespace, key)
        }
    }
}

#[async_trait]
impl LocalStorage for RedisStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(self.key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(self.key(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(self.key(key)).await?;
        Ok(())
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<usize, StorageError> {
        let pattern = format!("{}*", escape_glob(&self.key(prefix)));
        let mut conn = self.conn.clone();
        let keys: Vec<String> = redis::cmd("KEYS").arg(&pattern).query_async(&mut conn).await?;
        if keys.is_empty() {
            return Ok(0);
        }
        let removed: usize = conn.del(keys).await?;
        Ok(removed)
    }
}

// KEYS понимает glob-шаблоны
fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_characters_are_escaped() {
        assert_eq!(escape_glob("cinema:session:1:"), "cinema:session:1:");
        assert_eq!(escape_glob("a*b?[c]"), "a\\*b\\?\\[c\\]");
    }
}
