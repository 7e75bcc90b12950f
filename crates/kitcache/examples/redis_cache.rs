use kitcache::prelude::*;
use std::time::Duration;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/0".to_string());

    println!("Connecting to Redis at {redis_url}");

    let options = vec![
        with_connection_string(redis_url),
        with_timeout(Duration::from_secs(3)),
        with_max_retry(1),
    ];

    // Construction probes the server and fails fast if it is unreachable
    match RedisBackend::new(options).await {
        Ok(cache) => {
            println!("Connected ({})", cache.topology());

            cache.set("demo", "hello", "world", Duration::from_secs(300)).await?;
            println!("Got: {}", cache.get_key("demo", "hello").await?);

            cache.remove_key("demo", "hello").await?;
            match cache.get_key("demo", "hello").await {
                Err(CacheError::NotFound) => println!("hello removed"),
                other => println!("unexpected: {other:?}"),
            }
        }
        Err(err) => {
            println!("Could not connect to Redis: {err}");
            println!("Start one with: docker run -p 6379:6379 redis");
        }
    }

    Ok(())
}
