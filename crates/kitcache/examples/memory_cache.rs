use kitcache::prelude::*;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Internal sweeper diagnostics are emitted at DEBUG/TRACE
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cache = MemoryBackend::new(Duration::from_millis(500), Vec::new())?;

    println!("Setting values...");
    cache.set("demo", "session:1", "alice", Duration::from_secs(1)).await?;
    cache.set("demo", "session:2", "bob", Duration::from_secs(10)).await?;

    println!("Got: {}", cache.get_key("demo", "session:1").await?);

    tokio::time::sleep(Duration::from_millis(1200)).await;

    match cache.get_key("demo", "session:1").await {
        Err(CacheError::NotFound) => println!("session:1 expired"),
        other => println!("unexpected: {other:?}"),
    }
    println!("Entries left after sweep: {}", cache.len());

    cache.close().await;
    Ok(())
}
