//! Local interaction server.
//!
//! Boots the interaction runtime against an in-memory host, seeds a few
//! interactions, and walks a player past them, triggering the `interact`
//! event at every step. Emitted events are logged as JSON.
mod sink;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use interaction_runtime::{
    ActorId, Dimension, InMemoryActorHost, Position, Runtime, RuntimeConfig,
};
use sink::JsonLogSink;
use tracing::{info, warn};

const EVENT: &str = "interact";
const PLAYER: ActorId = ActorId(1);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::from_env();
    let host = Arc::new(InMemoryActorHost::new());

    let runtime = Runtime::builder()
        .config(config)
        .shared_host(host.clone())
        .broadcaster(JsonLogSink)
        .build()
        .await?;
    let service = runtime.service();

    // Market stalls along the x axis, plus a door only visible indoors.
    service.create_interaction(1, 1, Position::new(0.0, 0.0, 0.0), Dimension(0), 10)?;
    service.create_interaction(1, 2, Position::new(25.0, 0.0, 0.0), Dimension(0), 10)?;
    service.create_interaction(1, 3, Position::new(50.0, 5.0, 0.0), Dimension(0), 15)?;
    service.create_interaction(2, 1, Position::new(25.0, 0.0, 0.0), Dimension(1), 50)?;

    if let Err(error) = service.create_interaction(1, 1, Position::ORIGIN, Dimension(0), 1) {
        warn!(%error, "second create with an existing key rejected as expected");
    }

    service.register_interaction_event(EVENT)?;

    let mut events = service.subscribe(EVENT);
    let listener = tokio::spawn(async move {
        let mut delivered = 0usize;
        while let Ok(event) = events.recv().await {
            delivered += 1;
            info!(
                actor = %event.actor,
                matches = event.interactions.len(),
                "in range: {:?}",
                event.keys()
            );
        }
        delivered
    });

    host.place(PLAYER, Position::ORIGIN, Dimension(0));
    for step in 0..=12u32 {
        let x = step as f32 * 5.0;
        host.move_to(PLAYER, Position::new(x, 0.0, 0.0));
        service.trigger(EVENT, PLAYER, serde_json::json!({ "step": step }));
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    // Same spot, other dimension: only the indoor door matches.
    host.place(PLAYER, Position::new(25.0, 0.0, 0.0), Dimension(1));
    service.trigger(EVENT, PLAYER, serde_json::json!({ "step": "indoors" }));

    runtime.shutdown().await?;
    drop(service);

    let delivered = listener.await?;
    info!(delivered, "session finished");
    Ok(())
}
