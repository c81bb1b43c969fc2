//! Simple multicast receiver example
//!
//! Joins a multicast group and prints every payload the consumer sees.
//!
//! Usage:
//!   cargo run --example simple_receiver [group:port]
//!
//! Defaults to 239.255.42.99:9001. Send test traffic from another host with
//! e.g. `socat - UDP4-DATAGRAM:239.255.42.99:9001`.

use groupcast::MulticastReceiver;
use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("groupcast=info")
        .init();

    let group = env::args()
        .nth(1)
        .unwrap_or_else(|| "239.255.42.99:9001".to_string());

    println!("Cycling interfaces for multicast group {group}");
    println!("Press Ctrl+C to stop...");
    println!();

    let count = Arc::new(AtomicU64::new(0));
    let counter = count.clone();

    let receiver = MulticastReceiver::new(Arc::new(move |payload: &[u8]| {
        let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
        println!("datagram {n}: {} bytes", payload.len());
    }));

    receiver.start(group).await;

    signal::ctrl_c().await?;
    println!();
    println!("Stopping...");

    receiver.stop().await;

    let stats = receiver.get_stats().await;
    println!();
    println!("Final statistics:");
    println!("  Interface attempts: {}", stats.attempts);
    println!("  Failed attempts:    {}", stats.failed_attempts);
    println!("  Idle timeouts:      {}", stats.idle_timeouts);
    println!("  Read errors:        {}", stats.read_errors);
    println!("  Datagrams received: {}", stats.datagrams_received);
    println!("  Bytes received:     {}", stats.bytes_received);

    Ok(())
}
