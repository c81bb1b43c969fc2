//! Resilient multicast datagram reception.
//!
//! Hosts often have several network interfaces, only one of which carries
//! the multicast traffic of interest — and that interface may not be known
//! in advance, or may change when links flap. Instead of binding once, the
//! receiver round-robins across all enumerated interfaces, staying on each
//! just long enough (one read deadline) to detect whether traffic arrives,
//! and keeps cycling for as long as it is running.
//!
//! # Features
//!
//! - Interface rotation with live re-enumeration every cycle
//! - Operator-configurable skip-list of interface names
//! - Bounded-deadline reads, so a silent interface never stalls the rotation
//! - Synchronous, in-order payload dispatch to a caller-supplied consumer
//! - Fire-and-forget stop with prompt cancellation of a pending read
//!
//! # Example
//!
//! ```no_run
//! use groupcast::MulticastReceiver;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let receiver = MulticastReceiver::new(Arc::new(|payload: &[u8]| {
//!     println!("{} byte datagram", payload.len());
//! }));
//!
//! receiver.skip_interface("docker0").await;
//! receiver.start("239.255.42.99:9001").await;
//!
//! // ... payloads flow to the consumer on the background worker ...
//!
//! receiver.stop().await;
//! # }
//! ```

mod consumer;
mod iface;
mod receiver;
mod socket;
mod types;

pub use consumer::Consumer;
pub use iface::{InterfaceDescriptor, enumerate, next_interface};
pub use receiver::MulticastReceiver;
pub use socket::{GroupSocket, resolve_group};
pub use types::{
    DEFAULT_CYCLE_INTERVAL, DEFAULT_MAX_DATAGRAM_SIZE, DEFAULT_READ_DEADLINE, ReceiverConfig,
    ReceiverStats,
};
