//! The multicast receiver: lifecycle control, interface rotation, and the
//! per-interface listen loop.

use crate::consumer::Consumer;
use crate::iface::{self, InterfaceDescriptor};
use crate::socket::{self, GroupSocket};
use crate::types::{ReceiverConfig, ReceiverStats};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify, RwLock};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Mutable receiver state, guarded by a single lock.
///
/// `active_socket` is set only while a listener attempt is in progress, and
/// taking it is always safe. `generation` identifies the worker spawned by
/// the most recent `start`; a worker outlived by a restart observes the
/// mismatch and exits.
struct ReceiverState {
    running: bool,
    generation: u64,
    active_socket: Option<Arc<GroupSocket>>,
    current_ifi_idx: usize,
}

/// Resilient multicast datagram receiver.
///
/// Joins a multicast group on one network interface at a time, rotating
/// through all interfaces the host reports until traffic is found, and hands
/// every received payload to the consumer in read order. The rotation keeps
/// cycling for as long as the receiver is running, so traffic moving to
/// another interface is picked up within one revolution.
pub struct MulticastReceiver {
    consumer: Arc<dyn Consumer>,
    config: ReceiverConfig,
    state: Arc<Mutex<ReceiverState>>,
    skip_interfaces: Arc<RwLock<HashSet<String>>>,
    stats: Arc<RwLock<ReceiverStats>>,
    stop_signal: Arc<Notify>,
}

impl MulticastReceiver {
    /// Create a receiver with the default configuration.
    pub fn new(consumer: Arc<dyn Consumer>) -> Self {
        Self::with_config(consumer, ReceiverConfig::default())
    }

    /// Create a receiver with an explicit configuration.
    pub fn with_config(consumer: Arc<dyn Consumer>, config: ReceiverConfig) -> Self {
        Self {
            consumer,
            config,
            state: Arc::new(Mutex::new(ReceiverState {
                running: false,
                generation: 0,
                active_socket: None,
                current_ifi_idx: 0,
            })),
            skip_interfaces: Arc::new(RwLock::new(HashSet::new())),
            stats: Arc::new(RwLock::new(ReceiverStats::default())),
            stop_signal: Arc::new(Notify::new()),
        }
    }

    /// Exclude an interface from the rotation.
    pub async fn skip_interface(&self, name: impl Into<String>) {
        self.skip_interfaces.write().await.insert(name.into());
    }

    /// Replace the skip-list wholesale.
    pub async fn set_skip_interfaces(&self, names: impl IntoIterator<Item = String>) {
        *self.skip_interfaces.write().await = names.into_iter().collect();
    }

    /// Current skip-list contents.
    pub async fn skip_interfaces(&self) -> HashSet<String> {
        self.skip_interfaces.read().await.clone()
    }

    /// Begin background reception on `group_address` ("host:port").
    ///
    /// Spawns the single background worker. Operational failures are
    /// reported through the diagnostic log, never returned; a second `start`
    /// while running is refused with a warning. Starting again after `stop`
    /// spawns a fresh worker.
    pub async fn start(&self, group_address: impl Into<String>) {
        let group_address = group_address.into();

        if let Err(e) = self.config.validate() {
            warn!(error = %e, "invalid receiver configuration, not starting");
            return;
        }

        let generation = {
            let mut state = self.state.lock().await;
            if state.running {
                warn!(group = %group_address, "receiver already running, ignoring start");
                return;
            }
            state.running = true;
            state.generation += 1;
            state.generation
        };

        info!(group = %group_address, "starting multicast receiver");

        let worker = Worker {
            group: group_address,
            generation,
            consumer: self.consumer.clone(),
            config: self.config.clone(),
            state: self.state.clone(),
            skip_interfaces: self.skip_interfaces.clone(),
            stats: self.stats.clone(),
            stop_signal: self.stop_signal.clone(),
        };

        tokio::spawn(worker.run());
    }

    /// Request shutdown.
    ///
    /// Clears the running flag, releases the active socket handle, and wakes
    /// the worker. Fire-and-forget: the worker may still be unwinding its
    /// current attempt when this returns; callers that need join semantics
    /// must layer their own synchronization on top.
    pub async fn stop(&self) {
        {
            let mut state = self.state.lock().await;
            state.running = false;
            if let Some(socket) = state.active_socket.take() {
                debug!("releasing active group socket");
                drop(socket);
            }
        }

        self.stop_signal.notify_one();
        info!("multicast receiver stop requested");
    }

    /// Lock-guarded snapshot of the running flag.
    pub async fn is_running(&self) -> bool {
        self.state.lock().await.running
    }

    /// Statistics snapshot.
    pub async fn get_stats(&self) -> ReceiverStats {
        *self.stats.read().await
    }
}

/// The single background worker spawned by `start`.
///
/// All socket I/O, dispatch, and sleeping happen here; the only cross-task
/// interaction is the shared state lock and the stop signal.
struct Worker {
    group: String,
    generation: u64,
    consumer: Arc<dyn Consumer>,
    config: ReceiverConfig,
    state: Arc<Mutex<ReceiverState>>,
    skip_interfaces: Arc<RwLock<HashSet<String>>>,
    stats: Arc<RwLock<ReceiverStats>>,
    stop_signal: Arc<Notify>,
}

impl Worker {
    async fn run(self) {
        loop {
            if !self.should_run().await {
                break;
            }

            let interfaces = match iface::enumerate() {
                Ok(list) => list,
                Err(e) => {
                    warn!(error = %e, "interface enumeration failed");
                    Vec::new()
                }
            };

            let skip = self.skip_interfaces.read().await.clone();
            let selected = {
                let mut state = self.state.lock().await;
                let (idx, selected) =
                    iface::next_interface(&interfaces, state.current_ifi_idx, &skip);
                state.current_ifi_idx = idx;
                selected.cloned()
            };

            match selected {
                Some(ifi) => self.listen_on_interface(&ifi).await,
                None => debug!("no usable network interfaces, retrying after sleep"),
            }

            if !self.should_run().await {
                break;
            }

            tokio::select! {
                _ = sleep(self.config.cycle_interval) => {}
                _ = self.stop_signal.notified() => {}
            }
        }

        info!(group = %self.group, "multicast receiver stopped");
    }

    async fn should_run(&self) -> bool {
        let state = self.state.lock().await;
        state.running && state.generation == self.generation
    }

    /// One listener attempt: join the group on `ifi` and read until the
    /// deadline expires with no traffic, a read fails, or stop is requested.
    async fn listen_on_interface(&self, ifi: &InterfaceDescriptor) {
        let group = match socket::resolve_group(&self.group) {
            Ok(addr) => addr,
            Err(e) => {
                warn!(group = %self.group, error = %e, "could not resolve multicast group");
                self.stats.write().await.failed_attempts += 1;
                return;
            }
        };

        let socket = match GroupSocket::join(group, ifi, self.config.max_datagram_size) {
            Ok(socket) => Arc::new(socket),
            Err(e) => {
                warn!(
                    group = %self.group,
                    interface = %ifi.name,
                    error = %e,
                    "could not listen on interface"
                );
                self.stats.write().await.failed_attempts += 1;
                return;
            }
        };

        self.state.lock().await.active_socket = Some(socket.clone());
        self.stats.write().await.attempts += 1;

        info!(group = %self.group, interface = %ifi.name, "listening for multicast datagrams");

        let mut first = true;
        let mut buf = vec![0u8; self.config.max_datagram_size];

        loop {
            tokio::select! {
                result = timeout(self.config.read_deadline, socket.recv(&mut buf)) => {
                    match result {
                        Ok(Ok(len)) => {
                            if first {
                                info!(
                                    group = %self.group,
                                    interface = %ifi.name,
                                    "got first datagram on interface"
                                );
                                first = false;
                            }

                            {
                                let mut stats = self.stats.write().await;
                                stats.datagrams_received += 1;
                                stats.bytes_received += len as u64;
                            }

                            self.consumer.consume(&buf[..len]);
                        }
                        Ok(Err(e)) => {
                            warn!(interface = %ifi.name, error = %e, "datagram read failed");
                            self.stats.write().await.read_errors += 1;
                            break;
                        }
                        Err(_) => {
                            // The expected path on a silent interface
                            debug!(interface = %ifi.name, "no traffic within read deadline");
                            self.stats.write().await.idle_timeouts += 1;
                            break;
                        }
                    }
                }
                _ = self.stop_signal.notified() => {
                    debug!(interface = %ifi.name, "stop requested, abandoning interface");
                    break;
                }
            }
        }

        info!(group = %self.group, interface = %ifi.name, "stopped listening on interface");

        // Last handle drop closes the socket and leaves the group; only
        // clear the slot if stop (or a restart's attempt) hasn't already
        // replaced it
        let mut state = self.state.lock().await;
        let is_current = state
            .active_socket
            .as_ref()
            .is_some_and(|active| Arc::ptr_eq(active, &socket));
        if is_current {
            state.active_socket = None;
        }
    }
}
