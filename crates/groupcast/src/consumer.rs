//! Consumer boundary for received datagram payloads.

/// Receives the payload of one datagram per invocation.
///
/// The payload view covers exactly the bytes read from the socket, with no
/// framing or metadata added, and is only valid for the duration of the
/// call. Consumers run synchronously on the receiver's worker, so a consumer
/// that blocks stalls all subsequent reads.
#[cfg_attr(test, mockall::automock)]
pub trait Consumer: Send + Sync {
    /// Handle one datagram payload
    fn consume(&self, payload: &[u8]);
}

impl<F> Consumer for F
where
    F: Fn(&[u8]) + Send + Sync,
{
    fn consume(&self, payload: &[u8]) {
        self(payload)
    }
}
