//! The interface of SSH transport layer consumed by the authentication layer.
//!
//! Packet framing, encryption, integrity and the key exchange live behind this
//! trait. The authentication layer only hands over complete payloads and reads
//! decrypted ones.

// Refs:
// * https://tools.ietf.org/html/rfc4253

use bytes::BufMut;
use futures::task::{self, Poll};
use std::{ops::Range, pin::Pin};

/// An established SSH transport.
pub trait Transport {
    /// Return the session identifier, i.e. the exchange hash of the first key exchange.
    ///
    /// The value is stable for the lifetime of the session.
    fn session_id(&self) -> &[u8];

    /// Receive a packet from the peer, and return the range of its payload
    /// within `recv_buf`.
    ///
    /// Transport layer messages (`SSH_MSG_IGNORE`, re-keying etc.) are
    /// handled internally and never returned.
    fn poll_recv(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
        recv_buf: &mut [u8],
    ) -> Poll<Result<Range<usize>, crate::Error>>;

    /// Wait until the send buffer is able to hold a payload of
    /// `payload_length` bytes.
    fn poll_send_ready(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
        payload_length: u32,
    ) -> Poll<Result<(), crate::Error>>;

    /// Fill the send buffer with a payload and seal it.
    ///
    /// `poll_send_ready` must have returned `Ready(Ok(()))` with a length
    /// of at least the amount written by `filler`.
    fn start_send<F>(self: Pin<&mut Self>, filler: F) -> Result<(), crate::Error>
    where
        F: FnOnce(&mut dyn BufMut);

    /// Flush the sealed packets to underlying I/O.
    fn poll_flush(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Result<(), crate::Error>>;
}
