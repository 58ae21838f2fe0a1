//! Manages authentication process described in RFC4252.

// Refs:
// * https://tools.ietf.org/html/rfc4252

pub mod hostbased;

use crate::{
    consts,
    signature::SignatureFactories,
    transport::Transport,
    util::{get_ssh_string, payload_length, peek_u8, put_ssh_string},
};
use bytes::{Buf, BufMut};
use futures::{
    ready,
    task::{self, Poll},
};
use std::pin::Pin;

/// The session-level parameters shared by every authentication method.
#[derive(Clone, Debug)]
pub struct AuthContext {
    username: String,
    service: String,
    signature_factories: SignatureFactories,
}

impl AuthContext {
    /// Create a context requesting `ssh-connection` for `username`, with
    /// every builtin signature algorithm enabled.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            service: consts::SSH_SERVICE_CONNECTION.into(),
            signature_factories: SignatureFactories::builtin(),
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_signature_factories(mut self, factories: SignatureFactories) -> Self {
        self.signature_factories = factories;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The service requested after authentication.
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn signature_factories(&self) -> &SignatureFactories {
        &self.signature_factories
    }
}

/// A client authentication method.
pub trait UserAuth {
    /// The method name sent in `SSH_MSG_USERAUTH_REQUEST`.
    fn name(&self) -> &str;

    /// Prepare a new attempt.
    fn init(&mut self, ctx: &AuthContext) -> Result<(), crate::Error>;

    /// Send the next request of this method.
    ///
    /// Resolves to `false` once the method has nothing more to offer.
    fn poll_send_auth_data_request<T>(
        &mut self,
        cx: &mut task::Context<'_>,
        transport: Pin<&mut T>,
        ctx: &AuthContext,
    ) -> Poll<Result<bool, crate::Error>>
    where
        T: Transport;

    /// Handle a method specific message (60 to 79) received while waiting
    /// for the reply to a request.
    ///
    /// Resolves to `false` if the method gives up.
    fn process_auth_data_request(
        &mut self,
        ctx: &AuthContext,
        payload: &[u8],
    ) -> Result<bool, crate::Error>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum AuthResult {
    Success,
    Failure {
        continues: Vec<u8>,
        partial_success: bool,
    },
}

pub struct Authenticator {
    state: AuthState,
    recv_buf: Box<[u8]>,
    context: AuthContext,
    last_failure: Option<(Vec<u8>, bool)>,
}

#[derive(Debug)]
enum AuthState {
    Init,
    ServiceRequest,
    AuthRequests,
    SendRequest,
    AwaitReply,
    Authenticated,
}

impl Authenticator {
    pub fn new(context: AuthContext) -> Self {
        Self {
            state: AuthState::Init,
            recv_buf: vec![0u8; 0x10000].into_boxed_slice(),
            context,
            last_failure: None,
        }
    }

    pub fn context(&self) -> &AuthContext {
        &self.context
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated)
    }

    pub fn poll_service_request<T>(
        &mut self,
        cx: &mut task::Context<'_>,
        mut transport: Pin<&mut T>,
    ) -> Poll<Result<(), crate::Error>>
    where
        T: Transport,
    {
        loop {
            match self.state {
                AuthState::Init => {
                    let service = consts::SSH_SERVICE_USERAUTH.as_bytes();
                    let len = payload_length(1 + 4 + service.len())?;
                    ready!(transport.as_mut().poll_send_ready(cx, len))?;
                    transport.as_mut().start_send(|mut buf| {
                        buf.put_u8(consts::SSH_MSG_SERVICE_REQUEST);
                        put_ssh_string(&mut buf, service);
                    })?;

                    self.state = AuthState::ServiceRequest;
                }

                AuthState::ServiceRequest => {
                    ready!(transport.as_mut().poll_flush(cx))?;
                    let range = ready!(transport.as_mut().poll_recv(cx, &mut self.recv_buf[..]))?;
                    let mut payload = &self.recv_buf[range];

                    if peek_u8(&payload) != Some(consts::SSH_MSG_SERVICE_ACCEPT) {
                        return Poll::Ready(Err(crate::Error::userauth("incorrect reply")));
                    }
                    payload.advance(1);

                    let service_name = get_ssh_string(&mut payload)?;
                    if service_name != consts::SSH_SERVICE_USERAUTH.as_bytes() {
                        return Poll::Ready(Err(crate::Error::userauth("incorrect service name")));
                    }

                    self.state = AuthState::AuthRequests;
                    break;
                }

                _ => break,
            }
        }

        Poll::Ready(Ok(()))
    }

    /// Drive `method` until the server accepts one of its requests or the
    /// method runs out of requests.
    pub fn poll_authenticate<T, M>(
        &mut self,
        cx: &mut task::Context<'_>,
        mut transport: Pin<&mut T>,
        method: &mut M,
    ) -> Poll<Result<AuthResult, crate::Error>>
    where
        T: Transport,
        M: UserAuth,
    {
        let span = tracing::trace_span!("Authenticator::poll_authenticate", method = method.name());
        let _enter = span.enter();

        loop {
            match self.state {
                AuthState::Authenticated => return Poll::Ready(Ok(AuthResult::Success)),

                AuthState::Init | AuthState::ServiceRequest => {
                    ready!(self.poll_service_request(cx, transport.as_mut()))?;
                }

                AuthState::AuthRequests => {
                    method.init(&self.context)?;
                    self.last_failure = None;
                    self.state = AuthState::SendRequest;
                }

                AuthState::SendRequest => {
                    let sent = ready!(method.poll_send_auth_data_request(
                        cx,
                        transport.as_mut(),
                        &self.context
                    ))?;
                    if !sent {
                        tracing::debug!("{}: no more requests to send", method.name());
                        self.state = AuthState::AuthRequests;
                        let (continues, partial_success) =
                            self.last_failure.take().unwrap_or_default();
                        return Poll::Ready(Ok(AuthResult::Failure {
                            continues,
                            partial_success,
                        }));
                    }
                    tracing::trace!("<-- USERAUTH_REQUEST ({})", method.name());
                    self.state = AuthState::AwaitReply;
                }

                AuthState::AwaitReply => {
                    ready!(transport.as_mut().poll_flush(cx))?;
                    let range = ready!(transport.as_mut().poll_recv(cx, &mut self.recv_buf[..]))?;
                    let mut payload = &self.recv_buf[range];

                    let typ = peek_u8(&payload)
                        .ok_or_else(|| crate::Error::userauth("received empty packet"))?;
                    match typ {
                        consts::SSH_MSG_USERAUTH_SUCCESS => {
                            tracing::trace!("--> USERAUTH_SUCCESS");
                            self.state = AuthState::Authenticated;
                        }

                        consts::SSH_MSG_USERAUTH_FAILURE => {
                            tracing::trace!("--> USERAUTH_FAILURE");
                            payload.advance(1);

                            let continues = get_ssh_string(&mut payload)?;
                            if !payload.has_remaining() {
                                return Poll::Ready(Err(crate::Error::userauth(
                                    "missing partial success flag",
                                )));
                            }
                            let partial_success = payload.get_u8() != 0;

                            if !partial_success && name_list_contains(&continues, method.name()) {
                                tracing::debug!(
                                    "{} rejected, try the next request (continues = {})",
                                    method.name(),
                                    String::from_utf8_lossy(&continues)
                                );
                                self.last_failure = Some((continues, partial_success));
                                self.state = AuthState::SendRequest;
                                continue;
                            }

                            self.state = AuthState::AuthRequests;
                            return Poll::Ready(Ok(AuthResult::Failure {
                                continues,
                                partial_success,
                            }));
                        }

                        consts::SSH_MSG_USERAUTH_BANNER => {
                            tracing::trace!("--> USERAUTH_BANNER");
                            payload.advance(1);
                            let message = get_ssh_string(&mut payload)?;
                            tracing::debug!("banner: {}", String::from_utf8_lossy(&message));
                        }

                        typ if consts::is_method_specific(typ) => {
                            tracing::trace!("--> {}", consts::message_name(typ));
                            if !method.process_auth_data_request(&self.context, payload)? {
                                self.state = AuthState::AuthRequests;
                                let (continues, partial_success) =
                                    self.last_failure.take().unwrap_or_default();
                                return Poll::Ready(Ok(AuthResult::Failure {
                                    continues,
                                    partial_success,
                                }));
                            }
                        }

                        typ => {
                            tracing::error!("unsupported packet type: {}", typ);
                            return Poll::Ready(Err(crate::Error::userauth(
                                "unsupported packet type",
                            )));
                        }
                    }
                }
            }
        }
    }
}

/// Check whether a comma separated `name-list` holds `name`.
fn name_list_contains(list: &[u8], name: &str) -> bool {
    list.split(|&b| b == b',').any(|entry| entry == name.as_bytes())
}
