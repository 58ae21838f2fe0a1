//! Host-based client authentication.

// Refs:
// * https://tools.ietf.org/html/rfc4252#section-9

use super::{AuthContext, UserAuth};
use crate::{
    consts,
    identity::{Certificate, HostKeyIdentityProvider, IdentitySequence},
    keys::HostKeyPair,
    local,
    signature::{resolve_signature_factories, SignatureFactories},
    transport::Transport,
    util::{payload_length, peek_u8, put_ssh_string},
};
use bytes::BufMut;
use futures::{
    ready,
    task::{self, Poll},
};
use std::{fmt, pin::Pin, sync::Arc};

/// The progress of the host-based method within one attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostBasedState {
    /// Ready to build the request for the next identity.
    Idle,
    /// A request was handed to the transport.
    RequestSent,
    /// No identity is left until the next `init`.
    Exhausted,
}

/// The `hostbased` authentication method.
pub struct HostBased {
    provider: Option<Arc<dyn HostKeyIdentityProvider>>,
    identities: IdentitySequence,
    signature_factories: Option<SignatureFactories>,
    client_username: Option<String>,
    client_hostname: Option<String>,
    state: HostBasedState,
    pending: Option<(u32, Vec<u8>)>,
}

impl HostBased {
    pub const NAME: &'static str = "hostbased";

    /// Create the method with the host identities to offer.
    ///
    /// `None` is accepted; the method then has nothing to send.
    pub fn new(provider: Option<Arc<dyn HostKeyIdentityProvider>>) -> Self {
        Self {
            provider,
            identities: IdentitySequence::empty(),
            signature_factories: None,
            client_username: None,
            client_hostname: None,
            state: HostBasedState::Idle,
            pending: None,
        }
    }

    pub fn client_username(&self) -> Option<&str> {
        self.client_username.as_deref()
    }

    pub fn set_client_username(&mut self, username: impl Into<String>) {
        self.client_username = Some(username.into());
    }

    pub fn client_hostname(&self) -> Option<&str> {
        self.client_hostname.as_deref()
    }

    pub fn set_client_hostname(&mut self, hostname: impl Into<String>) {
        self.client_hostname = Some(hostname.into());
    }

    /// The signature algorithms of this method, overriding those of the session.
    pub fn signature_factories(&self) -> Option<&SignatureFactories> {
        self.signature_factories.as_ref()
    }

    pub fn set_signature_factories(&mut self, factories: Option<SignatureFactories>) {
        self.signature_factories = factories;
    }

    pub fn state(&self) -> HostBasedState {
        self.state
    }

    pub fn resolve_client_username(&self) -> String {
        local::resolve_client_username(self.client_username())
    }

    pub fn resolve_client_hostname(&self) -> String {
        local::resolve_client_hostname(self.client_hostname())
    }

    /// Build and sign the request for the next identity.
    ///
    /// Returns `Ok(None)` once every identity has been consumed. An error
    /// consumes the identity it was raised for.
    pub fn next_request(
        &mut self,
        session_id: &[u8],
        ctx: &AuthContext,
    ) -> Result<Option<HostBasedRequest>, crate::Error> {
        let span = tracing::trace_span!("HostBased::next_request");
        let _enter = span.enter();

        if self.state == HostBasedState::Exhausted {
            return Ok(None);
        }
        self.state = HostBasedState::Idle;

        let identity = match self.identities.next() {
            Some(identity) => identity?,
            None => {
                tracing::debug!("no more keys to send (service = {})", ctx.service());
                self.state = HostBasedState::Exhausted;
                return Ok(None);
            }
        };

        let key = identity.key_pair();
        let key_type = key.key_type();
        tracing::trace!("current key: type={}", key_type);

        let factories =
            resolve_signature_factories(self.signature_factories.as_ref(), ctx.signature_factories());
        let signer = factories.resolve(key_type)?;

        let client_username = self.resolve_client_username();
        let client_hostname = self.resolve_client_hostname();
        tracing::debug!("client={}@{}", client_username, client_hostname);

        let key_blob = encode_key_blob(key, identity.certificates())?;
        tracing::trace!("key blob: {} bytes", key_blob.len());

        let fields = RequestFields {
            username: ctx.username(),
            service: ctx.service(),
            algorithm: signer.algorithm(),
            key_blob: &key_blob[..],
            client_hostname: &client_hostname,
            client_username: &client_username,
        };

        let signed_data = fields.signed_data(session_id);
        let signature = signer.sign(key, &signed_data[..])?;
        tracing::trace!(
            "signed {} bytes with {}: signature {} bytes",
            signed_data.len(),
            signer.algorithm(),
            signature.len()
        );

        let payload = fields.payload(&signature[..]);
        let algorithm = signer.algorithm().to_owned();

        Ok(Some(HostBasedRequest {
            algorithm,
            key_blob,
            signed_data,
            signature,
            payload,
        }))
    }
}

impl Default for HostBased {
    fn default() -> Self {
        Self::new(None)
    }
}

impl UserAuth for HostBased {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn init(&mut self, ctx: &AuthContext) -> Result<(), crate::Error> {
        tracing::trace!("init hostbased (service = {})", ctx.service());
        self.identities = IdentitySequence::reset(self.provider.as_deref());
        self.state = HostBasedState::Idle;
        self.pending = None;
        Ok(())
    }

    fn poll_send_auth_data_request<T>(
        &mut self,
        cx: &mut task::Context<'_>,
        mut transport: Pin<&mut T>,
        ctx: &AuthContext,
    ) -> Poll<Result<bool, crate::Error>>
    where
        T: Transport,
    {
        let span = tracing::trace_span!("HostBased::poll_send_auth_data_request");
        let _enter = span.enter();

        loop {
            if let Some((len, _)) = self.pending {
                ready!(transport.as_mut().poll_send_ready(cx, len))?;

                if let Some((_, payload)) = self.pending.take() {
                    transport
                        .as_mut()
                        .start_send(|buf| buf.put_slice(&payload[..]))?;
                }
                self.state = HostBasedState::RequestSent;
                return Poll::Ready(Ok(true));
            }

            match self.next_request(transport.session_id(), ctx)? {
                Some(request) => {
                    let len = payload_length(request.payload().len())?;
                    self.pending = Some((len, request.into_payload()));
                }
                None => return Poll::Ready(Ok(false)),
            }
        }
    }

    fn process_auth_data_request(
        &mut self,
        ctx: &AuthContext,
        payload: &[u8],
    ) -> Result<bool, crate::Error> {
        let typ = peek_u8(&payload)
            .ok_or_else(|| crate::Error::userauth("received empty packet"))?;
        tracing::error!(
            "process_auth_data_request({}) received unknown packet: {}",
            ctx.service(),
            consts::message_name(typ)
        );
        Err(crate::Error::protocol(
            typ,
            format!("process_auth_data_request({})[{}]", Self::NAME, ctx.service()),
        ))
    }
}

impl fmt::Debug for HostBased {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostBased")
            .field("has_provider", &self.provider.is_some())
            .field("signature_factories", &self.signature_factories)
            .field("client_username", &self.client_username)
            .field("client_hostname", &self.client_hostname)
            .field("state", &self.state)
            .finish()
    }
}

/// A signed host-based request.
#[derive(Debug)]
pub struct HostBasedRequest {
    algorithm: String,
    key_blob: Vec<u8>,
    signed_data: Vec<u8>,
    signature: Vec<u8>,
    payload: Vec<u8>,
}

impl HostBasedRequest {
    /// The signature algorithm named in the request.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn key_blob(&self) -> &[u8] {
        &self.key_blob[..]
    }

    /// The exact bytes the signature was computed over.
    pub fn signed_data(&self) -> &[u8] {
        &self.signed_data[..]
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature[..]
    }

    /// The `SSH_MSG_USERAUTH_REQUEST` payload handed to the transport.
    pub fn payload(&self) -> &[u8] {
        &self.payload[..]
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

/// Encode the public key followed by the DER encoding of each certificate,
/// in the order given.
pub fn encode_key_blob(
    key: &HostKeyPair,
    certificates: &[Certificate],
) -> Result<Vec<u8>, crate::Error> {
    let mut blob = key.public_key_blob();
    for certificate in certificates {
        blob.put_slice(certificate.to_der()?);
    }
    Ok(blob)
}

/// The fields shared by the signed data and the transmitted payload.
struct RequestFields<'a> {
    username: &'a str,
    service: &'a str,
    algorithm: &'a str,
    key_blob: &'a [u8],
    client_hostname: &'a str,
    client_username: &'a str,
}

impl RequestFields<'_> {
    fn encoded_len(&self) -> usize {
        1 + 4 * 7
            + self.username.len()
            + self.service.len()
            + HostBased::NAME.len()
            + self.algorithm.len()
            + self.key_blob.len()
            + self.client_hostname.len()
            + self.client_username.len()
    }

    fn put_fields<B: BufMut>(&self, mut buf: B) {
        buf.put_u8(consts::SSH_MSG_USERAUTH_REQUEST);
        put_ssh_string(&mut buf, self.username.as_bytes());
        put_ssh_string(&mut buf, self.service.as_bytes());
        put_ssh_string(&mut buf, HostBased::NAME.as_bytes());
        put_ssh_string(&mut buf, self.algorithm.as_bytes());
        put_ssh_string(&mut buf, self.key_blob);
        put_ssh_string(&mut buf, self.client_hostname.as_bytes());
        put_ssh_string(&mut buf, self.client_username.as_bytes());
    }

    /// string session identifier, then the request without its signature.
    fn signed_data(&self, session_id: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + session_id.len() + self.encoded_len());
        put_ssh_string(&mut buf, session_id);
        self.put_fields(&mut buf);
        buf
    }

    fn payload(&self, signature: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len() + 4 + signature.len());
        self.put_fields(&mut buf);
        put_ssh_string(&mut buf, signature);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        identity::{tests::HOST_A_CERT, tests::INTERMEDIATE_CERT, HostIdentity},
        keys::{tests as keys, EcdsaCurve},
        signature::{tests as signatures, BuiltinSignature},
        transport::mock::MockTransport,
        util::get_ssh_string,
        ErrorKind,
    };
    use futures::task::noop_waker_ref;

    const SESSION_ID: &[u8] = &[0x5a; 32];

    #[derive(Debug)]
    struct ParsedRequest {
        username: Vec<u8>,
        service: Vec<u8>,
        method: Vec<u8>,
        algorithm: Vec<u8>,
        key_blob: Vec<u8>,
        client_hostname: Vec<u8>,
        client_username: Vec<u8>,
        signature: Vec<u8>,
    }

    fn parse_request(payload: &[u8]) -> ParsedRequest {
        let (&typ, mut data) = payload.split_first().unwrap();
        assert_eq!(typ, consts::SSH_MSG_USERAUTH_REQUEST);
        let parsed = ParsedRequest {
            username: get_ssh_string(&mut data).unwrap(),
            service: get_ssh_string(&mut data).unwrap(),
            method: get_ssh_string(&mut data).unwrap(),
            algorithm: get_ssh_string(&mut data).unwrap(),
            key_blob: get_ssh_string(&mut data).unwrap(),
            client_hostname: get_ssh_string(&mut data).unwrap(),
            client_username: get_ssh_string(&mut data).unwrap(),
            signature: get_ssh_string(&mut data).unwrap(),
        };
        assert!(data.is_empty(), "trailing bytes after signature");
        parsed
    }

    fn method(identities: Vec<HostIdentity>) -> HostBased {
        let mut method = HostBased::new(Some(Arc::new(identities)));
        method.set_client_username("builder");
        method.set_client_hostname("client.example.org");
        method
    }

    fn context() -> AuthContext {
        AuthContext::new("alice")
    }

    fn poll_send(
        method: &mut HostBased,
        transport: &mut MockTransport,
        ctx: &AuthContext,
    ) -> Poll<Result<bool, crate::Error>> {
        let mut cx = task::Context::from_waker(noop_waker_ref());
        method.poll_send_auth_data_request(&mut cx, Pin::new(transport), ctx)
    }

    #[track_caller]
    fn send(method: &mut HostBased, transport: &mut MockTransport, ctx: &AuthContext) -> bool {
        match poll_send(method, transport, ctx) {
            Poll::Ready(Ok(sent)) => sent,
            Poll::Ready(Err(err)) => panic!("send failed: {}", err),
            Poll::Pending => panic!("send is pending"),
        }
    }

    #[test]
    fn key_blob_without_certificates_is_the_public_key() {
        let key = keys::ed25519();
        let blob = encode_key_blob(&key, &[]).unwrap();
        assert_eq!(blob, key.public_key_blob());
    }

    #[test]
    fn key_blob_appends_certificates_in_given_order() {
        let key = keys::ecdsa(EcdsaCurve::NistP256);
        let host_a = Certificate::from_der(HOST_A_CERT);
        let intermediate = Certificate::from_der(INTERMEDIATE_CERT);

        let mut expected = key.public_key_blob();
        expected.extend_from_slice(HOST_A_CERT);
        expected.extend_from_slice(INTERMEDIATE_CERT);
        let blob = encode_key_blob(&key, &[host_a.clone(), intermediate.clone()]).unwrap();
        assert_eq!(blob, expected);

        let mut expected = key.public_key_blob();
        expected.extend_from_slice(INTERMEDIATE_CERT);
        expected.extend_from_slice(HOST_A_CERT);
        let blob = encode_key_blob(&key, &[intermediate, host_a]).unwrap();
        assert_eq!(blob, expected);
    }

    #[test]
    fn signed_data_layout() {
        let key = Arc::new(keys::ed25519());
        let mut method = method(vec![HostIdentity::new(key.clone())]);
        let ctx = context();
        method.init(&ctx).unwrap();

        let request = method.next_request(SESSION_ID, &ctx).unwrap().unwrap();
        assert_eq!(request.algorithm(), "ssh-ed25519");
        assert_eq!(request.key_blob(), &key.public_key_blob()[..]);

        let mut expected: Vec<u8> = vec![];
        put_ssh_string(&mut expected, SESSION_ID);
        expected.put_u8(50);
        put_ssh_string(&mut expected, b"alice");
        put_ssh_string(&mut expected, b"ssh-connection");
        put_ssh_string(&mut expected, b"hostbased");
        put_ssh_string(&mut expected, b"ssh-ed25519");
        put_ssh_string(&mut expected, &key.public_key_blob()[..]);
        put_ssh_string(&mut expected, b"client.example.org");
        put_ssh_string(&mut expected, b"builder");
        assert_eq!(request.signed_data(), &expected[..]);

        signatures::verify(&key, request.signed_data(), request.signature());
    }

    #[test]
    fn payload_repeats_signed_fields() {
        let mut method = method(vec![
            HostIdentity::new(keys::ecdsa(EcdsaCurve::NistP384))
                .with_certificates(vec![Certificate::from_der(HOST_A_CERT)]),
        ]);
        let ctx = context();
        method.init(&ctx).unwrap();

        let request = method.next_request(SESSION_ID, &ctx).unwrap().unwrap();
        let signed = &request.signed_data()[4 + SESSION_ID.len()..];
        let payload = request.payload();

        let (fields, signature) = payload.split_at(signed.len());
        assert_eq!(fields, signed);
        let mut signature_string: Vec<u8> = vec![];
        put_ssh_string(&mut signature_string, request.signature());
        assert_eq!(signature, &signature_string[..]);

        let parsed = parse_request(payload);
        assert_eq!(parsed.username, b"alice");
        assert_eq!(parsed.service, b"ssh-connection");
        assert_eq!(parsed.method, b"hostbased");
        assert_eq!(parsed.algorithm, b"ecdsa-sha2-nistp384");
        assert_eq!(parsed.key_blob, request.key_blob());
        assert!(parsed.key_blob.ends_with(HOST_A_CERT));
        assert_eq!(parsed.client_hostname, b"client.example.org");
        assert_eq!(parsed.client_username, b"builder");
        assert_eq!(parsed.signature, request.signature());
    }

    #[test]
    fn sends_each_identity_once_then_exhausts() {
        let rsa = Arc::new(keys::rsa());
        let ecdsa = Arc::new(keys::ecdsa(EcdsaCurve::NistP256));
        let mut method = method(vec![
            HostIdentity::new(rsa.clone()),
            HostIdentity::new(ecdsa.clone())
                .with_certificates(vec![Certificate::from_der(HOST_A_CERT)]),
        ]);
        let ctx = context();
        let mut transport = MockTransport::new(SESSION_ID);
        method.init(&ctx).unwrap();

        assert!(send(&mut method, &mut transport, &ctx));
        assert_eq!(method.state(), HostBasedState::RequestSent);
        assert!(send(&mut method, &mut transport, &ctx));
        assert!(!send(&mut method, &mut transport, &ctx));
        assert_eq!(method.state(), HostBasedState::Exhausted);
        assert!(!send(&mut method, &mut transport, &ctx));
        assert_eq!(transport.sent.len(), 2);

        let first = parse_request(&transport.sent[0]);
        assert_eq!(first.algorithm, b"ssh-rsa");
        assert_eq!(first.key_blob, rsa.public_key_blob());

        let second = parse_request(&transport.sent[1]);
        assert_eq!(second.algorithm, b"ecdsa-sha2-nistp256");
        let mut key_blob = ecdsa.public_key_blob();
        key_blob.extend_from_slice(HOST_A_CERT);
        assert_eq!(second.key_blob, key_blob);

        for (payload, key) in transport.sent.iter().zip(&[rsa, ecdsa]) {
            let parsed = parse_request(payload);
            let mut signed: Vec<u8> = vec![];
            put_ssh_string(&mut signed, SESSION_ID);
            signed.extend_from_slice(&payload[..payload.len() - 4 - parsed.signature.len()]);
            signatures::verify(key, &signed[..], &parsed.signature[..]);
        }

        assert_eq!(
            transport.ready_lengths,
            transport
                .sent
                .iter()
                .map(|payload| payload.len() as u32)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn rsa_identity_sends_ssh_rsa_by_default() {
        let key = Arc::new(keys::rsa());
        let mut method = method(vec![HostIdentity::new(key.clone())]);
        let ctx = context();
        method.init(&ctx).unwrap();

        let request = method.next_request(SESSION_ID, &ctx).unwrap().unwrap();
        assert_eq!(request.algorithm(), "ssh-rsa");

        let parsed = parse_request(request.payload());
        assert_eq!(parsed.algorithm, b"ssh-rsa");
        let mut key_type = &parsed.key_blob[..];
        assert_eq!(get_ssh_string(&mut key_type).unwrap(), b"ssh-rsa");

        let (algorithm, _) = signatures::split_signature(request.signature());
        assert_eq!(algorithm, "ssh-rsa");
        signatures::verify(&key, request.signed_data(), request.signature());
    }

    #[test]
    fn rsa_sha2_preference_is_opt_in() {
        let key = Arc::new(keys::rsa());
        let mut method = method(vec![HostIdentity::new(key.clone())]);
        method.set_signature_factories(Some(
            SignatureFactories::new().with(BuiltinSignature::RsaSha2_256),
        ));
        let ctx = context();
        method.init(&ctx).unwrap();

        let request = method.next_request(SESSION_ID, &ctx).unwrap().unwrap();
        assert_eq!(request.algorithm(), "rsa-sha2-256");
        assert_eq!(parse_request(request.payload()).algorithm, b"rsa-sha2-256");
        signatures::verify(&key, request.signed_data(), request.signature());
    }

    #[test]
    fn empty_method_preference_uses_session_algorithms() {
        let mut method = method(vec![HostIdentity::new(keys::ed25519())]);
        method.set_signature_factories(Some(SignatureFactories::new()));
        let ctx = context();
        method.init(&ctx).unwrap();

        let request = method.next_request(SESSION_ID, &ctx).unwrap().unwrap();
        assert_eq!(request.algorithm(), "ssh-ed25519");
    }

    #[test]
    fn empty_provider_sends_nothing() {
        let ctx = context();
        for mut method in vec![HostBased::new(None), method(vec![])] {
            let mut transport = MockTransport::new(SESSION_ID);
            method.init(&ctx).unwrap();

            assert!(!send(&mut method, &mut transport, &ctx));
            assert_eq!(method.state(), HostBasedState::Exhausted);
            assert!(!send(&mut method, &mut transport, &ctx));
            assert!(transport.sent.is_empty());
            assert!(transport.ready_lengths.is_empty());
        }
    }

    #[test]
    fn uninitialized_method_has_nothing_to_send() {
        let mut method = method(vec![HostIdentity::new(keys::ed25519())]);
        let mut transport = MockTransport::new(SESSION_ID);
        assert!(!send(&mut method, &mut transport, &context()));
    }

    #[test]
    fn init_restarts_the_sequence() {
        let mut method = method(vec![HostIdentity::new(keys::ed25519())]);
        let ctx = context();
        let mut transport = MockTransport::new(SESSION_ID);

        method.init(&ctx).unwrap();
        assert!(send(&mut method, &mut transport, &ctx));
        assert!(!send(&mut method, &mut transport, &ctx));

        method.init(&ctx).unwrap();
        assert_eq!(method.state(), HostBasedState::Idle);
        assert!(send(&mut method, &mut transport, &ctx));
        assert!(!send(&mut method, &mut transport, &ctx));
        assert_eq!(transport.sent.len(), 2);
    }

    #[test]
    fn no_matching_algorithm_before_building() {
        let mut method = method(vec![
            HostIdentity::new(keys::ecdsa(EcdsaCurve::NistP256)),
            HostIdentity::new(keys::ed25519()),
        ]);
        method.set_signature_factories(Some(
            SignatureFactories::new().with(BuiltinSignature::Ed25519),
        ));
        let ctx = context();
        let mut transport = MockTransport::new(SESSION_ID);
        method.init(&ctx).unwrap();

        match poll_send(&mut method, &mut transport, &ctx) {
            Poll::Ready(Err(err)) => assert_eq!(err.kind(), ErrorKind::NoMatchingAlgorithm),
            _ => panic!("expected an algorithm resolution failure"),
        }
        assert!(transport.ready_lengths.is_empty());
        assert!(transport.sent.is_empty());

        // the failed identity is consumed, the next one is still offered
        assert!(send(&mut method, &mut transport, &ctx));
        assert_eq!(parse_request(&transport.sent[0]).algorithm, b"ssh-ed25519");
    }

    #[test]
    fn session_without_algorithms_fails() {
        let mut method = method(vec![HostIdentity::new(keys::ed25519())]);
        let ctx = context().with_signature_factories(SignatureFactories::new());
        method.init(&ctx).unwrap();

        let err = method.next_request(SESSION_ID, &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoMatchingAlgorithm);
    }

    #[test]
    fn malformed_certificate_fails_the_identity() {
        let mut method = method(vec![
            HostIdentity::new(keys::ed25519())
                .with_certificates(vec![Certificate::from_der(&b"\x30\x05abc"[..])]),
            HostIdentity::new(keys::ed25519()),
        ]);
        let ctx = context();
        method.init(&ctx).unwrap();

        let err = method.next_request(SESSION_ID, &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Certificate);
        assert!(method.next_request(SESSION_ID, &ctx).unwrap().is_some());
        assert!(method.next_request(SESSION_ID, &ctx).unwrap().is_none());
    }

    #[test]
    fn pending_transport_keeps_the_request() {
        let mut method = method(vec![HostIdentity::new(keys::ed25519())]);
        let ctx = context();
        let mut transport = MockTransport::new(SESSION_ID);
        transport.pending_once = true;
        method.init(&ctx).unwrap();

        assert!(poll_send(&mut method, &mut transport, &ctx).is_pending());
        assert!(transport.sent.is_empty());
        assert_eq!(method.state(), HostBasedState::Idle);

        assert!(send(&mut method, &mut transport, &ctx));
        assert_eq!(transport.sent.len(), 1);
        assert!(!send(&mut method, &mut transport, &ctx));
    }

    #[test]
    fn client_identity_defaults() {
        let mut method = HostBased::new(None);
        assert_eq!(method.client_username(), None);
        assert_eq!(method.resolve_client_username(), whoami::username());

        method.set_client_username("");
        assert_eq!(method.resolve_client_username(), whoami::username());

        method.set_client_username("builder");
        method.set_client_hostname("client.example.org");
        assert_eq!(method.resolve_client_username(), "builder");
        assert_eq!(method.resolve_client_hostname(), "client.example.org");
    }

    #[test]
    fn continuation_messages_are_rejected() {
        let mut method = method(vec![HostIdentity::new(keys::ed25519())]);
        let ctx = context();
        method.init(&ctx).unwrap();

        for payload in &[
            &[consts::SSH_MSG_USERAUTH_INFO_REQUEST][..],
            &[consts::SSH_MSG_USERAUTH_INFO_RESPONSE, 0, 0, 0, 0][..],
            &[79][..],
            &[consts::SSH_MSG_USERAUTH_SUCCESS][..],
        ] {
            let err = method.process_auth_data_request(&ctx, payload).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Protocol);
            assert_eq!(err.message_number(), Some(payload[0]));
            assert!(err.to_string().contains(consts::message_name(payload[0])));
        }

        let err = method.process_auth_data_request(&ctx, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Userauth);
    }
}
