//! Client side host-based authentication for SSH (RFC 4252, section 9).

mod consts;
mod error;
mod util;

pub mod identity;
pub mod keys;
pub mod local;
pub mod signature;
pub mod transport;
pub mod userauth;

pub use crate::{
    error::{Error, ErrorKind},
    userauth::{
        hostbased::{HostBased, HostBasedRequest, HostBasedState},
        AuthContext, AuthResult, Authenticator, UserAuth,
    },
};
