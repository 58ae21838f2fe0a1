// defined in https://tools.ietf.org/html/rfc4253#section-12
pub(crate) const SSH_MSG_DISCONNECT: u8 = 1;
pub(crate) const SSH_MSG_IGNORE: u8 = 2;
pub(crate) const SSH_MSG_UNIMPLEMENTED: u8 = 3;
pub(crate) const SSH_MSG_DEBUG: u8 = 4;
pub(crate) const SSH_MSG_SERVICE_REQUEST: u8 = 5;
pub(crate) const SSH_MSG_SERVICE_ACCEPT: u8 = 6;
pub(crate) const SSH_MSG_KEXINIT: u8 = 20;
pub(crate) const SSH_MSG_NEWKEYS: u8 = 21;

// defined in https://tools.ietf.org/html/rfc4252#section-6
pub(crate) const SSH_MSG_USERAUTH_REQUEST: u8 = 50;
pub(crate) const SSH_MSG_USERAUTH_FAILURE: u8 = 51;
pub(crate) const SSH_MSG_USERAUTH_SUCCESS: u8 = 52;
pub(crate) const SSH_MSG_USERAUTH_BANNER: u8 = 53;

// method specific messages share 60..=79, see https://tools.ietf.org/html/rfc4250#section-4.1.2
pub(crate) const SSH_MSG_USERAUTH_INFO_REQUEST: u8 = 60;
pub(crate) const SSH_MSG_USERAUTH_INFO_RESPONSE: u8 = 61;
pub(crate) const SSH_MSG_USERAUTH_METHOD_SPECIFIC_FIRST: u8 = 60;
pub(crate) const SSH_MSG_USERAUTH_METHOD_SPECIFIC_LAST: u8 = 79;

// defined in https://tools.ietf.org/html/rfc4254#section-9
pub(crate) const SSH_MSG_GLOBAL_REQUEST: u8 = 80;

pub(crate) const SSH_SERVICE_USERAUTH: &str = "ssh-userauth";
pub(crate) const SSH_SERVICE_CONNECTION: &str = "ssh-connection";

/// Returns a printable name of the message number, used in error reports.
pub(crate) fn message_name(typ: u8) -> &'static str {
    match typ {
        SSH_MSG_DISCONNECT => "SSH_MSG_DISCONNECT",
        SSH_MSG_IGNORE => "SSH_MSG_IGNORE",
        SSH_MSG_UNIMPLEMENTED => "SSH_MSG_UNIMPLEMENTED",
        SSH_MSG_DEBUG => "SSH_MSG_DEBUG",
        SSH_MSG_SERVICE_REQUEST => "SSH_MSG_SERVICE_REQUEST",
        SSH_MSG_SERVICE_ACCEPT => "SSH_MSG_SERVICE_ACCEPT",
        SSH_MSG_KEXINIT => "SSH_MSG_KEXINIT",
        SSH_MSG_NEWKEYS => "SSH_MSG_NEWKEYS",
        SSH_MSG_USERAUTH_REQUEST => "SSH_MSG_USERAUTH_REQUEST",
        SSH_MSG_USERAUTH_FAILURE => "SSH_MSG_USERAUTH_FAILURE",
        SSH_MSG_USERAUTH_SUCCESS => "SSH_MSG_USERAUTH_SUCCESS",
        SSH_MSG_USERAUTH_BANNER => "SSH_MSG_USERAUTH_BANNER",
        // also SSH_MSG_USERAUTH_PK_OK and SSH_MSG_USERAUTH_PASSWD_CHANGEREQ
        SSH_MSG_USERAUTH_INFO_REQUEST => "SSH_MSG_USERAUTH_INFO_REQUEST",
        SSH_MSG_USERAUTH_INFO_RESPONSE => "SSH_MSG_USERAUTH_INFO_RESPONSE",
        SSH_MSG_GLOBAL_REQUEST => "SSH_MSG_GLOBAL_REQUEST",
        _ => "SSH_MSG_UNKNOWN",
    }
}

pub(crate) fn is_method_specific(typ: u8) -> bool {
    (SSH_MSG_USERAUTH_METHOD_SPECIFIC_FIRST..=SSH_MSG_USERAUTH_METHOD_SPECIFIC_LAST).contains(&typ)
}
