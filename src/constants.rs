use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Env values used for credential resolution.
//
// Credentials live under `AKAMAI_<KEY>` for the default section or
// `AKAMAI_<SECTION>_<KEY>` for a named section.
pub const ENV_PREFIX: &str = "AKAMAI_";
pub const ENV_HOST: &str = "HOST";
pub const ENV_ACCESS_TOKEN: &str = "ACCESS_TOKEN";
pub const ENV_CLIENT_TOKEN: &str = "CLIENT_TOKEN";
pub const ENV_CLIENT_SECRET: &str = "CLIENT_SECRET";

// Env values describing the surrounding CLI process, appended to User-Agent.
pub const AKAMAI_CLI: &str = "AKAMAI_CLI";
pub const AKAMAI_CLI_VERSION: &str = "AKAMAI_CLI_VERSION";
pub const AKAMAI_CLI_COMMAND: &str = "AKAMAI_CLI_COMMAND";
pub const AKAMAI_CLI_COMMAND_VERSION: &str = "AKAMAI_CLI_COMMAND_VERSION";

/// AsciiSet matching JavaScript's `encodeURIComponent`.
///
/// Escapes every byte except 'A'-'Z', 'a'-'z', '0'-'9' and `- _ . ! ~ * ' ( )`.
/// Structured body values are escaped with this set so the content hash
/// matches what the counterpart service computes.
pub static URI_COMPONENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');
