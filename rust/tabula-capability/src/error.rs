/// Errors raised while reading capability vocabulary from configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityParseError {
    /// The string does not name a known capability.
    #[error("Unknown capability '{0}', expected one of READ, WRITE, READ_WRITE")]
    UnknownCapability(String),

    /// An action name was empty or lacked a `service:` prefix.
    #[error("Malformed action '{0}': expected '<service>:<operation>'")]
    MalformedAction(String),
}
