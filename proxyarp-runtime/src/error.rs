use thiserror::Error;

/// Errors surfaced by the proxy and its runner.
///
/// The first four are contract violations by the caller and only abort the call that hit them.
#[derive(Debug, Error)]
pub enum ProxyArpError {
    #[error("Ethernet frame does not contain ARP request.")]
    NotArp,

    #[error("ARP is not a request.")]
    NotArpRequest,

    #[error("ARP is not a reply.")]
    NotArpReply,

    #[error("malformed ARP frame: {0}")]
    MalformedArp(&'static str),

    #[error("failed to start the runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ProxyArpError>;
