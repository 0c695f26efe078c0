//! The abstract transport collaborator, per spec.md §1/§6: `CoordinatorCore`
//! talks to a parent broker (and, in a networked deployment, to peer cores)
//! over *something* that can carry bytes; this workspace never needs to
//! name a protocol, since wire serialization and concrete transports
//! (ZMQ/UDP/IPC/TCP) beyond what the in-process test harness requires are
//! out of scope (§1 Non-goals). Grounded on `boomerang_federated::rti`'s
//! `Framed<T, BinCodec<_>>` over `T: AsyncRead + AsyncWrite`.

use std::time::Duration;

use helics_core::{Error, Result};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Anything a `CoordinatorCore` can carry `BrokerMessage`s over.
///
/// Blanket-implemented for any `AsyncRead + AsyncWrite + Unpin + Send`
/// type, matching the generic bound `boomerang_federated` places on its own
/// `Framed<T, _>` wire connections. Nothing in this workspace frames bytes
/// over it; it exists as the seam a concrete transport plugs into.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}

/// Attempt a bare TCP connection to a broker address within `timeout`,
/// surfacing failure as `RegistrationFailure` — the minimal concrete
/// transport behavior spec.md's S6 ("bad broker") scenario exercises: a
/// federate constructed against an unreachable broker address fails
/// registration quickly rather than hanging.
pub async fn connect_broker(address: &str, timeout: Duration) -> Result<TcpStream> {
    match tokio::time::timeout(timeout, TcpStream::connect(address)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(err)) => Err(Error::RegistrationFailure(format!(
            "failed to connect to broker at {address}: {err}"
        ))),
        Err(_) => Err(Error::RegistrationFailure(format!(
            "timed out connecting to broker at {address} after {timeout:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bad_broker_address_is_registration_failure() {
        let result = connect_broker("127.0.0.1:1", Duration::from_millis(200)).await;
        assert!(matches!(result, Err(Error::RegistrationFailure(_))));
    }
}
