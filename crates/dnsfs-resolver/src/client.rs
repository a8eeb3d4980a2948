//! One-shot DNS-over-TCP exchanges against a fixed resolver endpoint.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use dnsfs_types::RecordType;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::ResolveError;
use crate::wire::{self, AnswerSet};

/// A DNS client speaking the connection-oriented transport of RFC 1035
/// §4.2.2: each message is prefixed with a two-byte big-endian length.
///
/// Every query opens a fresh connection, sends exactly one question and
/// reads exactly one response. There is no retry and no second server; an
/// optional `timeout` bounds the whole exchange.
#[derive(Debug, Clone)]
pub struct DnsTcpClient {
    server: SocketAddr,
    timeout: Option<Duration>,
}

impl DnsTcpClient {
    pub fn new(server: SocketAddr) -> Self {
        Self {
            server,
            timeout: None,
        }
    }

    /// Bound each exchange by `timeout`. A `None` restores the unbounded
    /// default, where a stalled resolver stalls the calling operation.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    /// Send one query for `name` and return the raw wire-format response.
    pub async fn raw_query(&self, name: &str, rtype: RecordType) -> Result<Bytes, ResolveError> {
        let query = wire::build_query(name, rtype)?;
        debug!(name, %rtype, server = %self.server, "dns query");

        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(&query))
                .await
                .map_err(|_| ResolveError::Timeout)??,
            None => self.exchange(&query).await?,
        };

        debug!(name, %rtype, bytes = response.len(), "dns response");
        Ok(response)
    }

    /// Send one query and decode the answer section of the queried type.
    pub async fn resolve(&self, name: &str, rtype: RecordType) -> Result<AnswerSet, ResolveError> {
        let response = self.raw_query(name, rtype).await?;
        wire::decode_answers(&response, rtype)
    }

    async fn exchange(&self, query: &[u8]) -> Result<Bytes, ResolveError> {
        let len = u16::try_from(query.len()).map_err(|_| ResolveError::QueryTooLarge(query.len()))?;

        let mut stream = TcpStream::connect(self.server).await?;

        let mut framed = Vec::with_capacity(query.len() + 2);
        framed.extend_from_slice(&len.to_be_bytes());
        framed.extend_from_slice(query);
        stream.write_all(&framed).await?;
        stream.flush().await?;

        let mut len_buf = [0u8; 2];
        read_exact_framed(&mut stream, &mut len_buf).await?;
        let body_len = u16::from_be_bytes(len_buf) as usize;

        let mut body = vec![0u8; body_len];
        read_exact_framed(&mut stream, &mut body).await?;
        Ok(Bytes::from(body))
    }
}

async fn read_exact_framed(stream: &mut TcpStream, buf: &mut [u8]) -> Result<(), ResolveError> {
    stream.read_exact(buf).await.map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            ResolveError::TruncatedResponse
        } else {
            ResolveError::Io(e)
        }
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::op::{Message, MessageType};
    use hickory_proto::rr::{rdata, Name, RData, Record};
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    /// Serve one framed exchange: read a query, answer it with `make_reply`.
    async fn serve_one<F>(listener: TcpListener, make_reply: F)
    where
        F: FnOnce(Message) -> Message + Send + 'static,
    {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut len_buf = [0u8; 2];
        socket.read_exact(&mut len_buf).await.unwrap();
        let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
        socket.read_exact(&mut query).await.unwrap();

        let reply = make_reply(Message::from_vec(&query).unwrap());
        let body = reply.to_vec().unwrap();
        let mut framed = (body.len() as u16).to_be_bytes().to_vec();
        framed.extend_from_slice(&body);
        socket.write_all(&framed).await.unwrap();
    }

    fn answered(query: Message, addr: Ipv4Addr, ttl: u32) -> Message {
        let mut reply = Message::new();
        reply.set_id(query.id());
        reply.set_message_type(MessageType::Response);
        for q in query.queries() {
            reply.add_query(q.clone());
        }
        reply.add_answer(Record::from_rdata(
            Name::from_ascii("example.com.").unwrap(),
            ttl,
            RData::A(rdata::A(addr)),
        ));
        reply
    }

    #[tokio::test]
    async fn test_raw_query_roundtrip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_one(listener, |q| {
            answered(q, Ipv4Addr::new(93, 184, 216, 34), 300)
        }));

        let client = DnsTcpClient::new(addr);
        let bytes = client.raw_query("example.com.", RecordType::A).await.unwrap();

        let message = Message::from_vec(&bytes).unwrap();
        assert_eq!(message.message_type(), MessageType::Response);
        assert_eq!(message.answers().len(), 1);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_resolve_decodes_answers() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_one(listener, |q| {
            answered(q, Ipv4Addr::new(93, 184, 216, 34), 300)
        }));

        let client = DnsTcpClient::new(addr);
        let set = client.resolve("example.com.", RecordType::A).await.unwrap();
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.records[0].text, "93.184.216.34");
        assert_eq!(set.ttl, 300);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_timeout_on_silent_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold the connection open without ever replying.
        let server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client = DnsTcpClient::new(addr).with_timeout(Some(Duration::from_millis(50)));
        let err = client.raw_query("example.com.", RecordType::A).await.unwrap_err();
        assert!(matches!(err, ResolveError::Timeout));
        server.abort();
    }

    #[tokio::test]
    async fn test_truncated_response() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut len_buf = [0u8; 2];
            socket.read_exact(&mut len_buf).await.unwrap();
            let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
            socket.read_exact(&mut query).await.unwrap();
            // Advertise 100 bytes but send only 3, then close.
            socket.write_all(&100u16.to_be_bytes()).await.unwrap();
            socket.write_all(&[1, 2, 3]).await.unwrap();
        });

        let client = DnsTcpClient::new(addr);
        let err = client.raw_query("example.com.", RecordType::A).await.unwrap_err();
        assert!(matches!(err, ResolveError::TruncatedResponse));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind then drop to get an unused port.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = DnsTcpClient::new(addr);
        let err = client.raw_query("example.com.", RecordType::A).await.unwrap_err();
        assert!(matches!(err, ResolveError::Io(_)));
    }
}
