use bytes::{Buf, Bytes};
use std::io::Error as IoError;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};
use tokio::sync::mpsc;

/// An `AsyncRead` fed by chunks arriving on a channel; closing the sender is EOF.
///
/// The channel bound is the transport's flow control: senders wait while the
/// reader is not being polled.
pub struct ChannelReader {
    rx: mpsc::Receiver<Bytes>,
    current: Bytes,
}

impl ChannelReader {
    pub fn new(rx: mpsc::Receiver<Bytes>) -> Self {
        Self { rx, current: Bytes::new() }
    }

    /// A reader together with the sender that feeds it.
    pub fn channel(capacity: usize) -> (mpsc::Sender<Bytes>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx))
    }
}

impl AsyncRead for ChannelReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<Result<(), IoError>> {
        // Empty chunks carry nothing and must not look like EOF.
        while self.current.is_empty() {
            match Pin::new(&mut self.rx).poll_recv(cx) {
                Poll::Ready(Some(chunk)) => self.current = chunk,
                Poll::Ready(None) => return Poll::Ready(Ok(())),
                Poll::Pending => return Poll::Pending,
            }
        }

        let to_copy = std::cmp::min(self.current.len(), buf.remaining());
        buf.put_slice(&self.current[..to_copy]);
        self.current.advance(to_copy);
        Poll::Ready(Ok(()))
    }
}
