//! Line-delimited JSON listener.

use std::{future::Future, io, str};

use serde_json::Value;
use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    task::JoinSet,
};
use tracing::{Instrument as _, debug, info, warn};

use crate::{
    handler::RpcHandler,
    message::{RpcError, RpcReply},
};

/// Longest accepted frame, excluding the trailing newline.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("failed to read frame: {0}")]
    Read(#[source] io::Error),

    #[error("failed to encode reply: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write reply: {0}")]
    Write(#[source] io::Error),
}

/// Accept connections until `shutdown` resolves, then drop open connections.
pub async fn serve<F>(listener: TcpListener, handler: RpcHandler, shutdown: F)
where
    F: Future<Output = ()>,
{
    let mut connections = JoinSet::new();

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let handler = handler.clone();
                    let span = tracing::info_span!("rpc.connection", peer = %peer);

                    connections.spawn(
                        async move {
                            debug!("connection opened");

                            match connection(stream, &handler).await {
                                Ok(()) => debug!("connection closed"),
                                Err(e) => warn!(error = %e, "connection failed"),
                            }
                        }
                        .instrument(span),
                    );
                }
                Err(e) => warn!(error = %e, "failed to accept connection"),
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }

    info!(open_connections = connections.len(), "rpc listener stopped");

    connections.shutdown().await;
}

async fn connection(stream: TcpStream, handler: &RpcHandler) -> Result<(), FrameError> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut frame = Vec::new();

    loop {
        frame.clear();

        let read = (&mut reader)
            .take(MAX_FRAME_LEN as u64 + 1)
            .read_until(b'\n', &mut frame)
            .await
            .map_err(FrameError::Read)?;

        if read == 0 {
            break;
        }

        let reply = if frame.len() > MAX_FRAME_LEN && frame.last() != Some(&b'\n') {
            discard_line(&mut reader).await.map_err(FrameError::Read)?;

            warn!(limit = MAX_FRAME_LEN, "oversized rpc frame");

            RpcReply::err(
                Value::Null,
                RpcError::bad_request(format!("frame exceeds {MAX_FRAME_LEN} bytes")),
            )
        } else {
            match str::from_utf8(&frame) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => handler.handle_frame(line).await,
                Err(e) => {
                    warn!(error = %e, "rpc frame is not valid UTF-8");

                    RpcReply::err(
                        Value::Null,
                        RpcError::bad_request(format!("frame is not valid UTF-8: {e}")),
                    )
                }
            }
        };

        let mut bytes = serde_json::to_vec(&reply).map_err(FrameError::Encode)?;
        bytes.push(b'\n');

        writer.write_all(&bytes).await.map_err(FrameError::Write)?;

        debug!(id = %reply.id(), "reply sent");
    }

    Ok(())
}

/// Skip the rest of the current line without buffering it.
async fn discard_line<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let buf = reader.fill_buf().await?;

        if buf.is_empty() {
            return Ok(());
        }

        if let Some(newline) = buf.iter().position(|b| *b == b'\n') {
            reader.consume(newline + 1);

            return Ok(());
        }

        let len = buf.len();
        reader.consume(len);
    }
}
