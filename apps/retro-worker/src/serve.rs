//! JSON-lines front end: one request per input line, one reply per output line.

use serde_json::{Value, json};
use tokio::{
	io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
	task::JoinSet,
};

use retro_service::{Error, Request, RetroClient};

/// Answers lines concurrently until `input` hits EOF and every reply is written. Replies are
/// written as they complete; a request's `"id"` is echoed so callers can match them.
pub async fn serve<R, W>(client: RetroClient, input: R, mut output: W) -> color_eyre::Result<()>
where
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	let mut lines = input.lines();
	let mut pending = JoinSet::new();
	let mut eof = false;

	loop {
		tokio::select! {
			line = lines.next_line(), if !eof => match line? {
				Some(line) if line.trim().is_empty() => {},
				Some(line) => {
					let client = client.clone();

					pending.spawn(async move { respond(&client, &line).await });
				},
				None => eof = true,
			},
			Some(reply) = pending.join_next(), if !pending.is_empty() => {
				let mut reply = reply?;

				reply.push('\n');
				output.write_all(reply.as_bytes()).await?;
				output.flush().await?;
			},
			else => break,
		}
	}

	Ok(())
}

pub async fn respond(client: &RetroClient, line: &str) -> String {
	let (id, outcome) = match serde_json::from_str::<Value>(line) {
		Ok(value) => {
			let id = value.get("id").cloned();

			match serde_json::from_value::<Request>(value) {
				Ok(request) => (id, client.dispatch(request).await),
				Err(err) => (id, Err(malformed(err))),
			}
		},
		Err(err) => (None, Err(malformed(err))),
	};
	let mut reply = match outcome {
		Ok(value) => json!({ "ok": value }),
		Err(err) => {
			tracing::warn!(kind = err.kind(), error = %err, "Request failed.");

			json!({ "error": { "kind": err.kind(), "message": err.to_string() } })
		},
	};

	if let Some(id) = id {
		reply["id"] = id;
	}

	reply.to_string()
}

fn malformed(err: serde_json::Error) -> Error {
	Error::InvalidRequest { message: format!("Malformed request line: {err}.") }
}
