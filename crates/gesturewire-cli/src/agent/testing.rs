//! Scripted in-memory agent for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use gesturewire_core::protocol::NativeCommand;
use gesturewire_core::status;
use serde_json::{json, Value};
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream};

use crate::agent::connection::AgentConnection;

/// Replies are looked up by `name:firstArg`, then by `name`. A queue with a
/// single reply left keeps answering with it.
pub struct FakeAgent {
    replies: HashMap<String, VecDeque<String>>,
    received: Arc<Mutex<Vec<NativeCommand>>>,
}

impl FakeAgent {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn reply(self, name: &str, frame: Value) -> Self {
        self.reply_raw(name, &frame.to_string())
    }

    pub fn reply_raw(mut self, name: &str, frame: &str) -> Self {
        self.replies
            .entry(name.to_string())
            .or_default()
            .push_back(frame.to_string());
        self
    }

    /// Register geometry replies for one element.
    pub fn element(self, id: &str, origin: (f64, f64), size: (f64, f64)) -> Self {
        self.reply(
            &format!("getLocation:{}", id),
            json!({"status": 0, "value": {"x": origin.0, "y": origin.1}}),
        )
        .reply(
            &format!("getSize:{}", id),
            json!({"status": 0, "value": {"width": size.0, "height": size.1}}),
        )
    }

    /// Commands received so far, in order. Raw requests are not recorded.
    pub fn received(&self) -> Vec<NativeCommand> {
        self.received.lock().unwrap().clone()
    }

    /// Names of the commands received so far.
    pub fn received_names(&self) -> Vec<String> {
        self.received().into_iter().map(|c| c.name).collect()
    }

    /// Spawn the agent and return a client connection to it.
    pub fn connect(&self) -> AgentConnection<DuplexStream> {
        let (client, mut server) = duplex(64 * 1024);
        let mut replies = self.replies.clone();
        let received = self.received.clone();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 64 * 1024];
            loop {
                let n = match server.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => n,
                };
                let text = String::from_utf8_lossy(&buf[..n]).to_string();

                let keys = match serde_json::from_str::<NativeCommand>(&text) {
                    Ok(cmd) => {
                        let mut keys = Vec::new();
                        if let Some(first) = cmd.args.first() {
                            keys.push(format!("{}:{}", cmd.name, first));
                        }
                        keys.push(cmd.name.clone());
                        received.lock().unwrap().push(cmd);
                        keys
                    }
                    Err(_) => vec![text.trim().to_string()],
                };

                let frame = keys
                    .iter()
                    .find_map(|k| replies.get_mut(k).and_then(next_reply))
                    .unwrap_or_else(|| json!({"status": status::UNKNOWN_COMMAND}).to_string());

                if server.write_all(frame.as_bytes()).await.is_err() {
                    break;
                }
            }
        });

        AgentConnection::new(client, "fake-agent")
    }
}

fn next_reply(queue: &mut VecDeque<String>) -> Option<String> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}
