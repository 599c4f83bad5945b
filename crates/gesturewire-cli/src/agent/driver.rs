//! Driver-facing entry points for gesture and element commands.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gesturewire_core::error::ApiError;
use gesturewire_core::gesture::{ElementId, Gesture, GestureOptions};
use gesturewire_core::protocol::{CommandName, NativeCommand, SOURCE_REQUEST};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::agent::compiler::{
    describe, only_release_names_element, point_command, strip_release_element, GestureCompiler,
    MoveTo,
};
use crate::agent::connection::{AgentConnection, AgentTransport};
use crate::agent::resolve::ElementGeometry;

/// Dispatches commands for one session over its agent connection.
pub struct GestureDriver<S = TcpStream> {
    connection: Arc<AgentConnection<S>>,
    geometry: Arc<dyn ElementGeometry>,
    ready: AtomicBool,
    move_to: MoveTo,
}

impl<S> GestureDriver<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Create a ready driver that asks the agent itself for element geometry.
    pub fn new(connection: Arc<AgentConnection<S>>) -> Self {
        let geometry: Arc<dyn ElementGeometry> = connection.clone();
        Self {
            connection,
            geometry,
            ready: AtomicBool::new(true),
            move_to: MoveTo::default(),
        }
    }

    /// Use geometry queries supplied by the driver base.
    pub fn with_geometry(mut self, geometry: Arc<dyn ElementGeometry>) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_move_to(mut self, mode: MoveTo) -> Self {
        self.move_to = mode;
        self
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn ensure_ready(&self, command: &str) -> Result<(), ApiError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(ApiError::not_ready(command))
        }
    }

    /// Perform a touch-action sequence as one native command.
    ///
    /// When the agent reports an element stale or missing and the trailing
    /// `release` is the only step naming one, the sequence is re-issued once
    /// without that element.
    pub async fn perform_touch(&self, gestures: &[Gesture]) -> Result<Value, ApiError> {
        self.ensure_ready("performTouch")?;
        debug!("performTouch: {}", describe(gestures));

        let compiler = GestureCompiler::new(self.geometry.as_ref()).move_to(self.move_to);
        match compiler.perform(self.connection.as_ref(), gestures).await {
            Err(e) if e.is_element_race() && only_release_names_element(gestures) => {
                warn!("{}; retrying release without its element", e);
                let retry = strip_release_element(gestures);
                compiler.perform(self.connection.as_ref(), &retry).await
            }
            result => result,
        }
    }

    /// Tap an element's default point, an offset from it, or an absolute point.
    pub async fn tap(
        &self,
        element: Option<&ElementId>,
        x: f64,
        y: f64,
    ) -> Result<Value, ApiError> {
        self.ensure_ready("tap")?;
        let options = GestureOptions {
            element: element.cloned(),
            ..GestureOptions::at(x, y)
        };
        self.connection
            .execute(&point_command(CommandName::Tap, &options))
            .await
    }

    /// Click an element through the agent's own click handling.
    pub async fn click(&self, element: &ElementId) -> Result<Value, ApiError> {
        self.ensure_ready("click")?;
        self.connection
            .execute(&NativeCommand::on_element(CommandName::Click, element))
            .await
    }

    /// Fetch the application's UI tree as the agent serializes it.
    pub async fn source(&self) -> Result<String, ApiError> {
        self.ensure_ready("getPageSource")?;
        let source = self.connection.send_raw(SOURCE_REQUEST).await?;
        if source.trim().is_empty() {
            return Err(ApiError::protocol("getPageSource", "agent returned no source"));
        }
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::FakeAgent;
    use async_trait::async_trait;
    use gesturewire_core::error::ErrorCode;
    use gesturewire_core::geometry::{Point, Size};
    use gesturewire_core::gesture::Action;
    use gesturewire_core::status;
    use serde_json::json;

    fn driver(agent: &FakeAgent) -> GestureDriver<tokio::io::DuplexStream> {
        GestureDriver::new(Arc::new(agent.connect()))
    }

    fn swipe_releasing_on(element: &str) -> Vec<Gesture> {
        vec![
            Gesture::new(Action::Press, GestureOptions::at(10.0, 10.0)),
            Gesture::new(Action::MoveTo, GestureOptions::at(10.0, 200.0)),
            Gesture::new(Action::Release, GestureOptions::on(element)),
        ]
    }

    #[tokio::test]
    async fn test_not_ready_rejects_without_sending() {
        let agent = FakeAgent::new();
        let driver = driver(&agent);
        driver.set_ready(false);

        let err = driver
            .perform_touch(&swipe_releasing_on("x"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotReady);

        let err = driver.click(&ElementId::from("x")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotReady);
        assert!(agent.received().is_empty());
    }

    #[tokio::test]
    async fn test_stale_release_retries_once_without_element() {
        let agent = FakeAgent::new()
            .reply("swipe", json!({"status": status::STALE_ELEMENT}))
            .reply("swipe", json!({"status": status::SUCCESS, "value": "ok"}));
        let driver = driver(&agent);
        let gestures = swipe_releasing_on("list");

        let value = driver.perform_touch(&gestures).await.expect("retry succeeds");

        assert_eq!(value, json!("ok"));
        assert_eq!(agent.received_names(), vec!["swipe", "swipe"]);
        // Caller's sequence is not modified by the retry.
        assert_eq!(gestures, swipe_releasing_on("list"));
    }

    #[tokio::test]
    async fn test_retry_is_bounded() {
        let agent = FakeAgent::new().reply("swipe", json!({"status": status::STALE_ELEMENT}));
        let driver = driver(&agent);

        let err = driver
            .perform_touch(&swipe_releasing_on("list"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::StaleElement);
        assert_eq!(agent.received_names(), vec!["swipe", "swipe"]);
    }

    #[tokio::test]
    async fn test_stale_without_release_element_is_not_retried() {
        let agent = FakeAgent::new().reply("tap", json!({"status": status::STALE_ELEMENT}));
        let driver = driver(&agent);
        let gestures = vec![
            Gesture::new(Action::Press, GestureOptions::on("gone")),
            Gesture::bare(Action::Release),
        ];

        let err = driver.perform_touch(&gestures).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::StaleElement);
        assert_eq!(agent.received_names(), vec!["tap"]);
    }

    #[tokio::test]
    async fn test_stale_press_element_is_not_retried_for_release_element() {
        let agent = FakeAgent::new().reply("tap", json!({"status": status::STALE_ELEMENT}));
        let driver = driver(&agent);
        let gestures = vec![
            Gesture::new(Action::Press, GestureOptions::on("gone")),
            Gesture::new(Action::Release, GestureOptions::on("other")),
        ];

        let err = driver.perform_touch(&gestures).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::StaleElement);
        assert_eq!(
            agent.received(),
            vec![NativeCommand::new(CommandName::Tap, vec!["gone".into()])]
        );
    }

    #[tokio::test]
    async fn test_unknown_command_is_not_retried() {
        let agent = FakeAgent::new().reply("swipe", json!({"status": status::UNKNOWN_COMMAND}));
        let driver = driver(&agent);

        let err = driver
            .perform_touch(&swipe_releasing_on("list"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::UnknownCommand);
        assert_eq!(agent.received_names(), vec!["swipe"]);
    }

    #[tokio::test]
    async fn test_tap_variants() {
        let agent = FakeAgent::new().reply("tap", json!({"status": 0, "value": null}));
        let driver = driver(&agent);
        let id = ElementId::from("7");

        driver.tap(Some(&id), 0.0, 0.0).await.unwrap();
        driver.tap(Some(&id), 3.0, 4.0).await.unwrap();
        driver.tap(None, 30.0, 40.0).await.unwrap();

        let args: Vec<Vec<String>> = agent.received().into_iter().map(|c| c.args).collect();
        assert_eq!(
            args,
            vec![
                vec!["7".to_string()],
                vec!["7".to_string(), "3".to_string(), "4".to_string()],
                vec!["30".to_string(), "40".to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn test_click_sends_click_command() {
        let agent = FakeAgent::new().reply("click", json!({"status": 0, "value": true}));
        let driver = driver(&agent);

        let value = driver.click(&ElementId::from("12")).await.unwrap();

        assert_eq!(value, json!(true));
        assert_eq!(
            agent.received(),
            vec![NativeCommand::new(CommandName::Click, vec!["12".into()])]
        );
    }

    #[tokio::test]
    async fn test_source_returns_tree() {
        let agent = FakeAgent::new().reply_raw(SOURCE_REQUEST, "<Root/>");
        let driver = driver(&agent);

        assert_eq!(driver.source().await.unwrap(), "<Root/>");
    }

    #[tokio::test]
    async fn test_blank_source_is_protocol_error() {
        let agent = FakeAgent::new().reply_raw(SOURCE_REQUEST, " \n");
        let driver = driver(&agent);

        let err = driver.source().await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ProtocolError);
        assert!(err.message.contains("getPageSource"));
    }

    struct FixedGeometry;

    #[async_trait]
    impl ElementGeometry for FixedGeometry {
        async fn location(&self, _element: &ElementId) -> Result<Point, ApiError> {
            Ok(Point::new(100.0, 100.0))
        }

        async fn size(&self, _element: &ElementId) -> Result<Size, ApiError> {
            Ok(Size::new(20.0, 20.0))
        }
    }

    #[tokio::test]
    async fn test_injected_geometry_replaces_agent_queries() {
        let agent = FakeAgent::new().reply("swipe", json!({"status": 0, "value": null}));
        let driver = driver(&agent).with_geometry(Arc::new(FixedGeometry));
        let gestures = vec![
            Gesture::new(Action::Press, GestureOptions::on("a")),
            Gesture::new(Action::MoveTo, GestureOptions::at(0.0, 0.0)),
            Gesture::bare(Action::Release),
        ];

        driver.perform_touch(&gestures).await.unwrap();

        let received = agent.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].args, vec!["110", "110", "0", "0"]);
    }
}
