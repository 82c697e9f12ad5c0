use crate::agent::{Agent, tool_call_message, tool_response_message};
use crate::error::RunError;
use crate::events::{Content, Event, FunctionResponse, Part, USER_AUTHOR};
use crate::session::InMemorySessionService;
use futures_util::Stream;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

pub const MAX_ITERATIONS: usize = 10;

/// Drives an agent over a session, producing the events of each invocation
/// as a stream.
pub struct Runner {
    agent: Arc<Agent>,
    app_name: String,
    session_service: Arc<InMemorySessionService>,
}

impl Runner {
    pub fn new(
        agent: Arc<Agent>,
        app_name: impl Into<String>,
        session_service: Arc<InMemorySessionService>,
    ) -> Self {
        Self {
            agent,
            app_name: app_name.into(),
            session_service,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn session_service(&self) -> &InMemorySessionService {
        &self.session_service
    }

    /// Runs one invocation for `new_message`.
    ///
    /// Every yielded event has already been appended to the session. The
    /// user's own message is recorded but not yielded.
    pub fn run_async<'a>(
        &'a self,
        user_id: &'a str,
        session_id: &'a str,
        new_message: Content,
    ) -> impl Stream<Item = Result<Event, RunError>> + 'a {
        async_stream::try_stream! {
            let agent = &self.agent;
            let sessions = &self.session_service;
            let session = sessions.get_session(&self.app_name, user_id, session_id).await?;
            let invocation_id = format!("e-{}", Uuid::new_v4());

            let mut messages = agent.history_messages(&session.events);
            messages.push(genai::chat::ChatMessage::user(new_message.text()));

            let user_event = Event::new(&invocation_id, USER_AUTHOR, Some(new_message));
            sessions.append_event(&self.app_name, user_id, session_id, user_event).await?;

            let tools = agent.genai_tools();

            for _ in 0..MAX_ITERATIONS {
                let response = agent.model().completion(messages.clone(), tools.clone()).await?;

                if response.tool_calls.is_empty() {
                    let event = Event::new(
                        &invocation_id,
                        agent.name(),
                        Some(Content::model(vec![Part::text(response.content)])),
                    );
                    sessions.append_event(&self.app_name, user_id, session_id, event.clone()).await?;
                    yield event;
                    return;
                }

                let mut call_parts = vec![];
                if !response.content.is_empty() {
                    call_parts.push(Part::text(response.content.clone()));
                }
                call_parts.extend(response.tool_calls.iter().cloned().map(Part::FunctionCall));
                messages.push(tool_call_message(&response.content, &response.tool_calls));

                let call_event = Event::new(&invocation_id, agent.name(), Some(Content::model(call_parts)));
                sessions.append_event(&self.app_name, user_id, session_id, call_event.clone()).await?;
                yield call_event;

                let mut response_parts = vec![];
                for call in &response.tool_calls {
                    tracing::info!("Agent executing tool: {} with args: {}", call.name, call.args);
                    let result = agent.runtime().execute(&call.name, call.args.clone()).await;
                    let output = FunctionResponse {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        response: tool_output(result),
                    };
                    tracing::info!("Agent tool output: {}", output.response);
                    messages.push(tool_response_message(&output));
                    response_parts.push(Part::FunctionResponse(output));
                }

                let response_event = Event::new(&invocation_id, agent.name(), Some(Content::model(response_parts)));
                sessions.append_event(&self.app_name, user_id, session_id, response_event.clone()).await?;
                yield response_event;
            }

            Err::<(), _>(RunError::MaxIterations(MAX_ITERATIONS))?;
        }
    }
}

/// Tool output as a JSON value: parsed when the tool returned JSON,
/// `{"result": ..}` otherwise, `{"error": ..}` on failure.
fn tool_output(result: Result<String, String>) -> Value {
    match result {
        Ok(s) => serde_json::from_str::<Value>(&s)
            .ok()
            .filter(Value::is_object)
            .unwrap_or_else(|| json!({ "result": s })),
        Err(e) => json!({ "error": e }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentConfig;
    use crate::agent::tools::{TimeTools, discover_tools};
    use crate::error::{LlmError, SessionError};
    use crate::events::FunctionCall;
    use crate::llm::{LLMResponse, Model};
    use async_trait::async_trait;
    use futures_util::StreamExt;
    use genai::chat::ChatMessage;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses; once exhausted, keeps answering with `fallback`.
    struct ScriptedModel {
        script: Mutex<VecDeque<LLMResponse>>,
        fallback: LLMResponse,
        calls: Mutex<Vec<usize>>,
    }

    impl ScriptedModel {
        fn new(script: Vec<LLMResponse>, fallback: LLMResponse) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback,
                calls: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl Model for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn completion(
            &self,
            messages: Vec<ChatMessage>,
            _tools: Option<Vec<genai::chat::Tool>>,
        ) -> Result<LLMResponse, LlmError> {
            self.calls.lock().unwrap().push(messages.len());
            let next = self.script.lock().unwrap().pop_front();
            Ok(next.unwrap_or_else(|| self.fallback.clone()))
        }
    }

    fn get_time_call(tz: &str) -> LLMResponse {
        LLMResponse {
            content: String::new(),
            tool_calls: vec![FunctionCall {
                id: "call_1".to_string(),
                name: "get_time".to_string(),
                args: json!({ "timezone": tz }),
            }],
        }
    }

    fn answer(text: &str) -> LLMResponse {
        LLMResponse {
            content: text.to_string(),
            tool_calls: vec![],
        }
    }

    async fn runner_with(model: Arc<ScriptedModel>) -> Runner {
        let agent = Agent::new(
            AgentConfig {
                name: "time_agent".to_string(),
                description: "Provides current time".to_string(),
                instruction: "Use get_time.".to_string(),
            },
            model,
            discover_tools(&TimeTools),
        );
        let sessions = Arc::new(InMemorySessionService::new());
        sessions.create_session("app", "u1", "s1").await.unwrap();
        Runner::new(Arc::new(agent), "app", sessions)
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let model = Arc::new(ScriptedModel::new(
            vec![get_time_call("nyc"), answer("It is 10:00 AM in New York.")],
            answer("unused"),
        ));
        let runner = runner_with(model.clone()).await;

        let events: Vec<Event> = runner
            .run_async("u1", "s1", Content::user_text("time in nyc"))
            .map(|e| e.unwrap())
            .collect()
            .await;

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].function_calls().count(), 1);
        let response = events[1].function_responses().next().unwrap();
        assert_eq!(response.id, "call_1");
        assert_eq!(response.response["status"], "success");
        assert_eq!(response.response["timezone"], "America/New_York");
        assert!(events[2].is_final_response());
        assert_eq!(events[2].parts(), &[Part::text("It is 10:00 AM in New York.")]);
        assert!(events.iter().all(|e| e.author == "time_agent"));
        assert!(events.iter().all(|e| e.invocation_id == events[0].invocation_id));

        // user event + 3 agent events
        let session = runner.session_service().get_session("app", "u1", "s1").await.unwrap();
        assert_eq!(session.events.len(), 4);
        assert_eq!(session.events[0].author, USER_AUTHOR);

        // system + user, then + tool call + tool response
        assert_eq!(*model.calls.lock().unwrap(), vec![2, 4]);
    }

    #[tokio::test]
    async fn test_second_query_sees_earlier_turns() {
        let model = Arc::new(ScriptedModel::new(
            vec![answer("10:00"), answer("20:30")],
            answer("unused"),
        ));
        let runner = runner_with(model.clone()).await;

        for query in ["time in nyc", "time at delhi"] {
            let events: Vec<_> = runner
                .run_async("u1", "s1", Content::user_text(query))
                .collect()
                .await;
            assert_eq!(events.len(), 1);
        }

        // second call: system + (user, answer) + new user
        assert_eq!(*model.calls.lock().unwrap(), vec![2, 4]);
    }

    #[tokio::test]
    async fn test_missing_session_is_a_stream_error() {
        let runner = runner_with(Arc::new(ScriptedModel::new(vec![], answer("x")))).await;
        let items: Vec<_> = runner
            .run_async("u1", "nope", Content::user_text("hi"))
            .collect()
            .await;

        assert_eq!(items.len(), 1);
        assert!(matches!(
            items[0],
            Err(RunError::Session(SessionError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_iteration_cap() {
        let runner = runner_with(Arc::new(ScriptedModel::new(vec![], get_time_call("utc")))).await;
        let items: Vec<_> = runner
            .run_async("u1", "s1", Content::user_text("loop"))
            .collect()
            .await;

        assert_eq!(items.len(), MAX_ITERATIONS * 2 + 1);
        assert!(matches!(items.last(), Some(Err(RunError::MaxIterations(MAX_ITERATIONS)))));
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_error_response() {
        let call = LLMResponse {
            content: "Checking.".to_string(),
            tool_calls: vec![FunctionCall {
                id: "c9".to_string(),
                name: "get_weather".to_string(),
                args: json!({}),
            }],
        };
        let model = Arc::new(ScriptedModel::new(vec![call, answer("Sorry.")], answer("unused")));
        let runner = runner_with(model).await;
        let events: Vec<Event> = runner
            .run_async("u1", "s1", Content::user_text("weather?"))
            .map(|e| e.unwrap())
            .collect()
            .await;

        assert_eq!(events[0].parts()[0], Part::text("Checking."));
        let response = events[1].function_responses().next().unwrap();
        assert_eq!(response.response, json!({"error": "Tool get_weather not found"}));
    }

    #[test]
    fn test_tool_output_shapes() {
        assert_eq!(
            tool_output(Ok(r#"{"status":"success"}"#.to_string())),
            json!({"status": "success"})
        );
        assert_eq!(tool_output(Ok("plain".to_string())), json!({"result": "plain"}));
        assert_eq!(tool_output(Ok("42".to_string())), json!({"result": "42"}));
        assert_eq!(
            tool_output(Err("Tool x not found".to_string())),
            json!({"error": "Tool x not found"})
        );
    }
}
