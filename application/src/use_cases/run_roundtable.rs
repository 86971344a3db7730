//! Run Roundtable use case
//!
//! Drives a panel of agents through `max_rounds` rounds of discussion and a
//! final synthesis, reporting progress exclusively as [`RoundtableEvent`]s.
//!
//! The run executes on a worker task that feeds a bounded channel; the
//! caller consumes [`RoundtableEvents`] at its own pace. Dropping the stream
//! stops the run at its next event, but provider calls already in flight are
//! not cancelled.
//!
//! Round 1 fans out every panelist concurrently and joins on all of them
//! before reporting anything, so its events come out in panelist order.
//! Later rounds take turns in panelist order and stream chunks live.

use crate::config::DiscussionParams;
use crate::ports::llm_provider::ProviderResolver;
use crate::ports::recorder::EventRecorder;
use crate::use_cases::invoke_agent::{AgentTurnError, invoke_agent};
use futures::Stream;
use roundtable_domain::{
    AgentDefinition, ContextBuilder, DiscussionStats, DomainError, RoleProtocol,
    RoundMode, RoundtableConfig, RoundtableEvent, RoundtableOutcome, Transcript,
    TranscriptEntry,
};
use std::ops::ControlFlow;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Input for the RunRoundtable use case
#[derive(Debug, Clone)]
pub struct RunRoundtableInput {
    /// Discussion topic, interpolated into every prompt
    pub topic: String,
    /// Panel composition and round count
    pub config: RoundtableConfig,
}

impl RunRoundtableInput {
    pub fn new(topic: impl Into<String>, config: RoundtableConfig) -> Self {
        Self {
            topic: topic.into(),
            config,
        }
    }
}

/// Events of one run, in emission order.
///
/// Ends when the run finishes, fails, or its worker task goes away.
pub struct RoundtableEvents {
    rx: mpsc::Receiver<RoundtableEvent>,
}

impl RoundtableEvents {
    /// Wait for the next event.
    pub async fn recv(&mut self) -> Option<RoundtableEvent> {
        self.rx.recv().await
    }

    /// Drain the stream to the end.
    pub async fn collect_all(mut self) -> Vec<RoundtableEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.rx.recv().await {
            events.push(event);
        }
        events
    }
}

impl Stream for RoundtableEvents {
    type Item = RoundtableEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

/// Use case for running a roundtable discussion
pub struct RunRoundtableUseCase<R: ProviderResolver + 'static> {
    resolver: Arc<R>,
    params: DiscussionParams,
}

impl<R: ProviderResolver + 'static> RunRoundtableUseCase<R> {
    pub fn new(resolver: Arc<R>) -> Self {
        Self {
            resolver,
            params: DiscussionParams::default(),
        }
    }

    pub fn with_params(mut self, params: DiscussionParams) -> Self {
        self.params = params;
        self
    }

    /// Start the run on a worker task and return its event stream.
    ///
    /// Must be called from within a tokio runtime.
    pub fn execute(&self, input: RunRoundtableInput) -> RoundtableEvents {
        let (tx, rx) = mpsc::channel(self.params.event_buffer.max(1));
        let timeout = self.params.timeout_for(&input.config);
        let resolver: Arc<dyn ProviderResolver> = self.resolver.clone();

        let run = DiscussionRun {
            resolver,
            topic: input.topic,
            config: input.config,
            timeout,
            transcript: Transcript::new(),
            sink: EventSink { tx },
        };
        tokio::spawn(run.drive());

        RoundtableEvents { rx }
    }

    /// Run to completion, feeding every event to `recorder`, and report how
    /// the run ended.
    pub async fn execute_with_recorder(
        &self,
        input: RunRoundtableInput,
        recorder: &dyn EventRecorder,
    ) -> RoundtableOutcome {
        let mut events = self.execute(input);
        let mut seen = Vec::new();
        while let Some(event) = events.recv().await {
            recorder.handle_event(&event);
            seen.push(event);
        }
        RoundtableOutcome::from_events(&seen)
    }
}

/// The consumer dropped the event stream.
struct ConsumerGone;

#[derive(Clone)]
struct EventSink {
    tx: mpsc::Sender<RoundtableEvent>,
}

impl EventSink {
    async fn emit(&self, event: RoundtableEvent) -> Result<(), ConsumerGone> {
        self.tx.send(event).await.map_err(|_| ConsumerGone)
    }

    /// Emit a streamed fragment; `Break` once the consumer is gone.
    async fn forward(&self, event: RoundtableEvent) -> ControlFlow<()> {
        match self.emit(event).await {
            Ok(()) => ControlFlow::Continue(()),
            Err(ConsumerGone) => ControlFlow::Break(()),
        }
    }
}

/// Chunks and full text of a round-1 turn, held until the join.
struct BufferedTurn {
    chunks: Vec<String>,
    response: String,
}

/// State owned by one run. The transcript is the only thing that changes.
struct DiscussionRun {
    resolver: Arc<dyn ProviderResolver>,
    topic: String,
    config: RoundtableConfig,
    timeout: Duration,
    transcript: Transcript,
    sink: EventSink,
}

impl DiscussionRun {
    async fn drive(mut self) {
        if self.run().await.is_err() {
            debug!("Event stream dropped by consumer, stopping discussion");
        }
    }

    async fn run(&mut self) -> Result<(), ConsumerGone> {
        let started = Instant::now();

        let panelists: Vec<AgentDefinition> = RoleProtocol::panelists(&self.config.agents)
            .into_iter()
            .cloned()
            .collect();
        if panelists.is_empty() {
            return self.reject(DomainError::NoPanelists).await;
        }
        let Some(synthesizer) = RoleProtocol::synthesizer(&self.config.agents).cloned() else {
            return self.reject(DomainError::NoSynthesizer).await;
        };

        info!(
            "Starting roundtable with {} panelists over {} rounds",
            panelists.len(),
            self.config.max_rounds
        );

        self.sink
            .emit(RoundtableEvent::RoundtableStart {
                topic: self.topic.clone(),
                agents: self
                    .config
                    .agents
                    .iter()
                    .map(AgentDefinition::summary)
                    .collect(),
                max_rounds: self.config.max_rounds,
            })
            .await?;

        for round in 1..=self.config.max_rounds {
            let mode = RoundMode::for_round(round);
            info!("Round {} ({})", round, mode);
            self.sink
                .emit(RoundtableEvent::RoundStart { round, mode })
                .await?;

            match mode {
                RoundMode::Concurrent => self.concurrent_round(round, &panelists).await?,
                RoundMode::Sequential => self.sequential_round(round, &panelists).await?,
            }

            self.sink.emit(RoundtableEvent::RoundEnd { round }).await?;
        }

        self.synthesize(&synthesizer, started).await
    }

    async fn reject(&self, error: DomainError) -> Result<(), ConsumerGone> {
        warn!("Roundtable rejected: {}", error);
        self.sink.emit(RoundtableEvent::fatal(error.to_string())).await
    }

    /// Fan out every panelist, wait for all of them, then report in
    /// panelist order.
    async fn concurrent_round(
        &mut self,
        round: u32,
        panelists: &[AgentDefinition],
    ) -> Result<(), ConsumerGone> {
        let context = ContextBuilder::new(&self.topic);
        let mut join_set = JoinSet::new();

        for (index, agent) in panelists.iter().enumerate() {
            let messages = context.panelist_messages(agent, round, &self.transcript);
            let resolver = Arc::clone(&self.resolver);
            let agent = agent.clone();
            let timeout = self.timeout;

            join_set.spawn(async move {
                let mut chunks = Vec::new();
                let result = invoke_agent(resolver.as_ref(), &agent, &messages, timeout, |chunk| {
                    chunks.push(chunk);
                    std::future::ready(ControlFlow::Continue(()))
                })
                .await;
                (index, result.map(|response| BufferedTurn { chunks, response }))
            });
        }

        let mut slots: Vec<Option<Result<BufferedTurn, AgentTurnError>>> =
            panelists.iter().map(|_| None).collect();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("Panelist task join error: {}", e),
            }
        }

        for (agent, slot) in panelists.iter().zip(slots) {
            match slot {
                Some(Ok(turn)) => {
                    self.sink
                        .emit(RoundtableEvent::AgentStart {
                            agent_id: agent.id.clone(),
                            agent_name: agent.name.clone(),
                            round,
                        })
                        .await?;
                    for text in turn.chunks {
                        self.sink
                            .emit(RoundtableEvent::AgentChunk {
                                agent_id: agent.id.clone(),
                                text,
                            })
                            .await?;
                    }
                    self.record_turn(agent, round, turn.response).await?;
                }
                Some(Err(e)) => self.turn_failed(agent, &e).await?,
                None => {
                    self.sink
                        .emit(RoundtableEvent::agent_error(
                            &agent.id,
                            "panelist task did not complete",
                        ))
                        .await?
                }
            }
        }

        Ok(())
    }

    /// One panelist at a time; each sees this round's earlier speakers.
    async fn sequential_round(
        &mut self,
        round: u32,
        panelists: &[AgentDefinition],
    ) -> Result<(), ConsumerGone> {
        for agent in panelists {
            self.sink
                .emit(RoundtableEvent::AgentStart {
                    agent_id: agent.id.clone(),
                    agent_name: agent.name.clone(),
                    round,
                })
                .await?;

            let messages =
                ContextBuilder::new(&self.topic).panelist_messages(agent, round, &self.transcript);
            let sink = self.sink.clone();
            let agent_id = agent.id.clone();

            let result = invoke_agent(
                self.resolver.as_ref(),
                agent,
                &messages,
                self.timeout,
                move |text| {
                    let sink = sink.clone();
                    let agent_id = agent_id.clone();
                    async move {
                        sink.forward(RoundtableEvent::AgentChunk { agent_id, text })
                            .await
                    }
                },
            )
            .await;

            // A failed turn leaves no entry; later speakers proceed without it.
            match result {
                Ok(response) => self.record_turn(agent, round, response).await?,
                Err(AgentTurnError::Abandoned { .. }) => return Err(ConsumerGone),
                Err(e) => self.turn_failed(agent, &e).await?,
            }
        }

        Ok(())
    }

    async fn synthesize(
        &mut self,
        synthesizer: &AgentDefinition,
        started: Instant,
    ) -> Result<(), ConsumerGone> {
        info!("Synthesis by {} ({})", synthesizer.name, synthesizer.model);
        self.sink
            .emit(RoundtableEvent::SynthesisStart {
                agent_name: synthesizer.name.clone(),
                model: synthesizer.model.clone(),
            })
            .await?;

        let messages =
            ContextBuilder::new(&self.topic).synthesizer_messages(synthesizer, &self.transcript);
        let sink = self.sink.clone();

        let result = invoke_agent(
            self.resolver.as_ref(),
            synthesizer,
            &messages,
            self.timeout,
            move |text| {
                let sink = sink.clone();
                async move { sink.forward(RoundtableEvent::SynthesisChunk { text }).await }
            },
        )
        .await;

        match result {
            Ok(answer) => {
                self.sink
                    .emit(RoundtableEvent::SynthesisDone {
                        answer: answer.clone(),
                    })
                    .await?;

                let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                let stats = DiscussionStats::compute(
                    self.config.max_rounds,
                    self.config.agents.len(),
                    &self.transcript,
                    &answer,
                    duration_ms,
                );
                info!(
                    "Roundtable finished in {}ms (~{} tokens)",
                    stats.duration_ms, stats.total_tokens_estimate
                );
                self.sink
                    .emit(RoundtableEvent::RoundtableDone { answer, stats })
                    .await
            }
            Err(AgentTurnError::Abandoned { .. }) => Err(ConsumerGone),
            Err(e) => {
                warn!("Synthesis failed: {}", e);
                self.sink
                    .emit(RoundtableEvent::agent_error(
                        &synthesizer.id,
                        format!("Synthesis failed: {}", e),
                    ))
                    .await
            }
        }
    }

    /// Append the transcript entry, then report it.
    async fn record_turn(
        &mut self,
        agent: &AgentDefinition,
        round: u32,
        response: String,
    ) -> Result<(), ConsumerGone> {
        self.transcript.push(TranscriptEntry {
            agent_id: agent.id.clone(),
            agent_name: agent.name.clone(),
            round,
            response: response.clone(),
            model: agent.model.clone(),
        });
        self.sink
            .emit(RoundtableEvent::AgentDone {
                agent_id: agent.id.clone(),
                agent_name: agent.name.clone(),
                full_response: response,
                round,
                model: agent.model.clone(),
            })
            .await
    }

    async fn turn_failed(
        &self,
        agent: &AgentDefinition,
        error: &AgentTurnError,
    ) -> Result<(), ConsumerGone> {
        warn!("Agent {} failed: {}", agent.id, error);
        self.sink
            .emit(RoundtableEvent::agent_error(&agent.id, error.to_string()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_provider::{
        CompletionOptions, LlmProvider, ProviderError, TextStream,
    };
    use async_trait::async_trait;
    use futures::StreamExt;
    use roundtable_domain::{ChatMessage, MessageRole};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Copy)]
    enum Behavior {
        /// Reply `"<model> #<n>"` in two chunks after `delay_ms`
        Reply { delay_ms: u64 },
        /// `count` one-character fragments, all at once
        Burst { count: usize },
        /// A fragment every 10ms, never finishing
        Endless,
        Fail,
        Hang,
    }

    struct ScriptedProvider {
        model: String,
        behavior: Behavior,
        calls: AtomicUsize,
        pulled: Arc<AtomicUsize>,
        received: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        fn new(model: &str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                model: model.to_string(),
                behavior,
                calls: AtomicUsize::new(0),
                pulled: Arc::new(AtomicUsize::new(0)),
                received: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn pulled_count(&self) -> usize {
            self.pulled.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            options: &CompletionOptions,
        ) -> Result<String, ProviderError> {
            let stream = self.stream(messages, options).await?;
            crate::ports::llm_provider::collect_text(stream).await
        }

        async fn stream(
            &self,
            messages: &[ChatMessage],
            _options: &CompletionOptions,
        ) -> Result<TextStream, ProviderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.received.lock().unwrap().push(messages.to_vec());

            match self.behavior {
                Behavior::Reply { delay_ms } => {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    let chunks: Vec<Result<String, ProviderError>> =
                        vec![Ok(format!("{} ", self.model)), Ok(format!("#{}", n))];
                    Ok(futures::stream::iter(chunks).boxed())
                }
                Behavior::Burst { count } => {
                    let chunks: Vec<Result<String, ProviderError>> =
                        (0..count).map(|_| Ok("x".to_string())).collect();
                    Ok(futures::stream::iter(chunks).boxed())
                }
                Behavior::Endless => {
                    let pulled = Arc::clone(&self.pulled);
                    Ok(futures::stream::unfold(pulled, |pulled| async move {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        pulled.fetch_add(1, Ordering::SeqCst);
                        Some((Ok("x".to_string()), pulled))
                    })
                    .boxed())
                }
                Behavior::Fail => Err(ProviderError::Api {
                    status: 500,
                    message: format!("{} exploded", self.model),
                }),
                Behavior::Hang => std::future::pending().await,
            }
        }
    }

    #[derive(Default)]
    struct ScriptedResolver {
        providers: HashMap<String, Arc<ScriptedProvider>>,
    }

    impl ScriptedResolver {
        fn with(mut self, model: &str, behavior: Behavior) -> Self {
            self.providers
                .insert(model.to_string(), ScriptedProvider::new(model, behavior));
            self
        }

        fn provider(&self, model: &str) -> &ScriptedProvider {
            &self.providers[model]
        }
    }

    impl ProviderResolver for ScriptedResolver {
        fn resolve(&self, model: &str) -> Result<Arc<dyn LlmProvider>, ProviderError> {
            self.providers
                .get(model)
                .map(|p| Arc::clone(p) as Arc<dyn LlmProvider>)
                .ok_or_else(|| ProviderError::ModelNotAvailable(model.to_string()))
        }
    }

    const REPLY: Behavior = Behavior::Reply { delay_ms: 0 };

    fn panel(panelists: &[&str], max_rounds: u32) -> RoundtableConfig {
        let mut agents: Vec<AgentDefinition> = panelists
            .iter()
            .map(|id| AgentDefinition::panelist(*id, id.to_uppercase(), format!("model-{}", id)))
            .collect();
        agents.push(AgentDefinition::synthesizer("s", "S", "model-s"));
        RoundtableConfig::new(agents, max_rounds)
    }

    fn resolver_for(panelists: &[&str]) -> ScriptedResolver {
        panelists
            .iter()
            .fold(ScriptedResolver::default(), |r, id| {
                r.with(&format!("model-{}", id), REPLY)
            })
            .with("model-s", REPLY)
    }

    async fn run_events(
        resolver: ScriptedResolver,
        config: RoundtableConfig,
    ) -> (Arc<ScriptedResolver>, Vec<RoundtableEvent>) {
        let resolver = Arc::new(resolver);
        let use_case = RunRoundtableUseCase::new(Arc::clone(&resolver));
        let events = use_case
            .execute(RunRoundtableInput::new("X", config))
            .collect_all()
            .await;
        (resolver, events)
    }

    /// Compact `kind[:agent][@round]` labels, chunks dropped
    fn outline(events: &[RoundtableEvent]) -> Vec<String> {
        events
            .iter()
            .filter(|e| e.chunk_text().is_none())
            .map(|e| match e {
                RoundtableEvent::RoundStart { round, mode } => {
                    format!("round_start@{}:{}", round, mode)
                }
                RoundtableEvent::RoundEnd { round } => format!("round_end@{}", round),
                RoundtableEvent::AgentDone { agent_id, round, .. } => {
                    format!("agent_done:{}@{}", agent_id, round)
                }
                other => match other.agent_id() {
                    Some(id) => format!("{}:{}", other.kind(), id),
                    None => other.kind().to_string(),
                },
            })
            .collect()
    }

    #[tokio::test]
    async fn test_end_to_end_event_order() {
        let (_, events) = run_events(resolver_for(&["a", "b"]), panel(&["a", "b"], 2)).await;

        assert_eq!(
            outline(&events),
            vec![
                "roundtable_start",
                "round_start@1:concurrent",
                "agent_start:a",
                "agent_done:a@1",
                "agent_start:b",
                "agent_done:b@1",
                "round_end@1",
                "round_start@2:sequential",
                "agent_start:a",
                "agent_done:a@2",
                "agent_start:b",
                "agent_done:b@2",
                "round_end@2",
                "synthesis_start",
                "synthesis_done",
                "roundtable_done",
            ]
        );

        match events.last() {
            Some(RoundtableEvent::RoundtableDone { answer, stats }) => {
                assert_eq!(answer, "model-s #1");
                assert_eq!(stats.total_rounds, 2);
                assert_eq!(stats.total_agents, 3);
            }
            other => panic!("expected roundtable_done, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_chunks_precede_done_and_concatenate_to_response() {
        let (_, events) = run_events(resolver_for(&["a"]), panel(&["a"], 2)).await;

        let mut pending = String::new();
        for event in &events {
            match event {
                RoundtableEvent::AgentChunk { text, .. } => pending.push_str(text),
                RoundtableEvent::AgentDone { full_response, .. } => {
                    assert_eq!(&pending, full_response);
                    pending.clear();
                }
                _ => {}
            }
        }

        let synthesis: String = events
            .iter()
            .filter_map(|e| match e {
                RoundtableEvent::SynthesisChunk { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(synthesis, "model-s #1");
    }

    #[tokio::test]
    async fn test_round_count_and_modes_follow_max_rounds() {
        let (_, events) = run_events(resolver_for(&["a", "b"]), panel(&["a", "b"], 4)).await;

        let modes: Vec<(u32, RoundMode)> = events
            .iter()
            .filter_map(|e| match e {
                RoundtableEvent::RoundStart { round, mode } => Some((*round, *mode)),
                _ => None,
            })
            .collect();
        assert_eq!(
            modes,
            vec![
                (1, RoundMode::Concurrent),
                (2, RoundMode::Sequential),
                (3, RoundMode::Sequential),
                (4, RoundMode::Sequential),
            ]
        );
        let ends = events
            .iter()
            .filter(|e| matches!(e, RoundtableEvent::RoundEnd { .. }))
            .count();
        assert_eq!(ends, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_round_reports_in_panelist_order_despite_latency() {
        let resolver = ScriptedResolver::default()
            .with("model-a", Behavior::Reply { delay_ms: 500 })
            .with("model-b", Behavior::Reply { delay_ms: 10 })
            .with("model-c", Behavior::Reply { delay_ms: 200 })
            .with("model-s", REPLY);

        let (_, events) = run_events(resolver, panel(&["a", "b", "c"], 1)).await;

        let done: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                RoundtableEvent::AgentDone { agent_id, .. } => Some(agent_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(done, vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_round_runs_panelists_together() {
        let resolver = ScriptedResolver::default()
            .with("model-a", Behavior::Reply { delay_ms: 1000 })
            .with("model-b", Behavior::Reply { delay_ms: 1000 })
            .with("model-s", REPLY);

        let started = tokio::time::Instant::now();
        let (_, events) = run_events(resolver, panel(&["a", "b"], 1)).await;

        assert!(events.last().is_some_and(|e| e.kind() == "roundtable_done"));
        assert!(started.elapsed() < Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_round_one_failure_is_isolated() {
        let resolver = ScriptedResolver::default()
            .with("model-a", REPLY)
            .with("model-b", Behavior::Fail)
            .with("model-c", REPLY)
            .with("model-s", REPLY);

        let (_, events) = run_events(resolver, panel(&["a", "b", "c"], 1)).await;

        assert_eq!(
            outline(&events),
            vec![
                "roundtable_start",
                "round_start@1:concurrent",
                "agent_start:a",
                "agent_done:a@1",
                "error:b",
                "agent_start:c",
                "agent_done:c@1",
                "round_end@1",
                "synthesis_start",
                "synthesis_done",
                "roundtable_done",
            ]
        );

        let errors: Vec<&RoundtableEvent> = events.iter().filter(|e| e.is_error()).collect();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            RoundtableEvent::Error { error, .. } if error.contains("model-b exploded")
        ));

        let outcome = RoundtableOutcome::from_events(&events);
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_sequential_failure_skips_entry_and_continues() {
        let resolver = ScriptedResolver::default()
            .with("model-a", REPLY)
            .with("model-b", Behavior::Fail)
            .with("model-c", REPLY)
            .with("model-s", REPLY);

        let (resolver, events) = run_events(resolver, panel(&["a", "b", "c"], 2)).await;

        let round_two: Vec<String> = outline(&events)
            .into_iter()
            .skip_while(|l| l != "round_start@2:sequential")
            .take_while(|l| l != "round_end@2")
            .collect();
        assert_eq!(
            round_two,
            vec![
                "round_start@2:sequential",
                "agent_start:a",
                "agent_done:a@2",
                "agent_start:b",
                "error:b",
                "agent_start:c",
                "agent_done:c@2",
            ]
        );

        // c's round-2 turn sees a's answer but nothing from b
        let received = resolver.provider("model-c").received.lock().unwrap();
        let turn = &received[1][2].content;
        assert!(turn.contains("model-a #2"));
        assert!(!turn.contains("model-b"));
    }

    #[tokio::test]
    async fn test_sequential_context_contains_only_earlier_speakers() {
        let ids = ["a", "b", "c"];
        let (resolver, _) = run_events(resolver_for(&ids), panel(&ids, 2)).await;

        let received = resolver.provider("model-b").received.lock().unwrap();
        assert_eq!(received.len(), 2);
        let round_two = &received[1];
        assert_eq!(round_two.len(), 3);

        // Prior rounds: everyone's round-1 answer
        let context = &round_two[1].content;
        for id in ids {
            assert!(context.contains(&format!("model-{} #1", id)));
        }

        // This round: a spoke before b, c has not
        let turn = &round_two[2].content;
        assert!(turn.contains("model-a #2"));
        assert!(!turn.contains("model-c #2"));
        assert!(!turn.contains("model-b #2"));
    }

    #[tokio::test]
    async fn test_round_one_panelists_get_opening_prompt_only() {
        let ids = ["a", "b"];
        let (resolver, _) = run_events(resolver_for(&ids), panel(&ids, 1)).await;

        for id in ids {
            let received = resolver
                .provider(&format!("model-{}", id))
                .received
                .lock()
                .unwrap();
            assert_eq!(received[0].len(), 2);
            assert_eq!(received[0][0].role, MessageRole::System);
            assert!(received[0][1].content.contains("X"));
        }
    }

    #[tokio::test]
    async fn test_cache_hints_follow_model_family() {
        let config = RoundtableConfig::new(
            vec![
                AgentDefinition::panelist("a", "A", "anthropic/claude-sonnet-4.5"),
                AgentDefinition::panelist("b", "B", "openai/gpt-5.2"),
                AgentDefinition::synthesizer("s", "S", "model-s"),
            ],
            2,
        );
        let resolver = ScriptedResolver::default()
            .with("anthropic/claude-sonnet-4.5", REPLY)
            .with("openai/gpt-5.2", REPLY)
            .with("model-s", REPLY);

        let (resolver, _) = run_events(resolver, config).await;

        let cached = resolver
            .provider("anthropic/claude-sonnet-4.5")
            .received
            .lock()
            .unwrap();
        let round_two = &cached[1];
        assert!(round_two[0].cache);
        assert!(round_two[1].cache);
        assert!(!round_two[2].cache);

        let plain = resolver.provider("openai/gpt-5.2").received.lock().unwrap();
        assert!(plain.iter().flatten().all(|m| !m.cache));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_scoped_and_round_completes() {
        let resolver = ScriptedResolver::default()
            .with("model-a", REPLY)
            .with("model-b", Behavior::Hang)
            .with("model-s", REPLY);
        let config = panel(&["a", "b"], 2).with_agent_timeout(5);

        let (_, events) = run_events(resolver, config).await;

        let errors: Vec<(&str, &str)> = events
            .iter()
            .filter_map(|e| match e {
                RoundtableEvent::Error {
                    agent_id: Some(id),
                    error,
                } => Some((id.as_str(), error.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(errors.len(), 2);
        for (id, error) in errors {
            assert_eq!(id, "b");
            assert_eq!(error, "Agent \"B\" (model-b) timed out after 5s");
        }

        let labels = outline(&events);
        assert!(labels.contains(&"round_end@1".to_string()));
        assert!(labels.contains(&"round_end@2".to_string()));
        assert_eq!(labels.last().map(String::as_str), Some("roundtable_done"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_params_timeout_applies_without_config_override() {
        let resolver = Arc::new(
            ScriptedResolver::default()
                .with("model-a", Behavior::Hang)
                .with("model-s", REPLY),
        );
        let use_case = RunRoundtableUseCase::new(resolver)
            .with_params(DiscussionParams::default().with_agent_timeout(Duration::from_secs(2)));

        let events = use_case
            .execute(RunRoundtableInput::new("X", panel(&["a"], 1)))
            .collect_all()
            .await;

        assert!(events.iter().any(|e| matches!(
            e,
            RoundtableEvent::Error { error, .. } if error.ends_with("timed out after 2s")
        )));
    }

    #[tokio::test]
    async fn test_synthesis_failure_ends_without_done() {
        let resolver = resolver_for(&["a", "b"]).with("model-s", Behavior::Fail);

        let (_, events) = run_events(resolver, panel(&["a", "b"], 1)).await;

        assert!(!events.iter().any(|e| e.kind() == "roundtable_done"));
        assert!(!events.iter().any(|e| e.kind() == "synthesis_done"));
        match events.last() {
            Some(RoundtableEvent::Error { agent_id, error }) => {
                assert_eq!(agent_id.as_deref(), Some("s"));
                assert!(error.starts_with("Synthesis failed:"));
            }
            other => panic!("expected error, got {:?}", other),
        }

        let outcome = RoundtableOutcome::from_events(&events);
        assert!(matches!(outcome, RoundtableOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_unresolvable_model_fails_only_that_agent() {
        let resolver = ScriptedResolver::default()
            .with("model-a", REPLY)
            .with("model-s", REPLY);

        let (_, events) = run_events(resolver, panel(&["a", "ghost"], 1)).await;

        assert!(events.iter().any(|e| matches!(
            e,
            RoundtableEvent::Error { agent_id: Some(id), error }
                if id == "ghost" && error.contains("model-ghost")
        )));
        assert_eq!(events.last().map(|e| e.kind()), Some("roundtable_done"));
    }

    #[tokio::test]
    async fn test_missing_synthesizer_is_single_fatal_event() {
        let config = RoundtableConfig::new(
            vec![
                AgentDefinition::panelist("a", "A", "model-a"),
                AgentDefinition::panelist("b", "B", "model-b"),
            ],
            2,
        );

        let (resolver, events) = run_events(resolver_for(&["a", "b"]), config).await;

        assert_eq!(
            events,
            vec![RoundtableEvent::fatal(DomainError::NoSynthesizer.to_string())]
        );
        assert_eq!(resolver.provider("model-a").call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_panelists_is_single_fatal_event() {
        let config = RoundtableConfig::new(
            vec![
                AgentDefinition::synthesizer("s", "S", "model-s"),
                AgentDefinition::new("m", "M", roundtable_domain::AgentRole::Moderator, "model-m"),
            ],
            1,
        );

        let (_, events) = run_events(resolver_for(&[]), config).await;

        assert_eq!(
            events,
            vec![RoundtableEvent::fatal(DomainError::NoPanelists.to_string())]
        );
    }

    #[tokio::test]
    async fn test_stats_estimate_tokens_over_responses_and_synthesis() {
        let (_, events) = run_events(resolver_for(&["a"]), panel(&["a"], 1)).await;

        // "model-a #1" and "model-s #1": 10 chars each -> ceil(10 / 3.5) = 3
        match events.last() {
            Some(RoundtableEvent::RoundtableDone { stats, .. }) => {
                assert_eq!(stats.total_tokens_estimate, 6);
                assert_eq!(stats.total_rounds, 1);
                assert_eq!(stats.total_agents, 2);
            }
            other => panic!("expected roundtable_done, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_stream_stops_the_run() {
        let resolver = Arc::new(
            ScriptedResolver::default()
                .with("model-a", Behavior::Reply { delay_ms: 50 })
                .with("model-s", REPLY),
        );
        let use_case = RunRoundtableUseCase::new(Arc::clone(&resolver))
            .with_params(DiscussionParams::default().with_event_buffer(1));

        let mut events = use_case.execute(RunRoundtableInput::new("X", panel(&["a"], 3)));
        let first = events.recv().await;
        assert!(matches!(first, Some(RoundtableEvent::RoundtableStart { .. })));
        drop(events);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(resolver.provider("model-s").call_count(), 0);
        assert!(resolver.provider("model-a").call_count() <= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_consumer_is_not_charged_to_agents() {
        let resolver = Arc::new(
            ScriptedResolver::default()
                .with("model-a", Behavior::Burst { count: 10 })
                .with("model-s", Behavior::Burst { count: 10 }),
        );
        let use_case = RunRoundtableUseCase::new(resolver)
            .with_params(DiscussionParams::default().with_event_buffer(1));
        let config = panel(&["a"], 2).with_agent_timeout(5);

        let mut events = use_case.execute(RunRoundtableInput::new("X", config));
        let mut seen = Vec::new();
        while let Some(event) = events.recv().await {
            tokio::time::sleep(Duration::from_secs(1)).await;
            seen.push(event);
        }

        assert!(seen.iter().all(|e| !e.is_error()), "{:?}", seen);
        assert_eq!(seen.last().map(|e| e.kind()), Some("roundtable_done"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_stream_mid_turn_stops_pulling() {
        let resolver = Arc::new(
            ScriptedResolver::default()
                .with("model-a", REPLY)
                .with("model-s", Behavior::Endless),
        );
        let use_case = RunRoundtableUseCase::new(Arc::clone(&resolver))
            .with_params(DiscussionParams::default().with_event_buffer(1));
        let config = panel(&["a"], 1).with_agent_timeout(1000);

        let mut events = use_case.execute(RunRoundtableInput::new("X", config));
        while let Some(event) = events.recv().await {
            if matches!(event, RoundtableEvent::SynthesisChunk { .. }) {
                break;
            }
        }
        drop(events);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let settled = resolver.provider("model-s").pulled_count();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(resolver.provider("model-s").pulled_count(), settled);
    }

    #[derive(Default)]
    struct Collecting(Mutex<Vec<&'static str>>);

    impl EventRecorder for Collecting {
        fn handle_event(&self, event: &RoundtableEvent) {
            self.0.lock().unwrap().push(event.kind());
        }
    }

    #[tokio::test]
    async fn test_recorder_sees_every_event_and_outcome_completes() {
        let use_case = RunRoundtableUseCase::new(Arc::new(resolver_for(&["a", "b"])));
        let recorder = Collecting::default();

        let outcome = use_case
            .execute_with_recorder(
                RunRoundtableInput::new("X", panel(&["a", "b"], 1)),
                &recorder,
            )
            .await;

        match outcome {
            RoundtableOutcome::Completed { answer, .. } => assert_eq!(answer, "model-s #1"),
            other => panic!("expected completion, got {:?}", other),
        }
        let kinds = recorder.0.lock().unwrap();
        assert_eq!(kinds.first(), Some(&"roundtable_start"));
        assert_eq!(kinds.last(), Some(&"roundtable_done"));
        assert!(kinds.contains(&"agent_chunk"));
    }

    #[tokio::test]
    async fn test_events_implement_stream() {
        let use_case = RunRoundtableUseCase::new(Arc::new(resolver_for(&["a"])));
        let kinds: Vec<&'static str> = use_case
            .execute(RunRoundtableInput::new("X", panel(&["a"], 1)))
            .map(|e| e.kind())
            .collect()
            .await;
        assert_eq!(kinds.first(), Some(&"roundtable_start"));
        assert_eq!(kinds.last(), Some(&"roundtable_done"));
    }
}
