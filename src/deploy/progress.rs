//! Step progression and progress reporting.
//!
//! Steps advance on fixed delays; nothing here waits on the chain. Delays go
//! through a [`Pacer`] so tests and the CLI can run them instantly.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::error::DeployFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStep {
    PrepareCalldata,
    SignAndSimulate,
    Broadcast,
    Confirm,
}

impl DeployStep {
    pub const ALL: [DeployStep; 4] =
        [DeployStep::PrepareCalldata, DeployStep::SignAndSimulate, DeployStep::Broadcast, DeployStep::Confirm];

    /// 1-based position shown next to the step.
    pub fn number(&self) -> u8 {
        match self {
            DeployStep::PrepareCalldata => 1,
            DeployStep::SignAndSimulate => 2,
            DeployStep::Broadcast => 3,
            DeployStep::Confirm => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeployStep::PrepareCalldata => "Preparing calldata",
            DeployStep::SignAndSimulate => "Signing & simulating",
            DeployStep::Broadcast => "Broadcasting",
            DeployStep::Confirm => "Confirming",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Active,
    Done,
}

/// Per-step display delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub prepare: Duration,
    pub simulate: Duration,
    pub broadcast: Duration,
    pub confirm: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            prepare: Duration::from_millis(1000),
            simulate: Duration::from_millis(500),
            broadcast: Duration::from_millis(1000),
            confirm: Duration::from_millis(2000),
        }
    }
}

impl Pacing {
    pub fn instant() -> Self {
        Self {
            prepare: Duration::ZERO,
            simulate: Duration::ZERO,
            broadcast: Duration::ZERO,
            confirm: Duration::ZERO,
        }
    }

    pub fn delay(&self, step: DeployStep) -> Duration {
        match step {
            DeployStep::PrepareCalldata => self.prepare,
            DeployStep::SignAndSimulate => self.simulate,
            DeployStep::Broadcast => self.broadcast,
            DeployStep::Confirm => self.confirm,
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Pacer {
    async fn pause(&self, duration: Duration);
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Pacer for NoPacing {
    async fn pause(&self, _duration: Duration) {}
}

#[cfg(feature = "native")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[cfg(feature = "native")]
#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Workflow state as seen by a surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WorkflowState {
    Disconnected,
    Connected,
    Preparing,
    Simulating,
    Submitting,
    Confirming,
    Done,
    Error(DeployFailure),
}

impl WorkflowState {
    /// An attempt is running; further actions must wait.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            WorkflowState::Preparing | WorkflowState::Simulating | WorkflowState::Submitting | WorkflowState::Confirming
        )
    }
}

/// Receives progress. All methods default to no-ops.
pub trait DeployObserver {
    fn on_state(&mut self, _state: &WorkflowState) {}

    fn on_step(&mut self, _step: DeployStep, _status: StepStatus) {}

    /// Start of an attempt: clear previous success/error display and steps.
    fn on_reset(&mut self) {}
}

/// Discards all progress.
#[derive(Debug, Default)]
pub struct NullObserver;

impl DeployObserver for NullObserver {}

/// Records everything it sees; handy for assertions and the CLI transcript.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub states: Vec<WorkflowState>,
    pub steps: Vec<(DeployStep, StepStatus)>,
    pub resets: usize,
}

impl DeployObserver for RecordingObserver {
    fn on_state(&mut self, state: &WorkflowState) {
        self.states.push(state.clone());
    }

    fn on_step(&mut self, step: DeployStep, status: StepStatus) {
        self.steps.push((step, status));
    }

    fn on_reset(&mut self) {
        self.resets += 1;
        self.steps.clear();
    }
}

impl<T: DeployObserver + ?Sized> DeployObserver for &mut T {
    fn on_state(&mut self, state: &WorkflowState) {
        (**self).on_state(state)
    }

    fn on_step(&mut self, step: DeployStep, status: StepStatus) {
        (**self).on_step(step, status)
    }

    fn on_reset(&mut self) {
        (**self).on_reset()
    }
}

impl<T: DeployObserver + ?Sized> DeployObserver for Box<T> {
    fn on_state(&mut self, state: &WorkflowState) {
        (**self).on_state(state)
    }

    fn on_step(&mut self, step: DeployStep, status: StepStatus) {
        (**self).on_step(step, status)
    }

    fn on_reset(&mut self) {
        (**self).on_reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pacing_matches_step_delays() {
        let p = Pacing::default();
        let total: Duration = DeployStep::ALL.iter().map(|s| p.delay(*s)).sum();
        assert_eq!(total, Duration::from_millis(4500));
        assert_eq!(Pacing::instant().delay(DeployStep::Confirm), Duration::ZERO);
    }

    #[test]
    fn busy_states() {
        assert!(WorkflowState::Simulating.is_busy());
        assert!(!WorkflowState::Connected.is_busy());
        assert!(!WorkflowState::Done.is_busy());
    }

    #[test]
    fn recorder_clears_steps_on_reset() {
        let mut rec = RecordingObserver::default();
        rec.on_step(DeployStep::PrepareCalldata, StepStatus::Active);
        rec.on_reset();
        assert!(rec.steps.is_empty());
        assert_eq!(rec.resets, 1);
    }
}
