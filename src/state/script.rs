//! Timed effect scripts
//!
//! A turn's deferred effects are an ordered list of steps, each with a delay
//! relative to the previous step. Running a script chains the delays, so the
//! relative order of steps holds even when timers fire late.

use std::time::Duration;
use url::Url;

use crate::dialogue::OptionLink;

/// A deferred effect on the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    StartTyping,
    /// Stop typing and append a bot message
    DeliverBot(String),
    RevealOptions(Vec<OptionLink>),
    Navigate(Url),
}

/// One scheduled action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Delay after the previous step completed
    pub delay: Duration,
    pub action: Action,
}

/// Ordered steps of a single turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    steps: Vec<Step>,
}

/// Whether the runner should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, delay: Duration, action: Action) -> Self {
        self.steps.push(Step { delay, action });
        self
    }

    /// Typing indicator on, then the message after `typing_delay`
    pub fn bot_message(self, typing_delay: Duration, text: impl Into<String>) -> Self {
        self.then(Duration::ZERO, Action::StartTyping)
            .then(typing_delay, Action::DeliverBot(text.into()))
    }

    pub fn reveal_options(self, delay: Duration, options: Vec<OptionLink>) -> Self {
        self.then(delay, Action::RevealOptions(options))
    }

    pub fn navigate(self, url: Url) -> Self {
        self.then(Duration::ZERO, Action::Navigate(url))
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Time from the first step's schedule to the last step firing
    pub fn total_delay(&self) -> Duration {
        self.steps.iter().map(|s| s.delay).sum()
    }

    /// Bot messages this script will deliver, in order
    pub fn bot_messages(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|s| match &s.action {
                Action::DeliverBot(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl IntoIterator for Script {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

/// Execute a script step by step on the tokio timer
///
/// Each step waits for its delay after the previous step was applied. The
/// callback decides whether to continue; returns the number of steps applied.
pub async fn run_script<F>(script: Script, mut apply: F) -> usize
where
    F: FnMut(Action) -> Flow,
{
    let mut applied = 0;

    for step in script {
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        match apply(step.action) {
            Flow::Continue => applied += 1,
            Flow::Stop => break,
        }
    }

    applied
}
