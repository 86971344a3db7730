//! Spinners shown while agents are thinking

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use roundtable_application::EventRecorder;
use roundtable_domain::{AgentRole, RoundMode, RoundtableEvent};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Shows a spinner for every agent the run is waiting on.
///
/// Spinners are cleared as soon as the next event arrives, so register this
/// recorder ahead of the console renderer.
pub struct ProgressReporter {
    multi: MultiProgress,
    panelists: Mutex<Vec<String>>,
    active: Mutex<Vec<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            panelists: Mutex::new(Vec::new()),
            active: Mutex::new(Vec::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spin(&self, prefix: &str, message: &str) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(prefix.to_string());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self::lock(&self.active).push(pb);
    }

    fn clear(&self) {
        for pb in Self::lock(&self.active).drain(..) {
            pb.finish_and_clear();
        }
    }

    /// Number of spinners currently on screen
    pub fn active_count(&self) -> usize {
        Self::lock(&self.active).len()
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRecorder for ProgressReporter {
    fn handle_event(&self, event: &RoundtableEvent) {
        self.clear();

        match event {
            RoundtableEvent::RoundtableStart { agents, .. } => {
                *Self::lock(&self.panelists) = agents
                    .iter()
                    .filter(|a| a.role == AgentRole::Panelist)
                    .map(|a| a.name.clone())
                    .collect();
            }
            RoundtableEvent::RoundStart {
                mode: RoundMode::Concurrent,
                ..
            } => {
                let names = Self::lock(&self.panelists).clone();
                for name in names {
                    self.spin(&name, &"thinking...".dimmed().to_string());
                }
            }
            RoundtableEvent::AgentStart {
                agent_name, round, ..
            } if RoundMode::for_round(*round) == RoundMode::Sequential => {
                self.spin(agent_name, &"thinking...".dimmed().to_string());
            }
            RoundtableEvent::SynthesisStart { agent_name, .. } => {
                self.spin(agent_name, &"synthesizing...".dimmed().to_string());
            }
            _ => {}
        }
    }
}
