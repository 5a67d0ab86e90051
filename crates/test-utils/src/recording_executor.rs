use std::collections::HashSet;

use anyhow::{anyhow, bail};
use passplan::schedule::{Batch, Binding, Instance, ScheduleExecutor, ScheduledPass};

/// One call made by [`Schedule::execute`](passplan::schedule::Schedule::execute).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    BeginBatch(usize),
    Acquire { pass: String, instance: Instance },
    Run(String),
    Release { pass: String, instance: Instance },
    EndBatch(usize),
}

/// An executor that:
/// - records every call in order
/// - tracks which instances are live and rejects double acquisition
/// - can be told to fail a given pass
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub calls: Vec<Call>,
    live: HashSet<Instance>,
    fail_on: Option<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `run_pass` fail for the pass called `name`.
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Names of the passes run, in order.
    pub fn runs(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Run(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Instances still held once execution stopped.
    pub fn live(&self) -> &HashSet<Instance> {
        &self.live
    }
}

impl ScheduleExecutor for RecordingExecutor {
    type Error = anyhow::Error;

    fn begin_batch(&mut self, batch: &Batch) -> Result<(), Self::Error> {
        self.calls.push(Call::BeginBatch(batch.index));
        Ok(())
    }

    fn acquire(&mut self, pass: &ScheduledPass, binding: &Binding) -> Result<(), Self::Error> {
        if !self.live.insert(binding.instance) {
            bail!("'{}' acquired {} while it was live", pass.name, binding.instance);
        }
        self.calls.push(Call::Acquire {
            pass: pass.name.clone(),
            instance: binding.instance,
        });
        Ok(())
    }

    fn run_pass(&mut self, pass: &ScheduledPass) -> Result<(), Self::Error> {
        if self.fail_on.as_deref() == Some(pass.name.as_str()) {
            return Err(anyhow!("pass '{}' failed", pass.name));
        }
        self.calls.push(Call::Run(pass.name.clone()));
        Ok(())
    }

    fn release(&mut self, pass: &ScheduledPass, binding: &Binding) -> Result<(), Self::Error> {
        if !self.live.remove(&binding.instance) {
            bail!("'{}' released {} which was not live", pass.name, binding.instance);
        }
        self.calls.push(Call::Release {
            pass: pass.name.clone(),
            instance: binding.instance,
        });
        Ok(())
    }

    fn end_batch(&mut self, batch: &Batch) -> Result<(), Self::Error> {
        self.calls.push(Call::EndBatch(batch.index));
        Ok(())
    }
}
