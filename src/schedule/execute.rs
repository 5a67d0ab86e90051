// src/schedule/execute.rs

//! Consume API: drive a host backend through a schedule.
//!
//! The planner never runs anything itself. A host implements
//! [`ScheduleExecutor`] to bind instances to real objects and to run each
//! pass's actual work; [`Schedule::execute`] calls it in a valid order.

use crate::schedule::{Batch, Binding, PassEvent, Schedule, ScheduledPass};

/// Host-side hooks invoked by [`Schedule::execute`].
///
/// Production code maps instances onto backend objects; tests can record
/// the calls instead.
pub trait ScheduleExecutor {
    type Error;

    /// Called before the first pass of each batch.
    fn begin_batch(&mut self, _batch: &Batch) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `binding.instance` now belongs to `binding.resource`.
    fn acquire(&mut self, _pass: &ScheduledPass, _binding: &Binding) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Perform the pass's real work.
    fn run_pass(&mut self, pass: &ScheduledPass) -> Result<(), Self::Error>;

    /// `binding.resource` is dead; its instance may be reused.
    fn release(&mut self, _pass: &ScheduledPass, _binding: &Binding) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called after the last pass of each batch.
    fn end_batch(&mut self, _batch: &Batch) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<C> Schedule<C> {
    /// Walk every batch and pass in order, issuing each pass's
    /// [`events`](ScheduledPass::events). Stops at the first error.
    ///
    /// Passes of one batch are issued sequentially here; a host that wants
    /// concurrency can walk [`batches`](Schedule::batches) itself.
    pub fn execute<E: ScheduleExecutor>(&self, executor: &mut E) -> Result<(), E::Error> {
        for batch in &self.batches {
            executor.begin_batch(batch)?;
            for pass in &batch.passes {
                for event in pass.events() {
                    match event {
                        PassEvent::Release(b) => executor.release(pass, &b)?,
                        PassEvent::Acquire(b) => executor.acquire(pass, &b)?,
                        PassEvent::Run => executor.run_pass(pass)?,
                    }
                }
            }
            executor.end_batch(batch)?;
        }
        Ok(())
    }
}
