//! Search driver (C5): depth-first exploration of the database tree to
//! saturation, plus the runtime-limits config that guards against
//! non-terminating programs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::database::Database;
use crate::error::DriverError;
use crate::rules::Program;
use crate::stepper::step;

/// Caller-supplied limits on search, mirroring the reference engine's
/// hardcoded `MAX_ITERATIONS` / `MAX_SUBSTITUTIONS` safety guards but as
/// explicit, optional configuration rather than compiled-in constants.
#[derive(Clone, Default)]
pub struct SolverConfig {
    /// Maximum number of `step` invocations before the driver gives up
    /// and returns whatever saturated models it has collected so far.
    pub max_steps: Option<usize>,
    /// Stop once this many saturated models have been collected.
    pub max_models: Option<usize>,
    /// Wall-clock deadline, checked at the top of each loop iteration.
    pub deadline: Option<Instant>,
    /// Cooperative cancellation flag.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SolverConfig {
    pub fn unbounded() -> Self {
        Self::default()
    }

    fn should_stop(&self, steps_taken: usize, models_found: usize) -> bool {
        if let Some(max) = self.max_steps {
            if steps_taken >= max {
                return true;
            }
        }
        if let Some(max) = self.max_models {
            if models_found >= max {
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return true;
            }
        }
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return true;
            }
        }
        false
    }
}

/// Explores the database tree rooted at `program.db` to saturation,
/// collecting every saturated model. An optional `pause_hook` runs
/// between loop iterations; it may observe the working stack but must
/// never mutate solver state (it is given only a shared reference).
#[instrument(level = "debug", skip_all)]
pub fn run(
    program: &Program,
    config: &SolverConfig,
    mut pause_hook: Option<&mut dyn FnMut(&[Database])>,
) -> Result<Vec<Database>, DriverError> {
    let mut stack = vec![program.db.clone()];
    let mut models = Vec::new();
    let mut steps_taken = 0usize;

    while let Some(db) = stack.last() {
        if config.should_stop(steps_taken, models.len()) {
            warn!(
                steps_taken,
                models_found = models.len(),
                "search stopped early by configured limit or cancellation"
            );
            break;
        }

        if let Some(hook) = pause_hook.as_deref_mut() {
            hook(&stack);
        }

        if db.queue_is_empty() {
            let db = stack.pop().expect("stack non-empty by loop condition");
            models.push(db);
            continue;
        }

        steps_taken += 1;
        let successors = step(&program.rules, &program.conclusions, db)?;
        stack.pop();
        match successors.len() {
            0 => { /* pruned: constraint violated or choice exhausted */ }
            _ => {
                // DFS: push in reverse so the first alternative is
                // explored first (it ends up on top of the stack).
                for successor in successors.into_iter().rev() {
                    stack.push(successor);
                }
            }
        }
    }

    info!(models_found = models.len(), steps_taken, "search complete");
    Ok(models)
}
