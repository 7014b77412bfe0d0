//! Dependency planner
//!
//! Expands a requested task (and its arguments) into a [`Plan`]: every
//! dependency before its dependents, every distinct task instance once.
//!
//! The walk is depth-first over an explicit stack of frames. A frame holds the
//! interpolated candidate and the index of the next dependency reference to
//! look at; a candidate is scheduled once all its references name scheduled
//! steps. A reference naming a frame still on the stack is a cycle.

use crate::config::Config;
use crate::error::{PlanError, PlanResult};
use crate::runner::{split_reference, Plan, Task};
use std::collections::HashMap;
use tracing::debug;

/// Default bound on the length of a dependency chain
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Plans task executions against a fixed set of declarations
///
/// Each call to [`Planner::plan`] starts from scratch, so one planner can
/// serve any number of requests.
#[derive(Debug, Clone)]
pub struct Planner {
    tasks: HashMap<String, Task>,
    max_depth: usize,
}

/// A task instance being expanded
struct Frame {
    task: Task,
    args: Vec<String>,
    next: usize,
}

impl Planner {
    /// Create a planner over task declarations keyed by name
    pub fn new(tasks: HashMap<String, Task>) -> Self {
        Planner {
            tasks,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Create a planner from a parsed declaration file
    pub fn from_config(config: Config) -> Self {
        Self::new(
            config
                .tasks
                .into_iter()
                .map(|(name, def)| (name.clone(), Task::from_config(name, def)))
                .collect(),
        )
    }

    /// Bound the dependency chain length
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Declarations known to this planner
    pub fn tasks(&self) -> &HashMap<String, Task> {
        &self.tasks
    }

    /// Expand `name` with top-level `args` into an execution plan
    pub fn plan(&self, name: &str, args: &[String]) -> PlanResult<Plan> {
        let mut scheduled: Vec<Task> = Vec::new();
        let mut stack = vec![self.frame(name, args)?];

        while let Some(frame) = stack.last_mut() {
            let Some(reference) = frame.task.depends.get(frame.next).cloned() else {
                if let Some(done) = stack.pop() {
                    schedule(done, &mut scheduled)?;
                }
                continue;
            };
            frame.next += 1;

            if is_scheduled(&scheduled, &reference) {
                continue;
            }

            if let Some(start) = stack.iter().position(|f| f.task.name == reference) {
                let mut cycle: Vec<&str> = stack[start..]
                    .iter()
                    .map(|f| f.task.name.as_str())
                    .collect();
                cycle.push(&reference);
                let cycle = cycle.join(" -> ");

                let stuck = &stack[stack.len() - 1];
                return Err(PlanError::Unresolvable {
                    task: stuck.task.name.clone(),
                    args: stuck.args.join(" "),
                    dependency: reference,
                    cycle: Some(cycle),
                });
            }

            if stack.len() >= self.max_depth {
                return Err(PlanError::DepthExceeded {
                    depth: self.max_depth,
                    task: reference,
                });
            }

            let (dependency, dependency_args) = split_reference(&reference);
            debug!("Dependency {} has args {:?}", dependency, dependency_args);
            stack.push(self.frame(dependency, &dependency_args)?);
        }

        debug!(
            "Plan requires {:?}",
            scheduled.iter().map(|t| t.name.as_str()).collect::<Vec<_>>()
        );
        Plan::from_scheduled(scheduled)
    }

    fn frame(&self, name: &str, args: &[String]) -> PlanResult<Frame> {
        let declaration = self
            .tasks
            .get(name)
            .ok_or_else(|| PlanError::UnknownTask(name.to_string()))?;

        Ok(Frame {
            task: declaration.apply_args(args)?,
            args: args.to_vec(),
            next: 0,
        })
    }
}

fn is_scheduled(scheduled: &[Task], reference: &str) -> bool {
    scheduled.iter().any(|step| step.name == reference)
}

/// Append a fully expanded frame, unless an equal step is already there
fn schedule(frame: Frame, scheduled: &mut Vec<Task>) -> PlanResult<()> {
    // A dependency that rendered under another name never shows up
    if let Some(missing) = frame
        .task
        .depends
        .iter()
        .find(|reference| !is_scheduled(scheduled, reference))
    {
        return Err(PlanError::Unresolvable {
            task: frame.task.name.clone(),
            args: frame.args.join(" "),
            dependency: missing.clone(),
            cycle: None,
        });
    }

    if scheduled.contains(&frame.task) {
        debug!("Already planned: {}", frame.task.name);
    } else {
        debug!("Adding step: {}", frame.task);
        scheduled.push(frame.task);
    }

    Ok(())
}
