//! Execution plans
//!
//! A [`Plan`] is the ordered list of steps produced by the planner. Dependency
//! edges are stored as positions into the plan, never as copies of tasks.

use crate::error::PlanResult;
use crate::runner::Task;

/// One scheduled task instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The fully interpolated task
    pub task: Task,

    /// Positions of the steps this one depends on, all earlier than itself
    pub depends: Vec<usize>,
}

/// Topologically ordered, deduplicated steps for one requested task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    /// Rebind the dependency references of every scheduled task onto the
    /// scheduled steps themselves
    pub fn from_scheduled(scheduled: Vec<Task>) -> PlanResult<Self> {
        let mut steps = Vec::with_capacity(scheduled.len());

        for task in &scheduled {
            let depends = task.rebind_dependencies(&scheduled)?;
            steps.push(Step {
                task: task.clone(),
                depends,
            });
        }

        Ok(Plan { steps })
    }

    /// All steps in execution order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.steps.iter().map(|step| &step.task)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in execution order
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|task| task.name.as_str()).collect()
    }

    /// The scheduled tasks a step depends on
    pub fn dependencies_of(&self, index: usize) -> Vec<&Task> {
        self.steps
            .get(index)
            .map(|step| step.depends.iter().map(|&i| &self.steps[i].task).collect())
            .unwrap_or_default()
    }
}
