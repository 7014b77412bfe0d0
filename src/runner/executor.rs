//! Plan execution
//!
//! Walks a plan step by step: condition, run, message, sleep.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{Context, Plan, Task};
use std::process::{Command as StdCommand, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Runs (or dry-runs) a plan in a context
pub struct Executor<'a> {
    plan: &'a Plan,
    ctx: &'a Context,
}

impl<'a> Executor<'a> {
    pub fn new(plan: &'a Plan, ctx: &'a Context) -> Self {
        Executor { plan, ctx }
    }

    /// Log what every step would do, without executing anything
    ///
    /// Sleep values are still resolved, so an invalid one fails here too.
    pub fn dry_run(&self) -> ExecutionResult<()> {
        debug!("The plan: {:?}", self.plan.names());

        for task in self.plan.iter() {
            info!(">>> Running task {}", task.name);
            info!("condition: {}", task.condition.as_deref().unwrap_or("None"));
            info!("run: {}", task.run.as_deref().unwrap_or("None"));
            info!("message: {}", task.message.as_deref().unwrap_or("None"));
            match task.resolved_sleep()? {
                Some(seconds) => info!("sleep: {}", seconds),
                None => info!("sleep: None"),
            }
        }

        Ok(())
    }

    /// Execute every step in order, stopping at the first failing command
    pub fn run(&self) -> ExecutionResult<()> {
        info!("Running plan");

        for task in self.plan.iter() {
            self.run_step(task)?;
        }

        Ok(())
    }

    fn run_step(&self, task: &Task) -> ExecutionResult<()> {
        info!(">>> Running task {}", task.name);

        if let Some(run) = &task.run {
            let condition_passes = match &task.condition {
                Some(condition) => {
                    let passes = check_command(condition, self.ctx)?;
                    if !passes {
                        warn!("Condition (false) triggered for {}: {}", task.name, condition);
                    }
                    passes
                }
                None => true,
            };

            if condition_passes {
                debug!("Running {}", run);
                execute_command(&task.name, run, self.ctx)?;
            } else {
                debug!("Not running {} due to condition not passing", run);
            }
        }

        if let Some(message) = &task.message {
            info!("{}", message);
        }

        if let Some(seconds) = task.resolved_sleep()? {
            debug!("Sleeping for {}", seconds);
            thread::sleep(Duration::from_secs(seconds));
        }

        Ok(())
    }
}

/// Build a command running `script` through the context's interpreter
fn shell(script: &str, ctx: &Context) -> ExecutionResult<StdCommand> {
    let (program, interpreter_args) = ctx
        .interpreter
        .split_first()
        .ok_or(ExecutionError::NoInterpreter)?;

    let mut command = StdCommand::new(program);
    command.args(interpreter_args);
    command.arg(script);
    command.current_dir(&ctx.working_dir);
    command.envs(&ctx.env);

    Ok(command)
}

fn spawn_error(ctx: &Context, error: std::io::Error) -> ExecutionError {
    ExecutionError::Spawn {
        interpreter: ctx.interpreter.join(" "),
        error: error.to_string(),
    }
}

/// Execute a task's command with inherited stdio
pub fn execute_command(task_name: &str, script: &str, ctx: &Context) -> ExecutionResult<()> {
    let mut command = shell(script, ctx)?;
    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    let status = command.status().map_err(|e| spawn_error(ctx, e))?;

    if !status.success() {
        return Err(ExecutionError::CommandFailed {
            task: task_name.to_string(),
            code: status.code(),
        });
    }

    Ok(())
}

/// Check if a shell predicate succeeds, discarding its output
pub fn check_command(script: &str, ctx: &Context) -> ExecutionResult<bool> {
    let mut command = shell(script, ctx)?;
    command.stdout(Stdio::null());
    command.stderr(Stdio::null());

    let status = command.status().map_err(|e| spawn_error(ctx, e))?;
    Ok(status.success())
}
