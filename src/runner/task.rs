//! Task model
//!
//! A [`Task`] is a declaration after zero or more rounds of argument
//! interpolation. Declarations are never mutated: [`Task::apply_args`] always
//! derives a new instance.

use crate::config;
use crate::error::{ExecutionError, ExecutionResult, PlanError, PlanResult};
use crate::runner::{args_to_map, interpolate, interpolate_opt};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// A task declaration or one of its interpolated instances
///
/// Two tasks are the same planned step when every field matches, dependency
/// references included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Task {
    /// Task name, suffixed with its arguments once interpolated
    pub name: String,

    /// Command text
    pub run: Option<String>,

    /// Shell predicate guarding `run`
    pub condition: Option<String>,

    /// Message to emit after `run`
    pub message: Option<String>,

    /// Seconds to sleep, parsed only once interpolation is over
    pub sleep: Option<String>,

    /// Dependency references, each naming the step it waits for
    pub depends: Vec<String>,
}

impl Task {
    /// Create a bare task with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Task {
            name: name.into(),
            ..Task::default()
        }
    }

    /// Create a task from its declaration
    pub fn from_config(name: String, config: config::TaskDef) -> Self {
        Task {
            name,
            run: config.run,
            condition: config.condition,
            message: config.message,
            sleep: config.sleep,
            depends: config.depends,
        }
    }

    /// Derive the instance of this task for an argument list
    ///
    /// Substitutes `{key}` in every text field and dependency reference. The
    /// space-joined argument list is appended to the name and to each reference
    /// unless already present, so distinct argument sets give distinct names.
    pub fn apply_args(&self, args: &[String]) -> PlanResult<Task> {
        if args.is_empty() {
            return Ok(self.clone());
        }

        let wrap = |source| PlanError::Interpolation {
            task: self.name.clone(),
            source,
        };

        let args_map = args_to_map(args).map_err(wrap)?;
        let args_string = args.join(" ");

        let task = Task {
            name: with_suffix(interpolate(&self.name, &args_map).map_err(wrap)?, &args_string),
            run: interpolate_opt(self.run.as_deref(), &args_map).map_err(wrap)?,
            condition: interpolate_opt(self.condition.as_deref(), &args_map).map_err(wrap)?,
            message: interpolate_opt(self.message.as_deref(), &args_map).map_err(wrap)?,
            sleep: interpolate_opt(self.sleep.as_deref(), &args_map).map_err(wrap)?,
            depends: self
                .depends
                .iter()
                .map(|reference| apply_to_reference(reference, &args_map, &args_string))
                .collect::<Result<Vec<_>, _>>()
                .map_err(wrap)?,
        };

        debug!("Interpolated task: {}", task);
        Ok(task)
    }

    /// Sleep duration in seconds, validated now that interpolation is over
    pub fn resolved_sleep(&self) -> ExecutionResult<Option<u64>> {
        let Some(sleep) = &self.sleep else {
            return Ok(None);
        };

        sleep
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ExecutionError::InvalidSleep {
                task: self.name.clone(),
                value: sleep.clone(),
            })
    }

    /// Map every dependency reference onto the finished step it names
    ///
    /// Returns positions into `finished`, in declared order.
    pub fn rebind_dependencies(&self, finished: &[Task]) -> PlanResult<Vec<usize>> {
        self.depends
            .iter()
            .map(|reference| {
                finished
                    .iter()
                    .position(|step| step.name == *reference)
                    .ok_or_else(|| PlanError::DanglingDependency {
                        task: self.name.clone(),
                        dependency: reference.clone(),
                    })
            })
            .collect()
    }
}

/// Split a dependency reference into a task name and its arguments
///
/// `"build target:a mode:fast"` gives `("build", ["target:a", "mode:fast"])`.
pub fn split_reference(reference: &str) -> (&str, Vec<String>) {
    match reference.split_once(' ') {
        Some((name, rest)) => (name, rest.split(' ').map(str::to_string).collect()),
        None => (reference, Vec::new()),
    }
}

fn with_suffix(name: String, args_string: &str) -> String {
    if name.contains(args_string) {
        name
    } else {
        format!("{} {}", name, args_string)
    }
}

/// A reference is a bare task, so it receives the caller's arguments the same
/// way a name does
fn apply_to_reference(
    reference: &str,
    args_map: &HashMap<String, String>,
    args_string: &str,
) -> crate::error::InterpolationResult<String> {
    Ok(with_suffix(interpolate(reference, args_map)?, args_string))
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(field: &Option<String>) -> &str {
            field.as_deref().unwrap_or("-")
        }

        write!(
            f,
            "{}: [{}] ({}?)-> {} (says {}, sleeps {})",
            self.name,
            self.depends.join(", "),
            show(&self.condition),
            show(&self.run),
            show(&self.message),
            show(&self.sleep),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[&str]) -> Vec<String> {
        pairs.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_from_config() {
        let def = config::TaskDef {
            run: Some("make".to_string()),
            sleep: Some("2".to_string()),
            depends: vec!["fetch".to_string()],
            ..config::TaskDef::default()
        };

        let task = Task::from_config("build".to_string(), def);
        assert_eq!(task.name, "build");
        assert_eq!(task.run.as_deref(), Some("make"));
        assert_eq!(task.depends, vec!["fetch".to_string()]);
    }

    #[test]
    fn test_apply_no_args_is_identity() {
        let task = Task {
            run: Some("{untouched}".to_string()),
            ..Task::new("C")
        };

        assert_eq!(task.apply_args(&[]).unwrap(), task);
    }

    #[test]
    fn test_double_interpolate_every_field() {
        let template = "{arg1} {arg2}".to_string();
        let task = Task {
            run: Some(template.clone()),
            condition: Some(template.clone()),
            message: Some(template.clone()),
            sleep: Some(template),
            ..Task::new("C")
        };

        let applied = task
            .apply_args(&args(&["arg1:argument_to_C", "arg2:argument_to_C_2"]))
            .unwrap();

        let expected = Some("argument_to_C argument_to_C_2".to_string());
        assert_eq!(applied.run, expected);
        assert_eq!(applied.condition, expected);
        assert_eq!(applied.message, expected);
        assert_eq!(applied.sleep, expected);
        assert_eq!(applied.name, "C arg1:argument_to_C arg2:argument_to_C_2");
    }

    #[test]
    fn test_apply_args_leaves_declaration_untouched() {
        let task = Task {
            run: Some("{arg}".to_string()),
            ..Task::new("C")
        };

        let a = task.apply_args(&args(&["arg:a"])).unwrap();
        let b = task.apply_args(&args(&["arg:b"])).unwrap();

        assert_eq!(task.run.as_deref(), Some("{arg}"));
        assert_eq!(a.name, "C arg:a");
        assert_eq!(b.name, "C arg:b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_apply_args_to_dependency_references() {
        let task = Task {
            depends: args(&["C arg2:fixed arg:{argA}", "D"]),
            ..Task::new("A")
        };

        let applied = task.apply_args(&args(&["argA:argument_to_A"])).unwrap();
        assert_eq!(applied.name, "A argA:argument_to_A");
        assert_eq!(
            applied.depends,
            args(&[
                "C arg2:fixed arg:argument_to_A argA:argument_to_A",
                "D argA:argument_to_A",
            ])
        );
    }

    #[test]
    fn test_suffix_not_repeated() {
        let task = Task::new("C arg:x");
        let applied = task.apply_args(&args(&["arg:x"])).unwrap();
        assert_eq!(applied.name, "C arg:x");
    }

    #[test]
    fn test_apply_unknown_argument() {
        let task = Task {
            run: Some("{missing}".to_string()),
            ..Task::new("C")
        };

        let result = task.apply_args(&args(&["arg:x"]));
        assert!(matches!(result, Err(PlanError::Interpolation { .. })));
    }

    #[test]
    fn test_apply_malformed_argument() {
        let result = Task::new("C").apply_args(&args(&["nocolon"]));
        assert!(matches!(
            result,
            Err(PlanError::Interpolation {
                source: crate::error::InterpolationError::MalformedArgument(_),
                ..
            })
        ));
    }

    #[test]
    fn test_resolved_sleep() {
        let mut task = Task::new("D");
        assert_eq!(task.resolved_sleep().unwrap(), None);

        task.sleep = Some("3".to_string());
        assert_eq!(task.resolved_sleep().unwrap(), Some(3));
    }

    #[test]
    fn test_sleep_placeholder_deferred() {
        let task = Task {
            sleep: Some("{seconds}".to_string()),
            ..Task::new("P")
        };
        assert!(matches!(
            task.resolved_sleep(),
            Err(ExecutionError::InvalidSleep { .. })
        ));

        let applied = task.apply_args(&args(&["seconds:5"])).unwrap();
        assert_eq!(applied.resolved_sleep().unwrap(), Some(5));

        let applied = task.apply_args(&args(&["seconds:soon"])).unwrap();
        assert!(applied.resolved_sleep().is_err());
    }

    #[test]
    fn test_rebind_dependencies() {
        let finished = vec![Task::new("E"), Task::new("C arg:x"), Task::new("D")];
        let task = Task {
            depends: args(&["D", "C arg:x"]),
            ..Task::new("A")
        };

        assert_eq!(task.rebind_dependencies(&finished).unwrap(), vec![2, 1]);
    }

    #[test]
    fn test_rebind_dangling_dependency() {
        let task = Task {
            depends: args(&["ghost"]),
            ..Task::new("A")
        };

        let result = task.rebind_dependencies(&[Task::new("E")]);
        assert_eq!(
            result,
            Err(PlanError::DanglingDependency {
                task: "A".to_string(),
                dependency: "ghost".to_string(),
            })
        );
    }

    #[test]
    fn test_split_reference() {
        assert_eq!(split_reference("D"), ("D", vec![]));
        assert_eq!(
            split_reference("C argument1_to_C argument2_to_C"),
            ("C", args(&["argument1_to_C", "argument2_to_C"]))
        );
    }

    #[test]
    fn test_display() {
        let task = Task {
            run: Some("make".to_string()),
            depends: args(&["fetch"]),
            ..Task::new("build")
        };
        assert_eq!(
            task.to_string(),
            "build: [fetch] (-?)-> make (says -, sleeps -)"
        );
    }
}
