//! Main CLI application

use crate::config::{load_env_file, parse_config_auto, parse_config_file, Config};
use crate::error::PaqueError;
use crate::logging::{init_logging, Verbosity};
use crate::runner::{Context, Executor, Plan, Planner};
use anyhow::anyhow;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;
use tracing::info;

/// CLI application
pub struct App {
    /// Planner over the parsed declarations
    planner: Planner,
    /// Execution context
    ctx: Context,
}

impl App {
    /// Create a new app from the discovered paquefile
    pub fn new() -> Result<Self, PaqueError> {
        let (config, config_path) = parse_config_auto()?;
        Self::from_config(config, config_path)
    }

    /// Create app with a specific paquefile
    pub fn with_config_file(path: PathBuf) -> Result<Self, PaqueError> {
        let config = parse_config_file(&path)?;
        Self::from_config(config, path)
    }

    fn from_config(config: Config, config_path: PathBuf) -> Result<Self, PaqueError> {
        let env = load_env_file(&config_path)?;
        let ctx = Context::new().with_env(env);

        Ok(App {
            planner: Planner::from_config(config),
            ctx,
        })
    }

    /// Override the interpreter used by run and condition
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.ctx = self.ctx.with_interpreter(interpreter);
        self
    }

    /// One line per declared task, sorted by name
    pub fn list(&self) -> Vec<String> {
        let mut tasks: Vec<_> = self.planner.tasks().values().collect();
        tasks.sort_by(|a, b| a.name.cmp(&b.name));

        tasks
            .into_iter()
            .map(|task| {
                if task.depends.is_empty() {
                    task.name.clone()
                } else {
                    format!("{} (depends: {})", task.name, task.depends.join(", "))
                }
            })
            .collect()
    }

    /// Plan a task without running it
    pub fn plan(&self, task: &str, args: &[String]) -> Result<Plan, PaqueError> {
        info!(">>> Planning execution for task {}", task);
        let plan = self.planner.plan(task, args)?;
        info!(">>> Plan requires {:?}", plan.names());
        Ok(plan)
    }

    /// Plan a task and run (or dry-run) the plan
    pub fn run_task(&self, task: &str, args: &[String], dry_run: bool) -> Result<(), PaqueError> {
        let plan = self.plan(task, args)?;
        let executor = Executor::new(&plan, &self.ctx);

        if dry_run {
            executor.dry_run()?;
        } else {
            executor.run()?;
        }

        Ok(())
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("paque")
        .version(crate::VERSION)
        .about("Paque: not make, but a small YAML task runner")
        .arg(
            Arg::new("task")
                .value_name("TASK")
                .help("Task to run from the paquefile")
                .required_unless_present_any(["list", "completions"]),
        )
        .arg(
            Arg::new("args")
                .value_name("KEY:VALUE")
                .help("Arguments for the task, substituted into its {key} placeholders")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to the paquefile"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Dry run the plan")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List the declared tasks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("interpreter")
                .long("interpreter")
                .value_name("COMMAND")
                .help("Interpreter for run and condition, e.g. \"bash -c\""),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Print a shell completion script")
                .value_parser(value_parser!(Shell)),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output, warnings and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output besides commands and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .visible_alias("debug")
                .help("Set logging to debug level")
                .action(ArgAction::SetTrue),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Run the CLI application with process arguments
pub fn run() -> anyhow::Result<()> {
    run_with_matches(&build_command().get_matches())
}

/// Run the CLI application with parsed arguments
pub fn run_with_matches(matches: &ArgMatches) -> anyhow::Result<()> {
    if let Some(shell) = matches.get_one::<Shell>("completions") {
        let mut cmd = build_command();
        clap_complete::generate(*shell, &mut cmd, "paque", &mut io::stdout());
        return Ok(());
    }

    init_logging(get_verbosity(matches))?;

    let mut app = match matches.get_one::<String>("file") {
        Some(path) => App::with_config_file(PathBuf::from(path))?,
        None => App::new()?,
    };

    if let Some(interpreter) = matches.get_one::<String>("interpreter") {
        app = app.with_interpreter(interpreter.split_whitespace().map(str::to_string).collect());
    }

    if matches.get_flag("list") {
        for line in app.list() {
            println!("{}", line);
        }
        return Ok(());
    }

    let task = matches
        .get_one::<String>("task")
        .ok_or_else(|| anyhow!("no task given"))?;
    let args: Vec<String> = matches
        .get_many::<String>("args")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    app.run_task(task, &args, matches.get_flag("dry-run"))?;
    Ok(())
}
