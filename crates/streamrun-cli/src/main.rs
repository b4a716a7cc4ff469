//! streamrun CLI - check offers against a task and compile launch descriptors.

use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use streamrun_core::offer::{CPUS, MEM};
use streamrun_core::{
    FrameworkSettings, Offer, Parameters, Resource, Task, TaskKind, UuidTokens,
};

/// streamrun CLI - task descriptor tool
#[derive(Parser)]
#[command(name = "streamrun")]
#[command(about = "Match offers and build launch descriptors for streamrun tasks", long_about = None)]
struct Cli {
    /// Framework API base URL executors are fetched from
    #[arg(long, default_value = "http://127.0.0.1:6666")]
    api: String,

    /// Log level for this process and for launched executors
    /// (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether an offer satisfies the task
    Match {
        #[command(flatten)]
        task: TaskArgs,

        #[command(flatten)]
        offer: OfferArgs,
    },

    /// Compile a launch descriptor and print it as JSON
    Launch {
        #[command(flatten)]
        task: TaskArgs,

        #[command(flatten)]
        offer: OfferArgs,
    },

    /// Print the task summary and its JSON projection
    Show {
        #[command(flatten)]
        task: TaskArgs,
    },
}

#[derive(Args)]
struct TaskArgs {
    /// Task type (consumer, producer)
    #[arg(short = 't', long = "type", default_value = "consumer")]
    kind: TaskKind,

    /// Task ID
    #[arg(short, long)]
    id: String,

    /// Task parameter as key=value (repeatable)
    #[arg(short = 'p', long = "param")]
    params: Vec<String>,
}

#[derive(Args)]
struct OfferArgs {
    /// Agent the offer comes from
    #[arg(long, default_value = "agent-1")]
    agent: String,

    /// Offered CPUs
    #[arg(long, default_value_t = 1.0)]
    cpus: f64,

    /// Offered memory (MB)
    #[arg(long, default_value_t = 1024.0)]
    mem: f64,
}

impl TaskArgs {
    fn build(&self) -> Result<Task, Box<dyn std::error::Error>> {
        let mut params = Parameters::new();
        for pair in &self.params {
            let (key, value) = Parameters::parse_pair(pair)?;
            params.add(key, value);
        }
        Ok(Task::new(self.kind, self.id.as_str(), &params)?)
    }
}

impl OfferArgs {
    fn build(&self) -> Offer {
        Offer::new(format!("offer-{}", self.agent), self.agent.as_str())
            .with_hostname(self.agent.as_str())
            .with_resource(Resource::scalar(CPUS, self.cpus))
            .with_resource(Resource::scalar(MEM, self.mem))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = FrameworkSettings::default()
        .with_api(cli.api)
        .with_log_level(cli.log_level.as_str().to_ascii_lowercase());

    match cli.command {
        Commands::Match { task, offer } => {
            let task = task.build()?;
            let offer = offer.build();
            let diagnostic = task.matches(&offer);
            if diagnostic.is_empty() {
                println!("Offer {} satisfies task {}", offer.id, task.id());
            } else {
                println!("Offer {} declined: {}", offer.id, diagnostic);
            }
        }
        Commands::Launch { task, offer } => {
            let task = task.build()?;
            let offer = offer.build();
            let diagnostic = task.matches(&offer);
            if !diagnostic.is_empty() {
                return Err(format!("offer {} declined: {}", offer.id, diagnostic).into());
            }

            let descriptor = task.new_task_info(&offer, &settings, &UuidTokens)?;
            info!(task_id = %descriptor.task_id, "Launch descriptor ready");
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
        Commands::Show { task } => {
            let task = task.build()?;
            print!("{}", task);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_is_validated() {
        let cli = Cli::try_parse_from(["streamrun", "--log-level", "debug", "show", "--id", "t1"]).unwrap();
        assert_eq!(cli.log_level, Level::DEBUG);

        let result = Cli::try_parse_from(["streamrun", "--log-level", "loud", "show", "--id", "t1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_forwarded_lowercase() {
        assert_eq!(Level::WARN.as_str().to_ascii_lowercase(), "warn");
    }
}
