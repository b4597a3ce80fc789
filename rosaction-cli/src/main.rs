use anyhow::Result;
use clap::{Parser, Subcommand};
use rosaction::{action_list, feedback_type, goal_type, result_type, MasterClient, TopicType};
use tracing::debug;

const CALLER_ID: &str = "/rosaction";

/// Discover and inspect ROS1 actions.
#[derive(Parser, Debug)]
#[clap(name = env!("CARGO_BIN_NAME"), version)]
struct Args {
    /// Master URI. Defaults to ROS_MASTER_URI, then http://localhost:11311.
    #[clap(long)]
    master_uri: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered actions, one per line.
    List,
    /// Print the message type of one action channel.
    Type {
        /// Action namespace, e.g. /move_base.
        action: String,
        /// Resolve the feedback channel instead of the goal.
        #[clap(long, conflicts_with = "result")]
        feedback: bool,
        /// Resolve the result channel instead of the goal.
        #[clap(long)]
        result: bool,
    },
    /// Show every channel of one action.
    Info {
        /// Action namespace, e.g. /move_base.
        action: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    debug!(?args);

    let master = match &args.master_uri {
        Some(uri) => MasterClient::with_uri(CALLER_ID, uri)?,
        None => MasterClient::new(CALLER_ID)?,
    };
    match args.command {
        Command::List => {
            for action in action_list(&master)? {
                println!("{action}");
            }
        }
        Command::Type {
            action,
            feedback,
            result,
        } => {
            let (channel, resolved) = if feedback {
                ("feedback", feedback_type(&master, &action)?)
            } else if result {
                ("result", result_type(&master, &action)?)
            } else {
                ("goal", goal_type(&master, &action)?)
            };
            match resolved {
                Some(topic) => println!("{}", topic.msg_type),
                None => return Err(missing_channel_error(channel, &action)),
            }
        }
        Command::Info { action } => {
            let channels = [
                ("goal", goal_type(&master, &action)?),
                ("feedback", feedback_type(&master, &action)?),
                ("result", result_type(&master, &action)?),
            ];
            if channels.iter().all(|(_, resolved)| resolved.is_none()) {
                anyhow::bail!("no action registered at {action}");
            }
            println!("action: {action}");
            for (label, resolved) in channels {
                match resolved {
                    Some(TopicType { name, msg_type }) => println!("{label}: {msg_type} ({name})"),
                    None => println!("{label}: <not registered>"),
                }
            }
        }
    }
    Ok(())
}

fn missing_channel_error(channel: &str, action: &str) -> anyhow::Error {
    anyhow::anyhow!("no {channel} type registered for {action}")
}
