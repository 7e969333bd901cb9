use anyhow::Context;
use clap::Parser;
use kafka_consumer_bridge::adapters::outgoing::BrokerConsumer;
use kafka_consumer_bridge::application::{start_partitions, StartupMode};
use kafka_consumer_bridge::config::AppConfig;
use kafka_consumer_bridge::ports::outgoing::ConsumerHandle;
use kafka_consumer_bridge::TopicPartition;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Resolve starting offsets for Kafka partitions.
#[derive(Parser, Debug)]
#[command(name = "kafka-bridge", version)]
struct Cli {
    /// Consumer properties file
    #[arg(short, long, env = "KAFKA_BRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Broker address, overrides bootstrap.servers
    #[arg(short, long)]
    bootstrap_server: Option<String>,

    /// earliest, latest or timestamp
    #[arg(short = 'm', long)]
    startup_mode: Option<StartupMode>,

    /// Target timestamp in epoch millis for the timestamp mode
    #[arg(short, long)]
    timestamp_ms: Option<i64>,

    /// Partitions as topic:partition
    #[arg(required = true)]
    partitions: Vec<TopicPartition>,
}

async fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match (&cli.config, &cli.bootstrap_server) {
        (Some(path), _) => AppConfig::load(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        (None, Some(server)) => AppConfig::new(server.clone()),
        (None, None) => anyhow::bail!("either --config or --bootstrap-server is required"),
    };

    if let Some(server) = &cli.bootstrap_server {
        config.bootstrap_server = server.clone();
    }
    if let Some(mode) = cli.startup_mode {
        config.startup_mode = mode;
    }
    if let Some(ts) = cli.timestamp_ms {
        config.startup_timestamp_ms = Some(ts);
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli).await?;

    let mut consumer = BrokerConsumer::from_config(&config)
        .await
        .with_context(|| format!("connecting to {}", config.bootstrap_server))?;
    let bridge = config.call_bridge();

    start_partitions(&bridge, &mut consumer, &cli.partitions, config.startup_mode).await?;

    for partition in consumer.assignment() {
        match consumer.position(&partition) {
            Some(offset) => println!("{}\t{}", partition, offset),
            None => println!("{}\t-", partition),
        }
    }

    Ok(())
}
