use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Clap;
use rocket::routes;
use tokio::sync::mpsc::unbounded_channel;

mod bot;
use bot::Pushbot;

mod config;
use config::PushbotConfig;

mod webhooks;
use webhooks::{github_commits, EventSender};

#[derive(Clap)]
#[clap(version = "0.1")]
struct Opts {
    /// Configuration file for pushbot
    #[clap(short, long, parse(from_os_str))]
    config: PathBuf,
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    let config_file = File::open(&opts.config)
        .with_context(|| format!("couldn't open {}:", opts.config.display()))?;
    let config: PushbotConfig = serde_yaml::from_reader(BufReader::new(config_file))
        .context("couldn't parse config file")?;

    let (sender, receiver) = unbounded_channel();

    let pushbot = Pushbot::new(config).context("failed to create pushbot")?;
    pushbot.init().await.context("failed to init pushbot")?;
    tokio::spawn(async move { pushbot.run(receiver).await });

    let rocket = rocket::build()
        .mount("/", routes![github_commits])
        .manage(EventSender(sender));
    rocket.launch().await.map_err(|err| anyhow::anyhow!(err))
}
