//! Train the phishing-URL DQN agent on a feature dataset.

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    optim::{adaptor::OptimizerAdaptor, Adam, AdamConfig},
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use phishnet::{
    agent::UrlAgent,
    config::AgentConfig,
    dataset::DatasetReader,
    memory::Transition,
    model::{ModelConfig, UrlQNet},
};

type B = Autodiff<NdArray>;
type Model = UrlQNet<B>;
type Agent = UrlAgent<B, Model, OptimizerAdaptor<Adam<NdArray>, Model, B>>;

#[derive(Parser, Debug)]
#[command(about = "Train the phishing-URL DQN agent")]
struct Args {
    /// Path to the feature dataset
    dataset: PathBuf,

    /// Number of passes over the training slice
    #[arg(long, default_value_t = 90)]
    epochs: usize,

    /// Transitions per pass; records beyond this stay held out for evaluation
    #[arg(long, default_value_t = 3600)]
    steps: usize,

    /// Transitions recorded at the start of each pass before training begins
    #[arg(long, default_value_t = 50)]
    warmup: usize,

    /// Where to write the trained model parameters
    #[arg(long, default_value = "models/phishnet")]
    model_out: PathBuf,

    /// Replay memory capacity
    #[arg(long)]
    capacity: Option<usize>,

    /// Transitions sampled per training step
    #[arg(long)]
    batch_size: Option<usize>,

    /// Discount factor
    #[arg(long)]
    gamma: Option<f32>,

    /// Learning rate
    #[arg(long)]
    lr: Option<f64>,

    /// Per-invocation exploration decay
    #[arg(long)]
    epsilon_decay: Option<f32>,
}

impl Args {
    fn agent_config(&self) -> AgentConfig {
        let mut config = AgentConfig::new();
        if let Some(capacity) = self.capacity {
            config = config.with_memory_capacity(capacity);
        }
        if let Some(batch_size) = self.batch_size {
            config = config.with_batch_size(batch_size);
        }
        if let Some(gamma) = self.gamma {
            config = config.with_gamma(gamma);
        }
        if let Some(lr) = self.lr {
            config = config.with_lr(lr);
        }
        if let Some(decay) = self.epsilon_decay {
            config = config.with_epsilon_decay(decay);
        }
        config
    }
}

struct EpochStats {
    reward_sum: f32,
    steps: usize,
    mean_loss: Option<f32>,
}

fn run_epoch(agent: &mut Agent, args: &Args) -> Result<EpochStats> {
    let mut records = DatasetReader::open(&args.dataset)
        .with_context(|| format!("opening dataset {}", args.dataset.display()))?;

    let first = records.next().context("dataset is empty")??;
    let mut state = first.features;
    let mut label = first.label;

    let mut reward_sum = 0.0;
    let mut steps = 0;
    let mut loss_sum = 0.0;
    let mut loss_count = 0;

    for record in records.take(args.steps) {
        let record = record?;

        let action = agent.act(&state);
        let reward = if action == label { 1.0 } else { -1.0 };

        agent.record(Transition {
            state,
            action,
            reward,
            next_state: record.features,
            done: false,
        });

        reward_sum += reward;
        steps += 1;

        // Let the buffer fill before the first updates of each pass
        if steps > args.warmup {
            if let Some(loss) = agent.learn() {
                loss_sum += loss;
                loss_count += 1;
            }
        }

        state = record.features;
        label = record.label;
    }

    if steps == 0 {
        bail!("dataset holds fewer than 2 records");
    }

    Ok(EpochStats {
        reward_sum,
        steps,
        mean_loss: (loss_count > 0).then(|| loss_sum / loss_count as f32),
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let device = NdArrayDevice::default();
    let config = args.agent_config();
    let model_config = ModelConfig::new();
    let mut agent: Agent = UrlAgent::new(
        model_config.init(&device),
        model_config.init(&device),
        AdamConfig::new().init(),
        &config,
        device,
    );

    println!(
        "Training on {} for {} epochs ({} transitions per pass)",
        args.dataset.display(),
        args.epochs,
        args.steps
    );

    let pb = ProgressBar::new(args.epochs as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    for epoch in 0..args.epochs {
        let stats = run_epoch(&mut agent, &args)?;
        let avg_reward = stats.reward_sum / stats.steps as f32;

        let mean_loss = stats
            .mean_loss
            .map_or_else(|| "n/a".to_owned(), |l| format!("{l:.6}"));
        info!(
            "epoch {epoch}: total reward {}, average reward {avg_reward:.4}, epsilon {:.4}, mean loss {mean_loss}",
            stats.reward_sum,
            agent.epsilon(),
        );
        pb.set_message(format!("avg reward {avg_reward:.3}"));
        pb.inc(1);
    }
    pb.finish_and_clear();

    if let Some(parent) = args.model_out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    agent.persist(&args.model_out)?;
    println!("Saved model parameters to {}", args.model_out.display());

    Ok(())
}
