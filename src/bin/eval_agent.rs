//! Evaluate a trained phishing-URL agent on the held-out dataset slice.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    optim::{adaptor::OptimizerAdaptor, Adam, AdamConfig},
};
use clap::Parser;
use log::debug;
use phishnet::{
    agent::UrlAgent,
    config::AgentConfig,
    dataset::{DatasetReader, UrlRecord},
    metrics::ConfusionMatrix,
    model::{ModelConfig, UrlQNet},
};

type B = Autodiff<NdArray>;
type Model = UrlQNet<B>;
type Agent = UrlAgent<B, Model, OptimizerAdaptor<Adam<NdArray>, Model, B>>;

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained phishing-URL agent")]
struct Args {
    /// Path to the feature dataset
    dataset: PathBuf,

    /// Path the model parameters were persisted to
    #[arg(long, default_value = "models/phishnet")]
    model: PathBuf,

    /// Records at the head of the file to skip (the training slice)
    #[arg(long, default_value_t = 3600)]
    skip: usize,

    /// Maximum number of records to evaluate; the rest of the file by default
    #[arg(long)]
    take: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let device = NdArrayDevice::default();
    let config = AgentConfig::new();
    let model_config = ModelConfig::new();
    let mut agent: Agent = UrlAgent::new(
        model_config.init(&device),
        model_config.init(&device),
        AdamConfig::new().init(),
        &config,
        device,
    );
    agent
        .restore(&args.model)
        .with_context(|| format!("restoring model from {}", args.model.display()))?;

    let records = DatasetReader::open(&args.dataset)
        .with_context(|| format!("opening dataset {}", args.dataset.display()))?
        .skip(args.skip);
    let records: Box<dyn Iterator<Item = _>> = match args.take {
        Some(n) => Box::new(records.take(n)),
        None => Box::new(records),
    };

    let mut cm = ConfusionMatrix::new();
    for record in records {
        let record: UrlRecord = record?;
        let predicted = agent.exploit(&record.features);

        if predicted == record.label {
            debug!("{} correctly classified as {:?}", record.url, predicted);
        } else {
            debug!(
                "{} wrongly classified as {:?} (expected {:?})",
                record.url, predicted, record.label
            );
        }
        cm.record(predicted, record.label);
    }

    if cm.total() == 0 {
        bail!("no records past the first {} to evaluate", args.skip);
    }

    println!("Processed URLs:       {}", cm.total());
    println!("Correctly classified: {}", cm.correct());
    println!("Precision: {:.4}", cm.precision());
    println!("Recall:    {:.4}", cm.recall());
    println!("Accuracy:  {:.4}", cm.accuracy());
    println!("F-score:   {:.4}", cm.f_score());

    Ok(())
}
