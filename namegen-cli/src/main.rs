use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;

use namegen_core::io::build_output_path;
use namegen_core::training::{evaluate_all, train_one};
use namegen_core::{
    Corpus, NGramGenerator, NameDataset, NameGenerator, Subset, TrainingConfig, UniformGenerator,
    generate_names, generate_with_limit,
};

const DEFAULT_URL: &str =
    "https://raw.githubusercontent.com/dominictarr/random-name/master/first-names.txt";

/// Train character-level name generators and compare them.
///
/// Run parameters come from `--config` (JSON, missing fields defaulted) or
/// the built-in defaults; any flag given on the command line wins.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Newline-separated list of names (downloaded if missing)
    #[arg(long, default_value = "data/names.txt")]
    names_file: PathBuf,

    /// Where to download the list of names from
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,

    /// JSON run config, e.g. {"orders": [1, 2, 3], "seed": 7}
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fraction of names held out for evaluation, in [0, 1) [default: 0.1]
    #[arg(long)]
    test_fraction: Option<f64>,

    /// Names per batch [default: 100]
    #[arg(long)]
    batch_size: Option<usize>,

    /// N-gram orders to train, comma separated [default: 1,2,3,4]
    #[arg(long, value_delimiter = ',')]
    orders: Option<Vec<usize>>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Names generated per model [default: 5]
    #[arg(long)]
    samples: Option<usize>,

    /// Stop generated names after this many characters
    #[arg(long)]
    max_length: Option<usize>,

    /// Train n-gram models on worker threads
    #[arg(long)]
    parallel: bool,

    /// Save every trained n-gram model in this directory
    #[arg(long)]
    save_dir: Option<PathBuf>,
}

impl Args {
    /// Config file (or defaults) with the command line flags applied on top.
    fn config(&self) -> Result<TrainingConfig, namegen_core::NameGenError> {
        let mut config = match &self.config {
            Some(path) => TrainingConfig::load(path)?,
            None => TrainingConfig::default(),
        };

        if let Some(test_fraction) = self.test_fraction {
            config.test_fraction = test_fraction;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(orders) = &self.orders {
            config.orders = orders.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(samples) = self.samples {
            config.sample_count = samples;
        }
        if self.max_length.is_some() {
            config.max_name_length = self.max_length;
        }
        config.parallel |= self.parallel;

        config.validate()?;
        Ok(config)
    }
}

/// Downloads the list of names unless it is already on disk.
fn download_if_not_exists(
    path: &Path,
    url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        info!("{} already exists, skipping download", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    println!("Downloading {}...", path.display());
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    fs::write(path, response.bytes()?)?;
    println!("Download complete.");
    Ok(())
}

fn print_scores(generators: &[&dyn NameGenerator], batch: &[&str]) {
    for (name, score) in evaluate_all(generators, batch) {
        println!("{name} - Average log likelihood: {score:.4}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let config = args.config()?;
    let mut rng = config.rng();

    download_if_not_exists(&args.names_file, &args.url)?;
    let corpus = Corpus::load(&args.names_file)?;
    let dataset = NameDataset::new(corpus, config.test_fraction, &mut rng)?;
    println!(
        "{} names: {} train / {} test, alphabet of {} characters",
        dataset.corpus().len(),
        dataset.train().len(),
        dataset.test().len(),
        dataset.alphabet().len()
    );

    // Uniform baseline first, then one n-gram model per order
    let uniform = UniformGenerator::new(dataset.alphabet().clone());
    let mut ngrams = config
        .orders
        .iter()
        .map(|&k| NGramGenerator::new(dataset.alphabet().clone(), k))
        .collect::<Result<Vec<_>, _>>()?;

    for ngram in &mut ngrams {
        println!("\nTraining {}...", ngram.name());
        train_one(ngram, &dataset, &config, &mut rng)?;
    }

    let generators: Vec<&dyn NameGenerator> = std::iter::once(&uniform as &dyn NameGenerator)
        .chain(ngrams.iter().map(|ngram| ngram as &dyn NameGenerator))
        .collect();

    // Evaluate all generators on a fixed sample batch
    println!("\nEvaluating generators on a sample batch:");
    print_scores(&generators, &["john>", "mary>", "robert>"]);

    // Then on held-out batches
    println!("\nEvaluating generators on test batches:");
    for (i, batch) in dataset
        .batches(Subset::Test, config.batch_size, config.shuffle, &mut rng)?
        .take(3)
        .enumerate()
    {
        println!("Batch {} ({} names):", i + 1, batch.len());
        print_scores(&generators, &batch);
    }

    for generator in &generators {
        let names: Vec<String> = match config.max_name_length {
            Some(max) => (0..config.sample_count)
                .map(|_| generate_with_limit(*generator, max, &mut rng))
                .collect(),
            None => generate_names(*generator, config.sample_count, &mut rng),
        };
        println!("\nGenerated names ({}): {names:?}", generator.name());
    }

    println!("\nProbabilities for next character in each sequence of the batch:");
    let prefixes = ["joh", "mar"];
    for generator in &generators {
        println!("\n{}:", generator.name());
        for (prefix, prediction) in prefixes.iter().zip(generator.predict(&prefixes)) {
            println!("Sequence: {prefix}");
            for (c, p) in prediction.top(5) {
                println!("  {c}: {p:.4}");
            }
        }
    }

    // The uniform baseline has nothing to save
    if let Some(dir) = &args.save_dir {
        for ngram in &ngrams {
            let path = build_output_path(dir, &format!("ngram-{}", ngram.order()), "bin");
            ngram.save(&path)?;
            println!("Saved {} to {}", ngram.name(), path.display());
        }
    }

    Ok(())
}
