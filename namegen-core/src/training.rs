use log::info;
use rand::Rng;

use crate::config::TrainingConfig;
use crate::dataset::{NameDataset, Subset};
use crate::error::Result;
use crate::model::{BoxedGenerator, NameGenerator, evaluate_batch};

/// Trains one generator with a sweep over the train split.
///
/// With `config.parallel` the batches of the sweep are gathered and handed
/// to [`NameGenerator::train_parallel`] in a single call, so worker threads
/// are started once per sweep rather than once per batch.
///
/// Returns the number of batches in the sweep.
pub fn train_one<G, R>(
	generator: &mut G,
	dataset: &NameDataset,
	config: &TrainingConfig,
	rng: &mut R,
) -> Result<usize>
where
	G: NameGenerator + ?Sized,
	R: Rng + ?Sized,
{
	let batches = dataset.batches(Subset::Train, config.batch_size, config.shuffle, rng)?;
	let batch_count = batches.len();

	if config.parallel {
		let sweep: Vec<&str> = batches.flatten().collect();
		generator.train_parallel(&sweep)?;
	} else {
		for batch in batches {
			generator.train(&batch);
		}
	}

	info!("Trained {} on {batch_count} batches", generator.name());
	Ok(batch_count)
}

/// Trains every generator, each with its own sweep over the train split.
///
/// Sweeps are shuffled independently when `config.shuffle` is set.
pub fn train_all<R>(
	generators: &mut [BoxedGenerator],
	dataset: &NameDataset,
	config: &TrainingConfig,
	rng: &mut R,
) -> Result<()>
where
	R: Rng + ?Sized,
{
	for generator in generators.iter_mut() {
		train_one(&mut **generator, dataset, config, rng)?;
	}
	Ok(())
}

/// Average log-likelihood of `batch` under each generator, in order.
pub fn evaluate_all(generators: &[&dyn NameGenerator], batch: &[&str]) -> Vec<(String, f64)> {
	generators
		.iter()
		.map(|generator| (generator.name(), evaluate_batch(*generator, batch)))
		.collect()
}
