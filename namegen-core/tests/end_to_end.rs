use namegen_core::{
	Corpus, END_TOKEN, NGramGenerator, NameDataset, NameGenerator, Subset, TrainingConfig, UniformGenerator,
	build_generators, evaluate_batch, generate_names, generate_with_limit,
};
use namegen_core::training::{evaluate_all, train_all};
use rand::SeedableRng;
use rand::rngs::StdRng;

const NAMES: &[&str] = &[
	"john", "mary", "robert", "linda", "michael", "barbara", "william", "elizabeth", "david", "jennifer", "richard",
	"maria", "joseph", "susan", "thomas", "margaret", "charles", "dorothy", "christopher", "lisa", "daniel", "nancy",
	"matthew", "karen", "anthony", "betty", "mark", "helen", "donald", "sandra",
];

fn corpus() -> Corpus {
	Corpus::from_lines(NAMES).unwrap()
}

fn seeded_config(seed: u64) -> TrainingConfig {
	TrainingConfig {
		test_fraction: 0.2,
		batch_size: 7,
		orders: vec![1, 2, 3],
		seed: Some(seed),
		..Default::default()
	}
}

#[test]
fn trained_ngram_beats_uniform_on_training_names() {
	let config = seeded_config(1);
	let mut rng = config.rng();
	let dataset = NameDataset::new(corpus(), config.test_fraction, &mut rng).unwrap();

	let mut generators = build_generators(dataset.alphabet(), &config.orders).unwrap();
	train_all(&mut generators, &dataset, &config, &mut rng).unwrap();

	let batch: Vec<&str> = dataset.train().iter().map(String::as_str).collect();
	let views: Vec<&dyn NameGenerator> = generators.iter().map(|g| &**g as &dyn NameGenerator).collect();
	let scores = evaluate_all(&views, &batch);
	assert_eq!(scores[0].0, "Uniform");
	for (name, score) in &scores[1..] {
		assert!(score.is_finite());
		assert!(*score > scores[0].1, "{name} scored {score}, uniform {}", scores[0].1);
	}
}

#[test]
fn seeded_runs_are_reproducible_end_to_end() {
	let run = |seed: u64| {
		let config = seeded_config(seed);
		let mut rng = config.rng();
		let dataset = NameDataset::new(corpus(), config.test_fraction, &mut rng).unwrap();
		let mut generators = build_generators(dataset.alphabet(), &config.orders).unwrap();
		train_all(&mut generators, &dataset, &config, &mut rng).unwrap();
		let samples: Vec<Vec<String>> = generators
			.iter()
			.map(|g| generate_names(&**g, 5, &mut rng))
			.collect();
		(dataset.test().to_vec(), samples)
	};
	assert_eq!(run(42), run(42));
}

#[test]
fn evaluation_is_idempotent() {
	let corpus = corpus();
	let names: Vec<&str> = corpus.names().iter().map(String::as_str).collect();
	let mut generator = NGramGenerator::new(corpus.alphabet().clone(), 2).unwrap();
	generator.train(&names);

	let batch = ["john>", "mary>", "robert>"];
	let first = evaluate_batch(&generator, &batch);
	let second = evaluate_batch(&generator, &batch);
	assert_eq!(first, second);
}

#[test]
fn training_more_never_decreases_counts() {
	let corpus = corpus();
	let names: Vec<&str> = corpus.names().iter().map(String::as_str).collect();
	let mut generator = NGramGenerator::new(corpus.alphabet().clone(), 2).unwrap();

	let mut previous: Vec<(String, char, u64)> = Vec::new();
	for batch in names.chunks(4) {
		generator.train(batch);
		for (context, next_char, count) in &previous {
			assert!(generator.counts(context).unwrap().count(*next_char) >= *count);
		}
		previous = batch
			.iter()
			.flat_map(|name| {
				let padded: Vec<char> = "<<".chars().chain(name.chars()).collect();
				padded
					.windows(3)
					.map(|w| (w[..2].iter().collect::<String>(), w[2]))
					.collect::<Vec<_>>()
			})
			.map(|(context, next_char)| {
				let count = generator.counts(&context).unwrap().count(next_char);
				(context, next_char, count)
			})
			.collect();
	}
}

#[test]
fn batch_order_does_not_change_final_counts() {
	let corpus = corpus();
	let mut forward = NGramGenerator::new(corpus.alphabet().clone(), 3).unwrap();
	let mut backward = forward.clone();

	let mut rng = StdRng::seed_from_u64(9);
	let dataset = NameDataset::new(corpus.clone(), 0.0, &mut rng).unwrap();
	let batches: Vec<Vec<&str>> = dataset.batches(Subset::All, 4, true, &mut rng).unwrap().collect();

	for batch in &batches {
		forward.train(batch);
	}
	for batch in batches.iter().rev() {
		backward.train(batch);
	}

	for prefix in ["", "j", "jo", "mar", "chr", "xyz"] {
		assert_eq!(forward.predict(&[prefix]), backward.predict(&[prefix]));
	}
}

#[test]
fn generated_names_use_the_alphabet_and_never_contain_the_end_token() {
	let corpus = corpus();
	let names: Vec<&str> = corpus.names().iter().map(String::as_str).collect();
	let mut generator = NGramGenerator::new(corpus.alphabet().clone(), 3).unwrap();
	generator.train(&names);

	let mut rng = StdRng::seed_from_u64(3);
	for _ in 0..100 {
		let name = generate_with_limit(&generator, 50, &mut rng);
		assert!(!name.contains(END_TOKEN));
		assert!(name.chars().all(|c| corpus.alphabet().contains(&c)));
	}
}

#[test]
fn uniform_over_five_characters() {
	let generator = UniformGenerator::new("abcd>".chars().collect());
	let prediction = &generator.predict(&[""])[0];
	assert!(prediction.iter().all(|(_, p)| p == 0.2));
}
