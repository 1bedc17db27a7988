use std::env;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, put, web};
use log::{error, info};
use serde::Deserialize;

use namegen_core::training::train_all;
use namegen_core::{
	BoxedGenerator, Corpus, NameDataset, NameGenerator, TrainingConfig, build_generators, evaluate_batch,
	generate_with_limit,
};

/// Longest name the service will ever sample.
const DEFAULT_MAX_NAME_LENGTH: usize = 64;

/// Most names a single request may ask for.
const MAX_COUNT: usize = 1000;

/// Query parameters of the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	model: String,
	count: Option<usize>,
	seed: Option<u64>,
}

/// Query parameters of the `/v1/predict` endpoint
#[derive(Deserialize)]
struct PredictParams {
	model: String,
	prefix: Option<String>,
	top: Option<usize>,
}

/// Query parameters of the `/v1/evaluate` endpoint
#[derive(Deserialize)]
struct EvaluateParams {
	model: String,
	names: String,
}

/// Query parameters of the `/v1/train` endpoint
#[derive(Deserialize)]
struct TrainParams {
	orders: Option<String>,
	seed: Option<u64>,
}

struct SharedData {
	corpus: Corpus,
	config: TrainingConfig,
	generators: Vec<BoxedGenerator>,
}

impl SharedData {
	fn generator(&self, name: &str) -> Option<&dyn NameGenerator> {
		self.generators
			.iter()
			.find(|generator| generator.name() == name)
			.map(|generator| &**generator as &dyn NameGenerator)
	}
}

impl TrainParams {
	/// Parses the comma-separated list of orders.
	fn orders(&self) -> Result<Option<Vec<usize>>, String> {
		let Some(orders) = &self.orders else {
			return Ok(None);
		};
		orders
			.split(',')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(|s| s.parse::<usize>().map_err(|_| format!("Invalid order: {s}")))
			.collect::<Result<Vec<_>, _>>()
			.map(Some)
	}
}

/// Splits the corpus and trains a fresh set of generators.
fn train(corpus: &Corpus, config: &TrainingConfig) -> Result<Vec<BoxedGenerator>, namegen_core::NameGenError> {
	config.validate()?;
	let mut rng = config.rng();
	let dataset = NameDataset::new(corpus.clone(), config.test_fraction, &mut rng)?;
	let mut generators = build_generators(dataset.alphabet(), &config.orders)?;
	train_all(&mut generators, &dataset, config, &mut rng)?;
	Ok(generators)
}

/// HTTP GET endpoint `/v1/models`
///
/// Lists the names of the trained generators, one per line.
#[get("/v1/models")]
async fn get_models(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let names: Vec<String> = shared_data.generators.iter().map(|g| g.name()).collect();
	HttpResponse::Ok().body(names.join("\n"))
}

/// HTTP GET endpoint `/v1/generate`
///
/// Samples `count` names (default 1) from the requested generator, one per line.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let count = query.count.unwrap_or(1);
	if count > MAX_COUNT {
		return HttpResponse::BadRequest().body(format!("count must be <= {MAX_COUNT}"));
	}

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let Some(generator) = shared_data.generator(&query.model) else {
		return HttpResponse::NotFound().body(format!("Model {} not found", query.model));
	};

	let config = TrainingConfig { seed: query.seed, ..Default::default() };
	let mut rng = config.rng();
	let max_length = shared_data.config.max_name_length.unwrap_or(DEFAULT_MAX_NAME_LENGTH);
	let names: Vec<String> = (0..count)
		.map(|_| generate_with_limit(generator, max_length, &mut rng))
		.collect();

	HttpResponse::Ok().body(names.join("\n"))
}

/// HTTP GET endpoint `/v1/predict`
///
/// Returns the `top` (default 5) most likely next characters after `prefix`,
/// one `char probability` pair per line.
#[get("/v1/predict")]
async fn get_prediction(data: web::Data<Mutex<SharedData>>, query: web::Query<PredictParams>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let Some(generator) = shared_data.generator(&query.model) else {
		return HttpResponse::NotFound().body(format!("Model {} not found", query.model));
	};

	let prefix = query.prefix.as_deref().unwrap_or("").to_lowercase();
	let Some(prediction) = generator.predict(&[prefix.as_str()]).into_iter().next() else {
		return HttpResponse::InternalServerError().body("Empty prediction");
	};

	let lines: Vec<String> = prediction
		.top(query.top.unwrap_or(5))
		.into_iter()
		.map(|(c, p)| format!("{c} {p:.6}"))
		.collect();
	HttpResponse::Ok().body(lines.join("\n"))
}

/// HTTP GET endpoint `/v1/evaluate`
///
/// Scores a comma-separated list of names (end token appended) and returns
/// the average log-likelihood per character.
#[get("/v1/evaluate")]
async fn get_evaluation(data: web::Data<Mutex<SharedData>>, query: web::Query<EvaluateParams>) -> impl Responder {
	let batch = match Corpus::from_lines(query.names.split(',')) {
		Ok(corpus) => corpus,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let Some(generator) = shared_data.generator(&query.model) else {
		return HttpResponse::NotFound().body(format!("Model {} not found", query.model));
	};

	let names: Vec<&str> = batch.names().iter().map(String::as_str).collect();
	HttpResponse::Ok().body(format!("{:.6}", evaluate_batch(generator, &names)))
}

/// HTTP PUT endpoint `/v1/train`
///
/// Rebuilds and retrains the generators, optionally with other orders or seed.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, query: web::Query<TrainParams>) -> impl Responder {
	let orders = match query.orders() {
		Ok(orders) => orders,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let mut config = shared_data.config.clone();
	if let Some(orders) = orders {
		config.orders = orders;
	}
	if query.seed.is_some() {
		config.seed = query.seed;
	}

	match train(&shared_data.corpus, &config) {
		Ok(generators) => {
			shared_data.generators = generators;
			shared_data.config = config;
			HttpResponse::Ok().body("Models trained successfully")
		}
		Err(e) => HttpResponse::BadRequest().body(format!("Failed to train models: {e}")),
	}
}

/// Main entry point for the server.
///
/// Loads the names, trains the default generators, wraps them in a `Mutex`
/// and starts an Actix-web HTTP server.
///
/// # Notes
/// - `NAMEGEN_BIND` sets the address (default 127.0.0.1:5000).
/// - `NAMEGEN_NAMES` sets the names file (default ./data/names.txt).
/// - `NAMEGEN_CONFIG` optionally points to a JSON training config.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let bind = env::var("NAMEGEN_BIND").unwrap_or_else(|_| "127.0.0.1:5000".to_owned());
	let names_file = env::var("NAMEGEN_NAMES").unwrap_or_else(|_| "./data/names.txt".to_owned());

	let corpus = Corpus::load(&names_file).map_err(|e| {
		error!("Failed to load names: {e}");
		std::io::Error::other(e)
	})?;
	let config = match env::var("NAMEGEN_CONFIG") {
		Ok(path) => TrainingConfig::load(&path).map_err(|e| {
			error!("Failed to load config: {e}");
			std::io::Error::other(e)
		})?,
		Err(_) => TrainingConfig::default(),
	};
	let generators = train(&corpus, &config).map_err(std::io::Error::other)?;
	info!("Trained {} generators, listening on {bind}", generators.len());

	let shared_data = SharedData {
		corpus,
		config,
		generators,
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_models)
			.service(get_generated)
			.service(get_prediction)
			.service(get_evaluation)
			.service(put_train)
	})
	.bind(bind)?
	.run()
	.await
}
