use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};
use serde::Deserialize;

use rs_markov_core::io::{latin1_to_string, list_files, read_text, string_to_latin1};
use rs_markov_core::{GenerationInput, Generator, NO_CHARACTER, StartSeed};

mod config;

use config::ServerConfig;

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	length: Option<usize>,
	seed: Option<String> // -> text (or none), random, custom:<kgram>
}

/// Query parameters for the `/v1/frequency` and `/v1/next` endpoints
#[derive(Deserialize)]
struct KgramQuery {
	kgram: String,
	character: Option<String>
}

#[derive(Deserialize)]
struct TrainQuery {
	names: Option<String>
}

struct SharedData {
	generator: Generator,
	data_dir: PathBuf
}

impl GenerateParams {
	/// Determines the starting kgram strategy.
	fn start_seed(&self) -> Result<StartSeed, String> {
		match &self.seed {
			None => Ok(StartSeed::Text),
			Some(s) if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("text") => Ok(StartSeed::Text),
			Some(s) if s.eq_ignore_ascii_case("random") => Ok(StartSeed::Random),
			Some(s) if s.to_lowercase().starts_with("custom:") => {
				let value = &s["custom:".len()..];
				match string_to_latin1(value) {
					Some(kgram) if !kgram.is_empty() => Ok(StartSeed::Custom(kgram)),
					Some(_) => Err("Custom seed cannot be empty".into()),
					None => Err("Custom seed must only contain 8-bit characters".into()),
				}
			}
			Some(_) => Err("Seed must be 'text', 'random', 'custom:<kgram>' or 'none'".into()),
		}
	}
}

impl KgramQuery {
	fn kgram(&self) -> Result<Vec<u8>, String> {
		string_to_latin1(&self.kgram).ok_or_else(|| "Kgram must only contain 8-bit characters".to_owned())
	}

	fn character(&self) -> Result<Option<u8>, String> {
		let Some(s) = &self.character else {
			return Ok(None);
		};
		let mut chars = s.chars();
		match (chars.next(), chars.next()) {
			(Some(c), None) => u8::try_from(c)
				.map(Some)
				.map_err(|_| "Character must be an 8-bit character".to_owned()),
			_ => Err("Character must be exactly one character".to_owned()),
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates a passage from the shared model.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let start_seed = match query.start_seed() {
		Ok(s) => s,
		Err(e) => return HttpResponse::BadRequest().body(e)
	};
	let input = match GenerationInput::new(query.length.unwrap_or(100), start_seed) {
		Ok(input) => input,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string())
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match shared_data.generator.generate_string(&input) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/frequency`
///
/// Without `character`, returns how many times `kgram` was seen;
/// with it, how many times `character` followed `kgram`.
#[get("/v1/frequency")]
async fn get_frequency(data: web::Data<Mutex<SharedData>>, query: web::Query<KgramQuery>) -> impl Responder {
	let (kgram, character) = match query.kgram().and_then(|k| Ok((k, query.character()?))) {
		Ok(parsed) => parsed,
		Err(e) => return HttpResponse::BadRequest().body(e)
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let model = shared_data.generator.model();
	let count = match character {
		Some(c) => model.frequency_of(&kgram, c),
		None => model.frequency(&kgram),
	};
	match count {
		Ok(count) => HttpResponse::Ok().body(count.to_string()),
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/next`
///
/// Samples the character following `kgram`. The body is empty when the
/// model answers "no character".
#[get("/v1/next")]
async fn get_next(data: web::Data<Mutex<SharedData>>, query: web::Query<KgramQuery>) -> impl Responder {
	let kgram = match query.kgram() {
		Ok(k) => k,
		Err(e) => return HttpResponse::BadRequest().body(e)
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let model = shared_data.generator.model_mut();
	if kgram.len() != model.order() {
		return HttpResponse::BadRequest().body(format!("Kgram must have {} characters", model.order()));
	}
	match model.sample_next(&kgram) {
		NO_CHARACTER => HttpResponse::Ok().finish(),
		c => HttpResponse::Ok().body(latin1_to_string(&[c])),
	}
}

#[get("/v1/files")]
async fn get_files(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let data_dir = match data.lock() {
		Ok(m) => m.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	match list_files(&data_dir, "txt") {
		Ok(files) => {
			let names: Vec<&str> = files.iter().filter_map(|file| file.strip_suffix(".txt")).collect();
			HttpResponse::Ok().body(names.join("\n"))
		}
		Err(_) => HttpResponse::InternalServerError().body("Failed to list files")
	}
}

#[get("/v1/trained")]
async fn get_trained(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.generator.trained_files().join("\n"))
}

/// HTTP PUT endpoint `/v1/train`
///
/// Trains the shared model on `<data_dir>/<name>.txt` for each name.
/// Counts are added to what the model already knows.
///
/// Only files listed in the data directory are accepted. Every file is read
/// before any is trained on, so a failed request leaves the model unchanged.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, query: web::Query<TrainQuery>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty file name"),
	};

	let names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();

	let available = match list_files(&shared_data.data_dir, "txt") {
		Ok(files) => files,
		Err(_) => return HttpResponse::InternalServerError().body("Failed to list files"),
	};

	let mut texts = Vec::with_capacity(names.len());
	for name in names {
		if !is_listed(name, &available) {
			warn!("refusing to train on unknown file {name:?}");
			return HttpResponse::BadRequest().body(format!("Unknown file: {name}"));
		}
		let path = shared_data.data_dir.join(format!("{name}.txt"));
		match read_text(&path) {
			Ok(text) => texts.push((name, text)),
			Err(e) => {
				warn!("reading {} failed: {e}", path.display());
				return HttpResponse::InternalServerError().body(format!("Failed to read {name}: {e}"));
			}
		}
	}

	for (name, text) in texts {
		shared_data.generator.train_named(name, &text);
	}

	HttpResponse::Ok().body("Trained successfully")
}

/// A name is usable only if it is a plain `.txt` file name of the data directory.
fn is_listed(name: &str, available: &[String]) -> bool {
	if name.contains(['/', '\\']) || name.contains("..") {
		return false;
	}
	available.iter().any(|file| file.strip_suffix(".txt") == Some(name))
}

/// Main entry point for the server.
///
/// Trains the model on the data directory (if present), wraps the generator
/// in a `Mutex` (the model needs exclusive access to sample) and starts an
/// Actix-web HTTP server.
#[actix_web::main]
async fn main() -> io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = ServerConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

	let generator = if config.data_dir.is_dir() {
		Generator::load(&config.data_dir, config.order, config.seed)
	} else {
		warn!("data directory {} not found, starting with an empty model", config.data_dir.display());
		Generator::new(config.order, config.seed)
	}
	.map_err(io::Error::other)?;

	info!(
		"order {} model, {} kgrams from {} file(s), listening on {}:{}",
		config.order,
		generator.model().len(),
		generator.trained_files().len(),
		config.bind,
		config.port
	);

	let shared_data = SharedData {
		generator,
		data_dir: config.data_dir.clone(),
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_generated)
			.service(get_frequency)
			.service(get_next)
			.service(get_files)
			.service(get_trained)
			.service(put_train)
	})
		.bind((config.bind.clone(), config.port))?
		.run()
		.await
}
