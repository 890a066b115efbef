use std::env;
use std::path::PathBuf;

/// Server settings.
///
/// Every field can be overridden through an environment variable:
/// `MARKOV_BIND`, `MARKOV_PORT`, `MARKOV_DATA_DIR`, `MARKOV_ORDER`, `MARKOV_SEED`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
	pub bind: String,
	pub port: u16,
	/// Directory holding the `.txt` training files.
	pub data_dir: PathBuf,
	/// Kgram length of the served model.
	pub order: usize,
	/// Seed of the model's random generator.
	pub seed: i64,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			bind: "127.0.0.1".to_owned(),
			port: 5000,
			data_dir: PathBuf::from("./data"),
			order: 3,
			seed: 42,
		}
	}
}

impl ServerConfig {
	/// Reads the settings from the process environment.
	pub fn from_env() -> Result<Self, String> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Builds the settings from a variable lookup, falling back to defaults.
	///
	/// # Errors
	/// Returns an error if a numeric variable does not parse, or if the order is 0.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut config = Self::default();

		if let Some(bind) = lookup("MARKOV_BIND") {
			config.bind = bind;
		}
		if let Some(port) = lookup("MARKOV_PORT") {
			config.port = port.parse().map_err(|e| format!("MARKOV_PORT: {e}"))?;
		}
		if let Some(dir) = lookup("MARKOV_DATA_DIR") {
			config.data_dir = PathBuf::from(dir);
		}
		if let Some(order) = lookup("MARKOV_ORDER") {
			config.order = order.parse().map_err(|e| format!("MARKOV_ORDER: {e}"))?;
		}
		if let Some(seed) = lookup("MARKOV_SEED") {
			config.seed = seed.parse().map_err(|e| format!("MARKOV_SEED: {e}"))?;
		}

		if config.order == 0 {
			return Err("MARKOV_ORDER must be >= 1".to_owned());
		}
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		move |key| vars.get(key).cloned()
	}

	#[test]
	fn defaults_without_variables() {
		assert_eq!(ServerConfig::from_lookup(lookup(&[])).unwrap(), ServerConfig::default());
	}

	#[test]
	fn variables_override_defaults() {
		let config = ServerConfig::from_lookup(lookup(&[
			("MARKOV_PORT", "8080"),
			("MARKOV_ORDER", "5"),
			("MARKOV_SEED", "7"),
			("MARKOV_DATA_DIR", "/srv/texts"),
		]))
		.unwrap();

		assert_eq!(config.port, 8080);
		assert_eq!(config.order, 5);
		assert_eq!(config.seed, 7);
		assert_eq!(config.data_dir, PathBuf::from("/srv/texts"));
		assert_eq!(config.bind, "127.0.0.1");
	}

	#[test]
	fn invalid_values_are_rejected() {
		assert!(ServerConfig::from_lookup(lookup(&[("MARKOV_PORT", "http")])).is_err());
		assert!(ServerConfig::from_lookup(lookup(&[("MARKOV_ORDER", "0")])).is_err());
	}

	#[test]
	fn seed_can_be_negative() {
		let config = ServerConfig::from_lookup(lookup(&[("MARKOV_SEED", "-9")])).unwrap();
		assert_eq!(config.seed, -9);
	}
}
