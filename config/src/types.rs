// Copyright 2017 The Grin Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Public types for config modules

use std::fmt;
use std::io;
use std::path::PathBuf;

use flow_core::FlowConfig;
use flow_util::LoggingConfig;

/// Error type wrapping config errors.
#[derive(Debug)]
pub enum ConfigError {
	/// Error with parsing of config file
	ParseError(String, String),
	/// Error with fileIO while reading config file
	FileIOError(String, String),
	/// No file found
	FileNotFoundError(String),
	/// Error serializing config values
	SerializationError(String),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			ConfigError::ParseError(ref file_name, ref message) => {
				write!(f, "Error parsing configuration file at {} - {}", file_name, message)
			}
			ConfigError::FileIOError(ref file_name, ref message) => write!(f, "{} {}", message, file_name),
			ConfigError::FileNotFoundError(ref file_name) => {
				write!(f, "Configuration file not found: {}", file_name)
			}
			ConfigError::SerializationError(ref message) => {
				write!(f, "Error serializing configuration: {}", message)
			}
		}
	}
}

impl From<io::Error> for ConfigError {
	fn from(error: io::Error) -> ConfigError {
		ConfigError::FileIOError(
			String::from(""),
			format!("Error loading config file: {}", error),
		)
	}
}

/// Top-level config container. Keeps track of the file it was read from
/// (if any) so it can be re-serialized back to the same place.
#[derive(Debug, Serialize, Deserialize)]
pub struct GlobalConfig {
	/// The file this config was read from, if it came from disk rather
	/// than `NodeConfig::default()`.
	pub config_file_path: Option<PathBuf>,
	/// Whether `members` came from a config file or from defaults.
	pub using_config_file: bool,
	/// The actual settings.
	pub members: Option<NodeConfig>,
}

/// Everything the flowcore node needs at startup: the consensus
/// parameters every core component shares, where to put the on-disk
/// store, and how to log. Flattened into one struct -- unlike the
/// upstream server config this bundles, a flow node has only one process
/// to configure, not a server/wallet/miner trio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
	/// Consensus and resource parameters shared by `blockflow`, `chain`
	/// and `pool`.
	pub flow: FlowConfig,
	/// Directory the RocksDB-backed store is opened under.
	pub db_root: String,
	/// Logging configuration.
	#[serde(default)]
	pub logging: Option<LoggingConfig>,
}

impl Default for NodeConfig {
	fn default() -> NodeConfig {
		NodeConfig {
			flow: FlowConfig::default(),
			db_root: ".flowcore".to_string(),
			logging: Some(LoggingConfig::default()),
		}
	}
}
