// Copyright 2016 The Grin Developers
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

//! Configuration file management: reads a TOML file into a `NodeConfig`,
//! falling back to defaults when no file is given.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use dirs;
use toml;

use crate::types::{ConfigError, GlobalConfig, NodeConfig};

/// Name the node looks for in the current directory and in the user's
/// home config directory, in that order.
pub const CONFIG_FILE_NAME: &str = "flowcore-node.toml";

fn home_config_path() -> Option<PathBuf> {
	dirs::home_dir().map(|mut p| {
		p.push(".flowcore");
		p.push(CONFIG_FILE_NAME);
		p
	})
}

impl Default for GlobalConfig {
	fn default() -> GlobalConfig {
		GlobalConfig {
			config_file_path: None,
			using_config_file: false,
			members: Some(NodeConfig::default()),
		}
	}
}

impl GlobalConfig {
	/// Returns the first of `./flowcore-node.toml` or
	/// `~/.flowcore/flowcore-node.toml` that exists, if any.
	pub fn derive_config_location() -> Option<PathBuf> {
		let cwd_path = PathBuf::from(CONFIG_FILE_NAME);
		if cwd_path.exists() {
			return Some(cwd_path);
		}
		if let Some(home_path) = home_config_path() {
			if home_path.exists() {
				return Some(home_path);
			}
		}
		None
	}

	/// Loads `NodeConfig` from `config_file`, or from the derived default
	/// location if `None`, or falls back to `NodeConfig::default()` if
	/// neither exists.
	pub fn new(config_file: Option<&str>) -> Result<GlobalConfig, ConfigError> {
		let path = match config_file {
			Some(f) => Some(PathBuf::from(f)),
			None => GlobalConfig::derive_config_location(),
		};

		let path = match path {
			Some(p) => p,
			None => return Ok(GlobalConfig::default()),
		};

		if !path.exists() {
			return Err(ConfigError::FileNotFoundError(
				path.to_string_lossy().into_owned(),
			));
		}

		let mut contents = String::new();
		File::open(&path)?.read_to_string(&mut contents)?;

		let members: NodeConfig = toml::from_str(&contents).map_err(|e| {
			ConfigError::ParseError(path.to_string_lossy().into_owned(), format!("{}", e))
		})?;

		Ok(GlobalConfig {
			config_file_path: Some(path),
			using_config_file: true,
			members: Some(members),
		})
	}

	/// Serializes `self.members` back to TOML, writing it to `path` (or
	/// this config's own `config_file_path`, if set).
	pub fn write_to_file(&self, path: Option<&Path>) -> Result<(), ConfigError> {
		let members = self
			.members
			.as_ref()
			.ok_or_else(|| ConfigError::SerializationError("no members to write".to_string()))?;

		let encoded =
			toml::to_string(members).map_err(|e| ConfigError::SerializationError(format!("{}", e)))?;

		let target = path
			.map(PathBuf::from)
			.or_else(|| self.config_file_path.clone())
			.ok_or_else(|| ConfigError::SerializationError("no output path given".to_string()))?;

		let mut file = File::create(&target)?;
		file.write_all(encoded.as_bytes())?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_config_has_two_groups() {
		let cfg = GlobalConfig::default();
		let members = cfg.members.unwrap();
		assert_eq!(members.flow.num_groups, 2);
		assert_eq!(members.db_root, ".flowcore");
	}

	#[test]
	fn round_trips_through_toml() {
		let cfg = NodeConfig::default();
		let encoded = toml::to_string(&cfg).expect("serializes");
		let decoded: NodeConfig = toml::from_str(&encoded).expect("parses");
		assert_eq!(decoded.flow.num_groups, cfg.flow.num_groups);
		assert_eq!(decoded.db_root, cfg.db_root);
	}
}
