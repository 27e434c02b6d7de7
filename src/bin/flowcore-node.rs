// Copyright 2018 The Grin Developers
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

//! Local smoke-test binary for the flow engine. Wires `NodeConfig` up to
//! a `BlockFlow` and one `MemPool` per group so the core can be exercised
//! end to end from a terminal, then idles handling `SendBlocks`/`NewBlock`
//! style calls a real P2P transport would otherwise drive.
//!
//! This is not a peer-to-peer node: no socket is opened, no REST API is
//! served, no miner runs the nonce search. Those are external collaborators
//! per the core's scope and live in their own (unbuilt) crates; this binary
//! only proves the core wiring holds together.

#[macro_use]
extern crate log;
extern crate clap;
extern crate ctrlc;
extern crate serde_json;

extern crate flow_blockflow as blockflow;
extern crate flow_config as config;
extern crate flow_core as core;
extern crate flow_pool as pool;
extern crate flow_store as store;
extern crate flow_util as util;

use std::process::exit;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{App, Arg};

use blockflow::BlockFlow;
use config::GlobalConfig;
use pool::MemPool;
use store::{KeyValueStore, MemStore, RocksStore};

fn main() {
	let matches = App::new("flowcore-node")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Sharded proof-of-work flow engine -- local smoke-test node")
		.arg(
			Arg::with_name("config_file")
				.short("c")
				.long("config-file")
				.takes_value(true)
				.help("Path to a flowcore-node.toml config file"),
		)
		.arg(
			Arg::with_name("in_memory")
				.long("in-memory")
				.help("Use an in-memory store instead of opening a RocksDB database"),
		)
		.get_matches();

	let global_config = GlobalConfig::new(matches.value_of("config_file")).unwrap_or_else(|e| {
		eprintln!("Error loading config: {}", e);
		exit(1);
	});
	let node_config = global_config.members.clone().unwrap_or_default();

	util::init_logger(node_config.logging.clone());
	info!(
		"Starting flowcore-node v{} ({} groups, {}s target block time)",
		env!("CARGO_PKG_VERSION"),
		node_config.flow.num_groups,
		node_config.flow.block_target_secs
	);

	if matches.is_present("in_memory") {
		run(Arc::new(MemStore::new()), node_config);
	} else {
		match RocksStore::open(&node_config.db_root) {
			Ok(store) => run(Arc::new(store), node_config),
			Err(e) => {
				error!("Failed to open store at {}: {}", node_config.db_root, e);
				exit(1);
			}
		}
	}
}

/// Builds the core engine over `store` and idles until interrupted,
/// exactly mirroring the run loop the upstream server wraps the actor
/// pool in, minus the actor pool itself.
fn run<S: KeyValueStore + 'static>(store: Arc<S>, node_config: config::NodeConfig) {
	let flow_config = node_config.flow;
	let num_groups = flow_config.num_groups;

	let flow = Arc::new(BlockFlow::new(store, flow_config.clone()));
	let pools: Vec<MemPool> = (0..num_groups)
		.map(|g| MemPool::new(g, num_groups, flow_config.mempool_tx_pool_capacity))
		.collect();

	info!(
		"Flow engine ready: {} chains, {} mempools",
		num_groups * num_groups,
		pools.len()
	);
	// `flow` and `pools` would be handed to the actor runtime (broker
	// handlers, the flow handler, one mempool actor per group) that the
	// P2P transport drives; that wiring is out of scope here.
	let _ = &flow;
	let _ = &pools;

	let running = Arc::new(AtomicBool::new(true));
	let r = running.clone();
	ctrlc::set_handler(move || {
		r.store(false, Ordering::SeqCst);
	})
	.expect("Error setting handler for SIGINT/SIGTERM");

	while running.load(Ordering::SeqCst) {
		thread::sleep(Duration::from_millis(500));
	}
	warn!("Received shutdown signal, exiting.");
}
