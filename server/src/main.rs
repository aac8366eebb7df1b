//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


mod config;

use crate::config::Arguments;
use blinken_service::StreamServer;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Initialize tracing/logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    let server = StreamServer::new(arguments.server_config()).await?;
    server.start().await?;
    info!(bind_address = %server.bind_address(), "Blinken is streaming, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C");
    server.shutdown().await?;

    let snapshot = server.metrics().snapshot();
    info!(
        connections = snapshot.total_connections,
        frames_printed = snapshot.frames_printed,
        bytes_sent = snapshot.bytes_sent,
        uptime = ?snapshot.uptime,
        "Server stopped"
    );
    Ok(())
}
