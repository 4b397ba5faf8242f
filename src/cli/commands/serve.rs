//! Serve Command
//!
//! Run the HTTP API until Ctrl-C or SIGTERM. Runs still in flight at
//! shutdown are abandoned and stay `processing` in the store.

use crate::cli::{CommandContext, Output, runtime};
use crate::pipeline::ProjectOrchestrator;
use crate::server::{self, AppState};
use crate::types::Result;

pub fn run(ctx: &CommandContext, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut server_config = ctx.config.server.clone();
    if let Some(host) = host {
        server_config.host = host;
    }
    if let Some(port) = port {
        server_config.port = port;
    }

    let output = Output::new();
    output.info(&format!(
        "Serving on http://{}:{} (data: {})",
        server_config.host,
        server_config.port,
        ctx.config.storage.data_dir.display()
    ));

    let rt = runtime()?;
    rt.block_on(async {
        let orchestrator = ProjectOrchestrator::from_config(&ctx.config).await?;
        server::serve(AppState::new(orchestrator, server_config)).await
    })
}
