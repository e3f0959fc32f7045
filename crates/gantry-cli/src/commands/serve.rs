//! `gantry serve`: host the web entry point.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::{
    cli::ServeArgs,
    config::Bootstrap,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    server,
};

pub fn execute(args: ServeArgs, bootstrap: &Bootstrap, output: &OutputManager) -> CliResult<u8> {
    let dispatcher = Arc::new(bootstrap.web()?);
    let name = dispatcher.config().name.clone();
    if dispatcher
        .config()
        .session
        .as_ref()
        .is_some_and(|s| s.placeholder_key)
    {
        output.warning("COOKIE_VALIDATION_KEY is not set; using the development placeholder")?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_cli_context(|| "starting the async runtime")?;

    runtime.block_on(async {
        let listener = TcpListener::bind((args.host.as_str(), args.port))
            .await
            .map_err(|e| CliError::Server {
                message: format!("cannot bind {}:{}", args.host, args.port),
                source: Some(Box::new(e)),
            })?;
        let addr = listener.local_addr()?;
        output.success(&format!("Serving {name} on http://{addr}"))?;
        output.print("Press Ctrl-C to stop.")?;

        server::run(dispatcher, listener)
            .await
            .map_err(|e| CliError::Server {
                message: "connection handling failed".into(),
                source: Some(Box::new(e)),
            })
    })?;

    Ok(0)
}
