#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! Binary entrypoint for the PageMiner preview server and translation audit.

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use pageminer_server::{Cli, run};

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", display_chain(&err));
            ExitCode::FAILURE
        }
    }
}

fn display_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageminer_server::ServerError;
    use std::io;

    #[test]
    fn chain_includes_sources() {
        let err = ServerError::Serve {
            source: io::Error::other("connection reset"),
        };
        assert_eq!(
            display_chain(&err),
            "preview server terminated unexpectedly: connection reset"
        );
    }
}
