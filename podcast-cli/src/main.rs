use std::process::ExitCode;

use podcast_cli::{is_error_silent, shell};

#[tokio::main]
async fn main() -> ExitCode {
    match podcast_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if is_error_silent(&err) {
                // cargo and wasm-bindgen already reported the failure
            } else if let Some(cargo_metadata::Error::CargoMetadata { stderr }) = err.downcast_ref()
            {
                shell().error(stderr.trim_end());
            } else {
                shell().error(format!("{err:#}"));
            }
            ExitCode::FAILURE
        }
    }
}
