use std::process::ExitCode;

fn main() -> ExitCode {
    match sapp::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Help, version and usage errors carry their own output and exit code.
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                clap_err.exit();
            }
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
