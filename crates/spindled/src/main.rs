use std::process::ExitCode;

fn main() -> ExitCode {
    match spindled::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("spindled: {error}");
            ExitCode::FAILURE
        }
    }
}
