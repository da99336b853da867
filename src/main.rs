use std::process::ExitCode;

use rlab::ui::output;

fn main() -> ExitCode {
    match rlab::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
