use std::process::ExitCode;

fn main() -> ExitCode {
    match ethics_assistant::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
