use std::process::ExitCode;

fn main() -> ExitCode {
    smartedu_cli::run()
}
