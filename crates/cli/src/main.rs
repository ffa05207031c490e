use std::process::ExitCode;

fn main() -> ExitCode {
    leavegate_cli::run()
}
