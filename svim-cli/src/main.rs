use svim_cli::error::exit_code;
use svim_cli::AppError;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let command = match svim_cli::cli::parse(std::env::args()) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{}", err);
            return AppError::Config(err).exit_code();
        }
    };

    match svim_cli::run(command) {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            err.exit_code()
        }
    }
}
