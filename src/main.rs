use clap::Parser;

fn main() {
    let cli = c_notify::cli::Cli::parse();
    match c_notify::run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("c-notify: {err:#}");
            std::process::exit(1);
        }
    }
}
