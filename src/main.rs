use colored::Colorize;

fn main() {
    if let Err(e) = query_filter::run() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
