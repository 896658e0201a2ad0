use crate::dataset::MovieRecord;
use colored::*;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.len()).bright_cyan());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

pub fn print_prompt(text: &str) {
    print!("{}", text.yellow().bold());
}

/// Compact listing of the structured results behind a turn
pub fn print_movies(movies: &[MovieRecord]) {
    for (i, movie) in movies.iter().enumerate() {
        println!(
            "  {} {} ({}) {}",
            format!("{}.", i + 1).bright_cyan(),
            movie.title.bold(),
            movie.year,
            format!("⭐{}", movie.rating).yellow()
        );
    }
}
