use std::{env, process};

use lox::Lox;

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut lox = Lox::new();

    match args.len() {
        n if n > 2 => {
            eprintln!("Usage: lox [script]");
            process::exit(1);
        }
        2 => process::exit(lox.run_file(&args[1])),
        _ => lox.run_prompt(),
    }
}
