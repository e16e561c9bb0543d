use std::env;
use std::process::ExitCode;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;
use tracing_subscriber::EnvFilter;
use tumpuk::storage::env::DbEnv;
use tumpuk::storage::self_test::test_heap_storage;

/// Parse a query and echo it back in SQL form. Real execution is a later
/// milestone.
fn run_query(query: &str) {
    match Parser::parse_sql(&SQLiteDialect {}, query) {
        Ok(statements) => {
            for statement in statements {
                println!("{}", statement);
            }
        }
        Err(_) => println!("invalid SQL: {}", query),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: tumpuk dbenvpath");
        return ExitCode::FAILURE;
    }

    let db_env = match DbEnv::open(&args[1]) {
        Ok(db_env) => db_env,
        Err(err) => {
            eprintln!("(tumpuk: {})", err);
            return ExitCode::FAILURE;
        }
    };
    println!("(tumpuk: running with database environment at {})", args[1]);

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("(tumpuk: {})", err);
            return ExitCode::FAILURE;
        }
    };

    loop {
        match rl.readline("SQL> ") {
            Ok(line) => {
                let query = line.trim();
                if query.is_empty() {
                    continue;
                }
                if query == "quit" {
                    break;
                }
                if query == "test" {
                    let outcome = if test_heap_storage(&db_env) {
                        "ok"
                    } else {
                        "failed"
                    };
                    println!("test_heap_storage: {}", outcome);
                    continue;
                }
                let _ = rl.add_history_entry(query);
                run_query(query);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("(tumpuk: {})", err);
                break;
            }
        }
    }

    ExitCode::SUCCESS
}
