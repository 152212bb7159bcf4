use std::{fs::read_to_string, path::PathBuf, process::ExitCode, rc::Rc};

use clap::Parser;
use classc::{
    errors::errors::Error,
    lexer::lexer::tokenize,
    mangle::mangle::mangle_method,
    parser::parser::parse,
    render_error, resolve,
    semantic::program::Program,
    types::context::TypeRegistry,
};
use tracing_subscriber::EnvFilter;

/// Resolves a source file and lists the methods it defines
#[derive(Parser)]
#[command(name = "classc")]
#[command(version = "0.1.0")]
#[command(about = "Semantic resolver for class-based source files", long_about = None)]
struct Args {
    /// Path to the source file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print each method's linkage name next to it
    #[arg(long)]
    mangled: bool,
}

fn main() -> ExitCode {
    // Tracing is only installed when CLASSC_LOG is set, e.g. CLASSC_LOG=classc=trace
    if let Ok(filter) = EnvFilter::try_from_env("CLASSC_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }

    let args = Args::parse();

    let source = match read_to_string(&args.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", args.file.display(), error);
            return ExitCode::FAILURE;
        },
    };
    let file_name = match args.file.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => args.file.to_string_lossy().into_owned(),
    };

    let resolved = compile(source.clone(), file_name).and_then(|(registry, program)| {
        print_methods(&registry, &program, args.mangled)
    });

    match resolved {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            println!("{}", render_error(&error, &source));
            ExitCode::FAILURE
        },
    }
}

fn compile(source: String, file_name: String) -> Result<(TypeRegistry, Program), Error> {
    let tokens = tokenize(source, Some(file_name.clone()))?;
    let syntax = parse(tokens, Rc::new(file_name))?;
    resolve(&syntax)
}

fn print_methods(registry: &TypeRegistry, program: &Program, mangled: bool) -> Result<(), Error> {
    for (id, method) in program.methods() {
        if method.is_operator() {
            continue;
        }

        let name = match method.owner {
            Some(class) => format!("{}.{}", program.class(class)?.name, method.name),
            None => method.name.clone(),
        };

        if mangled {
            println!("{} {}", name, mangle_method(registry, program, id)?);
        } else {
            println!("{}", name);
        }
    }

    Ok(())
}
