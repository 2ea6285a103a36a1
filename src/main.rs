//! Ferrule CLI: execute files, evaluate snippets or run the REPL.

use std::env;
use std::fs;
use std::process;

use tracing_subscriber::EnvFilter;

use ferrule::ast::printer::print_program;
use ferrule::bytecode::{disassemble_chunk, Compiler, InterpretResult, Vm};
use ferrule::config::VmOptions;
use ferrule::error::{ConsoleReporter, ErrorReporter, FerruleError};
use ferrule::repl::Repl;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the log filter (`warn` when unset).
const LOG_ENV: &str = "FERRULE_LOG";

const EXIT_USAGE: i32 = 64;
const EXIT_COMPILE: i32 = 65;
const EXIT_RUNTIME: i32 = 70;
const EXIT_IO: i32 = 74;

/// CLI command to execute.
enum Command {
    /// Run a script file
    Run { file: String },
    /// Evaluate a string
    Eval { code: String },
    /// Start the REPL
    Repl,
}

/// CLI options parsed from arguments.
struct Options {
    command: Command,
    disassemble: bool,
    ast: bool,
    vm: VmOptions,
}

fn print_usage() {
    eprintln!("Ferrule {} - bytecode scripting language", VERSION);
    eprintln!();
    eprintln!("Usage: ferrule [options] [script]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -e <code>              Evaluate code");
    eprintln!("  --disassemble          Print the compiled bytecode before running");
    eprintln!("  --ast                  Print the parsed program before running");
    eprintln!("  --trace                Trace every executed instruction (needs {}=trace)", LOG_ENV);
    eprintln!("  --max-instructions N   Stop after N instructions");
    eprintln!("  --help, -h             Show this help message");
    eprintln!("  --version, -V          Show the version");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {}             Log filter, e.g. debug or ferrule=trace", LOG_ENV);
    eprintln!("  {}           Same as --trace when set to 1", ferrule::config::TRACE_ENV);
    eprintln!("  {} Default for --max-instructions", ferrule::config::MAX_INSTRUCTIONS_ENV);
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  ferrule                       Start interactive REPL");
    eprintln!("  ferrule script.fe             Run a script file");
    eprintln!("  ferrule --disassemble a.fe    Show bytecode, then run");
    eprintln!("  ferrule -e 'print 1 + 1;'     Evaluate code directly");
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    print_usage();
    process::exit(EXIT_USAGE);
}

fn parse_args() -> Options {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut options = Options {
        command: Command::Repl,
        disassemble: false,
        ast: false,
        vm: VmOptions::from_env(),
    };

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "-V" | "--version" => {
                println!("ferrule {}", VERSION);
                process::exit(0);
            }
            "-e" => {
                i += 1;
                if i >= args.len() {
                    usage_error("-e requires code to evaluate");
                }
                options.command = Command::Eval {
                    code: args[i].clone(),
                };
            }
            "--disassemble" => options.disassemble = true,
            "--ast" => options.ast = true,
            "--trace" => options.vm = options.vm.with_trace(true),
            "--max-instructions" => {
                i += 1;
                let Some(value) = args.get(i) else {
                    usage_error("--max-instructions requires a number");
                };
                match value.parse::<u64>() {
                    Ok(limit) => options.vm = options.vm.with_max_instructions(Some(limit)),
                    Err(_) => usage_error(&format!("Invalid instruction limit: {}", value)),
                }
            }
            s if s.starts_with("--max-instructions=") => {
                let value = &s["--max-instructions=".len()..];
                match value.parse::<u64>() {
                    Ok(limit) => options.vm = options.vm.with_max_instructions(Some(limit)),
                    Err(_) => usage_error(&format!("Invalid instruction limit: {}", value)),
                }
            }
            s if s.starts_with('-') => usage_error(&format!("Unknown option: {}", s)),
            _ => {
                if !matches!(options.command, Command::Repl) {
                    usage_error(&format!("Unexpected argument: {}", arg));
                }
                options.command = Command::Run { file: arg.clone() };
            }
        }
        i += 1;
    }

    options
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let options = parse_args();
    init_logging();

    match &options.command {
        Command::Repl => run_repl(&options),
        Command::Run { file } => run_file(file, &options),
        Command::Eval { code } => run_source(code, "<eval>", &options),
    }
}

fn run_file(path: &str, options: &Options) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            let err = FerruleError::from(e);
            eprintln!("Error: could not read '{}': {}", path, err);
            process::exit(EXIT_IO);
        }
    };
    run_source(&source, path, options);
}

fn run_source(source: &str, name: &str, options: &Options) {
    let mut reporter = ConsoleReporter::new();

    let program = match ferrule::parse_source(source) {
        Ok(program) => program,
        Err(errors) => exit_with_compile_errors(&mut reporter, &errors),
    };

    if options.ast {
        println!("{}", print_program(&program));
    }

    let chunk = match Compiler::compile(&program) {
        Ok(chunk) => chunk,
        Err(e) => exit_with_compile_errors(&mut reporter, &[e.into()]),
    };

    if options.disassemble {
        print!("{}", disassemble_chunk(&chunk, name));
    }

    let mut vm = Vm::new().with_options(options.vm);
    if vm.interpret(&chunk) == InterpretResult::RuntimeError {
        process::exit(EXIT_RUNTIME);
    }
}

fn exit_with_compile_errors(reporter: &mut ConsoleReporter, errors: &[FerruleError]) -> ! {
    for err in errors {
        reporter.report(err.line().unwrap_or(0), &err.to_string());
    }
    process::exit(EXIT_COMPILE);
}

fn run_repl(options: &Options) {
    if let Err(e) = Repl::new(options.vm).run() {
        eprintln!("Error: {}", e);
        process::exit(EXIT_IO);
    }
}
