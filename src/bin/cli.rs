//! rosapi CLI Client
//!
//! Runs a single API command against a router and prints the reply.

use clap::{Parser, ValueEnum};
use rosapi::{Command, Config, LoginFlow, Outcome, Session};
use tracing_subscriber::{fmt, EnvFilter};

/// rosapi CLI
#[derive(Parser, Debug)]
#[command(name = "rosapi-cli")]
#[command(about = "Run a RouterOS API command and print the reply")]
#[command(version)]
struct Args {
    /// Router address
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// API port
    #[arg(short, long, default_value = "8728")]
    port: u16,

    /// Login user name
    #[arg(short, long, default_value = "admin")]
    user: String,

    /// Login password
    #[arg(short = 'P', long, default_value = "")]
    password: String,

    /// Login exchange to use
    #[arg(long, value_enum, default_value = "two-step")]
    login: LoginArg,

    /// Connect timeout in milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    /// Command path, e.g. /system/resource/print
    path: String,

    /// Parameter as key=value (repeatable)
    #[arg(short, long = "attr", value_parser = parse_pair)]
    attributes: Vec<(String, String)>,

    /// Query filter as key=value (repeatable)
    #[arg(short, long = "query", value_parser = parse_pair)]
    queries: Vec<(String, String)>,

    /// Valueless parameter such as stats or once (repeatable)
    #[arg(short, long = "flag")]
    flags: Vec<String>,

    /// Only return these properties (comma separated)
    #[arg(long, value_delimiter = ',')]
    proplist: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LoginArg {
    TwoStep,
    Plain,
    Auto,
}

impl From<LoginArg> for LoginFlow {
    fn from(arg: LoginArg) -> Self {
        match arg {
            LoginArg::TwoStep => LoginFlow::TwoStep,
            LoginArg::Plain => LoginFlow::Plain,
            LoginArg::Auto => LoginFlow::Auto,
        }
    }
}

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "warn,rosapi=info";

fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("rosapi CLI v{}", rosapi::VERSION);

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .username(&args.user)
        .password(&args.password)
        .login_flow(args.login.into())
        .connect_timeout_ms(args.timeout_ms)
        .build();

    let mut command = Command::new(&args.path);
    if !args.proplist.is_empty() {
        let properties: Vec<&str> = args.proplist.iter().map(String::as_str).collect();
        command = command.proplist(&properties);
    }
    for (key, value) in &args.attributes {
        command = command.attribute(key, value);
    }
    for flag in &args.flags {
        command = command.flag(flag);
    }
    for (key, value) in &args.queries {
        command = command.filter(key, value);
    }

    let mut session = match Session::open(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to open session: {}", e);
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = session.execute_raw(&command);
    session.disconnect();

    match outcome {
        Ok(Outcome::Done(reply)) => {
            for (index, row) in reply.rows.iter().enumerate() {
                if index > 0 {
                    println!();
                }
                for (key, value) in row {
                    println!("{}={}", key, value);
                }
            }
            if let Some(ret) = reply.ret() {
                println!("ret={}", ret);
            }
        }
        Ok(Outcome::Trap(trap)) => {
            eprintln!("trap: {}", trap.message);
            std::process::exit(2);
        }
        Err(e) => {
            tracing::error!("Command failed: {}", e);
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
