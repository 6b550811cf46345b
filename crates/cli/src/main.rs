mod config;
mod logging;
mod serve;

use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use reverseai_core::{build_prompt, Category, Submission};

/// ReverseAI: find the prompt behind an unhinged LinkedIn post.
#[derive(Parser)]
#[command(
    name = "reverseai",
    version,
    about = "ReverseAI - decode LinkedIn's wildest posts"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the ReverseAI web page
    Serve {
        /// Port to listen on [default: 8501]
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind [default: 0.0.0.0]
        #[arg(long)]
        bind: Option<String>,
        /// Path to a TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Gemini model name [default: gemini-2.0-flash]
        #[arg(long)]
        model: Option<String>,
        /// Generative Language API base URL
        #[arg(long)]
        api_base: Option<String>,
    },

    /// Print the prompt that would be sent for a post (no network call)
    Prompt {
        /// Post category
        #[arg(long, default_value = "Humble Brag")]
        category: Category,
        /// Post text; read from stdin when omitted
        text: Option<String>,
    },

    /// List the available post categories
    Categories,
}

fn main() {
    // A .env in the working directory may carry GEMINI_API
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    match cli.command {
        Commands::Serve {
            port,
            bind,
            config: config_path,
            model,
            api_base,
        } => {
            let overrides = config::CliOverrides {
                port,
                bind,
                model,
                api_base,
            };
            cmd_serve(config_path.as_deref(), overrides);
        }
        Commands::Prompt { category, text } => {
            cmd_prompt(category, text);
        }
        Commands::Categories => {
            for c in Category::ALL {
                println!("{}", c);
            }
        }
    }
}

fn cmd_serve(config_path: Option<&std::path::Path>, overrides: config::CliOverrides) {
    let config = match config::load(config_path, overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(serve::start_server(config)) {
        eprintln!("Server error: {}", e);
        process::exit(1);
    }
}

fn cmd_prompt(category: Category, text: Option<String>) {
    let text = match text {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("error: failed to read stdin: {}", e);
                process::exit(1);
            }
            buf
        }
    };

    match Submission::new(text, category) {
        Ok(submission) => print!("{}", build_prompt(&submission)),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
