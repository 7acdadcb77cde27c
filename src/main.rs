use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use huffkey::cli;
use huffkey::keys::KeyStore;

/// Huffman-encode text files into bit-strings and back.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// File holding one `<bits>:<table>` record per encoded file
    #[arg(long, global = true, default_value = "pass-keys.txt")]
    keys: PathBuf,

    /// Raise log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replace a text file with its bit-string and record its table
    Encode {
        file: PathBuf,
        /// Write the bit-string here instead of over FILE
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore a text file from its bit-string using the key file
    Decode {
        file: PathBuf,
        /// Write the text here instead of over FILE
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the code of every character of a text file
    Codes { file: PathBuf },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let store = KeyStore::new(&args.keys);
    match args.command {
        Command::Encode { file, output } => cli::encode_file(&file, output.as_deref(), &store),
        Command::Decode { file, output } => cli::decode_file(&file, output.as_deref(), &store),
        Command::Codes { file } => {
            match cli::codes(&file)? {
                Some(listing) => print!("{listing}"),
                None => println!("{} is empty", file.display()),
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
