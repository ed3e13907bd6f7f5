//! `build-code`: decode build-export codes to their document, or encode a
//! document back into a code.
//!
//! Usage:
//!   build-code decode [CODE] [--strict] [--max-output BYTES | --unbounded] [--show-framing]
//!   build-code encode [--raw] [--level N] < document.xml

use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use build_code::{decode_with, encode_with, Compression, DecodeError, DecodeOptions, Framing, TextPolicy};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "build-code", version, about = "Decode and encode build-export codes")]
struct Cli {
    /// Tracing filter directive (e.g. `debug`, `build_code=trace`); `RUST_LOG` wins when set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the document a build code encodes.
    Decode(DecodeArgs),
    /// Read a document on stdin and print its build code.
    Encode(EncodeArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// The code to decode; read from stdin when omitted.
    code: Option<String>,
    /// Fail on malformed UTF-8 instead of substituting U+FFFD.
    #[arg(long)]
    strict: bool,
    /// Largest decompressed document accepted, in bytes.
    #[arg(long, value_name = "BYTES", default_value_t = build_code::DEFAULT_MAX_OUTPUT, conflicts_with = "unbounded")]
    max_output: usize,
    /// Accept documents of any size.
    #[arg(long)]
    unbounded: bool,
    /// Report the compression framing on stderr.
    #[arg(long)]
    show_framing: bool,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Emit raw DEFLATE instead of zlib framing.
    #[arg(long)]
    raw: bool,
    /// Compression level.
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: u32,
}

impl DecodeArgs {
    fn options(&self) -> DecodeOptions {
        let text = if self.strict { TextPolicy::Strict } else { TextPolicy::Lossy };
        let max_output = if self.unbounded { None } else { Some(self.max_output) };
        DecodeOptions::new().text(text).max_output(max_output)
    }
}

impl EncodeArgs {
    fn framing(&self) -> Framing {
        if self.raw {
            Framing::Raw
        } else {
            Framing::Zlib
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(command: Commands) -> Result<()> {
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    match command {
        Commands::Decode(args) => decode_cmd(&args, stdin, stdout),
        Commands::Encode(args) => encode_cmd(&args, stdin, stdout),
    }
}

fn decode_cmd(args: &DecodeArgs, input: impl Read, mut output: impl Write) -> Result<()> {
    let code = match &args.code {
        Some(code) => code.clone(),
        None => read_all(input)?.trim().to_string(),
    };
    let decoded = decode_with(&code, &args.options()).context("failed to decode build code")?;
    tracing::info!(framing = %decoded.framing, len = decoded.text.len(), "decoded build code");
    if args.show_framing {
        eprintln!("framing: {}", decoded.framing);
    }
    output
        .write_all(decoded.text.as_bytes())
        .and_then(|()| output.flush())
        .context("failed to write document")?;
    Ok(())
}

fn encode_cmd(args: &EncodeArgs, input: impl Read, mut output: impl Write) -> Result<()> {
    let doc = read_all(input)?;
    let code = encode_with(&doc, args.framing(), Compression::new(args.level));
    tracing::info!(framing = %args.framing(), len = code.len(), "encoded build code");
    writeln!(output, "{code}")
        .and_then(|()| output.flush())
        .context("failed to write build code")?;
    Ok(())
}

fn read_all(mut input: impl Read) -> Result<String> {
    let mut buf = String::new();
    input
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<DecodeError>() {
        Some(DecodeError::InvalidEncoding(_)) => 2,
        Some(DecodeError::InvalidCompression(_)) => 3,
        Some(DecodeError::InvalidText(_)) => 4,
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn decode_flags_map_to_options() {
        let cli = Cli::try_parse_from(["build-code", "decode", "eJwDAAAAAAE", "--strict", "--max-output", "4096"])
            .unwrap();
        let Commands::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert_eq!(args.code.as_deref(), Some("eJwDAAAAAAE"));
        let options = args.options();
        assert_eq!(options.text, TextPolicy::Strict);
        assert_eq!(options.max_output, Some(4096));
    }

    #[test]
    fn unbounded_clears_the_limit() {
        let cli = Cli::try_parse_from(["build-code", "decode", "--unbounded"]).unwrap();
        let Commands::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert!(args.code.is_none());
        assert_eq!(args.options().max_output, None);
        assert!(Cli::try_parse_from(["build-code", "decode", "--unbounded", "--max-output", "1"]).is_err());
    }

    #[test]
    fn encode_flags_select_framing_and_level() {
        let cli = Cli::try_parse_from(["build-code", "--log-level", "debug", "encode", "--raw", "--level", "9"])
            .unwrap();
        assert_eq!(cli.log_level, "debug");
        let Commands::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.framing(), Framing::Raw);
        assert_eq!(args.level, 9);
        assert!(Cli::try_parse_from(["build-code", "encode", "--level", "10"]).is_err());
    }

    #[test]
    fn decode_errors_map_to_exit_codes() {
        let err = decode_with("abc!", &DecodeOptions::default())
            .context("failed to decode build code")
            .unwrap_err();
        assert_eq!(exit_code(&err), 2);

        let err = decode_with("________________", &DecodeOptions::default())
            .context("failed to decode build code")
            .unwrap_err();
        assert_eq!(exit_code(&err), 3);

        assert_eq!(exit_code(&anyhow::anyhow!("stdin closed")), 1);
    }

    fn parse_decode(argv: &[&str]) -> DecodeArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Decode(args) => args,
            other => panic!("expected decode, got {other:?}"),
        }
    }

    fn parse_encode(argv: &[&str]) -> EncodeArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Encode(args) => args,
            other => panic!("expected encode, got {other:?}"),
        }
    }

    #[test]
    fn encode_then_decode_through_stdin() {
        let doc = "<PathOfBuilding>\n\t<Notes>Größe 火球</Notes>\n</PathOfBuilding>\n";

        let mut code = Vec::new();
        encode_cmd(&parse_encode(&["build-code", "encode", "--raw"]), doc.as_bytes(), &mut code).unwrap();
        let code = String::from_utf8(code).unwrap();
        assert!(code.ends_with('\n'));

        // The trailing newline from `encode` must be trimmed off stdin input.
        let mut out = Vec::new();
        decode_cmd(&parse_decode(&["build-code", "decode"]), code.as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), doc);
    }

    #[test]
    fn code_argument_takes_precedence_over_stdin() {
        let code = build_code::encode("<Build/>");
        let args = parse_decode(&["build-code", "decode", code.as_str()]);
        let mut out = Vec::new();
        decode_cmd(&args, "not a code".as_bytes(), &mut out).unwrap();
        assert_eq!(out, b"<Build/>");
    }

    #[test]
    fn failed_decode_writes_nothing() {
        let mut out = Vec::new();
        let err = decode_cmd(&parse_decode(&["build-code", "decode"]), "  abc!\n".as_bytes(), &mut out)
            .unwrap_err();
        assert_eq!(exit_code(&err), 2);
        assert!(out.is_empty());
    }

    #[test]
    fn max_output_flag_reaches_the_decoder() {
        let code = build_code::encode(&"<Item/>".repeat(1_000));
        let args = parse_decode(&["build-code", "decode", code.as_str(), "--max-output", "64"]);
        let err = decode_cmd(&args, io::empty(), io::sink()).unwrap_err();
        assert!(
            format!("{err:#}").contains("exceeds 64 bytes"),
            "{err:#}"
        );
        assert_eq!(exit_code(&err), 3);
    }
}
