// Idiomatic Rust CLI for Nitrolz.
//
// Uses explicit subcommands and long-form options around the
// compress/decompress/verify/dump operations.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::lzss::header::{CompressionHeader, HEADER_LEN, MAX_DECOMPRESSED_SIZE, OverlayHeader};
use crate::lzss::token::{
    FLAG_GROUP, LZ10_MATCH_MAX, LZ11_MATCH_MAX, MATCH_MIN, PAD_BYTE, WINDOW_SIZE,
};
use crate::lzss::tokenizer::{DispMode, Lz10Tokens, Lz11Tokens, TokenAt, Tokens};
use crate::lzss::{self, Token, Variant};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// LZSS compressor/decompressor for console ROM binaries.
#[derive(Parser, Debug)]
#[command(
    name = "nitrolz",
    version,
    about = "LZSS10/LZSS11 compressor/decompressor",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compress an input stream.
    Compress(CompressArgs),
    /// Decompress an input stream.
    Decompress(DecompressArgs),
    /// Check compressed files for internal consistency.
    Verify(VerifyArgs),
    /// Print the token stream of a compressed file.
    Dump(DumpArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Lz10,
    Lz11,
}

impl From<FormatArg> for Variant {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Lz10 => Variant::Lz10,
            FormatArg::Lz11 => Variant::Lz11,
        }
    }
}

#[derive(Args, Debug)]
struct CompressArgs {
    /// Output format.
    #[arg(long, short = 'F', value_enum, default_value_t = FormatArg::Lz10)]
    format: FormatArg,

    /// Input file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DecompressArgs {
    /// Input is an overlay (backward stream with trailer at end of file).
    #[arg(long)]
    overlay: bool,

    /// Input file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Compressed files to check ('-' or none: stdin).
    #[arg(value_hint = ValueHint::FilePath)]
    files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Compressed input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Compress,
    Decompress,
    Verify,
    Dump,
    Config,
}

struct Options {
    command: Command,
    format: Variant,
    overlay: bool,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    verify_files: Vec<PathBuf>,
    json_output: bool,
}

fn resolve_options(cli: Cli) -> Options {
    let quiet = cli.quiet;
    let verbose = cli.verbose.min(2);
    let force = cli.force;
    let json_output = cli.json_output;

    match cli.command {
        Cmd::Compress(args) => Options {
            command: Command::Compress,
            format: args.format.into(),
            overlay: false,
            use_stdout: args.stdout,
            force,
            quiet,
            verbose,
            input_file: args.input.or(args.input_pos),
            output_file: args.output.or(args.output_pos),
            verify_files: Vec::new(),
            json_output,
        },
        Cmd::Decompress(args) => Options {
            command: Command::Decompress,
            format: Variant::Lz10,
            overlay: args.overlay,
            use_stdout: args.stdout,
            force,
            quiet,
            verbose,
            input_file: args.input.or(args.input_pos),
            output_file: args.output.or(args.output_pos),
            verify_files: Vec::new(),
            json_output,
        },
        Cmd::Verify(args) => Options {
            command: Command::Verify,
            format: Variant::Lz10,
            overlay: false,
            use_stdout: false,
            force,
            quiet,
            verbose,
            input_file: None,
            output_file: None,
            verify_files: args.files,
            json_output,
        },
        Cmd::Dump(args) => Options {
            command: Command::Dump,
            format: Variant::Lz10,
            overlay: false,
            use_stdout: false,
            force,
            quiet,
            verbose,
            input_file: Some(args.input),
            output_file: None,
            verify_files: Vec::new(),
            json_output,
        },
        Cmd::Config => Options {
            command: Command::Config,
            format: Variant::Lz10,
            overlay: false,
            use_stdout: false,
            force,
            quiet,
            verbose,
            input_file: None,
            output_file: None,
            verify_files: Vec::new(),
            json_output,
        },
    }
}

// ---------------------------------------------------------------------------
// Input/output plumbing
// ---------------------------------------------------------------------------

fn read_input(path: Option<&PathBuf>) -> io::Result<Vec<u8>> {
    match path {
        Some(p) => std::fs::read(p),
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Write `data` to the output file, or to stdout when no file is selected.
///
/// A broken pipe on stdout is treated as success so `nitrolz ... | head`
/// behaves like other stream tools.
fn write_output(opts: &Options, data: &[u8]) -> Result<(), String> {
    if !opts.use_stdout
        && let Some(path) = &opts.output_file
    {
        if path.exists() && !opts.force {
            return Err(format!(
                "output file exists, use -f to overwrite: {}",
                path.display()
            ));
        }
        let mut f = File::create(path).map_err(|e| format!("{}: {e}", path.display()))?;
        f.write_all(data)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match out.write_all(data).and_then(|()| out.flush()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(format!("stdout: {e}")),
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("nitrolz version {version} (Rust), Copyright (C) nitrolz contributors");
    eprintln!("Licensed under the Apache License, Version 2.0");

    let cli = cfg!(feature = "cli") as u8;
    let ptr_size = std::mem::size_of::<*const ()>();

    eprintln!("CLI={cli}");
    eprintln!("WINDOW_SIZE={WINDOW_SIZE}");
    eprintln!("MATCH_MIN={MATCH_MIN}");
    eprintln!("LZ10_MATCH_MAX={LZ10_MATCH_MAX}");
    eprintln!("LZ11_MATCH_MAX={LZ11_MATCH_MAX}");
    eprintln!("MAX_DECOMPRESSED_SIZE={MAX_DECOMPRESSED_SIZE}");
    eprintln!("FLAG_GROUP={FLAG_GROUP}");
    eprintln!("PAD_BYTE=0x{PAD_BYTE:02X}");
    eprintln!("sizeof(usize)={ptr_size}");

    0
}

// ---------------------------------------------------------------------------
// Compress command
// ---------------------------------------------------------------------------

fn cmd_compress(opts: &Options) -> i32 {
    let input = match read_input(opts.input_file.as_ref()) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("nitrolz: input: {e}");
            return 1;
        }
    };

    let packed = match lzss::compress(&input, opts.format) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("nitrolz: compress error: {e}");
            return 1;
        }
    };

    if let Err(msg) = write_output(opts, &packed) {
        eprintln!("nitrolz: {msg}");
        return 1;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "nitrolz: compress ({}): {} -> {} bytes",
            opts.format,
            input.len(),
            packed.len()
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "compress",
            "format": opts.format.to_string(),
            "input_size": input.len(),
            "output_size": packed.len(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

// ---------------------------------------------------------------------------
// Decompress command
// ---------------------------------------------------------------------------

fn cmd_decompress(opts: &Options) -> i32 {
    let input = match read_input(opts.input_file.as_ref()) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("nitrolz: input: {e}");
            return 1;
        }
    };

    let result = if opts.overlay {
        lzss::decompress_overlay(&input)
    } else {
        lzss::decompress(&input)
    };

    let unpacked = match result {
        Ok(u) => u,
        Err(e) => {
            eprintln!("nitrolz: decompress error: {e}");
            return 1;
        }
    };

    if let Err(msg) = write_output(opts, &unpacked) {
        eprintln!("nitrolz: {msg}");
        return 1;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "nitrolz: decompress: {} -> {} bytes",
            input.len(),
            unpacked.len()
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "decompress",
            "overlay": opts.overlay,
            "input_size": input.len(),
            "output_size": unpacked.len(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

// ---------------------------------------------------------------------------
// Verify command
// ---------------------------------------------------------------------------

// Exit codes: 0 all files pass, 1 at least one file fails verification,
// 2 at least one file could not be read.
fn cmd_verify(opts: &Options) -> i32 {
    let mut exit_code = 0;
    let mut results = Vec::new();

    // No files (or a lone '-') reads from stdin.
    let use_stdin = opts.verify_files.is_empty()
        || (opts.verify_files.len() == 1 && opts.verify_files[0].as_os_str() == "-");

    if use_stdin {
        let data = match read_input(None) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("nitrolz: stdin: {e}");
                return 2;
            }
        };
        exit_code = verify_one("-", &data, opts, &mut results);
    } else {
        for path in &opts.verify_files {
            let data = match std::fs::read(path) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("nitrolz: {}: {e}", path.display());
                    exit_code = 2;
                    continue;
                }
            };
            let code = verify_one(&path.display().to_string(), &data, opts, &mut results);
            if code > exit_code {
                exit_code = code;
            }
        }
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "verify",
            "files": results,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    exit_code
}

fn verify_one(
    name: &str,
    data: &[u8],
    opts: &Options,
    results: &mut Vec<serde_json::Value>,
) -> i32 {
    match lzss::verify(data) {
        Ok(report) => {
            if !opts.quiet {
                println!(
                    "{name}: ok ({}, {} bytes decompressed)",
                    report.variant, report.decompressed_size
                );
            }
            results.push(serde_json::json!({
                "file": name,
                "ok": true,
                "format": report.variant.to_string(),
                "decompressed_size": report.decompressed_size,
            }));
            0
        }
        Err(e) => {
            eprintln!("nitrolz: {name}: {e}");
            results.push(serde_json::json!({
                "file": name,
                "ok": false,
                "error": e.to_string(),
            }));
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Dump command
// ---------------------------------------------------------------------------

fn cmd_dump(opts: &Options) -> i32 {
    let input_file = match &opts.input_file {
        Some(path) => path.clone(),
        None => {
            eprintln!("nitrolz: dump requires an input file");
            return 1;
        }
    };

    let data = match std::fs::read(&input_file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("nitrolz: {}: {e}", input_file.display());
            return 1;
        }
    };

    let header = match CompressionHeader::parse(&data) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("nitrolz: invalid header: {e}");
            return 1;
        }
    };

    println!("format:            {}", header.variant);
    println!("decompressed size: {}", header.decompressed_size);
    println!("compressed size:   {}", data.len());
    println!();
    println!("  offset  flag    token");

    let body = &data[HEADER_LEN..];
    let tokens = match header.variant {
        Variant::Lz10 => Tokens::Lz10(Lz10Tokens::new(
            body,
            header.decompressed_size,
            DispMode::Standalone,
        )),
        Variant::Lz11 => Tokens::Lz11(Lz11Tokens::new(body, header.decompressed_size)),
    };

    let mut produced = 0usize;
    for TokenAt {
        token,
        offset,
        flag_offset,
    } in tokens
    {
        let abs = offset + HEADER_LEN;
        let flag_abs = flag_offset + HEADER_LEN;
        match token {
            Token::Literal(b) => {
                if opts.verbose > 0 {
                    println!("  {abs:06x}  {flag_abs:06x}  LIT  0x{b:02X}");
                }
                produced += 1;
            }
            Token::Match {
                length,
                displacement,
            } => {
                println!("  {abs:06x}  {flag_abs:06x}  CPY  {length:5} @-{displacement}");
                produced += length;
            }
        }
    }

    println!();
    println!("tokens decode to {produced} bytes");
    if produced != header.decompressed_size {
        eprintln!(
            "nitrolz: warning: token stream yields {produced} bytes, header declares {}",
            header.decompressed_size
        );
    }

    // Overlay trailers are also worth surfacing when present at the tail.
    if opts.verbose > 1
        && let Ok(overlay) = OverlayHeader::parse(&data)
    {
        println!();
        println!(
            "tail parses as overlay trailer: end_delta={} start_delta={} padding={}",
            overlay.end_delta, overlay.start_delta, overlay.padding
        );
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let mut opts = resolve_options(cli);

    // Warn if -c overrides output filename.
    if opts.use_stdout && opts.output_file.is_some() && !opts.quiet {
        eprintln!(
            "nitrolz: warning: -c option overrides output filename: {}",
            opts.output_file.as_ref().unwrap().display()
        );
        opts.output_file = None;
    }

    let exit_code = match opts.command {
        Command::Compress => cmd_compress(&opts),
        Command::Decompress => cmd_decompress(&opts),
        Command::Verify => cmd_verify(&opts),
        Command::Dump => cmd_dump(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
