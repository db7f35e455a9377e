//! Minimal `gzip`/`gunzip`-alike CLI (§6.5), built with `clap` derive. Ships
//! as an ambient-stack demonstration of the library, not as the deliverable
//! itself (see `SPEC_FULL.md` §1's non-goals).

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use deflate_rs::{Compressor, Decompressor};

#[derive(Parser)]
#[command(name = "gzipd", version, about = "compress or decompress gzip files")]
struct Args {
    /// Files to process; `-` or omitted means stdin.
    files: Vec<PathBuf>,

    /// Write to stdout, keep the input file(s) unchanged.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Decompress instead of compress.
    #[arg(short = 'd', long)]
    decompress: bool,

    /// Force overwriting an existing output file.
    #[arg(short = 'f', long)]
    force: bool,

    /// Keep (don't delete) the input file.
    #[arg(short = 'k', long)]
    keep: bool,

    /// Suppress warnings.
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Suffix to use for compressed files.
    #[arg(short = 'S', long = "suffix", default_value = ".gz")]
    suffix: String,

    /// Test the integrity of the compressed file; write nothing.
    #[arg(short = 't', long)]
    test: bool,

    /// Compression level 0-12 (short flags -1..-9 cover the conventional
    /// range; --level reaches the extended 10-12 tier this codec supports).
    #[arg(long, default_value_t = 6)]
    level: u8,

    #[arg(short = '1', long = "fast", hide = true)]
    l1: bool,
    #[arg(short = '2', hide = true)]
    l2: bool,
    #[arg(short = '3', hide = true)]
    l3: bool,
    #[arg(short = '4', hide = true)]
    l4: bool,
    #[arg(short = '5', hide = true)]
    l5: bool,
    #[arg(short = '6', hide = true)]
    l6: bool,
    #[arg(short = '7', hide = true)]
    l7: bool,
    #[arg(short = '8', hide = true)]
    l8: bool,
    #[arg(short = '9', long = "best", hide = true)]
    l9: bool,
}

impl Args {
    fn resolved_level(&self) -> u8 {
        let shorthand = [
            (self.l1, 1),
            (self.l2, 2),
            (self.l3, 3),
            (self.l4, 4),
            (self.l5, 5),
            (self.l6, 6),
            (self.l7, 7),
            (self.l8, 8),
            (self.l9, 9),
        ];
        shorthand
            .into_iter()
            .find(|(set, _)| *set)
            .map(|(_, level)| level)
            .unwrap_or(self.level)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let mut args = Args::parse();

    // Invoked as `gunzip` defaults to decompress, per §6.5.
    if let Some(argv0) = std::env::args().next() {
        if argv0.contains("gunzip") {
            args.decompress = true;
        }
    }

    let mut had_warning = false;

    let inputs: Vec<Option<PathBuf>> = if args.files.is_empty() {
        vec![None]
    } else {
        args.files
            .iter()
            .map(|p| if p.as_os_str() == "-" { None } else { Some(p.clone()) })
            .collect()
    };

    for input in inputs {
        if let Err(warning) = process_one(&args, input.as_deref()) {
            if !args.quiet {
                eprintln!("gzipd: {warning}");
            }
            had_warning = true;
        }
    }

    if had_warning && !args.quiet {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

fn process_one(args: &Args, input_path: Option<&std::path::Path>) -> Result<(), String> {
    let input_data = read_input(input_path)?;

    if args.test {
        let mut d = Decompressor::new();
        let mut scratch = vec![0u8; input_data.len().max(64) * 8];
        return d
            .gzip_decompress(&input_data, &mut scratch)
            .map(|_| ())
            .map_err(|e| format!("{}: {e}", display_path(input_path)));
    }

    if args.decompress {
        let mut d = Decompressor::new();
        let mut out = vec![0u8; input_data.len().max(64) * 16];
        let result = loop {
            match d.gzip_decompress(&input_data, &mut out) {
                Ok(r) => break r,
                Err(deflate_rs::Error::InsufficientSpace) => {
                    out.resize(out.len() * 2, 0);
                }
                Err(e) => return Err(format!("{}: {e}", display_path(input_path))),
            }
        };
        write_output(args, input_path, &out[..result.bytes_written], true)
    } else {
        let level = args.resolved_level();
        let mut c = Compressor::new(level).ok_or_else(|| "invalid compression level".to_string())?;
        let mut out = vec![0u8; c.gzip_compress_bound(input_data.len())];
        let n = c
            .gzip_compress(&input_data, &mut out)
            .ok_or("output buffer too small")?;
        write_output(args, input_path, &out[..n], false)
    }
}

fn read_input(path: Option<&std::path::Path>) -> Result<Vec<u8>, String> {
    match path {
        Some(p) => fs::read(p).map_err(|e| format!("{}: {e}", p.display())),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| format!("stdin: {e}"))?;
            Ok(buf)
        }
    }
}

fn write_output(
    args: &Args,
    input_path: Option<&std::path::Path>,
    data: &[u8],
    is_decompressing: bool,
) -> Result<(), String> {
    if args.stdout || input_path.is_none() {
        io::stdout()
            .write_all(data)
            .map_err(|e| format!("stdout: {e}"))?;
        return Ok(());
    }

    let input_path = input_path.unwrap();
    let out_path = if is_decompressing {
        strip_suffix(input_path, &args.suffix)
    } else {
        let mut p = input_path.as_os_str().to_owned();
        p.push(&args.suffix);
        PathBuf::from(p)
    };

    if out_path.exists() && !args.force {
        return Err(format!("{}: already exists", out_path.display()));
    }

    fs::write(&out_path, data).map_err(|e| format!("{}: {e}", out_path.display()))?;

    if !args.keep {
        fs::remove_file(input_path).map_err(|e| format!("{}: {e}", input_path.display()))?;
    }
    Ok(())
}

fn strip_suffix(path: &std::path::Path, suffix: &str) -> PathBuf {
    let s = path.to_string_lossy();
    match s.strip_suffix(suffix) {
        Some(stripped) => PathBuf::from(stripped),
        None => path.with_extension("out"),
    }
}

fn display_path(path: Option<&std::path::Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string())
}
