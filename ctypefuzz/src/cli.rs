use crate::util::{self, PathOrStd};

use ctypefuzz_lib::settings::{GenerateOpts, GenerateOptsBuilder, GenerateOptsErr, MAX_PARAMS};

use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};

use std::{
    ffi::OsString,
    io::{self, Write},
};

/// Single dash spellings accepted for compatibility with older scripts.
const LEGACY_FLAGS: [(&str, &str); 4] = [
    ("-no-cv", "--no-cv"),
    ("-only-int", "--only-int"),
    ("-param", "--param"),
    ("-out", "--out"),
];

/// Generates a random C typedef built from scalars, pointers and function pointers.
#[derive(Debug, Parser)]
#[command(author, version, long_about = None)]
pub struct Args {
    /// The recursion depth of the generated type, at least 1
    #[arg(value_parser = parse_depth)]
    depth: u32,

    /// Do not generate `const` and `volatile` qualifiers
    #[arg(long = "no-cv")]
    no_cv: bool,

    /// Restrict every type except function pointers to `int`
    #[arg(long = "only-int")]
    only_int: bool,

    /// The maximum amount of parameters of a generated function pointer (at most 32)
    #[arg(long = "param", value_name = "MAX_COUNT", default_value = "5", value_parser = parse_param)]
    param_max: u32,

    /// The output file, use `-` for std out.
    #[arg(
        long = "out",
        value_name = "FILE_PATH",
        default_value = "-",
        allow_hyphen_values = true
    )]
    output_path: PathOrStd,

    /// Seed for a reproducible run. A random seed is picked and logged otherwise.
    #[arg(long)]
    seed: Option<u64>,

    /// The chance that a level above the depth limit becomes a function pointer
    #[arg(long = "fn-bias", value_name = "P", default_value_t = 1.0)]
    fn_bias: f64,

    /// The name declared by the typedef
    #[arg(long, default_value = "T")]
    name: String,

    /// After this many nodes every remaining part of the type is a scalar
    #[arg(long = "max-nodes", value_name = "COUNT")]
    max_nodes: Option<usize>,
}

impl Args {
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn parse_depth(s: &str) -> Result<u32, String> {
    match util::parse_c_int(s).and_then(|v| u32::try_from(v).ok()) {
        Some(0) => Err("the depth has to be at least 1".to_owned()),
        Some(depth) => Ok(depth),
        None => Err(format!("`{s}` is not a depth")),
    }
}

fn parse_param(s: &str) -> Result<u32, String> {
    match util::parse_c_int(s).and_then(|v| u32::try_from(v).ok()) {
        Some(count) if count <= MAX_PARAMS => Ok(count),
        Some(count) => Err(format!("{count} is more than {MAX_PARAMS} parameters")),
        None => Err(format!("`{s}` is not a parameter count")),
    }
}

/// Rewrites the legacy spellings to their long form. Tokens that are the value of the option
/// before them are left alone, so `-out -param` still writes to a file named `-param`.
fn normalize_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Args::command();
    let takes_value: Vec<String> = command
        .get_arguments()
        .filter(|arg| arg.get_action().takes_values())
        .filter_map(|arg| arg.get_long())
        .map(|long| format!("--{long}"))
        .collect();

    let mut is_value = false;
    let mut after_separator = false;
    let mut normalized = Vec::new();
    for arg in args {
        let mut arg: OsString = arg.into();
        if !is_value && !after_separator {
            if let Some((_, long)) = LEGACY_FLAGS.iter().find(|(legacy, _)| arg == *legacy) {
                arg = OsString::from(*long);
            }
        }

        after_separator |= !is_value && arg == "--";
        is_value = !is_value && !after_separator && takes_value.iter().any(|flag| arg == **flag);
        normalized.push(arg);
    }
    normalized
}

pub fn try_parse_args<I, T>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    Args::try_parse_from(normalize_legacy_flags(args))
}

/// Parses the arguments. Malformed arguments print the help text and give `None`, which is not an
/// error for the caller: the process should still exit successfully.
pub fn parse_args<I, T>(args: I) -> anyhow::Result<Option<Args>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    match try_parse_args(args) {
        Ok(args) => Ok(Some(args)),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            ignore_broken_pipe(err.print()).context("Failed to print help")?;
            Ok(None)
        }
        Err(_) => {
            write_usage(io::stdout().lock()).context("Failed to print usage")?;
            Ok(None)
        }
    }
}

fn write_usage(mut out: impl Write) -> io::Result<()> {
    let help = Args::command().render_help();
    ignore_broken_pipe(writeln!(out, "{help}").and_then(|()| out.flush()))
}

/// A reader that went away, like `head`, is not an error.
fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

pub fn extract_generate_opts(args: &Args) -> Result<GenerateOpts, GenerateOptsErr> {
    let opts = GenerateOptsBuilder::new()
        .depth(args.depth)
        .param_max(args.param_max)
        .only_int(args.only_int)
        .no_cv(args.no_cv)
        .fn_ptr_bias(args.fn_bias);

    let opts = if let Some(max_nodes) = args.max_nodes {
        opts.max_nodes(max_nodes)
    } else {
        opts
    };

    opts.build()
}

pub fn open_output(args: &Args) -> anyhow::Result<Box<dyn std::io::Write>> {
    match &args.output_path {
        PathOrStd::Path(path) => std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)
            .map(|f| Box::new(f) as Box<dyn std::io::Write>)
            .with_context(|| format!("Failed to open output file `{}`", path.display())),
        PathOrStd::StdStream => Ok(Box::new(std::io::stdout().lock())),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        try_parse_args(std::iter::once("ctypefuzz").chain(args.iter().copied()))
    }

    #[test]
    fn legacy_flags() {
        let args = parse(&["4", "-no-cv", "-only-int", "-param", "2", "-out", "t.c"]).unwrap();
        assert_eq!(args.depth, 4);
        assert!(args.no_cv);
        assert!(args.only_int);
        assert_eq!(args.param_max, 2);
        assert_eq!(args.output_path, PathOrStd::Path("t.c".into()));
    }

    #[test]
    fn defaults() {
        let args = parse(&["3"]).unwrap();
        assert_eq!(args.param_max, 5);
        assert_eq!(args.output_path, PathOrStd::StdStream);
        assert_eq!(args.name(), "T");
        assert_eq!(args.seed(), None);

        let opts = extract_generate_opts(&args).unwrap();
        assert_eq!(opts.depth(), 3);
        assert_eq!(opts.fn_ptr_bias(), 1.0);
        assert_eq!(opts.max_nodes(), 65536);
    }

    #[test]
    fn new_flags() {
        let args = parse(&[
            "0x10",
            "--seed",
            "42",
            "--fn-bias",
            "0.8",
            "--name",
            "fp",
            "--max-nodes",
            "100",
        ])
        .unwrap();
        assert_eq!(args.depth, 16);
        assert_eq!(args.seed(), Some(42));
        assert_eq!(args.name(), "fp");

        let opts = extract_generate_opts(&args).unwrap();
        assert_eq!(opts.fn_ptr_bias(), 0.8);
        assert_eq!(opts.max_nodes(), 100);
    }

    #[test]
    fn malformed() {
        let test: [&[&str]; 7] = [
            &[],
            &["zero"],
            &["0"],
            &["3", "-param"],
            &["3", "-param", "33"],
            &["3", "-out"],
            &["3", "-unknown"],
        ];

        for args in test {
            assert!(parse(args).is_err(), "{args:?}");
            let args = std::iter::once("ctypefuzz").chain(args.iter().copied());
            assert!(matches!(parse_args(args), Ok(None)));
        }
    }

    #[test]
    fn legacy_spellings_as_values() {
        let args = parse(&["3", "-out", "-param"]).unwrap();
        assert_eq!(args.output_path, PathOrStd::Path("-param".into()));
        assert_eq!(args.param_max, 5);

        let args = parse(&["3", "--name", "x", "-param", "1", "-out", "-no-cv"]).unwrap();
        assert_eq!(args.param_max, 1);
        assert_eq!(args.output_path, PathOrStd::Path("-no-cv".into()));
        assert!(!args.no_cv);

        let args = parse(&["-no-cv", "-out", "-", "7"]).unwrap();
        assert!(args.no_cv);
        assert_eq!(args.output_path, PathOrStd::StdStream);
        assert_eq!(args.depth, 7);
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn usage_to_closed_pipe() {
        assert!(write_usage(ClosedPipe).is_ok());

        let mut out = Vec::new();
        write_usage(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Usage:"), "{out}");
        assert!(out.contains("--only-int"), "{out}");
    }

    #[test]
    fn core_errors_are_not_usage_errors() {
        let args = parse(&["3", "--fn-bias", "2"]).unwrap();
        assert_eq!(
            extract_generate_opts(&args),
            Err(GenerateOptsErr::InvalidProbability("function pointer bias", 2.0))
        );
    }
}
