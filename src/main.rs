// src/main.rs

use clap::Parser;
use env_logger::Env;
use std::fs;
use std::path::PathBuf;
use std::process;
use tagcheck::analyzer::{CheckerOptions, DEFAULT_MAX_DEPTH};
use tagcheck::diagnostics::codes;
use thiserror::Error;

/// 小型表达式语言的类型标签检查器
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 需要检查的源文件，每个文件是一个独立的检查单元
    #[arg(required_unless_present = "explain")]
    files: Vec<PathBuf>,

    /// 表达式嵌套的最大深度
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// 打印每个表达式语句解析出的类型
    #[arg(long)]
    print_types: bool,

    /// 输出调试日志（等价于 RUST_LOG=debug）
    #[arg(short, long)]
    verbose: bool,

    /// 打印某个诊断码的详细说明，例如 E0206
    #[arg(long, value_name = "CODE")]
    explain: Option<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to read file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unknown diagnostic code '{0}'")]
    UnknownCode(String),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    if let Some(code) = &cli.explain {
        let error_code = codes::lookup(code).ok_or_else(|| CliError::UnknownCode(code.clone()))?;
        println!("{}: {}\n\n{}", error_code.code, error_code.message, error_code.explanation);
        return Ok(());
    }

    let sources = cli
        .files
        .iter()
        .map(|path| {
            fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let options = CheckerOptions {
        max_depth: cli.max_depth,
    };
    let reports = tagcheck::check_units(&sources, &options);

    let mut failed_units = 0;
    for (path, mut report) in cli.files.iter().zip(reports) {
        let file_name = path.to_string_lossy();

        if cli.print_types {
            for expr in &report.expressions {
                println!("{}:{}..{}: {}", file_name, expr.span.start, expr.span.end, expr.resolved_type);
            }
        }

        if report.has_errors() {
            failed_units += 1;
        }
        // 警告也要打印出来
        report.diagnostics.print(&file_name)?;
    }

    if failed_units > 0 {
        eprintln!("Type checking failed in {} of {} file(s).", failed_units, cli.files.len());
        process::exit(1);
    }

    Ok(())
}
