pub mod analyzer;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod utils;

use analyzer::{Analyzer, CheckerOptions, ResolvedExpression};
use diagnostics::DiagnosticBag;
use std::io;
use std::thread;

/// 一个检查单元（一个源文件）的检查结果。
#[derive(Debug)]
pub struct CheckReport {
    /// 这个单元的所有诊断，包括词法、语法和类型错误。
    pub diagnostics: DiagnosticBag,
    /// 每个表达式语句解析出的类型。语法分析失败时为空。
    pub expressions: Vec<ResolvedExpression>,
}

impl CheckReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// 检查一段源代码。
///
/// 词法或语法错误会阻止类型检查；类型错误则不会中断，所有诊断都收集在报告里。
/// 检查在一个按嵌套上限分配栈空间的线程上进行，调用者的栈大小不影响结果。
pub fn check(source: &str, options: &CheckerOptions) -> CheckReport {
    thread::scope(|scope| match spawn_unit(scope, source, options) {
        Ok(handle) => join_unit(handle),
        Err(err) => {
            log::warn!("failed to spawn checker thread, checking inline: {}", err);
            check_unit(source, options)
        }
    })
}

/// 并行检查多个互相独立的单元，结果顺序与输入顺序一致。
/// 每个单元有自己的签名表和诊断，单元之间不共享任何可变状态。
pub fn check_units<S>(sources: &[S], options: &CheckerOptions) -> Vec<CheckReport>
where
    S: AsRef<str> + Sync,
{
    thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|source| {
                spawn_unit(scope, source.as_ref(), options).map_err(|err| {
                    log::warn!("failed to spawn checker thread, checking inline: {}", err);
                    source
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle {
                Ok(handle) => join_unit(handle),
                Err(source) => check_unit(source.as_ref(), options),
            })
            .collect()
    })
}

// 递归下降的解析和类型解析每层嵌套最多用这么多栈（按未优化构建估计）
const STACK_PER_NESTING_LEVEL: usize = 256 * 1024;
const MIN_UNIT_STACK_SIZE: usize = 8 * 1024 * 1024;

/// 检查线程的栈大小，随嵌套上限增长。
pub fn unit_stack_size(options: &CheckerOptions) -> usize {
    options
        .max_depth
        .saturating_mul(STACK_PER_NESTING_LEVEL)
        .max(MIN_UNIT_STACK_SIZE)
}

fn spawn_unit<'scope, 'env>(
    scope: &'scope thread::Scope<'scope, 'env>,
    source: &'env str,
    options: &'env CheckerOptions,
) -> io::Result<thread::ScopedJoinHandle<'scope, CheckReport>> {
    thread::Builder::new()
        .name("tagcheck-unit".to_string())
        .stack_size(unit_stack_size(options))
        .spawn_scoped(scope, move || check_unit(source, options))
}

fn join_unit(handle: thread::ScopedJoinHandle<'_, CheckReport>) -> CheckReport {
    match handle.join() {
        Ok(report) => report,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

fn check_unit(source: &str, options: &CheckerOptions) -> CheckReport {
    let mut diagnostics = DiagnosticBag::new(source);

    let expressions = match parser::parse_with_limit(source, options.max_depth, &mut diagnostics) {
        Some(program) => {
            let mut analyzer = Analyzer::with_options(&mut diagnostics, *options);
            analyzer.analyze(&program)
        }
        None => Vec::new(),
    };

    log::info!(
        "checked {} expression(s), {} diagnostic(s)",
        expressions.len(),
        diagnostics.len()
    );
    CheckReport {
        diagnostics,
        expressions,
    }
}
