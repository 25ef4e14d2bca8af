pub mod codes;

#[cfg(test)]
mod test;

use crate::utils::Span;
use ariadne::{Color, Label as AriadneLabel, Report, ReportKind, Source};
use codes::ErrorCode;
use std::io;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

// --- Diagnostic：一条诊断 = 错误码 + 标签 + 附注 ---

#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: &'static str,
    level: DiagnosticLevel,
    // 默认取自 ErrorCode，可以用 with_dynamic_message 换成带具体类型名的消息
    message: String,
    labels: Vec<Label>,
    notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(error_code: &'static ErrorCode, primary_label: Label) -> Self {
        Self {
            code: error_code.code,
            level: error_code.level,
            message: error_code.message.to_string(),
            labels: vec![primary_label],
            notes: Vec::new(),
        }
    }

    pub fn error(error_code: &'static ErrorCode, primary_label: Label) -> Self {
        assert!(
            matches!(error_code.level, DiagnosticLevel::Error),
            "Tried to create an error diagnostic with a non-error code."
        );
        Self::new(error_code, primary_label)
    }

    pub fn warning(error_code: &'static ErrorCode, primary_label: Label) -> Self {
        assert!(
            matches!(error_code.level, DiagnosticLevel::Warning),
            "Tried to create a warning diagnostic with a non-warning code."
        );
        Self::new(error_code, primary_label)
    }

    /// 覆盖默认消息，以包含动态信息（例如具体的类型名）。
    pub fn with_dynamic_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_secondary_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn level(&self) -> DiagnosticLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// 主标签的位置。构造函数保证至少有一个标签。
    pub fn primary_span(&self) -> Span {
        self.labels[0].span
    }
}

// --- DiagnosticBag：一个编译单元的诊断收集器 ---

#[derive(Debug, Default)]
pub struct DiagnosticBag {
    source: String,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            diagnostics: Vec::new(),
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!(
            "diagnostic {} at {}..{}: {}",
            diagnostic.code,
            diagnostic.primary_span().start,
            diagnostic.primary_span().end,
            diagnostic.message
        );
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == DiagnosticLevel::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Error)
            .count()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// 用 ariadne 把所有诊断打印到 stderr，并清空背包。
    pub fn print(&mut self, file_name: &str) -> io::Result<()> {
        let diags_to_print = std::mem::take(&mut self.diagnostics);
        print_all(file_name, &self.source, diags_to_print)
    }
}

// --- Printer 打印逻辑 ---

fn print_all(file_name: &str, source_code: &str, diagnostics: Vec<Diagnostic>) -> io::Result<()> {
    let cache = (file_name, Source::from(source_code));

    for diag in diagnostics {
        let kind = match diag.level {
            DiagnosticLevel::Error => ReportKind::Error,
            DiagnosticLevel::Warning => ReportKind::Warning,
        };

        let color = match diag.level {
            DiagnosticLevel::Error => Color::Red,
            DiagnosticLevel::Warning => Color::Yellow,
        };

        let primary: Range<usize> = diag.primary_span().into();
        let mut report = Report::build(kind, (file_name, primary))
            .with_message(&diag.message)
            .with_code(diag.code);

        for (i, label_info) in diag.labels.iter().enumerate() {
            let range: Range<usize> = label_info.span.into();
            let label = AriadneLabel::new((file_name, range)).with_message(&label_info.message);

            // 第一个标签是主标签，其余的都是辅助说明
            let final_label = if i == 0 {
                label.with_color(color)
            } else {
                label.with_color(Color::Blue)
            };
            report.add_label(final_label);
        }

        for note in &diag.notes {
            report = report.with_note(note);
        }

        report.finish().eprint(cache.clone())?;
    }

    Ok(())
}
