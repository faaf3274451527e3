//! Diagnostic infrastructure for error reporting
//!
//! Renders compile errors with source context through codespan-reporting.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, Severity};
use codespan_reporting::term;
use termcolor::{NoColor, WriteColor};

use crate::compiler::{CfgError, LowerError};
use crate::parser::{CheckError, LexError, ParseError, ParseErrorKind, Span};
use crate::CompileError;

pub use codespan_reporting::files::SimpleFiles;

/// A diagnostic message with source code context
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    /// Error code (e.g., "E2001")
    code: Option<&'static str>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self.inner = self.inner.with_code(code);
        self
    }

    /// Add a primary label (main error location)
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::primary(file_id, span.start..span.end).with_message(message);
        self.inner.labels.push(label);
        self
    }

    /// Add a secondary label (related location)
    pub fn with_secondary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::secondary(file_id, span.start..span.end).with_message(message);
        self.inner.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    pub fn code(&self) -> Option<&'static str> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Diagnostics for any compile error; lexing can report several at once
    pub fn from_compile_error(error: &CompileError, file_id: usize) -> Vec<Self> {
        match error {
            CompileError::Lex(errors) => errors
                .iter()
                .map(|e| Self::from_lex_error(e, file_id))
                .collect(),
            CompileError::Parse(e) => vec![Self::from_parse_error(e, file_id)],
            CompileError::Check(e) => vec![Self::from_check_error(e, file_id)],
            CompileError::Lower(e) => vec![Self::from_lower_error(e, file_id)],
            CompileError::Cfg(e) => vec![Self::from_cfg_error(e)],
        }
    }

    pub fn from_lex_error(error: &LexError, file_id: usize) -> Self {
        let (code, label) = match error {
            LexError::UnexpectedCharacter { .. } => ("E0001", "unexpected character"),
            LexError::UnterminatedString { .. } => ("E0002", "string starts here"),
            LexError::InvalidNumber { .. } => ("E0003", "invalid number"),
            LexError::InvalidEscape { .. } => ("E0004", "unknown escape"),
        };
        Diagnostic::error(error.to_string())
            .with_code(code)
            .with_primary_label(file_id, error.span(), label)
    }

    pub fn from_parse_error(error: &ParseError, file_id: usize) -> Self {
        let (code, label) = match &error.kind {
            ParseErrorKind::UnexpectedToken { .. } => ("E1001", "unexpected token"),
            ParseErrorKind::UnexpectedEof { .. } => ("E1002", "input ends here"),
            ParseErrorKind::InvalidSyntax { .. } => ("E1003", "invalid syntax"),
            ParseErrorKind::ParserLimitExceeded { .. } => ("E1004", "nesting too deep"),
        };
        Diagnostic::error(error.message.clone())
            .with_code(code)
            .with_primary_label(file_id, error.span, label)
    }

    pub fn from_check_error(error: &CheckError, file_id: usize) -> Self {
        use CheckError::*;

        let label = match error {
            DuplicateSymbol { .. } | FunctionRedefinition { .. } => "redefined here".to_string(),
            UndefinedName { .. } => "not found in this scope".to_string(),
            NotAFunction { .. } => "cannot be called".to_string(),
            FunctionAsValue { .. } => "function used as a value".to_string(),
            ArgumentCount { .. } => "incorrect number of arguments".to_string(),
            TypeMismatch { expected, actual, .. } | ReturnMismatch { expected, actual, .. } => {
                format!("expected '{}', found '{}'", expected, actual)
            }
            InvalidOperand { op, .. } => format!("invalid operand for '{}'", op),
            NonScalarCondition { .. } => "not a scalar".to_string(),
            VoidValue { .. } => "void value used here".to_string(),
            VoidVariable { .. } => "declared void".to_string(),
            UndefinedPrototype { .. } => "declared here".to_string(),
            ConflictingDeclaration { .. } => "conflicts with an earlier declaration".to_string(),
            NonConstantInitializer { .. } => "not a constant".to_string(),
            ArrayInitializer { .. } => "initializer not allowed".to_string(),
        };

        let mut diag = Diagnostic::error(error.to_string())
            .with_code(error.code())
            .with_primary_label(file_id, error.span(), label);

        if let Some(original) = error.related_span() {
            diag = diag.with_secondary_label(file_id, original, "first defined here");
        }
        match error {
            UndefinedPrototype { .. } => diag.with_help("add a definition or declare the function 'extern'"),
            NonConstantInitializer { .. } => {
                diag.with_note("global initializers must be integer or character literals")
            }
            _ => diag,
        }
    }

    pub fn from_lower_error(error: &LowerError, file_id: usize) -> Self {
        let diag = Diagnostic::error(error.to_string()).with_code(error.code());
        match error {
            LowerError::NotAnLvalue { span } => {
                diag.with_primary_label(file_id, *span, "cannot be assigned to")
            }
            LowerError::Unimplemented { span, .. } => diag
                .with_primary_label(file_id, *span, "not supported yet")
                .with_note("the program type checks, but this construct cannot be lowered"),
            LowerError::Internal { .. } | LowerError::Cfg(_) => {
                diag.with_note("this is a compiler bug")
            }
        }
    }

    pub fn from_cfg_error(error: &CfgError) -> Self {
        Diagnostic::error(error.to_string())
            .with_code("E3004")
            .with_note("this is a compiler bug")
    }

    /// Write the diagnostic to `writer`
    pub fn emit(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// Render without color
    pub fn render(&self, files: &SimpleFiles<String, String>) -> Result<String, codespan_reporting::files::Error> {
        let mut writer = NoColor::new(Vec::new());
        self.emit(&mut writer, files)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }

    /// Get the underlying codespan diagnostic
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }
}

/// Create a file database holding one source file (id 0)
pub fn create_files(name: impl Into<String>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(name.into(), source.into());
    files
}
