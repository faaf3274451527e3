//! Integration tests for the lexer, parser and type checker
//!
//! These go through the crate's public entry points and check what the
//! later stages rely on: token spans, the AST dump, and error codes.

use quadc_engine::parser::{Lexer, Token};
use quadc_engine::{compile, CompileError, CompileOptions, Diagnostic, ParseError, Parser, TypeChecker};

fn compile_err(source: &str) -> CompileError {
    match compile(source, &CompileOptions::default()) {
        Ok(_) => panic!("expected an error for {:?}", source),
        Err(err) => err,
    }
}

fn codes(source: &str) -> Vec<&'static str> {
    Diagnostic::from_compile_error(&compile_err(source), 0)
        .iter()
        .filter_map(Diagnostic::code)
        .collect()
}

// ============================================================================
// Lexer
// ============================================================================

mod lexer {
    use super::*;

    #[test]
    fn test_token_stream_ends_with_eof() {
        let (tokens, _) = Lexer::new("int x;").tokenize().unwrap();
        let kinds: Vec<&Token> = tokens.iter().map(|(t, _)| t).collect();
        assert_eq!(kinds.len(), 4);
        assert_eq!(kinds[0], &Token::Int);
        assert_eq!(kinds[3], &Token::Eof);
    }

    #[test]
    fn test_spans_track_lines() {
        let (tokens, _) = Lexer::new("int f()\n{\n  return 0; // done\n}").tokenize().unwrap();
        let ret = tokens.iter().find(|(t, _)| *t == Token::Return).unwrap();
        assert_eq!((ret.1.line, ret.1.column), (3, 3));
        assert_eq!(ret.1.to_string(), "3:3");
    }

    #[test]
    fn test_all_lexical_errors_are_reported() {
        assert_eq!(codes("int f() { return @ + 99999999999999999999; }"), vec!["E0001", "E0003"]);
        assert_eq!(codes("char *s = \"abc"), vec!["E0002"]);
        assert_eq!(codes("char c = '\\q';"), vec!["E0004"]);
    }

    #[test]
    fn test_block_comments_compile() {
        assert!(compile("int f() { /* note */ return 0; }", &CompileOptions::default()).is_ok());

        let source = "/**\n * counts up\n **/\nint g(int n) {\n    return n /* * 2 */ + 1; /*/ done */\n}\n";
        let c = compile(source, &CompileOptions::default()).unwrap();
        assert_eq!(c.dump_ast(), "function int g(int n)\n  block\n    return (+ n 1)\n");
    }
}

// ============================================================================
// Parser
// ============================================================================

mod parser {
    use super::*;

    #[test]
    fn test_ast_dump() {
        let c = compile(
            "int g = 3;\nextern int puts(char *s);\nint f(int a[], char *p) { a[0] = *p + g * 2; return a[0] && !p; }",
            &CompileOptions::default(),
        )
        .unwrap();
        let expected = "\
global int g = 3
extern function int puts(char* s);
function int f(int a[], char* p)
  block
    (= ([] a 0) (+ (* p) (* g 2)))
    return (&& ([] a 0) (! p))
";
        assert_eq!(c.dump_ast(), expected);
    }

    #[test]
    fn test_parse_errors_stop_compilation() {
        assert_eq!(codes("int f( { }"), vec!["E1001"]);
        assert_eq!(codes("int f() { return 1"), vec!["E1002"]);
    }

    #[test]
    fn test_parse_error_span() {
        let err: ParseError = Parser::new("void f() { x = 1 }").unwrap().parse().unwrap_err();
        assert_eq!(err.span.line, 1);
        assert_eq!(err.span.column, 18);
    }
}

// ============================================================================
// Type checker
// ============================================================================

mod checker {
    use super::*;

    #[test]
    fn test_error_codes() {
        let cases = [
            ("int x; int x;", "E2001"),
            ("int f() { return y; }", "E2002"),
            ("int x; int f() { return x(); }", "E2003"),
            ("int g(int a) { return a; } int f() { return g(); }", "E2005"),
            ("int f() { int *p; p = 1; return 0; }", "E2006"),
            ("void g() {} int f() { return g() + 1; }", "E2009"),
            ("void f() { void x; }", "E2010"),
            ("int f(int n);", "E2011"),
            ("int f() { return 1; } int f() { return 2; }", "E2012"),
            ("int y; int x = y;", "E2014"),
            ("void f() { return 1; }", "E2016"),
        ];
        for (source, code) in cases {
            assert_eq!(codes(source), vec![code], "for {:?}", source);
        }
    }

    #[test]
    fn test_checked_program_carries_types_for_lowering() {
        let (program, interner) = Parser::new("int f(char c) { return c + 1; }").unwrap().parse().unwrap();
        let out = TypeChecker::new(&interner).check(&program).unwrap();
        assert!(out.analysis.coercion_count() >= 1);
        assert_eq!(out.symbols.temp_count(), 0);
    }

    #[test]
    fn test_lvalues_are_checked_by_lowering() {
        assert!(matches!(compile_err("int f() { 3 = 4; return 0; }"), CompileError::Lower(_)));
        assert_eq!(codes("int f(int a) { a + 1 = 2; return a; }"), vec!["E3001"]);
    }
}
