pub mod lexer;
pub mod parser;

use parser::ParseOutcome;

/// Cadena completa del front end: texto fuente → tokens → AST con los
/// errores sintácticos acumulados
pub fn parse(source: &str) -> ParseOutcome {
    let tokens = lexer::tokenize(source);
    parser::parse_tokens(tokens)
}
