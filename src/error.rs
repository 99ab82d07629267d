use thiserror::Error;

/// Error sintáctico recuperable. El parser nunca aborta: cada error se
/// acumula en la lista del resultado y el análisis continúa.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Línea {line}, columna {column}: se esperaba {expected}, se encontró '{found}'")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    #[error("Línea {line}, columna {column}: token inesperado '{found}', no inicia ninguna instrucción")]
    UnexpectedStatementStart {
        found: String,
        line: usize,
        column: usize,
    },

    #[error("Línea {line}, columna {column}: fin de la entrada, se esperaba {expected}")]
    UnterminatedBlock {
        expected: String,
        line: usize,
        column: usize,
    },

    #[error("Línea {line}, columna {column}: el número '{literal}' excede el rango representable")]
    NumericOverflow {
        literal: String,
        line: usize,
        column: usize,
    },
}
