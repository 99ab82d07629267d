/// Posición 1-based del primer carácter de un token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Default for Span {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}
