use crate::span::Span;

/// Palabras reservadas del lenguaje; inmutables durante todo el proceso
const KEYWORDS: [&str; 5] = ["INICIO", "FIN", "int", "for", "vacio"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Number,
    AddSub, // + -
    MulDiv, // * /
    Equal,  // =
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
    /// Corrida máxima de caracteres no reconocidos; el parser la reporta
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

/// Análisis léxico completo. Total: la entrada malformada se convierte en
/// tokens `Invalid`, nunca en un fallo.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        if !self.skip_prologue() {
            // Nunca apareció INICIO: no hay programa que tokenizar
            return self.tokens;
        }

        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\n' => self.bump(),
                '/' if self.peek_at(1) == Some('/') => self.line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.block_comment(),
                'a'..='z' | 'A'..='Z' => {
                    // true: se reconoció FIN, el análisis termina aquí
                    if self.word() {
                        break;
                    }
                }
                '0'..='9' => self.number(),
                '+' | '-' => self.symbol(TokenKind::AddSub),
                '*' | '/' => self.symbol(TokenKind::MulDiv),
                '=' => self.symbol(TokenKind::Equal),
                '(' => self.symbol(TokenKind::LParen),
                ')' => self.symbol(TokenKind::RParen),
                '{' => self.symbol(TokenKind::LBrace),
                '}' => self.symbol(TokenKind::RBrace),
                _ => self.invalid_run(),
            }
        }

        self.tokens
    }

    /// Descarta todo hasta encontrar INICIO como palabra completa y emite su
    /// token. Devuelve false si la entrada se agota sin encontrarlo.
    fn skip_prologue(&mut self) -> bool {
        while self.pos < self.chars.len() {
            if self.matches_inicio() {
                let span = self.span();
                for _ in 0.."INICIO".len() {
                    self.bump();
                }
                self.push(TokenKind::Keyword, "INICIO".to_string(), span);
                return true;
            }
            self.bump();
        }
        false
    }

    fn matches_inicio(&self) -> bool {
        let word = "INICIO";
        if self.pos > 0 && self.chars[self.pos - 1].is_ascii_alphanumeric() {
            return false;
        }
        if self.chars.len() - self.pos < word.len() {
            return false;
        }
        if !self.chars[self.pos..self.pos + word.len()]
            .iter()
            .copied()
            .eq(word.chars())
        {
            return false;
        }
        match self.chars.get(self.pos + word.len()) {
            Some(ch) => !ch.is_ascii_alphanumeric(),
            None => true,
        }
    }

    fn line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.bump();
        }
    }

    /// Comentario de bloque; si nunca cierra se consume hasta el final de la
    /// entrada sin reportar nada
    fn block_comment(&mut self) {
        self.bump(); // /
        self.bump(); // *
        while self.pos < self.chars.len() {
            if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
                self.bump();
                self.bump();
                return;
            }
            self.bump();
        }
    }

    fn word(&mut self) -> bool {
        let span = self.span();
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_alphanumeric()) {
            self.bump();
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if KEYWORDS.contains(&text.as_str()) {
            let is_fin = text == "FIN";
            self.push(TokenKind::Keyword, text, span);
            is_fin
        } else {
            self.push(TokenKind::Identifier, text, span);
            false
        }
    }

    fn number(&mut self) {
        let span = self.span();
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.bump();
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::Number, text, span);
    }

    fn symbol(&mut self, kind: TokenKind) {
        let span = self.span();
        let text = self.chars[self.pos].to_string();
        self.bump();
        self.push(kind, text, span);
    }

    /// Corrida máxima de caracteres que no son letra, dígito, espacio ni
    /// salto de línea: un solo token Invalid por corrida
    fn invalid_run(&mut self) {
        let span = self.span();
        let start = self.pos;
        while matches!(self.peek(), Some(ch)
            if !ch.is_ascii_alphanumeric() && ch != ' ' && ch != '\n')
        {
            self.bump();
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::Invalid, text, span);
    }

    // Métodos auxiliares
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn bump(&mut self) {
        if let Some(&ch) = self.chars.get(self.pos) {
            self.pos += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
        }
    }

    fn push(&mut self, kind: TokenKind, text: String, span: Span) {
        self.tokens.push(Token { kind, text, span });
    }
}
