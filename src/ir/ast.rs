#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Cuerpo entre INICIO { y } FIN; puede estar vacío
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Declaración, ejemplo: int x = 5
    Declaration { identifier: String, expr: Expression },
    /// Asignación, ejemplo: x = x + 10
    Assignment { identifier: String, expr: Expression },
    /// Ciclo con conteo literal, ejemplo: for (3) { ... }
    ForLoop {
        iterations: i64,
        body: Vec<Statement>,
    },
    /// Función sin parámetros ni retorno, ejemplo: vacio f() { ... }
    FunctionDecl { name: String, body: Vec<Statement> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// 5, 120
    Number(i64),
    /// x, contador
    Variable(String),
    /// x * 2; siempre asociativa a la izquierda
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
}
