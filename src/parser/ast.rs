// AST definitions for the Org front end

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The twelve sized base types recognized in type position.
///
/// Any other word in type position is a fatal parse error; the full list is
/// quoted back in the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    Char,
    Pointer,
}

impl BaseType {
    /// Source-level spelling of this base type.
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseType::Int8 => "int8",
            BaseType::Int16 => "int16",
            BaseType::Int32 => "int32",
            BaseType::Int64 => "int64",
            BaseType::UInt8 => "uint8",
            BaseType::UInt16 => "uint16",
            BaseType::UInt32 => "uint32",
            BaseType::UInt64 => "uint64",
            BaseType::Float => "float",
            BaseType::Double => "double",
            BaseType::Char => "char",
            BaseType::Pointer => "pointer",
        }
    }

    pub fn from_str(name: &str) -> Option<Self> {
        match name {
            "int8" => Some(BaseType::Int8),
            "int16" => Some(BaseType::Int16),
            "int32" => Some(BaseType::Int32),
            "int64" => Some(BaseType::Int64),
            "uint8" => Some(BaseType::UInt8),
            "uint16" => Some(BaseType::UInt16),
            "uint32" => Some(BaseType::UInt32),
            "uint64" => Some(BaseType::UInt64),
            "float" => Some(BaseType::Float),
            "double" => Some(BaseType::Double),
            "char" => Some(BaseType::Char),
            "pointer" => Some(BaseType::Pointer),
            _ => None,
        }
    }
}

/// Type descriptor: a base type plus an optional size expression.
///
/// `size` is `None` for scalars; `var int32[8] buf = ...` carries the parsed
/// `8` here. The size is a full [`Expr`] so computed sizes parse too.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueType {
    pub base: BaseType,
    pub size: Option<Box<Expr>>,
}

impl ValueType {
    pub fn new(base: BaseType) -> Self {
        ValueType { base, size: None }
    }

    pub fn with_size(mut self, size: Expr) -> Self {
        self.size = Some(Box::new(size));
        self
    }
}

/// Binary operators
///
/// Comparisons and logical operators share the mathExpression node with the
/// arithmetic operators, so they all live in one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl BinOp {
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Sub),
            "*" => Some(BinOp::Mul),
            "/" => Some(BinOp::Div),
            "%" => Some(BinOp::Mod),
            "^" => Some(BinOp::Pow),
            "==" => Some(BinOp::Eq),
            "!=" => Some(BinOp::Ne),
            "<" => Some(BinOp::Lt),
            "<=" => Some(BinOp::Le),
            ">" => Some(BinOp::Gt),
            ">=" => Some(BinOp::Ge),
            "&&" => Some(BinOp::And),
            "||" => Some(BinOp::Or),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub param_type: ValueType,
}

/// One `if`/`else if` link: a condition and the body it guards.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub condition: Box<Expr>,
    pub body: Box<Expr>,
}

/// Expression tree produced by the builder.
///
/// A closed sum type over every construct of the language. Statement-like
/// and value-like forms share one discriminated set; a brace-delimited body
/// is an [`Expr::Block`] holding its statements in source order. Ownership
/// is strictly top-down: no sharing, no back-references, and no mutation
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Ordered statement sequence from a `{ }` body (or the implicit
    /// top-level block).
    Block(Vec<Expr>),

    // Declarations
    VariableDeclaration {
        var_type: ValueType,
        name: String,
        initializer: Box<Expr>,
    },
    FunctionDeclaration {
        name: String,
        return_type: ValueType,
        params: Vec<Param>,
        body: Box<Expr>,
    },

    // Statements
    ModifyVariable {
        name: String,
        value: Box<Expr>,
    },
    ReallocVariable {
        name: String,
        new_type: ValueType,
    },
    IfElseChain {
        if_branch: Branch,
        else_ifs: Vec<Branch>,
        else_body: Option<Box<Expr>>,
    },
    WhileLoop {
        condition: Box<Expr>,
        body: Box<Expr>,
    },
    Return(Option<Box<Expr>>),
    Break,
    Continue,

    // Memory operations
    AllocationForPointer {
        alloc_type: ValueType,
    },
    FreeMemory {
        address: Box<Expr>,
    },
    ModifyPointerValue {
        address: Box<Expr>,
        value: Box<Expr>,
    },
    GetPointerValue {
        address: Box<Expr>,
    },

    // Calls
    SystemCall {
        name: String,
        args: Vec<Expr>,
    },
    FunctionCall {
        name: String,
        args: Vec<Expr>,
    },

    // Expressions
    MathExpression {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    Number(i64),
    StringLiteral(String),
    Variable(String),
}
