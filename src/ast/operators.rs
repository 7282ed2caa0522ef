use std::{collections::HashMap, fmt, sync::LazyLock};

/// Builds an upper-cased symbol table for an operator enum.
fn symbol_table<T: Copy>(all: &[T], symbol: fn(T) -> &'static str) -> HashMap<String, T> {
    all.iter()
        .map(|&op| (symbol(op).to_ascii_uppercase(), op))
        .collect()
}

fn lookup<T: Copy>(table: &HashMap<String, T>, symbol: &str) -> Option<T> {
    table.get(&symbol.trim().to_ascii_uppercase()).copied()
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal (`=`)
    EqualTo,
    /// Not equal (`!=`)
    NotEqualTo,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessThanOrEqualTo,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterThanOrEqualTo,
    /// Pattern match (`LIKE`)
    Like,
}

static OPERATORS: LazyLock<HashMap<String, Operator>> =
    LazyLock::new(|| symbol_table(&Operator::ALL, Operator::symbol));

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::EqualTo,
        Operator::NotEqualTo,
        Operator::LessThan,
        Operator::LessThanOrEqualTo,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqualTo,
        Operator::Like,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::EqualTo => "=",
            Operator::NotEqualTo => "!=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqualTo => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqualTo => ">=",
            Operator::Like => "LIKE",
        }
    }

    /// The operator that keeps the comparison's meaning when its operands swap sides.
    pub fn reverse(self) -> Operator {
        match self {
            Operator::LessThan => Operator::GreaterThan,
            Operator::LessThanOrEqualTo => Operator::GreaterThanOrEqualTo,
            Operator::GreaterThan => Operator::LessThan,
            Operator::GreaterThanOrEqualTo => Operator::LessThanOrEqualTo,
            other => other,
        }
    }

    pub fn for_symbol(symbol: &str) -> Option<Operator> {
        lookup(&OPERATORS, symbol)
    }
}

/// Arithmetic operators used by [`ArithmeticOperand`](crate::ast::ArithmeticOperand).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
}

static ARITHMETIC_OPERATORS: LazyLock<HashMap<String, ArithmeticOperator>> =
    LazyLock::new(|| symbol_table(&ArithmeticOperator::ALL, ArithmeticOperator::symbol));

impl ArithmeticOperator {
    pub const ALL: [ArithmeticOperator; 4] = [
        ArithmeticOperator::Add,
        ArithmeticOperator::Subtract,
        ArithmeticOperator::Multiply,
        ArithmeticOperator::Divide,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            ArithmeticOperator::Add | ArithmeticOperator::Subtract => 1,
            ArithmeticOperator::Multiply | ArithmeticOperator::Divide => 2,
        }
    }

    pub fn for_symbol(symbol: &str) -> Option<ArithmeticOperator> {
        lookup(&ARITHMETIC_OPERATORS, symbol)
    }
}

/// Join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
    Cross,
}

static JOIN_TYPES: LazyLock<HashMap<String, JoinType>> =
    LazyLock::new(|| symbol_table(&JoinType::ALL, JoinType::symbol));

impl JoinType {
    pub const ALL: [JoinType; 5] = [
        JoinType::Inner,
        JoinType::LeftOuter,
        JoinType::RightOuter,
        JoinType::FullOuter,
        JoinType::Cross,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
            JoinType::RightOuter => "RIGHT OUTER JOIN",
            JoinType::FullOuter => "FULL OUTER JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }

    pub fn for_symbol(symbol: &str) -> Option<JoinType> {
        lookup(&JOIN_TYPES, symbol)
    }
}

/// Sort order of an [`Ordering`](crate::ast::Ordering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

static ORDERS: LazyLock<HashMap<String, Order>> =
    LazyLock::new(|| symbol_table(&Order::ALL, Order::symbol));

impl Order {
    pub const ALL: [Order; 2] = [Order::Ascending, Order::Descending];

    pub fn symbol(self) -> &'static str {
        match self {
            Order::Ascending => "ASC",
            Order::Descending => "DESC",
        }
    }

    pub fn for_symbol(symbol: &str) -> Option<Order> {
        lookup(&ORDERS, symbol)
    }
}

/// Set operations combining two query commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOperation {
    Union,
    Intersect,
    Except,
}

static SET_OPERATIONS: LazyLock<HashMap<String, SetOperation>> =
    LazyLock::new(|| symbol_table(&SetOperation::ALL, SetOperation::symbol));

impl SetOperation {
    pub const ALL: [SetOperation; 3] = [
        SetOperation::Union,
        SetOperation::Intersect,
        SetOperation::Except,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            SetOperation::Union => "UNION",
            SetOperation::Intersect => "INTERSECT",
            SetOperation::Except => "EXCEPT",
        }
    }

    pub fn for_symbol(symbol: &str) -> Option<SetOperation> {
        lookup(&SET_OPERATIONS, symbol)
    }
}

macro_rules! display_symbol {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.symbol())
                }
            }
        )*
    };
}

display_symbol!(Operator, ArithmeticOperator, JoinType, Order, SetOperation);
