use crate::{Locator, Statement};

/// The statements issued for a single grant request.
///
/// A `Grant` is a value: it is returned to the caller and never persisted.
/// Combining grants preserves the order statements were issued in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grant {
    statements: Vec<Statement>,
}

impl Grant {
    /// Append all statements of `other` after those of `self`.
    pub fn combine(mut self, other: Grant) -> Self {
        self.statements.extend(other.statements);
        self
    }

    /// Get the issued statements.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Statements that target `locator`.
    pub fn on<'a>(&'a self, locator: &'a Locator) -> impl Iterator<Item = &'a Statement> + 'a {
        self.statements
            .iter()
            .filter(move |statement| statement.targets(locator))
    }

    /// Statements whose actions belong to `service` (e.g. `"kms"`).
    pub fn for_service<'a>(&'a self, service: &'a str) -> impl Iterator<Item = &'a Statement> + 'a {
        self.statements.iter().filter(move |statement| {
            statement
                .actions()
                .iter()
                .any(|action| action.service() == service)
        })
    }

    /// Number of statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether no statement was issued.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Forward every statement, in order, to `sink`.
    ///
    /// Stops at and returns the first sink error unchanged.
    pub fn attach_to<S: StatementSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        self.statements
            .iter()
            .try_for_each(|statement| sink.attach(statement))
    }
}

impl From<Statement> for Grant {
    fn from(statement: Statement) -> Self {
        Self {
            statements: vec![statement],
        }
    }
}

impl FromIterator<Statement> for Grant {
    fn from_iter<T: IntoIterator<Item = Statement>>(iter: T) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Grant {
    type Item = Statement;
    type IntoIter = std::vec::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

/// Destination that accepts permission statements.
///
/// Implementations decide how statements are rendered and persisted; this
/// crate never serializes a policy document itself.
pub trait StatementSink {
    /// Error raised when a statement cannot be attached.
    type Error;

    /// Attach one statement.
    fn attach(&mut self, statement: &Statement) -> Result<(), Self::Error>;
}

impl StatementSink for Vec<Statement> {
    type Error = std::convert::Infallible;

    fn attach(&mut self, statement: &Statement) -> Result<(), Self::Error> {
        self.push(statement.clone());
        Ok(())
    }
}
