//! SQL text assembly.

use crate::ParamSlot;
use tether_mutation::{Binding, Bindings};

/// Quote an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Accumulates SQL text and its parameter slots.
#[derive(Debug, Default)]
pub(crate) struct SqlWriter {
    sql: String,
    params: Vec<ParamSlot>,
}

impl SqlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: &str) -> &mut Self {
        self.sql.push_str(text);
        self
    }

    pub fn ident(&mut self, name: &str) -> &mut Self {
        self.sql.push_str(&quote_ident(name));
        self
    }

    /// Append the next `?N` placeholder for `binding`.
    pub fn param(&mut self, binding: &Binding) -> &mut Self {
        self.params.push(ParamSlot::from(binding));
        self.sql.push_str(&format!("?{}", self.params.len()));
        self
    }

    /// `"a", "b"`
    pub fn ident_list<'s>(&mut self, names: impl IntoIterator<Item = &'s str>) -> &mut Self {
        for (i, name) in names.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.ident(name);
        }
        self
    }

    /// `"a" = ?1, "b" = ?2` joined by `separator`.
    pub fn assignments(&mut self, bindings: &Bindings, separator: &str) -> &mut Self {
        for (i, (column, binding)) in bindings.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(separator);
            }
            self.ident(column).push(" = ").param(binding);
        }
        self
    }

    pub fn finish(self) -> (String, Vec<ParamSlot>) {
        (self.sql, self.params)
    }
}
