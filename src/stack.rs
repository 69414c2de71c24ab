use crate::error::{JoyError, JoyResult};
use crate::value::{FileHandle, JoySymbol, JoyString, Value};

/// The operand stack. A thin `Vec<Value>` wrapper whose job is to centralize
/// the underflow check and the typed `pop_*` family every primitive uses,
/// rather than letting each operator match on `Value` inline.
#[derive(Debug, Clone, Default)]
pub struct OperandStack {
    items: Vec<Value>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn depth(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// A full deep copy of the current stack, for combinators that must
    /// probe a test quotation and restore context afterward.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn restore(&mut self, snapshot: Self) {
        self.items = snapshot.items;
    }

    pub fn require(&self, op: &'static str, n: usize) -> JoyResult<()> {
        if self.items.len() < n {
            return Err(JoyError::underflow(op, n, self.items.len()));
        }
        Ok(())
    }

    pub fn pop(&mut self, op: &'static str) -> JoyResult<Value> {
        self.items
            .pop()
            .ok_or_else(|| JoyError::underflow(op, 1, 0))
    }

    pub fn peek(&self, op: &'static str) -> JoyResult<&Value> {
        self.items
            .last()
            .ok_or_else(|| JoyError::underflow(op, 1, 0))
    }

    /// `n` is the offset from the top: `peek_n(op, 0)` is the same as `peek`.
    pub fn peek_n(&self, op: &'static str, n: usize) -> JoyResult<&Value> {
        self.require(op, n + 1)?;
        Ok(&self.items[self.items.len() - 1 - n])
    }

    /// Push every element of `items` onto the stack, bottom-first, so the
    /// list's last element ends up on top — mirrors `unstack`'s
    /// reconstruction of the original top-to-bottom order.
    pub fn extend_bottom_first(&mut self, items: Vec<Value>) {
        self.items.extend(items);
    }

    /// Drain the whole stack into a top-to-bottom list without clearing the
    /// backing storage's identity (used by `stack`, which does not clear).
    pub fn to_list_top_to_bottom(&self) -> Vec<Value> {
        self.items.iter().rev().cloned().collect()
    }

    /// The raw bottom-to-top contents, as `infra` collects its result list.
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn set_contents(&mut self, items: Vec<Value>) {
        self.items = items;
    }

    // ---- typed pops: each checks depth then variant before a primitive commits ----

    pub fn pop_integer(&mut self, op: &'static str) -> JoyResult<i64> {
        match self.pop(op)? {
            Value::Integer(n) => Ok(n),
            other => Err(JoyError::type_mismatch(op, "integer", other.kind())),
        }
    }

    pub fn pop_number(&mut self, op: &'static str) -> JoyResult<f64> {
        match self.pop(op)? {
            Value::Integer(n) => Ok(n as f64),
            Value::Float(x) => Ok(x),
            other => Err(JoyError::type_mismatch(op, "numeric", other.kind())),
        }
    }

    pub fn pop_boolean(&mut self, op: &'static str) -> JoyResult<bool> {
        match self.pop(op)? {
            Value::Boolean(b) => Ok(b),
            other => Err(JoyError::type_mismatch(op, "boolean", other.kind())),
        }
    }

    pub fn pop_char(&mut self, op: &'static str) -> JoyResult<u8> {
        match self.pop(op)? {
            Value::Char(c) => Ok(c),
            other => Err(JoyError::type_mismatch(op, "char", other.kind())),
        }
    }

    pub fn pop_string(&mut self, op: &'static str) -> JoyResult<JoyString> {
        match self.pop(op)? {
            Value::String(s) => Ok(s),
            other => Err(JoyError::type_mismatch(op, "string", other.kind())),
        }
    }

    pub fn pop_symbol(&mut self, op: &'static str) -> JoyResult<JoySymbol> {
        match self.pop(op)? {
            Value::Symbol(s) => Ok(s),
            other => Err(JoyError::type_mismatch(op, "symbol", other.kind())),
        }
    }

    pub fn pop_set(&mut self, op: &'static str) -> JoyResult<u64> {
        match self.pop(op)? {
            Value::Set(bits) => Ok(bits),
            other => Err(JoyError::type_mismatch(op, "set", other.kind())),
        }
    }

    pub fn pop_file(&mut self, op: &'static str) -> JoyResult<FileHandle> {
        match self.pop(op)? {
            Value::File(handle) => Ok(handle),
            other => Err(JoyError::type_mismatch(op, "file", other.kind())),
        }
    }

    /// Accepts either a List or a Quotation — the common "executable or
    /// iterable aggregate" argument shape combinators take.
    pub fn pop_aggregate(&mut self, op: &'static str) -> JoyResult<Vec<Value>> {
        match self.pop(op)? {
            Value::List(items) | Value::Quotation(items) => Ok(items),
            other => Err(JoyError::type_mismatch(op, "list or quotation", other.kind())),
        }
    }

    pub fn pop_list(&mut self, op: &'static str) -> JoyResult<Vec<Value>> {
        match self.pop(op)? {
            Value::List(items) => Ok(items),
            other => Err(JoyError::type_mismatch(op, "list", other.kind())),
        }
    }

    pub fn pop_quotation(&mut self, op: &'static str) -> JoyResult<Vec<Value>> {
        match self.pop(op)? {
            Value::Quotation(items) => Ok(items),
            other => Err(JoyError::type_mismatch(op, "quotation", other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underflow_reports_required_and_actual() {
        let mut s = OperandStack::new();
        let err = s.pop("dup").unwrap_err();
        match err {
            JoyError::Underflow {
                op,
                required,
                actual,
            } => {
                assert_eq!(op, "dup");
                assert_eq!(required, 1);
                assert_eq!(actual, 0);
            }
            _ => panic!("expected underflow"),
        }
    }

    #[test]
    fn snapshot_restore_is_idempotent() {
        let mut s = OperandStack::new();
        s.push(Value::Integer(1));
        s.push(Value::Integer(2));
        let snap = s.snapshot();
        s.push(Value::Integer(3));
        s.restore(snap);
        assert_eq!(s.depth(), 2);
    }

    #[test]
    fn peek_n_counts_from_top() {
        let mut s = OperandStack::new();
        s.push(Value::Integer(1));
        s.push(Value::Integer(2));
        s.push(Value::Integer(3));
        assert_eq!(*s.peek_n("peek", 0).unwrap(), Value::Integer(3));
        assert_eq!(*s.peek_n("peek", 2).unwrap(), Value::Integer(1));
    }
}
