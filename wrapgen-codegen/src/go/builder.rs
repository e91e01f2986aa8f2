//! Method declaration builder.

/// Statements inserted at the top of a method body.
pub trait Guard {
    /// Entry statements for a method whose receiver is `receiver`.
    fn enter(&self, receiver: &str) -> Vec<String>;
}

/// Holds a mutex for the whole method body.
///
/// The unlock is deferred so every return path releases it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutexGuard {
    lock: String,
}

impl MutexGuard {
    /// Creates a guard over the receiver field selected by `lock`.
    #[must_use]
    pub fn new(lock: impl Into<String>) -> Self {
        Self { lock: lock.into() }
    }

    /// Lock field selector.
    #[must_use]
    pub fn lock(&self) -> &str {
        &self.lock
    }
}

impl Guard for MutexGuard {
    fn enter(&self, receiver: &str) -> Vec<String> {
        vec![
            format!("{receiver}.{}.Lock()", self.lock),
            format!("defer {receiver}.{}.Unlock()", self.lock),
        ]
    }
}

/// Builds a method declaration with a pointer receiver.
pub struct MethodBuilder<'g> {
    receiver: String,
    receiver_type: String,
    name: String,
    params: String,
    results: String,
    prologue: Vec<String>,
    guard: Option<&'g dyn Guard>,
    body: Vec<String>,
}

impl<'g> MethodBuilder<'g> {
    /// Starts a method `name` on `*receiver_type`.
    #[must_use]
    pub fn new(
        receiver: impl Into<String>,
        receiver_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            receiver: receiver.into(),
            receiver_type: receiver_type.into(),
            name: name.into(),
            params: String::new(),
            results: String::new(),
            prologue: Vec::new(),
            guard: None,
            body: Vec::new(),
        }
    }

    /// Sets the parameter list, without parentheses.
    #[must_use]
    pub fn params(mut self, params: impl Into<String>) -> Self {
        self.params = params.into();
        self
    }

    /// Sets the result list as written after the parameters.
    #[must_use]
    pub fn results(mut self, results: impl Into<String>) -> Self {
        self.results = results.into();
        self
    }

    /// Adds a statement that runs before the guard is entered.
    #[must_use]
    pub fn prologue(mut self, stmt: impl Into<String>) -> Self {
        self.prologue.push(stmt.into());
        self
    }

    /// Sets the guard.
    #[must_use]
    pub fn guard(mut self, guard: Option<&'g dyn Guard>) -> Self {
        self.guard = guard;
        self
    }

    /// Appends a body statement. Nested lines carry their own extra tabs.
    #[must_use]
    pub fn stmt(mut self, stmt: impl Into<String>) -> Self {
        self.body.push(stmt.into());
        self
    }

    /// Method specification as listed in an interface.
    #[must_use]
    pub fn signature(&self) -> String {
        let mut sig = format!("{}({})", self.name, self.params);
        if !self.results.is_empty() {
            sig.push(' ');
            sig.push_str(&self.results);
        }
        sig
    }

    /// Renders the method declaration.
    #[must_use]
    pub fn build(&self) -> String {
        let mut output = format!(
            "func ({} *{}) {} {{\n",
            self.receiver,
            self.receiver_type,
            self.signature()
        );

        let guard_lines = self
            .guard
            .map(|guard| guard.enter(&self.receiver))
            .unwrap_or_default();
        for line in self.prologue.iter().chain(&guard_lines).chain(&self.body) {
            if !line.is_empty() {
                output.push('\t');
                output.push_str(line);
            }
            output.push('\n');
        }

        output.push('}');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutex_guard() {
        let guard = MutexGuard::new("lock");
        assert_eq!(guard.lock(), "lock");
        assert_eq!(
            guard.enter("t"),
            vec!["t.lock.Lock()", "defer t.lock.Unlock()"]
        );
    }

    #[test]
    fn test_plain_method() {
        let method = MethodBuilder::new("t", "TesterWrapper", "Field1")
            .results("string")
            .stmt("return t.Tester.field1");
        assert_eq!(method.signature(), "Field1() string");
        assert_eq!(
            method.build(),
            "func (t *TesterWrapper) Field1() string {\n\treturn t.Tester.field1\n}"
        );
    }

    #[test]
    fn test_guarded_method_with_prologue() {
        let guard = MutexGuard::new("mu");
        let method = MethodBuilder::new("w", "W", "Get")
            .results("int")
            .prologue("if w == nil {")
            .prologue("\treturn 0")
            .prologue("}")
            .guard(Some(&guard))
            .stmt("return w.T.n");
        assert_eq!(
            method.build(),
            "func (w *W) Get() int {\n\
             \tif w == nil {\n\
             \t\treturn 0\n\
             \t}\n\
             \tw.mu.Lock()\n\
             \tdefer w.mu.Unlock()\n\
             \treturn w.T.n\n\
             }"
        );
    }

    #[test]
    fn test_params_without_results() {
        let method = MethodBuilder::new("t", "TesterWrapper", "SetField1").params("val string");
        assert_eq!(method.signature(), "SetField1(val string)");
    }
}
