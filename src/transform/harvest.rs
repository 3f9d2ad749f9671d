//! Method harvesting and the suite manifest.

use specrun_syntax::ast::{Spanned, Statement};

/// Ordered record of the harvested test methods of one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassManifest {
    pub class_name: String,
    pub methods: Vec<String>,
}

/// The suite manifest: one entry per detected class, in harvest order.
///
/// This is the explicit context object produced by the transformation pass and
/// threaded by the caller. Entries are appended and never cleared, so feeding
/// the same program through the pipeline twice against one manifest duplicates
/// every harvested method name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuiteManifest {
    entries: Vec<ClassManifest>,
}

impl SuiteManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in harvest order.
    pub fn entries(&self) -> &[ClassManifest] {
        &self.entries
    }

    /// Harvested method names for a class, if any were recorded.
    pub fn methods_for(&self, class_name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.class_name == class_name)
            .map(|e| e.methods.as_slice())
    }

    /// Append a method name under a class, creating the entry on first use.
    ///
    /// A repeated name is appended again, never deduplicated.
    fn record(&mut self, class_name: &str, method: &str) {
        match self.entries.iter_mut().find(|e| e.class_name == class_name) {
            Some(entry) => entry.methods.push(method.to_string()),
            None => self.entries.push(ClassManifest {
                class_name: class_name.to_string(),
                methods: vec![method.to_string()],
            }),
        }
    }
}

/// Harvester bound to one class name.
pub(super) struct MethodHarvester<'a> {
    class_name: &'a str,
    manifest: &'a mut SuiteManifest,
}

impl<'a> MethodHarvester<'a> {
    pub(super) fn new(class_name: &'a str, manifest: &'a mut SuiteManifest) -> Self {
        Self { class_name, manifest }
    }

    /// Walk a class subtree and record every function definition whose name
    /// does not start with an underscore; the underscore prefix is the sole
    /// rule distinguishing test methods from private helpers.
    ///
    /// The walk descends into nested scopes, so definitions nested inside
    /// other functions (or nested classes) within the class are recorded too,
    /// not only directly-declared methods. First-seen order is preserved.
    pub(super) fn harvest(&mut self, body: &[Spanned<Statement>]) {
        for stmt in body {
            match &stmt.node {
                Statement::Function(func) => {
                    if func.name.starts_with('_') {
                        tracing::trace!(class = self.class_name, method = %func.name, "skipped private helper");
                    } else {
                        self.manifest.record(self.class_name, &func.name);
                    }
                    self.harvest(&func.body);
                }
                Statement::Class(class) => self.harvest(&class.body),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specrun_syntax::{lexer, parser};

    fn class_body(source: &str) -> Vec<Spanned<Statement>> {
        let tokens = lexer::lex(source).unwrap();
        let program = parser::parse(&tokens).unwrap();
        match program.body.into_iter().next().map(|s| s.node) {
            Some(Statement::Class(c)) => c.body,
            other => panic!("Expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_underscore_names_are_excluded() {
        let body = class_body("class HelperSpec:\n  def _setup(self):\n    pass\n  def test_ok(self):\n    pass\n");
        let mut manifest = SuiteManifest::new();
        MethodHarvester::new("HelperSpec", &mut manifest).harvest(&body);
        assert_eq!(manifest.methods_for("HelperSpec"), Some(&["test_ok".to_string()][..]));
    }

    #[test]
    fn test_nested_definitions_are_recorded() {
        let body = class_body(
            "class OuterSpec:\n  def test_outer(self):\n    def nested_check():\n      pass\n    pass\n",
        );
        let mut manifest = SuiteManifest::new();
        MethodHarvester::new("OuterSpec", &mut manifest).harvest(&body);
        assert_eq!(
            manifest.methods_for("OuterSpec"),
            Some(&["test_outer".to_string(), "nested_check".to_string()][..])
        );
    }

    #[test]
    fn test_repeated_names_are_appended() {
        let body = class_body("class DupSpec:\n  def test_twice(self):\n    pass\n  def test_twice(self):\n    pass\n");
        let mut manifest = SuiteManifest::new();
        MethodHarvester::new("DupSpec", &mut manifest).harvest(&body);
        assert_eq!(
            manifest.methods_for("DupSpec"),
            Some(&["test_twice".to_string(), "test_twice".to_string()][..])
        );
    }
}
