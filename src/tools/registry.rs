use super::definition::ToolDescriptor;
use super::error::ToolError;

/// Ordered set of tools addressable by name.
#[derive(Clone, Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool. A tool with the same name is replaced in its original
    /// position so the catalog order stays stable.
    pub fn register(&mut self, tool: ToolDescriptor) {
        match self.tools.iter_mut().find(|t| t.name == tool.name) {
            Some(slot) => *slot = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn extend(&mut self, tools: impl IntoIterator<Item = ToolDescriptor>) {
        for tool in tools {
            self.register(tool);
        }
    }

    /// `(name, description)` pairs in registration order.
    pub fn catalog(&self) -> Vec<(&'static str, &'static str)> {
        self.tools.iter().map(|t| (t.name, t.description)).collect()
    }

    pub fn resolve(&self, name: &str) -> Result<&ToolDescriptor, ToolError> {
        self.tools
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl FromIterator<ToolDescriptor> for ToolRegistry {
    fn from_iter<I: IntoIterator<Item = ToolDescriptor>>(iter: I) -> Self {
        let mut registry = ToolRegistry::new();
        registry.extend(iter);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolArgs;

    fn constant(name: &'static str, out: &'static str) -> ToolDescriptor {
        ToolDescriptor::blocking(name, "test tool", move |_: &ToolArgs| out.to_string())
    }

    #[test]
    fn catalog_keeps_registration_order() {
        let registry: ToolRegistry = [constant("b", ""), constant("a", "")].into_iter().collect();
        let names: Vec<_> = registry.catalog().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn re_registering_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register(constant("x", "old"));
        registry.register(constant("y", ""));
        registry.register(constant("x", "new"));

        assert_eq!(registry.tool_names(), vec!["x", "y"]);
        let out = registry.resolve("x").unwrap().handler.call(ToolArgs::new()).await;
        assert_eq!(out, "new");
    }

    #[test]
    fn unknown_name_renders_apology() {
        let registry = ToolRegistry::new();
        let err = registry.resolve("nope").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sorry, the requested tool 'nope' could not be found."
        );
    }
}
