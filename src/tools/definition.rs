use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

/// Ordered argument mapping parsed out of a tool call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolArgs(Vec<(String, String)>);

impl ToolArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pair, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value in call order, whatever its key.
    pub fn first_value(&self) -> Option<&str> {
        self.0.first().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ToolArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = ToolArgs::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

impl fmt::Display for ToolArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (k, v) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{k}={v:?}")?;
        }
        Ok(())
    }
}

/// Executes a tool. Handlers never fail structurally: every outcome,
/// including errors, comes back as the text handed to the model.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: ToolArgs) -> String;
}

#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub handler: Arc<dyn ToolHandler>,
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl ToolDescriptor {
    pub fn new(
        name: &'static str,
        description: &'static str,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name,
            description,
            handler,
        }
    }

    /// Wraps a synchronous function; it runs on the blocking thread pool.
    pub fn blocking<F>(name: &'static str, description: &'static str, func: F) -> Self
    where
        F: Fn(&ToolArgs) -> String + Send + Sync + 'static,
    {
        Self::new(
            name,
            description,
            Arc::new(BlockingHandler {
                func: Arc::new(func),
            }),
        )
    }
}

struct BlockingHandler<F> {
    func: Arc<F>,
}

#[async_trait]
impl<F> ToolHandler for BlockingHandler<F>
where
    F: Fn(&ToolArgs) -> String + Send + Sync + 'static,
{
    async fn call(&self, args: ToolArgs) -> String {
        let func = Arc::clone(&self.func);
        match tokio::task::spawn_blocking(move || func(&args)).await {
            Ok(output) => output,
            Err(err) => format!("Error: tool execution was interrupted: {err}"),
        }
    }
}
