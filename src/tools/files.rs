//! File tools confined to a [`Sandbox`].
//!
//! The operations return `Result<String, ToolError>`; the tool descriptors
//! built by [`file_tools`] flatten both arms into the text the model sees.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use super::definition::{ToolArgs, ToolDescriptor};
use super::error::ToolError;
use super::sandbox::Sandbox;

pub const CREATE_FILE: &str = "create_file";
pub const READ_FILE: &str = "read_file";
pub const DELETE_FILE: &str = "delete_file";
pub const LIST_DIRECTORY: &str = "list_directory";

/// Writes `content` to `file_path`, creating parent directories and
/// overwriting any existing file.
pub fn create_file(sandbox: &Sandbox, file_path: &str, content: &str) -> Result<String, ToolError> {
    let path = sandbox.resolve(file_path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ToolError::io("creating", file_path, e))?;
    }
    fs::write(&path, content).map_err(|e| ToolError::io("writing", file_path, e))?;
    log::debug!("wrote {} bytes to {}", content.len(), path.display());
    Ok(format!("File '{file_path}' was created or updated successfully."))
}

pub fn read_file(sandbox: &Sandbox, file_path: &str) -> Result<String, ToolError> {
    let path = existing_file(sandbox, file_path)?;
    let content = fs::read_to_string(&path).map_err(|e| ToolError::io("reading", file_path, e))?;
    Ok(format!("Contents of file '{file_path}':\n{content}"))
}

pub fn delete_file(sandbox: &Sandbox, file_path: &str) -> Result<String, ToolError> {
    let path = existing_file(sandbox, file_path)?;
    match fs::remove_file(&path) {
        Ok(()) => Ok(format!("File '{file_path}' was deleted successfully.")),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ToolError::NotFound {
            path: file_path.to_string(),
        }),
        Err(err) => Err(ToolError::io("deleting", file_path, err)),
    }
}

/// Lists entry names (files and directories) sorted by name.
pub fn list_directory(sandbox: &Sandbox, directory_path: &str) -> Result<String, ToolError> {
    let path = sandbox.resolve(directory_path)?;
    if !path.exists() {
        return Err(ToolError::NotFound {
            path: directory_path.to_string(),
        });
    }
    if !path.is_dir() {
        return Err(ToolError::NotADirectory {
            path: directory_path.to_string(),
        });
    }

    let mut names = Vec::new();
    let entries = fs::read_dir(&path).map_err(|e| ToolError::io("listing", directory_path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ToolError::io("listing", directory_path, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    if names.is_empty() {
        return Ok(format!("Directory '{directory_path}' is empty."));
    }
    Ok(format!(
        "Contents of directory '{directory_path}':\n{}",
        names.join("\n")
    ))
}

fn existing_file(sandbox: &Sandbox, file_path: &str) -> Result<PathBuf, ToolError> {
    let path = sandbox.resolve(file_path)?;
    if !path.exists() {
        return Err(ToolError::NotFound {
            path: file_path.to_string(),
        });
    }
    if !path.is_file() {
        return Err(ToolError::NotAFile {
            path: file_path.to_string(),
        });
    }
    Ok(path)
}

fn flatten(result: Result<String, ToolError>) -> String {
    result.unwrap_or_else(|err| err.to_string())
}

fn required<'a>(args: &'a ToolArgs, name: &'static str) -> Result<&'a str, ToolError> {
    args.get(name).ok_or(ToolError::MissingArgument(name))
}

/// Tool descriptors for the four file operations, sharing one sandbox.
pub fn file_tools(sandbox: Arc<Sandbox>) -> Vec<ToolDescriptor> {
    let create = Arc::clone(&sandbox);
    let read = Arc::clone(&sandbox);
    let delete = Arc::clone(&sandbox);
    let list = sandbox;

    vec![
        ToolDescriptor::blocking(
            CREATE_FILE,
            "Creates a new file or overwrites an existing one. \
             Arguments: file_path (path of the file), content (text to write, optional).",
            move |args: &ToolArgs| {
                flatten(required(args, "file_path").and_then(|path| {
                    create_file(&create, path, args.get("content").unwrap_or_default())
                }))
            },
        ),
        ToolDescriptor::blocking(
            READ_FILE,
            "Reads the contents of a file. Arguments: file_path (path of the file).",
            move |args: &ToolArgs| {
                flatten(required(args, "file_path").and_then(|path| read_file(&read, path)))
            },
        ),
        ToolDescriptor::blocking(
            DELETE_FILE,
            "Deletes a file. Arguments: file_path (path of the file).",
            move |args: &ToolArgs| {
                flatten(required(args, "file_path").and_then(|path| delete_file(&delete, path)))
            },
        ),
        ToolDescriptor::blocking(
            LIST_DIRECTORY,
            "Lists the files and directories in a directory. \
             Arguments: directory_path (path of the directory, defaults to the workspace root).",
            move |args: &ToolArgs| {
                flatten(list_directory(
                    &list,
                    args.get("directory_path").unwrap_or("."),
                ))
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sandbox() -> (tempfile::TempDir, Sandbox) {
        let dir = tempfile::tempdir().expect("tempdir");
        let sandbox = Sandbox::new(dir.path().join("ws")).expect("sandbox");
        (dir, sandbox)
    }

    #[test]
    fn create_then_read_returns_content() {
        let (_dir, sb) = sandbox();
        let msg = create_file(&sb, "notes.txt", "hello").unwrap();
        assert_eq!(msg, "File 'notes.txt' was created or updated successfully.");

        let read = read_file(&sb, "notes.txt").unwrap();
        assert_eq!(read, "Contents of file 'notes.txt':\nhello");
    }

    #[test]
    fn create_overwrites_existing_file() {
        let (_dir, sb) = sandbox();
        create_file(&sb, "f.txt", "one").unwrap();
        create_file(&sb, "f.txt", "two").unwrap();
        assert!(read_file(&sb, "f.txt").unwrap().ends_with("\ntwo"));
    }

    #[test]
    fn create_makes_parent_directories() {
        let (_dir, sb) = sandbox();
        create_file(&sb, "a/b/c.txt", "deep").unwrap();
        assert_eq!(
            std::fs::read_to_string(sb.root().join("a/b/c.txt")).unwrap(),
            "deep"
        );
    }

    #[test]
    fn delete_then_read_is_not_found() {
        let (_dir, sb) = sandbox();
        create_file(&sb, "gone.txt", "x").unwrap();
        assert_eq!(
            delete_file(&sb, "gone.txt").unwrap(),
            "File 'gone.txt' was deleted successfully."
        );
        let err = read_file(&sb, "gone.txt").unwrap_err();
        assert_eq!(err.to_string(), "Error: file 'gone.txt' does not exist.");
    }

    #[test]
    fn delete_missing_file_is_not_found() {
        let (_dir, sb) = sandbox();
        assert!(matches!(
            delete_file(&sb, "missing.txt"),
            Err(ToolError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_directory_is_not_a_file() {
        let (_dir, sb) = sandbox();
        create_file(&sb, "sub/inner.txt", "").unwrap();
        let err = delete_file(&sb, "sub").unwrap_err();
        assert_eq!(err.to_string(), "Error: 'sub' is not a file.");
        assert!(sb.root().join("sub/inner.txt").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn parent_segments_do_not_write_through_symlink() {
        let (dir, sb) = sandbox();
        let outside = dir.path().join("outside");
        std::fs::create_dir_all(&outside).unwrap();
        std::os::unix::fs::symlink(&outside, sb.root().join("link")).unwrap();

        let err = create_file(&sb, "missing/../link/pwned.txt", "escaped").unwrap_err();
        assert!(err.is_sandbox_violation());
        assert!(!outside.join("pwned.txt").exists());
    }

    #[test]
    fn list_empty_directory() {
        let (_dir, sb) = sandbox();
        assert_eq!(list_directory(&sb, ".").unwrap(), "Directory '.' is empty.");
    }

    #[test]
    fn list_is_sorted_and_includes_directories() {
        let (_dir, sb) = sandbox();
        create_file(&sb, "b.txt", "").unwrap();
        create_file(&sb, "a.txt", "").unwrap();
        create_file(&sb, "sub/c.txt", "").unwrap();
        assert_eq!(
            list_directory(&sb, ".").unwrap(),
            "Contents of directory '.':\na.txt\nb.txt\nsub"
        );
    }

    #[test]
    fn list_on_file_is_not_a_directory() {
        let (_dir, sb) = sandbox();
        create_file(&sb, "f.txt", "").unwrap();
        assert!(matches!(
            list_directory(&sb, "f.txt"),
            Err(ToolError::NotADirectory { .. })
        ));
    }

    #[test]
    fn escape_attempt_does_not_touch_filesystem() {
        let (dir, sb) = sandbox();
        let err = create_file(&sb, "../escaped.txt", "nope").unwrap_err();
        assert!(err.is_sandbox_violation());
        assert!(!dir.path().join("escaped.txt").exists());
    }

    #[tokio::test]
    async fn descriptors_flatten_errors_into_text() {
        let (_dir, sb) = sandbox();
        let tools = file_tools(Arc::new(sb));
        let read = tools.iter().find(|t| t.name == READ_FILE).unwrap();

        let out = read.handler.call(ToolArgs::new()).await;
        assert_eq!(out, "Error: missing required argument 'file_path'.");

        let args: ToolArgs = [("file_path", "../x")].into_iter().collect();
        let out = read.handler.call(args).await;
        assert_eq!(out, "Error: '../x' is outside the allowed agent workspace.");
    }

    #[tokio::test]
    async fn list_directory_defaults_to_root() {
        let (_dir, sb) = sandbox();
        let sb = Arc::new(sb);
        create_file(&sb, "only.txt", "").unwrap();
        let tools = file_tools(sb);
        let list = tools.iter().find(|t| t.name == LIST_DIRECTORY).unwrap();
        let out = list.handler.call(ToolArgs::new()).await;
        assert_eq!(out, "Contents of directory '.':\nonly.txt");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn parent_escapes_never_write_outside(depth in 1usize..8, name in "[a-z]{1,8}") {
            let dir = tempfile::tempdir().unwrap();
            let nested = dir.path().join("a/b/c");
            let sb = Sandbox::new(nested.join("ws")).unwrap();

            let rel = format!("{}{}.txt", "../".repeat(depth), name);
            let result = create_file(&sb, &rel, "x");
            let err = result.err();
            prop_assert!(err.as_ref().map_or(false, ToolError::is_sandbox_violation));

            let mut escaped = nested.join("ws");
            for _ in 0..depth {
                escaped.pop();
            }
            let target = escaped.join(format!("{}.txt", name));
            prop_assert!(!target.exists());
        }
    }
}
