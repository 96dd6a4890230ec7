//! Local knowledge-base documents.

use std::fs;
use std::io;
use std::path::Path;

const SEED_DOCUMENTS: [(&str, &str); 2] = [
    (
        "policy.txt",
        "Company policy: lunch break is from 12:00 to 13:00, and the work day ends at 18:00. \
         Meals are provided for employees working overtime.",
    ),
    (
        "products.txt",
        "Products: we sell smartphones and tablets. \
         The smartphone comes with built-in AI features.",
    ),
];

/// A loaded corpus file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub source: String,
    pub content: String,
}

/// Writes the seed documents when `dir` is missing or holds no `.txt` files.
/// Returns whether seeding happened.
pub fn ensure_seeded(dir: &Path) -> io::Result<bool> {
    fs::create_dir_all(dir)?;
    if !text_files(dir)?.is_empty() {
        return Ok(false);
    }
    for (name, content) in SEED_DOCUMENTS {
        fs::write(dir.join(name), content)?;
    }
    log::info!("seeded knowledge base in {}", dir.display());
    Ok(true)
}

/// Loads every `.txt` file in `dir`, ordered by file name.
pub fn load_documents(dir: &Path) -> io::Result<Vec<SourceDocument>> {
    let mut docs = Vec::new();
    for name in text_files(dir)? {
        let content = fs::read_to_string(dir.join(&name))?;
        if content.trim().is_empty() {
            continue;
        }
        docs.push(SourceDocument {
            source: name,
            content,
        });
    }
    Ok(docs)
}

fn text_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("txt") {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
