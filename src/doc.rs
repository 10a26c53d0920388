use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::expand::expand;
use crate::extract::extract_register;
use crate::model::{ConcreteReg, ExecState};

#[derive(thiserror::Error, Debug)]
pub enum DocError {
    #[error("missing register index {}", .path.display())]
    MissingIndex { path: PathBuf },
    #[error("reading {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {}", .path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
}

/// Register-file paths listed by the architecture's index, in document
/// order.
pub fn register_files(root: &Path, state: ExecState) -> Result<Vec<PathBuf>, DocError> {
    let index = root.join(state.index_file());
    if !index.exists() {
        return Err(DocError::MissingIndex { path: index });
    }
    let text = fs::read_to_string(&index).map_err(|source| DocError::Io {
        path: index.clone(),
        source,
    })?;
    let doc = roxmltree::Document::parse(&text).map_err(|source| DocError::Xml {
        path: index.clone(),
        source,
    })?;
    Ok(doc
        .descendants()
        .filter(|n| n.has_tag_name("register_link"))
        .filter_map(|n| n.attribute("registerfile"))
        .map(|f| root.join(f))
        .collect())
}

/// Expand every register definition in one register file. A failure inside
/// a single register is reported and does not abort the rest of the file.
pub fn expand_register_file(path: &Path) -> Result<Vec<ConcreteReg>, DocError> {
    let text = fs::read_to_string(path).map_err(|source| DocError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = roxmltree::Document::parse(&text).map_err(|source| DocError::Xml {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rows = Vec::new();
    for reg in doc.descendants().filter(|n| n.has_tag_name("register")) {
        let extraction = extract_register(reg);
        for tpl in &extraction.templates {
            match expand(tpl, &extraction.vars) {
                Ok(mut regs) => rows.append(&mut regs),
                Err(e) => error!(file = %path.display(), "{e}"),
            }
        }
    }
    Ok(rows)
}

/// Walk one architecture: every file its index names, in order. A file
/// that fails to load degrades to zero rows; a missing index is fatal.
pub fn expand_architecture(root: &Path, state: ExecState) -> Result<Vec<ConcreteReg>, DocError> {
    let mut rows = Vec::new();
    for file in register_files(root, state)? {
        info!(file = %file.display(), "parsing register file");
        match expand_register_file(&file) {
            Ok(mut regs) => rows.append(&mut regs),
            Err(e) => warn!("{e}"),
        }
    }
    Ok(rows)
}
