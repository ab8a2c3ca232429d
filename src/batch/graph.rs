//! Cross-file dependency graph and cycle search.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::registry::Registry;
use crate::analysis::dependencies::is_external;

/// Extensions tried, in order, when a specifier does not name a file exactly.
pub const RESOLVE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"];

/// One resolved import of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// The specifier as written in the import.
    pub specifier: String,
    /// Registry path when resolved, otherwise the normalized specifier path.
    pub target: String,
    pub resolved: bool,
}

/// File-to-file import edges for every file of a registry.
///
/// Only relative specifiers produce edges; packages are never nodes.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: BTreeMap<String, Vec<Edge>>,
}

impl DependencyGraph {
    pub fn build(registry: &Registry) -> Self {
        let keys: HashMap<String, &str> = registry
            .paths()
            .map(|path| (normalize(path), path))
            .collect();

        let edges = registry
            .iter()
            .map(|result| {
                let dir = parent_dir(&normalize(&result.path)).to_string();
                let edges = result
                    .dependencies
                    .imports
                    .iter()
                    .filter(|import| !is_external(&import.source))
                    .map(|import| {
                        let base = normalize(&join(&dir, &import.source));
                        match resolve(&base, &keys) {
                            Some(target) => Edge {
                                specifier: import.source.clone(),
                                target,
                                resolved: true,
                            },
                            None => Edge {
                                specifier: import.source.clone(),
                                target: base,
                                resolved: false,
                            },
                        }
                    })
                    .collect();
                (result.path.clone(), edges)
            })
            .collect();

        Self { edges }
    }

    pub fn edges(&self, file: &str) -> &[Edge] {
        self.edges.get(file).map_or(&[], Vec::as_slice)
    }

    /// Specifiers of `file` that matched no file in the registry.
    pub fn missing(&self, file: &str) -> Vec<String> {
        self.edges(file)
            .iter()
            .filter(|edge| !edge.resolved)
            .map(|edge| edge.specifier.clone())
            .collect()
    }

    /// First import cycle reachable from `root`, as the DFS path at the
    /// moment a file repeats. Empty when none is reachable.
    ///
    /// For A → B → C → A this is `[A, B, C]` from A, and `[D, A, B, C]`
    /// from a D that imports A. The search keeps its own stack, so import
    /// chains of any length are fine.
    pub fn find_cycle(&self, root: &str) -> Vec<String> {
        // (file, index of the next edge to follow); the files form the path.
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
        let mut on_path: HashSet<&str> = HashSet::from([root]);
        // Files fully explored without reaching a cycle.
        let mut settled: HashSet<&str> = HashSet::new();

        while let Some(frame) = stack.last_mut() {
            let (file, next) = *frame;
            let Some(edge) = self.edges(file).get(next) else {
                stack.pop();
                on_path.remove(file);
                settled.insert(file);
                continue;
            };
            frame.1 += 1;

            let target = edge.target.as_str();
            if on_path.contains(target) {
                return stack.iter().map(|(f, _)| f.to_string()).collect();
            }
            if !settled.contains(target) {
                on_path.insert(target);
                stack.push((target, 0));
            }
        }
        Vec::new()
    }
}

fn resolve(base: &str, keys: &HashMap<String, &str>) -> Option<String> {
    let exact = std::iter::once(base.to_string());
    let with_ext = RESOLVE_EXTENSIONS.iter().map(|ext| format!("{}{}", base, ext));
    let index = RESOLVE_EXTENSIONS
        .iter()
        .map(|ext| format!("{}/index{}", base, ext));

    exact
        .chain(with_ext)
        .chain(index)
        .find_map(|candidate| keys.get(&candidate).map(|key| key.to_string()))
}

/// Directory part of a `/`-separated path; empty for a bare file name.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => "",
    }
}

fn join(dir: &str, relative: &str) -> String {
    if dir.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), relative)
    }
}

/// Lexically normalize a path: `\` becomes `/`, `.` segments and empty
/// segments are dropped, and `..` removes the previous segment when there
/// is one.
pub fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}
