use std::collections::{HashMap, HashSet};

use anyhow::bail;
use swc_atoms::JsWord;

pub type BindingId = usize;

/// A resolved reference to a jsx factory (or fragment) for one module.
/// Only the head segment of a dotted path is an identifier; the rest is
/// re-emitted verbatim as property access.
#[derive(Debug)]
pub struct FactoryBinding {
    local: String,
    /// Name as written in the configuration, when the local was renamed
    /// to dodge a collision.
    imported: Option<String>,
    property_path: Option<String>,
    source: Option<String>,
    default_import: bool,
}

impl FactoryBinding {
    fn rendered_name(&self) -> String {
        match &self.property_path {
            Some(path) => format!("{}.{}", self.local, path),
            None => self.local.clone(),
        }
    }
}

/// Module-level bookkeeping shared by every element of one transform:
/// which identifiers exist (for deconfliction), which factories are in
/// use (so elimination passes keep them), and which imports must be
/// emitted. Registration is idempotent per (path, source) pair.
pub struct ModuleScope {
    reserved: HashSet<JsWord>,
    taken: HashSet<String>,
    bindings: Vec<FactoryBinding>,
    by_key: HashMap<(String, Option<String>), BindingId>,
    locals: HashMap<(String, Option<String>), String>,
    included: HashSet<String>,
}

impl ModuleScope {
    pub fn new(reserved: HashSet<JsWord>) -> Self {
        ModuleScope {
            reserved,
            taken: HashSet::new(),
            bindings: Vec::new(),
            by_key: HashMap::new(),
            locals: HashMap::new(),
            included: HashSet::new(),
        }
    }

    /// Resolve a dotted factory path, registering an import for
    /// `import_source` when one is given. Repeated calls with the same
    /// arguments return the same binding.
    pub fn resolve_factory(
        &mut self,
        dotted: &str,
        import_source: Option<&str>,
    ) -> anyhow::Result<BindingId> {
        if dotted.is_empty() || dotted.split('.').any(str::is_empty) {
            bail!("invalid jsx factory `{dotted}`");
        }
        let key = (dotted.to_owned(), import_source.map(str::to_owned));
        if let Some(&id) = self.by_key.get(&key) {
            return Ok(id);
        }

        let mut segments = dotted.split('.');
        let head = segments.next().expect("dotted path has a head segment");
        let rest: Vec<&str> = segments.collect();
        let property_path = (!rest.is_empty()).then(|| rest.join("."));

        let binding = match import_source {
            Some(source) => {
                let local = self.local_for(head, source);
                FactoryBinding {
                    imported: (local != head).then(|| head.to_owned()),
                    local,
                    default_import: property_path.is_some(),
                    property_path,
                    source: Some(source.to_owned()),
                }
            }
            None => {
                // References an existing binding or global; keep it alive.
                self.included.insert(head.to_owned());
                FactoryBinding {
                    local: head.to_owned(),
                    imported: None,
                    property_path,
                    source: None,
                    default_import: false,
                }
            }
        };

        let id = self.bindings.len();
        self.bindings.push(binding);
        self.by_key.insert(key, id);
        Ok(id)
    }

    /// One local per (head identifier, source), shared across bindings so
    /// `React.createElement` and `React.Fragment` use a single import.
    fn local_for(&mut self, head: &str, source: &str) -> String {
        let key = (head.to_owned(), Some(source.to_owned()));
        if let Some(local) = self.locals.get(&key) {
            return local.clone();
        }
        let mut candidate = head.to_owned();
        let mut suffix = 0;
        while self.reserved.contains(&JsWord::from(&*candidate))
            || self.taken.contains(&candidate)
        {
            suffix += 1;
            candidate = format!("{head}${suffix}");
        }
        self.taken.insert(candidate.clone());
        self.locals.insert(key, candidate.clone());
        candidate
    }

    pub fn rendered_name(&self, id: BindingId) -> String {
        self.bindings[id].rendered_name()
    }

    pub fn is_included(&self, name: &str) -> bool {
        self.included.contains(name)
    }

    /// Import statements for every registered source, one statement per
    /// source, in first-registration order.
    pub fn render_imports(&self) -> String {
        let mut sources: Vec<&str> = Vec::new();
        for binding in &self.bindings {
            if let Some(source) = &binding.source {
                if !sources.contains(&source.as_str()) {
                    sources.push(source);
                }
            }
        }

        let mut out = String::new();
        for source in sources {
            let mut defaults: Vec<&str> = Vec::new();
            let mut named: Vec<String> = Vec::new();
            for binding in &self.bindings {
                if binding.source.as_deref() != Some(source) {
                    continue;
                }
                if binding.default_import {
                    if !defaults.contains(&binding.local.as_str()) {
                        defaults.push(&binding.local);
                    }
                } else {
                    let specifier = match &binding.imported {
                        Some(imported) => format!("{imported} as {}", binding.local),
                        None => binding.local.clone(),
                    };
                    if !named.contains(&specifier) {
                        named.push(specifier);
                    }
                }
            }
            for local in defaults {
                out.push_str(&format!("import {local} from \"{source}\";\n"));
            }
            if !named.is_empty() {
                out.push_str(&format!("import {{ {} }} from \"{source}\";\n", named.join(", ")));
            }
        }
        out
    }
}
