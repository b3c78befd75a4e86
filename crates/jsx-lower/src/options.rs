use anyhow::bail;

/// Base lowering mode, as configured. The per-element decision derived
/// from it lives in [`crate::mode::RenderingMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsxMode {
    Preserve,
    Classic,
    Automatic,
}

/// Raw configuration as collected from the CLI (or embedding caller).
#[derive(Debug, Clone, Default)]
pub struct JsxOptions {
    pub mode: Option<JsxMode>,
    pub factory: Option<String>,
    pub fragment: Option<String>,
    pub import_source: Option<String>,
    pub jsx_import_source: Option<String>,
}

/// Configuration after defaults and validation have been applied. The
/// whole transform reads this and nothing else.
#[derive(Debug, Clone)]
pub struct NormalizedJsxOptions {
    pub mode: JsxMode,
    pub factory: String,
    pub fragment: String,
    pub import_source: Option<String>,
    pub jsx_import_source: String,
}

impl JsxOptions {
    pub fn normalize(self) -> anyhow::Result<NormalizedJsxOptions> {
        let factory = self.factory.unwrap_or_else(|| "React.createElement".to_owned());
        let fragment = self.fragment.unwrap_or_else(|| "React.Fragment".to_owned());
        let jsx_import_source = self.jsx_import_source.unwrap_or_else(|| "react".to_owned());
        if factory.is_empty() {
            bail!("jsx factory must not be empty");
        }
        if fragment.is_empty() {
            bail!("jsx fragment must not be empty");
        }
        if jsx_import_source.is_empty() {
            bail!("jsx import source must not be empty");
        }
        if let Some(source) = &self.import_source {
            if source.is_empty() {
                bail!("jsx import source must not be empty");
            }
        }
        Ok(NormalizedJsxOptions {
            mode: self.mode.unwrap_or(JsxMode::Classic),
            factory,
            fragment,
            import_source: self.import_source,
            jsx_import_source,
        })
    }
}

impl NormalizedJsxOptions {
    /// Module specifier the automatic runtime helpers are imported from.
    pub fn runtime_source(&self) -> String {
        format!("{}/jsx-runtime", self.jsx_import_source)
    }
}
