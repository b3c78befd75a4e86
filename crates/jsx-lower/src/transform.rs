use std::collections::HashSet;

use log::debug;
use swc_atoms::JsWord;
use swc_common::BytePos;
use swc_ecma_ast::{
    Decl, DefaultDecl, ImportSpecifier, Module, ModuleDecl, ModuleItem, ObjectPatProp, Pat, Stmt,
};
use swc_ecma_visit::VisitWith;

use crate::jsx_transform::{JsxAnalyzer, JsxRenderer};
use crate::magic_string::MagicString;
use crate::options::{JsxMode, NormalizedJsxOptions};
use crate::scope::ModuleScope;

pub struct JsxTransform;

impl JsxTransform {
    /// Lower every JSX subtree of `module` and return the spliced source.
    /// `base` is the position the parser assigned to the first byte of
    /// `source`; spans are offset by it.
    pub fn transform(
        source: &str,
        module: &Module,
        base: BytePos,
        options: &NormalizedJsxOptions,
    ) -> anyhow::Result<String> {
        if options.mode == JsxMode::Preserve {
            return Ok(source.to_owned());
        }

        let mut scope = ModuleScope::new(module_level_names(module));
        let mut analyzer = JsxAnalyzer::new(options, &mut scope);
        module.visit_with(&mut analyzer);
        let plan = analyzer.finish()?;
        debug!("planned {} jsx node(s)", plan.len());

        let mut code = MagicString::new(source);
        let mut renderer = JsxRenderer::new(source, base.0, &mut code, &scope, &plan);
        module.visit_with(&mut renderer);

        let imports = scope.render_imports();
        if !imports.is_empty() {
            code.prepend_left(0, &imports);
        }
        Ok(code.to_string())
    }
}

/// Identifiers bound at the top level of the module, so generated factory
/// locals can pick names that do not shadow or collide with them.
fn module_level_names(module: &Module) -> HashSet<JsWord> {
    let mut names = HashSet::new();
    for item in &module.body {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                for specifier in &import.specifiers {
                    match specifier {
                        ImportSpecifier::Named(named) => {
                            names.insert(named.local.sym.clone());
                        }
                        ImportSpecifier::Default(default) => {
                            names.insert(default.local.sym.clone());
                        }
                        ImportSpecifier::Namespace(namespace) => {
                            names.insert(namespace.local.sym.clone());
                        }
                    }
                }
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                collect_decl_names(&export.decl, &mut names);
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &export.decl {
                DefaultDecl::Fn(function) => {
                    if let Some(ident) = &function.ident {
                        names.insert(ident.sym.clone());
                    }
                }
                DefaultDecl::Class(class) => {
                    if let Some(ident) = &class.ident {
                        names.insert(ident.sym.clone());
                    }
                }
                DefaultDecl::TsInterfaceDecl(_) => {}
            },
            ModuleItem::Stmt(Stmt::Decl(decl)) => collect_decl_names(decl, &mut names),
            _ => {}
        }
    }
    names
}

fn collect_decl_names(decl: &Decl, names: &mut HashSet<JsWord>) {
    match decl {
        Decl::Fn(function) => {
            names.insert(function.ident.sym.clone());
        }
        Decl::Class(class) => {
            names.insert(class.ident.sym.clone());
        }
        Decl::Var(var) => {
            for declarator in &var.decls {
                collect_pat_names(&declarator.name, names);
            }
        }
        _ => {}
    }
}

fn collect_pat_names(pat: &Pat, names: &mut HashSet<JsWord>) {
    match pat {
        Pat::Ident(binding) => {
            names.insert(binding.id.sym.clone());
        }
        Pat::Array(array) => {
            for element in array.elems.iter().flatten() {
                collect_pat_names(element, names);
            }
        }
        Pat::Object(object) => {
            for property in &object.props {
                match property {
                    ObjectPatProp::KeyValue(property) => collect_pat_names(&property.value, names),
                    ObjectPatProp::Assign(property) => {
                        names.insert(property.key.sym.clone());
                    }
                    ObjectPatProp::Rest(property) => collect_pat_names(&property.arg, names),
                }
            }
        }
        Pat::Rest(rest) => collect_pat_names(&rest.arg, names),
        Pat::Assign(assign) => collect_pat_names(&assign.left, names),
        _ => {}
    }
}

#[cfg(test)]
mod test {
    use swc_common::{
        errors::{ColorConfig, Handler},
        sync::Lrc,
        FileName, SourceMap,
    };
    use swc_atoms::JsWord;
    use swc_ecma_ast::Module;

    use crate::parser::Parser;

    use super::module_level_names;

    fn parse(source: &str) -> Module {
        let source_map: Lrc<SourceMap> = Default::default();
        let handler =
            Handler::with_tty_emitter(ColorConfig::Auto, true, false, Some(source_map.clone()));
        let source_file =
            source_map.new_source_file(FileName::Custom("test.tsx".into()), source.to_owned());
        Parser::new(source_map, &handler)
            .parse(source_file)
            .expect("failed to parse")
    }

    #[test]
    fn top_level_bindings_are_collected() {
        let module = parse(
            "import React, { useState } from \"react\";\n\
             import * as ns from \"x\";\n\
             const a = 1;\n\
             function f() { const inner = 2; }\n\
             export class C {}",
        );
        let names = module_level_names(&module);
        for name in ["React", "useState", "ns", "a", "f", "C"] {
            assert!(names.contains(&JsWord::from(name)), "missing {name}");
        }
        assert!(!names.contains(&JsWord::from("inner")));
    }

    #[test]
    fn destructured_bindings_are_collected() {
        let module = parse(
            "const { jsx, renamed: local, fallback = 1, ...rest } = m;\n\
             const [first, , ...tail] = xs;\n\
             export default function main() {}",
        );
        let names = module_level_names(&module);
        for name in ["jsx", "local", "fallback", "rest", "first", "tail", "main"] {
            assert!(names.contains(&JsWord::from(name)), "missing {name}");
        }
        assert!(!names.contains(&JsWord::from("renamed")));
    }
}
