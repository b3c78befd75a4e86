use swc_ecma_ast::{JSXAttrName, JSXAttrOrSpread, JSXElementChild, JSXExpr};

use crate::options::{JsxMode, NormalizedJsxOptions};

/// Name of the automatic-runtime helper to call for one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsxFactoryName {
    Jsx,
    Jsxs,
}

impl JsxFactoryName {
    pub fn name(self) -> &'static str {
        match self {
            JsxFactoryName::Jsx => "jsx",
            JsxFactoryName::Jsxs => "jsxs",
        }
    }
}

/// Per-element lowering decision. Computed once during the analysis pass
/// and cached, so the render pass observes the identical choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderingMode {
    Preserve,
    Classic {
        factory: String,
        import_source: Option<String>,
    },
    Automatic {
        factory_name: JsxFactoryName,
        import_source: String,
    },
}

/// Decide how one element is lowered.
///
/// In automatic mode, a `key` attribute that appears after a spread forces
/// classic lowering: the spread may contribute its own `key` at runtime,
/// so the static key extraction of the automatic transform cannot prove
/// which one wins, while classic semantics resolve the props object at
/// the call site.
pub fn select_rendering_mode(
    options: &NormalizedJsxOptions,
    attributes: &[JSXAttrOrSpread],
    rendered_children: usize,
) -> RenderingMode {
    match options.mode {
        JsxMode::Preserve => RenderingMode::Preserve,
        JsxMode::Classic => classic(options),
        JsxMode::Automatic => {
            if key_after_spread(attributes) {
                classic(options)
            } else {
                RenderingMode::Automatic {
                    factory_name: if rendered_children > 1 {
                        JsxFactoryName::Jsxs
                    } else {
                        JsxFactoryName::Jsx
                    },
                    import_source: options.jsx_import_source.clone(),
                }
            }
        }
    }
}

fn classic(options: &NormalizedJsxOptions) -> RenderingMode {
    RenderingMode::Classic {
        factory: options.factory.clone(),
        import_source: options.import_source.clone(),
    }
}

fn key_after_spread(attributes: &[JSXAttrOrSpread]) -> bool {
    let mut saw_spread = false;
    for attribute in attributes {
        match attribute {
            JSXAttrOrSpread::SpreadElement(_) => saw_spread = true,
            JSXAttrOrSpread::JSXAttr(attr) => {
                if saw_spread && is_key_attribute_name(&attr.name) {
                    return true;
                }
            }
        }
    }
    false
}

pub fn is_key_attribute_name(name: &JSXAttrName) -> bool {
    matches!(name, JSXAttrName::Ident(ident) if &*ident.sym == "key")
}

/// Children that make it into the output. An expression container holding
/// only a comment renders to nothing and is not counted.
pub fn rendered_jsx_children(children: &[JSXElementChild]) -> usize {
    children
        .iter()
        .filter(|child| !is_elided_child(child))
        .count()
}

pub fn is_elided_child(child: &JSXElementChild) -> bool {
    matches!(
        child,
        JSXElementChild::JSXExprContainer(container)
            if matches!(container.expr, JSXExpr::JSXEmptyExpr(_))
    )
}

#[cfg(test)]
mod test {
    use swc_common::{
        errors::{ColorConfig, Handler},
        sync::Lrc,
        FileName, SourceMap,
    };
    use swc_ecma_ast::{Expr, JSXElement, ModuleItem, Stmt};

    use crate::options::{JsxMode, JsxOptions, NormalizedJsxOptions};
    use crate::parser::Parser;

    use super::{rendered_jsx_children, select_rendering_mode, JsxFactoryName, RenderingMode};

    fn parse_element(source: &str) -> Box<JSXElement> {
        let source_map: Lrc<SourceMap> = Default::default();
        let handler =
            Handler::with_tty_emitter(ColorConfig::Auto, true, false, Some(source_map.clone()));
        let source_file =
            source_map.new_source_file(FileName::Custom("test.jsx".into()), source.to_owned());
        let module = Parser::new(source_map, &handler)
            .parse(source_file)
            .expect("failed to parse");
        match module.body.into_iter().next() {
            Some(ModuleItem::Stmt(Stmt::Expr(stmt))) => match *stmt.expr {
                Expr::JSXElement(element) => element,
                _ => panic!("expected a jsx element"),
            },
            _ => panic!("expected an expression statement"),
        }
    }

    fn automatic_options() -> NormalizedJsxOptions {
        JsxOptions {
            mode: Some(JsxMode::Automatic),
            ..Default::default()
        }
        .normalize()
        .unwrap()
    }

    #[test]
    fn key_after_spread_downgrades_to_classic() {
        let element = parse_element("<Foo {...b} key=\"k\"/>");
        let mode = select_rendering_mode(&automatic_options(), &element.opening.attrs, 0);
        assert!(matches!(mode, RenderingMode::Classic { .. }));
    }

    #[test]
    fn key_before_spread_stays_automatic() {
        let element = parse_element("<Foo key=\"k\" {...b}/>");
        let mode = select_rendering_mode(&automatic_options(), &element.opening.attrs, 0);
        assert!(matches!(mode, RenderingMode::Automatic { .. }));
    }

    #[test]
    fn child_count_picks_the_factory() {
        let single = parse_element("<Foo><A/></Foo>");
        let mode = select_rendering_mode(
            &automatic_options(),
            &single.opening.attrs,
            rendered_jsx_children(&single.children),
        );
        assert!(matches!(
            mode,
            RenderingMode::Automatic { factory_name: JsxFactoryName::Jsx, .. }
        ));

        let multiple = parse_element("<Foo><A/><B/></Foo>");
        let mode = select_rendering_mode(
            &automatic_options(),
            &multiple.opening.attrs,
            rendered_jsx_children(&multiple.children),
        );
        assert!(matches!(
            mode,
            RenderingMode::Automatic { factory_name: JsxFactoryName::Jsxs, .. }
        ));
    }

    #[test]
    fn comment_containers_are_not_counted() {
        let element = parse_element("<Foo>{/* comment */}<A/></Foo>");
        assert_eq!(rendered_jsx_children(&element.children), 1);
    }

    #[test]
    fn preserve_wins_unconditionally() {
        let element = parse_element("<Foo {...b} key=\"k\"/>");
        let options = JsxOptions {
            mode: Some(JsxMode::Preserve),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        let mode = select_rendering_mode(&options, &element.opening.attrs, 0);
        assert_eq!(mode, RenderingMode::Preserve);
    }
}
