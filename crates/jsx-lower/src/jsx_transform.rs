use std::collections::HashMap;

use log::debug;
use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    Expr, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXElementChild,
    JSXElementName, JSXExpr, JSXFragment,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::magic_string::MagicString;
use crate::mode::{
    is_elided_child, is_key_attribute_name, rendered_jsx_children, select_rendering_mode,
    RenderingMode,
};
use crate::options::NormalizedJsxOptions;
use crate::scope::{BindingId, ModuleScope};

type SpanKey = (u32, u32);

fn span_key(span: Span) -> SpanKey {
    (span.lo.0, span.hi.0)
}

/// Per-element decision from the analysis pass; the render pass reads it
/// back instead of re-deriving anything.
pub struct PlannedJsx {
    mode: RenderingMode,
    factory: BindingId,
    fragment: Option<BindingId>,
}

pub type JsxPlan = HashMap<SpanKey, PlannedJsx>;

/// Analysis pass: picks a rendering mode per element/fragment and
/// resolves factory bindings before any edit is emitted.
pub struct JsxAnalyzer<'a> {
    options: &'a NormalizedJsxOptions,
    scope: &'a mut ModuleScope,
    plan: JsxPlan,
    error: Option<anyhow::Error>,
}

impl<'a> JsxAnalyzer<'a> {
    pub fn new(options: &'a NormalizedJsxOptions, scope: &'a mut ModuleScope) -> Self {
        JsxAnalyzer {
            options,
            scope,
            plan: JsxPlan::new(),
            error: None,
        }
    }

    pub fn finish(self) -> anyhow::Result<JsxPlan> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.plan),
        }
    }

    fn plan_node(&mut self, span: Span, mode: RenderingMode, is_fragment: bool) {
        if self.error.is_some() {
            return;
        }
        match self.resolve_bindings(&mode, is_fragment) {
            Ok((factory, fragment)) => {
                self.plan.insert(
                    span_key(span),
                    PlannedJsx {
                        mode,
                        factory,
                        fragment,
                    },
                );
            }
            Err(error) => self.error = Some(error),
        }
    }

    fn resolve_bindings(
        &mut self,
        mode: &RenderingMode,
        is_fragment: bool,
    ) -> anyhow::Result<(BindingId, Option<BindingId>)> {
        match mode {
            RenderingMode::Preserve => unreachable!("preserve mode never reaches analysis"),
            RenderingMode::Classic {
                factory,
                import_source,
            } => {
                let factory = self.scope.resolve_factory(factory, import_source.as_deref())?;
                let fragment = if is_fragment {
                    Some(
                        self.scope
                            .resolve_factory(&self.options.fragment, import_source.as_deref())?,
                    )
                } else {
                    None
                };
                Ok((factory, fragment))
            }
            RenderingMode::Automatic { factory_name, .. } => {
                let source = self.options.runtime_source();
                let factory = self
                    .scope
                    .resolve_factory(factory_name.name(), Some(&source))?;
                let fragment = if is_fragment {
                    Some(self.scope.resolve_factory("Fragment", Some(&source))?)
                } else {
                    None
                };
                Ok((factory, fragment))
            }
        }
    }
}

impl<'a> Visit for JsxAnalyzer<'a> {
    fn visit_jsx_element(&mut self, element: &JSXElement) {
        let mode = select_rendering_mode(
            self.options,
            &element.opening.attrs,
            rendered_jsx_children(&element.children),
        );
        self.plan_node(element.span, mode, false);
        element.visit_children_with(self);
    }

    fn visit_jsx_fragment(&mut self, fragment: &JSXFragment) {
        let mode =
            select_rendering_mode(self.options, &[], rendered_jsx_children(&fragment.children));
        self.plan_node(fragment.span, mode, true);
        fragment.visit_children_with(self);
    }
}

struct AttributeState<'n> {
    /// End of the last accumulated (non-key) attribute; separators and
    /// closing braces insert here.
    cursor: usize,
    /// End of the last consumed attribute, key included.
    trailing: usize,
    inside_object: bool,
    saw_spread: bool,
    has_props: bool,
    first_attr: Option<usize>,
    first_is_spread: bool,
    key: Option<&'n JSXAttr>,
}

/// Render pass: lowers every JSX subtree into call expressions by
/// splicing the original source.
pub struct JsxRenderer<'a> {
    source: &'a str,
    base: u32,
    code: &'a mut MagicString,
    scope: &'a ModuleScope,
    plan: &'a JsxPlan,
}

impl<'a> JsxRenderer<'a> {
    pub fn new(
        source: &'a str,
        base: u32,
        code: &'a mut MagicString,
        scope: &'a ModuleScope,
        plan: &'a JsxPlan,
    ) -> Self {
        JsxRenderer {
            source,
            base,
            code,
            scope,
            plan,
        }
    }

    fn lo(&self, span: Span) -> usize {
        (span.lo.0 - self.base) as usize
    }

    fn hi(&self, span: Span) -> usize {
        (span.hi.0 - self.base) as usize
    }

    fn span_text(&self, span: Span) -> &str {
        &self.source[self.lo(span)..self.hi(span)]
    }

    fn render_element(&mut self, element: &JSXElement) {
        let planned = self
            .plan
            .get(&span_key(element.span))
            .expect("jsx element was not analyzed");
        let factory = self.scope.rendered_name(planned.factory);
        debug!(
            "lowering <{}> with {factory}",
            self.span_text(element.opening.name.span())
        );
        match &planned.mode {
            RenderingMode::Preserve => {}
            RenderingMode::Classic { .. } => self.render_element_classic(element, &factory),
            RenderingMode::Automatic { .. } => self.render_element_automatic(element, &factory),
        }
    }

    /// `<Name a {...b}>c</Name>` -> `factory(Name, props, c)` where props
    /// is `null`, an object literal, or an `Object.assign` chain.
    fn render_element_classic(&mut self, element: &JSXElement, factory: &str) {
        let opening = &element.opening;
        let name_span = opening.name.span();
        self.code.overwrite(
            self.lo(opening.span),
            self.lo(name_span),
            &format!("/*#__PURE__*/{factory}("),
        );
        self.render_tag_name(&opening.name);
        let start = self.strip_type_args(opening);
        let attrs_end = self.attributes_end(opening);

        let state = self.render_attributes(&opening.attrs, start, false);
        if state.inside_object {
            self.code.append_left(state.cursor, " }");
        }
        if opening.attrs.is_empty() {
            if start < attrs_end {
                self.code.overwrite(start, attrs_end, ", null");
            } else {
                self.code.append_left(start, ", null");
            }
        } else {
            if state.saw_spread {
                self.wrap_in_object_assign(&state);
                self.code.append_left(state.cursor, ")");
            }
            self.code.remove(state.trailing, attrs_end);
        }

        if opening.self_closing {
            self.code.overwrite(attrs_end, self.hi(opening.span), ")");
        } else {
            self.code.remove(attrs_end, self.hi(opening.span));
            self.render_children(&element.children, true);
            if let Some(closing) = &element.closing {
                self.code
                    .overwrite(self.lo(closing.span), self.hi(closing.span), ")");
            }
        }
    }

    /// `<Name a key={k}>c</Name>` -> `factory(Name, props, k)` where the
    /// props object carries a trailing `children` property and the key is
    /// relocated behind the props argument.
    fn render_element_automatic(&mut self, element: &JSXElement, factory: &str) {
        let opening = &element.opening;
        let name_span = opening.name.span();
        self.code.overwrite(
            self.lo(opening.span),
            self.lo(name_span),
            &format!("/*#__PURE__*/{factory}("),
        );
        self.render_tag_name(&opening.name);
        let start = self.strip_type_args(opening);
        let attrs_end = self.attributes_end(opening);
        let count = rendered_jsx_children(&element.children);

        let state = self.render_attributes(&opening.attrs, start, true);
        if state.saw_spread {
            self.wrap_in_object_assign(&state);
        }
        self.code.remove(state.trailing, attrs_end);

        // Just before the call's closing paren, per shape below.
        let key_destination;

        if count > 0 {
            let mut prefix = String::from(if state.inside_object {
                ", children: "
            } else {
                ", { children: "
            });
            if count > 1 {
                prefix.push('[');
            }
            self.code.overwrite(attrs_end, self.hi(opening.span), &prefix);
            self.render_children(&element.children, false);

            let closing = element
                .closing
                .as_ref()
                .expect("element with children has a closing tag");
            let closing_lo = self.lo(closing.span);
            let closing_hi = self.hi(closing.span);
            let mut suffix = String::new();
            if count > 1 {
                suffix.push(']');
            }
            suffix.push_str(" }");
            if state.saw_spread {
                suffix.push(')');
            }
            self.code.overwrite(closing_lo, closing_hi - 1, &suffix);
            self.code.overwrite(closing_hi - 1, closing_hi, ")");
            key_destination = closing_hi - 1;
        } else {
            if state.inside_object {
                self.code.append_left(state.cursor, " }");
            }
            if !state.has_props {
                self.code.append_left(state.cursor, ", {}");
            }
            if state.saw_spread {
                self.code.append_left(state.cursor, ")");
            }
            if opening.self_closing {
                self.code.overwrite(attrs_end, self.hi(opening.span), ")");
                key_destination = attrs_end;
            } else {
                self.code.remove(attrs_end, self.hi(opening.span));
                // Children can only be elided containers here; delete them.
                self.render_children(&element.children, false);
                let closing = element
                    .closing
                    .as_ref()
                    .expect("non-self-closing element has a closing tag");
                let closing_lo = self.lo(closing.span);
                let closing_hi = self.hi(closing.span);
                self.code.remove(closing_lo, closing_hi - 1);
                self.code.overwrite(closing_hi - 1, closing_hi, ")");
                key_destination = closing_hi - 1;
            }
        }

        if let Some(key) = state.key {
            self.relocate_key(key, key_destination);
        }
    }

    fn render_fragment(&mut self, fragment: &JSXFragment) {
        let planned = self
            .plan
            .get(&span_key(fragment.span))
            .expect("jsx fragment was not analyzed");
        let factory = self.scope.rendered_name(planned.factory);
        let fragment_name = self
            .scope
            .rendered_name(planned.fragment.expect("fragment binding was planned"));
        let opening_lo = self.lo(fragment.opening.span);
        let opening_hi = self.hi(fragment.opening.span);
        let closing_lo = self.lo(fragment.closing.span);
        let closing_hi = self.hi(fragment.closing.span);
        match &planned.mode {
            RenderingMode::Preserve => {}
            RenderingMode::Classic { .. } => {
                self.code.overwrite(
                    opening_lo,
                    opening_hi,
                    &format!("/*#__PURE__*/{factory}({fragment_name}, null"),
                );
                self.render_children(&fragment.children, true);
                self.code.overwrite(closing_lo, closing_hi, ")");
            }
            RenderingMode::Automatic { .. } => {
                let count = rendered_jsx_children(&fragment.children);
                if count == 0 {
                    self.code.overwrite(
                        opening_lo,
                        opening_hi,
                        &format!("/*#__PURE__*/{factory}({fragment_name}, {{}}"),
                    );
                    self.render_children(&fragment.children, false);
                    self.code.overwrite(closing_lo, closing_hi, ")");
                } else {
                    let mut prefix =
                        format!("/*#__PURE__*/{factory}({fragment_name}, {{ children: ");
                    if count > 1 {
                        prefix.push('[');
                    }
                    self.code.overwrite(opening_lo, opening_hi, &prefix);
                    self.render_children(&fragment.children, false);
                    let suffix = if count > 1 { "] })" } else { " })" };
                    self.code.overwrite(closing_lo, closing_hi, suffix);
                }
            }
        }
    }

    /// Splice literal attributes into an object literal and spreads into
    /// bare expressions. With `extract_key`, a `key` attribute is handed
    /// back for relocation instead of accumulated.
    fn render_attributes<'n>(
        &mut self,
        attributes: &'n [JSXAttrOrSpread],
        start: usize,
        extract_key: bool,
    ) -> AttributeState<'n> {
        let mut state = AttributeState {
            cursor: start,
            trailing: start,
            inside_object: false,
            saw_spread: false,
            has_props: false,
            first_attr: None,
            first_is_spread: false,
            key: None,
        };
        for attribute in attributes {
            match attribute {
                JSXAttrOrSpread::JSXAttr(attr) => {
                    if extract_key && is_key_attribute_name(&attr.name) {
                        // The key span never joins the accumulation.
                        self.code.remove(state.cursor, self.lo(attr.span));
                        state.key = Some(attr);
                        state.trailing = self.hi(attr.span);
                        continue;
                    }
                    self.code.append_left(state.cursor, ",");
                    let attr_lo = self.lo(attr.span);
                    if !state.inside_object {
                        self.code.append_right(attr_lo, "{ ");
                        state.inside_object = true;
                    }
                    state.first_attr.get_or_insert(attr_lo);
                    state.has_props = true;
                    self.render_attribute(attr);
                    state.cursor = self.hi(attr.span);
                    state.trailing = state.cursor;
                }
                JSXAttrOrSpread::SpreadElement(spread) => {
                    if state.inside_object {
                        self.code.append_left(state.cursor, " }");
                        state.inside_object = false;
                    }
                    self.code.append_left(state.cursor, ",");
                    let expr_span = spread.expr.span();
                    let open = self.find_outside_comment(state.trailing, b'{');
                    let close = self.find_outside_comment(self.hi(expr_span), b'}');
                    self.code.remove(open, self.lo(expr_span));
                    self.code.remove(self.hi(expr_span), close + 1);
                    spread.expr.visit_with(self);
                    if state.first_attr.is_none() {
                        state.first_attr = Some(open);
                        state.first_is_spread = true;
                    }
                    state.saw_spread = true;
                    state.has_props = true;
                    state.cursor = close + 1;
                    state.trailing = state.cursor;
                }
            }
        }
        state
    }

    fn render_attribute(&mut self, attr: &JSXAttr) {
        let name_span = attr.name.span();
        match &attr.name {
            JSXAttrName::Ident(ident) => {
                if !is_js_identifier(&ident.sym) {
                    self.code.overwrite(
                        self.lo(name_span),
                        self.hi(name_span),
                        &quote_js_string(&ident.sym),
                    );
                }
            }
            JSXAttrName::JSXNamespacedName(name) => {
                let text = format!("{}:{}", name.ns.sym, name.name.sym);
                self.code.overwrite(
                    self.lo(name_span),
                    self.hi(name_span),
                    &quote_js_string(&text),
                );
            }
        }
        match &attr.value {
            None => self.code.append_left(self.hi(name_span), ": true"),
            Some(JSXAttrValue::Lit(lit)) => {
                self.code
                    .overwrite(self.hi(name_span), self.lo(lit.span()), ": ");
            }
            Some(JSXAttrValue::JSXExprContainer(container)) => {
                self.code
                    .overwrite(self.hi(name_span), self.lo(container.span), ": ");
                match &container.expr {
                    JSXExpr::Expr(expr) => {
                        let expr_span = expr.span();
                        self.code.remove(self.lo(container.span), self.lo(expr_span));
                        self.code.remove(self.hi(expr_span), self.hi(container.span));
                        expr.visit_with(self);
                    }
                    JSXExpr::JSXEmptyExpr(_) => {
                        // Comment-only container, boolean shorthand.
                        self.code
                            .overwrite(self.lo(container.span), self.hi(container.span), "true");
                    }
                }
            }
            Some(JSXAttrValue::JSXElement(element)) => {
                self.code
                    .overwrite(self.hi(name_span), self.lo(element.span), ": ");
                self.render_element(element);
            }
            Some(JSXAttrValue::JSXFragment(fragment)) => {
                self.code
                    .overwrite(self.hi(name_span), self.lo(fragment.span), ": ");
                self.render_fragment(fragment);
            }
        }
    }

    /// Move the key attribute's value behind the props argument; a key
    /// without a value synthesizes `true` at the destination instead.
    fn relocate_key(&mut self, attr: &JSXAttr, destination: usize) {
        let attr_lo = self.lo(attr.span);
        let attr_hi = self.hi(attr.span);
        match &attr.value {
            None => {
                self.code.remove(attr_lo, attr_hi);
                self.code.prepend_right(destination, ", true");
            }
            Some(JSXAttrValue::Lit(lit)) => {
                let value_lo = self.lo(lit.span());
                let value_hi = self.hi(lit.span());
                self.code.remove(attr_lo, value_lo);
                self.code.prepend_right(value_lo, ", ");
                self.code.move_range(value_lo, value_hi, destination);
            }
            Some(JSXAttrValue::JSXExprContainer(container)) => match &container.expr {
                JSXExpr::Expr(expr) => {
                    let expr_lo = self.lo(expr.span());
                    let expr_hi = self.hi(expr.span());
                    self.code.remove(attr_lo, expr_lo);
                    self.code.remove(expr_hi, self.hi(container.span));
                    expr.visit_with(self);
                    self.code.prepend_right(expr_lo, ", ");
                    self.code.move_range(expr_lo, expr_hi, destination);
                }
                JSXExpr::JSXEmptyExpr(_) => {
                    self.code.remove(attr_lo, attr_hi);
                    self.code.prepend_right(destination, ", true");
                }
            },
            Some(JSXAttrValue::JSXElement(element)) => {
                let value_lo = self.lo(element.span);
                let value_hi = self.hi(element.span);
                self.code.remove(attr_lo, value_lo);
                self.render_element(element);
                self.code.prepend_right(value_lo, ", ");
                self.code.move_range(value_lo, value_hi, destination);
            }
            Some(JSXAttrValue::JSXFragment(fragment)) => {
                let value_lo = self.lo(fragment.span);
                let value_hi = self.hi(fragment.span);
                self.code.remove(attr_lo, value_lo);
                self.render_fragment(fragment);
                self.code.prepend_right(value_lo, ", ");
                self.code.move_range(value_lo, value_hi, destination);
            }
        }
    }

    /// Elided containers are deleted outright and contribute no separator
    /// slot; every other child renders in place behind a `, `.
    fn render_children(&mut self, children: &[JSXElementChild], comma_before_first: bool) {
        let mut needs_comma = comma_before_first;
        for child in children {
            let child_span = child.span();
            if is_elided_child(child) {
                self.code.remove(self.lo(child_span), self.hi(child_span));
                continue;
            }
            if needs_comma {
                self.code.append_left(self.lo(child_span), ", ");
            } else {
                needs_comma = true;
            }
            self.render_child(child);
        }
    }

    fn render_child(&mut self, child: &JSXElementChild) {
        match child {
            JSXElementChild::JSXText(text) => {
                self.code.overwrite(
                    self.lo(text.span),
                    self.hi(text.span),
                    &quote_js_string(&text.value),
                );
            }
            JSXElementChild::JSXExprContainer(container) => {
                if let JSXExpr::Expr(expr) = &container.expr {
                    let expr_span = expr.span();
                    self.code.remove(self.lo(container.span), self.lo(expr_span));
                    self.code.remove(self.hi(expr_span), self.hi(container.span));
                    expr.visit_with(self);
                }
            }
            JSXElementChild::JSXElement(element) => self.render_element(element),
            JSXElementChild::JSXFragment(fragment) => self.render_fragment(fragment),
            JSXElementChild::JSXSpreadChild(spread) => {
                // Only the braces go; `...` stays.
                let lo = self.lo(spread.span);
                let hi = self.hi(spread.span);
                self.code.remove(lo, lo + 1);
                self.code.remove(hi - 1, hi);
                spread.expr.visit_with(self);
            }
        }
    }

    fn render_tag_name(&mut self, name: &JSXElementName) {
        match name {
            JSXElementName::Ident(ident) => {
                // Lower-case names are intrinsic elements and become
                // string literals; components keep their identifier.
                if ident.sym.chars().next().map_or(false, |c| c.is_ascii_lowercase()) {
                    self.code.overwrite(
                        self.lo(ident.span),
                        self.hi(ident.span),
                        &quote_js_string(&ident.sym),
                    );
                }
            }
            JSXElementName::JSXMemberExpr(_) => {}
            JSXElementName::JSXNamespacedName(name) => {
                let text = format!("{}:{}", name.ns.sym, name.name.sym);
                let span = name.span();
                self.code
                    .overwrite(self.lo(span), self.hi(span), &quote_js_string(&text));
            }
        }
    }

    fn wrap_in_object_assign(&mut self, state: &AttributeState<'_>) {
        let first = state
            .first_attr
            .expect("a spread attribute recorded a start offset");
        // A leading spread must not become Object.assign's mutation target.
        let wrap = if state.first_is_spread {
            "Object.assign({}, "
        } else {
            "Object.assign("
        };
        self.code.prepend_right(first, wrap);
    }

    fn strip_type_args(&mut self, opening: &swc_ecma_ast::JSXOpeningElement) -> usize {
        let name_hi = self.hi(opening.name.span());
        match &opening.type_args {
            Some(type_args) => {
                self.code.remove(name_hi, self.hi(type_args.span));
                self.hi(type_args.span)
            }
            None => name_hi,
        }
    }

    fn attributes_end(&self, opening: &swc_ecma_ast::JSXOpeningElement) -> usize {
        self.hi(opening.span) - if opening.self_closing { 2 } else { 1 }
    }

    /// First occurrence of `needle` at or after `index`, skipping line and
    /// block comments. The spread braces are not part of any span, so they
    /// are located in the source text this way.
    fn find_outside_comment(&self, mut index: usize, needle: u8) -> usize {
        let bytes = self.source.as_bytes();
        loop {
            if bytes[index] == needle {
                return index;
            }
            if bytes[index] == b'/' {
                match bytes[index + 1] {
                    b'/' => {
                        while bytes[index] != b'\n' {
                            index += 1;
                        }
                    }
                    b'*' => {
                        index += 2;
                        while !(bytes[index] == b'*' && bytes[index + 1] == b'/') {
                            index += 1;
                        }
                        index += 2;
                        continue;
                    }
                    _ => {}
                }
            }
            index += 1;
        }
    }
}

impl<'a> Visit for JsxRenderer<'a> {
    fn visit_expr(&mut self, expression: &Expr) {
        match expression {
            Expr::JSXElement(element) => self.render_element(element),
            Expr::JSXFragment(fragment) => self.render_fragment(fragment),
            _ => expression.visit_children_with(self),
        }
    }
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn quote_js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod test {
    use swc_common::{
        errors::{ColorConfig, Handler},
        sync::Lrc,
        FileName, SourceMap,
    };

    use crate::options::{JsxMode, JsxOptions};
    use crate::parser::Parser;
    use crate::transform::JsxTransform;

    use super::{is_js_identifier, quote_js_string};

    fn lower(source: &str, options: JsxOptions) -> String {
        let source_map: Lrc<SourceMap> = Default::default();
        let handler =
            Handler::with_tty_emitter(ColorConfig::Auto, true, false, Some(source_map.clone()));
        let source_file =
            source_map.new_source_file(FileName::Custom("test.jsx".into()), source.to_owned());
        let module = Parser::new(source_map, &handler)
            .parse(source_file.clone())
            .expect("failed to parse");
        JsxTransform::transform(
            source,
            &module,
            source_file.start_pos,
            &options.normalize().expect("invalid options"),
        )
        .expect("failed to transform")
    }

    fn classic(factory: &str) -> JsxOptions {
        JsxOptions {
            mode: Some(JsxMode::Classic),
            factory: Some(factory.to_owned()),
            ..Default::default()
        }
    }

    fn automatic() -> JsxOptions {
        JsxOptions {
            mode: Some(JsxMode::Automatic),
            ..Default::default()
        }
    }

    const RUNTIME_JSX: &str = "import { jsx } from \"react/jsx-runtime\";\n";

    #[test]
    fn classic_no_attributes_self_closing() {
        assert_eq!(lower("<Foo/>", classic("h")), "/*#__PURE__*/h(Foo, null)");
    }

    #[test]
    fn classic_literal_and_spread_mixed() {
        assert_eq!(
            lower("<Foo a=\"1\" {...b}/>", classic("h")),
            "/*#__PURE__*/h(Foo, Object.assign({ a: \"1\" }, b))"
        );
    }

    #[test]
    fn classic_spread_first_gets_a_fresh_target() {
        assert_eq!(
            lower("<Foo {...b} a=\"1\"/>", classic("h")),
            "/*#__PURE__*/h(Foo, Object.assign({}, b, { a: \"1\" }))"
        );
    }

    #[test]
    fn spread_braces_are_found_past_comments() {
        assert_eq!(
            lower("<Foo {/* { */ ...b /* } */}/>", classic("h")),
            "/*#__PURE__*/h(Foo, Object.assign({}, b))"
        );
    }

    #[test]
    fn classic_boolean_shorthand_still_appears() {
        assert_eq!(
            lower("<Foo disabled/>", classic("h")),
            "/*#__PURE__*/h(Foo, { disabled: true })"
        );
    }

    #[test]
    fn classic_children_become_positional_arguments() {
        assert_eq!(
            lower("<Foo>{x}<Bar/></Foo>", classic("h")),
            "/*#__PURE__*/h(Foo, null, x, /*#__PURE__*/h(Bar, null))"
        );
    }

    #[test]
    fn classic_text_child_is_quoted() {
        assert_eq!(
            lower("<Foo>hi</Foo>", classic("h")),
            "/*#__PURE__*/h(Foo, null, \"hi\")"
        );
    }

    #[test]
    fn classic_intrinsic_name_becomes_a_string() {
        assert_eq!(
            lower("<div id=\"a\"/>", classic("h")),
            "/*#__PURE__*/h(\"div\", { id: \"a\" })"
        );
    }

    #[test]
    fn namespaced_tag_name_becomes_a_string() {
        assert_eq!(
            lower("<svg:circle/>", classic("h")),
            "/*#__PURE__*/h(\"svg:circle\", null)"
        );
    }

    #[test]
    fn classic_member_expression_name_is_kept() {
        assert_eq!(
            lower("<Foo.Bar/>", classic("h")),
            "/*#__PURE__*/h(Foo.Bar, null)"
        );
    }

    #[test]
    fn classic_hyphenated_attribute_is_quoted() {
        assert_eq!(
            lower("<div data-id=\"a\"/>", classic("h")),
            "/*#__PURE__*/h(\"div\", { \"data-id\": \"a\" })"
        );
    }

    #[test]
    fn classic_expression_attribute_loses_its_braces() {
        assert_eq!(
            lower("<Foo a={x + 1}/>", classic("h")),
            "/*#__PURE__*/h(Foo, { a: x + 1 })"
        );
    }

    #[test]
    fn type_arguments_are_stripped() {
        assert_eq!(
            lower("<Foo<string>/>", classic("h")),
            "/*#__PURE__*/h(Foo, null)"
        );
    }

    #[test]
    fn namespaced_attribute_names_are_quoted() {
        assert_eq!(
            lower("<svg xlink:href=\"a\"/>", classic("h")),
            "/*#__PURE__*/h(\"svg\", { \"xlink:href\": \"a\" })"
        );
    }

    #[test]
    fn classic_key_stays_in_the_props_object() {
        assert_eq!(
            lower("<Foo key=\"k\"/>", classic("h")),
            "/*#__PURE__*/h(Foo, { key: \"k\" })"
        );
    }

    #[test]
    fn classic_fragment_uses_the_fragment_path() {
        assert_eq!(
            lower("<>hi</>", classic("h")),
            "/*#__PURE__*/h(React.Fragment, null, \"hi\")"
        );
    }

    #[test]
    fn classic_factory_with_import_source_is_imported_once() {
        let options = JsxOptions {
            mode: Some(JsxMode::Classic),
            import_source: Some("react".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            lower("const a = <Foo/>;\nconst b = <Bar/>;", options),
            "import React from \"react\";\n\
             const a = /*#__PURE__*/React.createElement(Foo, null);\n\
             const b = /*#__PURE__*/React.createElement(Bar, null);"
        );
    }

    #[test]
    fn automatic_single_child() {
        assert_eq!(
            lower("<Foo>{x}</Foo>", automatic()),
            format!("{RUNTIME_JSX}/*#__PURE__*/jsx(Foo, {{ children: x }})")
        );
    }

    #[test]
    fn automatic_multiple_children_use_jsxs_and_an_array() {
        assert_eq!(
            lower("<Foo><A/><B/></Foo>", automatic()),
            "import { jsxs, jsx } from \"react/jsx-runtime\";\n\
             /*#__PURE__*/jsxs(Foo, { children: [/*#__PURE__*/jsx(A, {}), /*#__PURE__*/jsx(B, {})] })"
        );
    }

    #[test]
    fn automatic_no_props_no_children_gets_a_bare_object() {
        assert_eq!(
            lower("<Foo/>", automatic()),
            format!("{RUNTIME_JSX}/*#__PURE__*/jsx(Foo, {{}})")
        );
    }

    #[test]
    fn automatic_key_is_relocated() {
        assert_eq!(
            lower("<Foo key=\"k\" a=\"1\"/>", automatic()),
            format!("{RUNTIME_JSX}/*#__PURE__*/jsx(Foo, {{ a: \"1\" }}, \"k\")")
        );
    }

    #[test]
    fn automatic_key_after_the_last_attribute() {
        assert_eq!(
            lower("<Foo a=\"1\" key={i}/>", automatic()),
            format!("{RUNTIME_JSX}/*#__PURE__*/jsx(Foo, {{ a: \"1\" }}, i)")
        );
    }

    #[test]
    fn automatic_key_without_value_synthesizes_true() {
        assert_eq!(
            lower("<Foo key/>", automatic()),
            format!("{RUNTIME_JSX}/*#__PURE__*/jsx(Foo, {{}}, true)")
        );
    }

    #[test]
    fn automatic_key_with_children() {
        assert_eq!(
            lower("<Foo key=\"k\">{x}</Foo>", automatic()),
            format!("{RUNTIME_JSX}/*#__PURE__*/jsx(Foo, {{ children: x }}, \"k\")")
        );
    }

    #[test]
    fn automatic_key_before_spread_is_still_extracted() {
        assert_eq!(
            lower("<Foo key=\"k\" {...b}/>", automatic()),
            format!("{RUNTIME_JSX}/*#__PURE__*/jsx(Foo, Object.assign({{}}, b), \"k\")")
        );
    }

    #[test]
    fn automatic_key_after_spread_downgrades_to_classic() {
        assert_eq!(
            lower("<Foo {...b} key=\"k\"/>", automatic()),
            "/*#__PURE__*/React.createElement(Foo, Object.assign({}, b, { key: \"k\" }))"
        );
    }

    #[test]
    fn automatic_spread_then_children_open_a_fresh_object() {
        assert_eq!(
            lower("<Foo {...b}>{x}</Foo>", automatic()),
            format!(
                "{RUNTIME_JSX}/*#__PURE__*/jsx(Foo, Object.assign({{}}, b, {{ children: x }}))"
            )
        );
    }

    #[test]
    fn automatic_attributes_and_children_share_one_object() {
        assert_eq!(
            lower("<Foo a=\"1\">{x}</Foo>", automatic()),
            format!("{RUNTIME_JSX}/*#__PURE__*/jsx(Foo, {{ a: \"1\", children: x }})")
        );
    }

    #[test]
    fn comment_containers_are_elided_everywhere() {
        assert_eq!(
            lower("<Foo>{/* comment */}<A/></Foo>", automatic()),
            format!("{RUNTIME_JSX}/*#__PURE__*/jsx(Foo, {{ children: /*#__PURE__*/jsx(A, {{}}) }})")
        );
    }

    #[test]
    fn sibling_elements_share_one_runtime_import() {
        assert_eq!(
            lower("const a = <Foo/>;\nconst b = <Bar/>;", automatic()),
            format!(
                "{RUNTIME_JSX}const a = /*#__PURE__*/jsx(Foo, {{}});\nconst b = /*#__PURE__*/jsx(Bar, {{}});"
            )
        );
    }

    #[test]
    fn runtime_import_dodges_a_user_binding() {
        assert_eq!(
            lower("const jsx = 1;\nconst a = <Foo/>;", automatic()),
            "import { jsx as jsx$1 } from \"react/jsx-runtime\";\n\
             const jsx = 1;\nconst a = /*#__PURE__*/jsx$1(Foo, {});"
        );
    }

    #[test]
    fn runtime_import_dodges_a_destructured_binding() {
        assert_eq!(
            lower("const { jsx } = m;\nconst a = <Foo/>;", automatic()),
            "import { jsx as jsx$1 } from \"react/jsx-runtime\";\n\
             const { jsx } = m;\nconst a = /*#__PURE__*/jsx$1(Foo, {});"
        );
    }

    #[test]
    fn automatic_fragment_with_children() {
        assert_eq!(
            lower("<><A/><B/></>", automatic()),
            "import { jsxs, Fragment, jsx } from \"react/jsx-runtime\";\n\
             /*#__PURE__*/jsxs(Fragment, { children: [/*#__PURE__*/jsx(A, {}), /*#__PURE__*/jsx(B, {})] })"
        );
    }

    #[test]
    fn nested_jsx_inside_a_ternary_is_found() {
        assert_eq!(
            lower("<Foo>{cond ? <A/> : <B/>}</Foo>", automatic()),
            format!(
                "{RUNTIME_JSX}/*#__PURE__*/jsx(Foo, {{ children: cond ? /*#__PURE__*/jsx(A, {{}}) : /*#__PURE__*/jsx(B, {{}}) }})"
            )
        );
    }

    #[test]
    fn spread_child_keeps_its_dots_as_an_argument() {
        assert_eq!(
            lower("<Foo>{...xs}</Foo>", classic("h")),
            "/*#__PURE__*/h(Foo, null, ...xs)"
        );
    }

    #[test]
    fn spread_child_lands_inside_the_children_array() {
        assert_eq!(
            lower("<Foo><A/>{...xs}</Foo>", automatic()),
            "import { jsxs, jsx } from \"react/jsx-runtime\";\n\
             /*#__PURE__*/jsxs(Foo, { children: [/*#__PURE__*/jsx(A, {}), ...xs] })"
        );
    }

    #[test]
    fn preserve_mode_is_a_pass_through() {
        let source = "const a = <Foo b=\"1\">{x}</Foo>;";
        let options = JsxOptions {
            mode: Some(JsxMode::Preserve),
            ..Default::default()
        };
        assert_eq!(lower(source, options), source);
    }

    #[test]
    fn surrounding_code_is_untouched() {
        assert_eq!(
            lower("f(1, <Foo/>, 2);", classic("h")),
            "f(1, /*#__PURE__*/h(Foo, null), 2);"
        );
    }

    #[test]
    fn malformed_factory_fails_before_any_edit() {
        let source_map: Lrc<SourceMap> = Default::default();
        let handler =
            Handler::with_tty_emitter(ColorConfig::Auto, true, false, Some(source_map.clone()));
        let source_file =
            source_map.new_source_file(FileName::Custom("test.jsx".into()), "<Foo/>".to_owned());
        let module = Parser::new(source_map, &handler)
            .parse(source_file.clone())
            .expect("failed to parse");
        let options = classic("React..createElement").normalize().expect("non-empty");
        let result =
            JsxTransform::transform("<Foo/>", &module, source_file.start_pos, &options);
        assert!(result.is_err());
    }

    #[test]
    fn identifier_check() {
        assert!(is_js_identifier("disabled"));
        assert!(is_js_identifier("$ref"));
        assert!(!is_js_identifier("data-id"));
        assert!(!is_js_identifier("1a"));
    }

    #[test]
    fn string_quoting_escapes_delimiters() {
        assert_eq!(quote_js_string("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
    }
}
