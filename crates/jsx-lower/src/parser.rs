use anyhow::anyhow;
use swc_common::{errors::Handler, sync::Lrc, SourceFile, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{lexer::Lexer, Parser as SWCParser, StringInput, Syntax, TsConfig};

/// Thin front-end around the swc parser. Produces the read-only module
/// tree the lowering consumes; syntax diagnostics are reported through
/// the handler.
pub struct Parser<'a> {
    #[allow(dead_code)]
    source_map: Lrc<SourceMap>,
    handler: &'a Handler,
}

impl<'a> Parser<'a> {
    pub fn new(source_map: Lrc<SourceMap>, handler: &'a Handler) -> Self {
        Parser {
            source_map,
            handler,
        }
    }

    pub fn parse(&mut self, source_file: Lrc<SourceFile>) -> anyhow::Result<Module> {
        let lexer = Lexer::new(
            Syntax::Typescript(TsConfig {
                tsx: true,
                ..Default::default()
            }),
            Default::default(),
            StringInput::from(&*source_file),
            None,
        );

        let mut parser = SWCParser::new_from(lexer);

        for error in parser.take_errors() {
            error.into_diagnostic(self.handler).emit();
        }

        parser.parse_module().map_err(|error| {
            error.into_diagnostic(self.handler).emit();
            anyhow!("failed to parse {}", source_file.name)
        })
    }
}
