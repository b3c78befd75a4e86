use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser as CliParser, ValueEnum};
use log::info;
use swc_common::{
    errors::{ColorConfig, Handler},
    sync::Lrc,
    SourceMap,
};

use jsx_lower::{JsxMode, JsxOptions, JsxTransform, Parser};

/// Lower JSX to plain call expressions by splicing the original source.
#[derive(CliParser)]
#[command(name = "jsx-lower", version)]
struct Cli {
    /// Input module (.jsx or .tsx)
    input: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ModeArg::Classic)]
    mode: ModeArg,

    /// Dotted path called for elements in classic mode
    #[arg(long)]
    factory: Option<String>,

    /// Dotted path passed for fragments in classic mode
    #[arg(long)]
    fragment: Option<String>,

    /// Module the classic factory is imported from; bare identifiers
    /// resolve against existing bindings when omitted
    #[arg(long)]
    import_source: Option<String>,

    /// Package whose /jsx-runtime entry serves automatic mode
    #[arg(long)]
    jsx_import_source: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Preserve,
    Classic,
    Automatic,
}

impl From<ModeArg> for JsxMode {
    fn from(mode: ModeArg) -> JsxMode {
        match mode {
            ModeArg::Preserve => JsxMode::Preserve,
            ModeArg::Classic => JsxMode::Classic,
            ModeArg::Automatic => JsxMode::Automatic,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let options = JsxOptions {
        mode: Some(cli.mode.into()),
        factory: cli.factory,
        fragment: cli.fragment,
        import_source: cli.import_source,
        jsx_import_source: cli.jsx_import_source,
    }
    .normalize()?;

    let source_map: Lrc<SourceMap> = Default::default();
    let handler =
        Handler::with_tty_emitter(ColorConfig::Auto, true, false, Some(source_map.clone()));
    let source_file = source_map
        .load_file(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    info!("parsing {}", cli.input.display());
    let module = Parser::new(source_map.clone(), &handler).parse(source_file.clone())?;

    let output = JsxTransform::transform(&source_file.src, &module, source_file.start_pos, &options)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => print!("{output}"),
    }
    Ok(())
}
