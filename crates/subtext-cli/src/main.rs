use anyhow::{Context, Result, bail};
use std::{env, path::PathBuf, process};
use subtext_config::{Config, EditorSettings};
use subtext_engine::parsing::GrammarSet;
use subtext_engine::snapshot::render_node;
use subtext_engine::{Editor, Engine, EntityKind, InMemoryResolver, TreeHost, io};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let note_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        eprintln!("Usage: {} <note-file>", args[0]);
        process::exit(1);
    };

    let config = match Config::load()? {
        Some(config) => config,
        None => {
            log::info!(
                "No config at {}, using defaults",
                Config::config_path().display()
            );
            Config::default()
        }
    };

    let grammars = grammars_from(&config.editor)?;
    let resolver = match &config.references_path {
        Some(dir) => io::load_references(dir)
            .with_context(|| format!("loading references from {}", dir.display()))?,
        None => InMemoryResolver::new(),
    };
    log::info!("{} reference targets available", resolver.len());

    let engine = Engine::new(grammars, resolver)
        .with_reference_sigils(config.editor.reference_sigils.iter().copied());
    let document = io::read_note(&note_path)
        .with_context(|| format!("reading {}", note_path.display()))?;
    let editor = Editor::new(document, engine)?;

    print!("{}", describe(&editor));
    Ok(())
}

fn grammars_from(settings: &EditorSettings) -> Result<GrammarSet> {
    let mut kinds = Vec::with_capacity(settings.grammars.len());
    for name in &settings.grammars {
        match name.parse::<EntityKind>() {
            Ok(kind) => kinds.push(kind),
            Err(e) => bail!("invalid grammar in config: {e}"),
        }
    }
    Ok(GrammarSet::with_kinds(&kinds)?)
}

/// One line per node with its display class, blocks separated by `--`.
fn describe(editor: &Editor<InMemoryResolver>) -> String {
    let doc = editor.document();
    let mut out = String::new();
    for (index, block) in doc.blocks().into_iter().enumerate() {
        if index > 0 {
            out.push_str("--\n");
        }
        for key in doc.children(block) {
            let Some(node) = doc.node(key) else {
                continue;
            };
            let class = editor
                .classify(key)
                .and_then(|c| c.display_class)
                .unwrap_or("-");
            out.push_str(&format!("{class:<22} {}\n", render_node(node)));
        }
    }
    out
}
