// Synthesis run: config -> stacks -> templates on disk

use crate::init;
use crate::stacks::{StatefulStack, StatelessStack};
use crate::SynthArgs;
use anyhow::{bail, Context, Result};
use dialoguer::Confirm;
use std::fs;
use std::path::Path;
use symphony_config::{load_config, tags_for};
use symphony_constructs::LambdaRule;
use symphony_core::{App, Assembly, SynthError};
use tracing::{error, info};

pub fn run(args: SynthArgs) -> Result<()> {
    init::init_tracing(&args.log_level, args.log_format);

    let config = load_config(&args.environment)?;
    let tags = tags_for(&args.environment);
    info!(
        environment = %args.environment,
        stage = %config.env.stage,
        profile = %config.compute.lambda.profile,
        "loaded configuration"
    );

    let mut app = App::new();
    app.add_aspect(LambdaRule);

    let stateful = StatefulStack::new(&mut app, &config, &tags)?;
    StatelessStack::new(&mut app, &config, &tags, stateful.refs())?;

    let assembly = match app.synth() {
        Ok(assembly) => assembly,
        Err(SynthError::PolicyViolations(violations)) => {
            for violation in &violations {
                error!(path = %violation.path, "{}", violation.message);
            }
            bail!(
                "synthesis failed with {} policy violation(s)",
                violations.len()
            );
        }
        Err(err) => return Err(err.into()),
    };

    write_assembly(&assembly, &args.output, args.force)
}

fn write_assembly(assembly: &Assembly, dir: &Path, force: bool) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    for stack in &assembly.stacks {
        let path = dir.join(format!("{}.template.json", stack.name));
        if path.exists() && !force {
            let overwrite = Confirm::new()
                .with_prompt(format!("{} already exists. Overwrite?", path.display()))
                .default(false)
                .interact()?;
            if !overwrite {
                info!(stack = %stack.name, "skipped existing template");
                continue;
            }
        }
        let body = serde_json::to_string_pretty(&stack.template)
            .context("Failed to serialize template")?;
        fs::write(&path, body)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(stack = %stack.name, path = %path.display(), "wrote template");
    }

    Ok(())
}
