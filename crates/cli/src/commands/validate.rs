//! Load content and report what did not check out.

use anyhow::Result;
use arena_core::GameError;
use clap::Parser;
use console::style;

use crate::config::CliConfig;
use crate::session::Session;

/// Load content and report diagnostics and build issues
#[derive(Parser, Debug)]
pub struct Validate {
    /// Builds to check (defaults to every build in the data directory, or the built-ins)
    #[arg(value_name = "BUILD")]
    builds: Vec<String>,

    /// Fail when anything is reported
    #[arg(long)]
    strict: bool,
}

impl Validate {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let session = Session::open(config)?;
        let registry = session.registry();

        match &config.data_dir {
            Some(dir) => println!("{} {}", style("Content:").bold().cyan(), dir.display()),
            None => println!("{} built-in", style("Content:").bold().cyan()),
        }
        println!(
            "  {} races, {} affixes, {} skills, {} passive nodes",
            registry.races().len(),
            registry.affixes().len(),
            registry.skills().len(),
            registry.passives().len()
        );
        println!();

        let report = registry.report();
        println!("{}", style("=== Effect diagnostics ===").bold().green());
        if report.is_clean() {
            println!("  {}", style("none").dim());
        }
        for diagnostic in report.diagnostics() {
            println!(
                "  {} [{}] {} {}",
                style("!").yellow().bold(),
                diagnostic.severity().as_str(),
                style(diagnostic.error_code()).dim(),
                diagnostic
            );
        }
        println!();

        let builds = if self.builds.is_empty() {
            session.build_names()?
        } else {
            self.builds
        };

        let mut problems = report.len();
        println!("{}", style("=== Builds ===").bold().green());
        for spec in &builds {
            let checked = session
                .build(spec)
                .and_then(|build| registry.resolve_build(&build));
            match checked {
                Ok(resolved) if resolved.issues.is_empty() => {
                    println!("  {} {}", style("✓").green(), resolved.name);
                }
                Ok(resolved) => {
                    problems += resolved.issues.len();
                    println!("  {} {}", style("!").yellow().bold(), resolved.name);
                    for issue in &resolved.issues {
                        println!("      {} {}", style(issue.error_code()).dim(), issue);
                    }
                }
                Err(err) => {
                    problems += 1;
                    println!("  {} {}: {:#}", style("✗").red().bold(), spec, err);
                }
            }
        }
        println!();

        if problems == 0 {
            println!("{}", style("✓ Content is clean").green().bold());
        } else {
            println!(
                "{}",
                style(format!("{} problem(s) reported", problems)).yellow().bold()
            );
            if self.strict {
                anyhow::bail!("validation reported {} problem(s)", problems);
            }
        }
        Ok(())
    }
}
