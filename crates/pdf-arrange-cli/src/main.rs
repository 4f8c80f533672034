use anyhow::Result;
use clap::{Parser, Subcommand};
use pdf_arrange::{ArrangementPlan, MergeMode, MoveDirection, PlanOp, Session};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfarr", about = "PDF page arrangement and merge tool", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rasterize, arrange and merge PDF pages, then package the results
    Export {
        /// Input PDF file(s) - can specify multiple
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output archive
        #[arg(short, long, default_value = "all.zip")]
        output: PathBuf,

        /// Arrangement plan JSON file (alternative to --op)
        #[arg(long, conflicts_with = "op")]
        plan: Option<PathBuf>,

        /// Arrangement operation, applied in order. Forms:
        /// merge:SLOT:vertical|horizontal|grid, move:SLOT:forward|backward,
        /// clear:SLOT
        #[arg(long = "op", value_parser = parse_op)]
        op: Vec<PlanOp>,

        /// Document the plan applies to (index into --input)
        #[arg(long, default_value = "0")]
        doc: usize,

        /// List every page slot with its merge label
        #[arg(long)]
        list: bool,

        /// Show statistics only, don't write the archive
        #[arg(long)]
        stats_only: bool,
    },
}

fn parse_op(value: &str) -> std::result::Result<PlanOp, String> {
    let mut parts = value.split(':');
    let kind = parts.next().unwrap_or_default();
    let slot = parts
        .next()
        .ok_or_else(|| format!("missing slot in '{value}'"))?
        .parse::<usize>()
        .map_err(|e| format!("bad slot in '{value}': {e}"))?;

    let op = match kind {
        "merge" => {
            let mode = match parts
                .next()
                .ok_or_else(|| format!("missing merge mode in '{value}'"))?
            {
                "vertical" => MergeMode::Vertical,
                "horizontal" => MergeMode::Horizontal,
                "grid" => MergeMode::Grid,
                other => return Err(format!("unknown merge mode '{other}'")),
            };
            PlanOp::Merge { slot, mode }
        }
        "move" => {
            let direction = match parts
                .next()
                .ok_or_else(|| format!("missing direction in '{value}'"))?
            {
                "forward" => MoveDirection::Forward,
                "backward" => MoveDirection::Backward,
                other => return Err(format!("unknown direction '{other}'")),
            };
            PlanOp::Move { slot, direction }
        }
        "clear" => PlanOp::Clear { slot },
        other => return Err(format!("unknown operation '{other}'")),
    };
    if parts.next().is_some() {
        return Err(format!("trailing input in '{value}'"));
    }
    Ok(op)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            plan,
            op,
            doc,
            list,
            stats_only,
        } => {
            let documents = pdf_arrange::load_documents(&input).await?;
            let mut session = Session::new();
            for document in documents {
                session.add(document);
            }

            let plan = match plan {
                Some(path) => ArrangementPlan::load(path).await?,
                None => ArrangementPlan { operations: op },
            };
            if !plan.operations.is_empty() {
                let Some(document) = session.document_mut(doc) else {
                    anyhow::bail!("--doc {doc} is out of range");
                };
                plan.apply(document.pages_mut());
            }

            for document in session.documents() {
                let stats = pdf_arrange::calculate_statistics(document.pages());
                println!("{}:", document.name());
                println!("  Source pages: {}", stats.source_pages);
                println!("  Export units: {}", stats.export_units);
                println!("  Merged groups: {}", stats.merged_groups);
                println!("  Pass-through pages: {}", stats.passthrough_pages);
                if list {
                    for index in 0..document.pages().len() {
                        println!("    {}", document.pages().slot_label(index));
                    }
                }
            }

            if stats_only {
                return Ok(());
            }

            let summary =
                tokio::task::spawn_blocking(move || {
                    let mut session = session;
                    session.package()
                })
                .await??;

            for failure in &summary.failures {
                eprintln!("export failed: {} ({})", failure.name, failure.reason);
            }
            if summary.exported == 0 {
                anyhow::bail!("no documents exported");
            }

            pdf_arrange::write_archive(&output, summary.archive).await?;
            println!(
                "Packaged {} document(s) → {}",
                summary.exported,
                output.display()
            );
        }
    }

    Ok(())
}
