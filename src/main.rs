use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use topotree::tree::NodeId;
use topotree::{TopologyController, TopologyTree};

#[derive(Parser)]
#[command(name = "topotree")]
#[command(about = "Topology tree converter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a topology file of any supported format to the stream
    /// format the name-server utility imports.
    Convert {
        input: String,

        #[arg(short = 'o', long)]
        out: String,
    },

    /// Print the topology tree of a file plus a short summary.
    Inspect { input: String },
}

#[derive(Serialize)]
struct Summary {
    nodes: usize,
    leaves: usize,
    depth: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let controller = TopologyController::standard()?;

    match cli.cmd {
        Commands::Convert { input, out } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("read topology file {}", input))?;
            let tree = controller.load(&text)?;
            let exported = controller.export(&tree)?;
            std::fs::write(&out, exported).with_context(|| format!("write {}", out))?;
            println!("Wrote {}", out);
        }

        Commands::Inspect { input } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("read topology file {}", input))?;
            let tree = controller.load(&text)?;

            print_subtree(&tree, tree.root(), 0);
            println!("{}", serde_json::to_string_pretty(&summarize(&tree))?);
        }
    }

    Ok(())
}

fn print_subtree(tree: &TopologyTree, node: NodeId, indent: usize) {
    println!("{:indent$}{}", "", tree.display_label(node), indent = indent);
    for &child in tree.node(node).children() {
        print_subtree(tree, child, indent + 2);
    }
}

/// Count attached nodes only; detached arena slots do not show up in the
/// tree the user sees.
fn summarize(tree: &TopologyTree) -> Summary {
    let mut nodes = 0usize;
    let mut leaves = 0usize;
    let mut depth = 0u32;

    let mut stack = vec![tree.root()];
    while let Some(current) = stack.pop() {
        nodes += 1;
        let entry = tree.node(current);
        if entry.is_leaf() {
            leaves += 1;
        }
        depth = depth.max(entry.level());
        stack.extend_from_slice(entry.children());
    }

    Summary {
        nodes,
        leaves,
        depth,
    }
}
