//! CLI command implementations.

use colored::{ColoredString, Colorize};
use std::path::Path;
use topograph_core::VertexInfo;
use topograph_graph::{HealthEngine, Subgraph};
use topograph_server::{ServerConfig, TopographServer};
use tracing::debug;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// How many vertices or edges to print before summarizing the rest.
const LIST_LIMIT: usize = 25;

fn load(topology: &Path) -> Result<HealthEngine> {
    debug!("Loading topology from {}", topology.display());
    Ok(HealthEngine::load(topology)?)
}

/// Validate the topology file.
pub fn check(topology: &Path) -> Result<()> {
    let engine = load(topology)?;
    let graph = engine.graph();

    println!(
        "{} {} is valid ({} components, {} dependencies)",
        "✓".green(),
        topology.display(),
        graph.vertex_count().to_string().cyan(),
        graph.edge_count().to_string().cyan()
    );

    Ok(())
}

/// Show totals and unhealthy components.
///
/// A fresh load has no health state, so this mostly reports totals. Health
/// lives in a running server.
pub fn summary(topology: &Path, json_output: bool) -> Result<()> {
    let engine = load(topology)?;
    let summary = engine.summary();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Topology Summary".cyan().bold());
    println!();
    println!("  {} {}", "Components:".dimmed(), summary.total_vertices);
    println!("  {} {}", "Dependencies:".dimmed(), summary.total_edges);
    println!(
        "  {} {}",
        "Unhealthy:".dimmed(),
        summary.unhealthy_vertices.len()
    );
    for vertex in &summary.unhealthy_vertices {
        println!("    {}", describe(vertex));
    }

    Ok(())
}

/// Show a single component.
pub fn vertex(topology: &Path, key: &str, json_output: bool) -> Result<()> {
    let engine = load(topology)?;
    let vertex = engine.get_vertex(key)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&vertex)?);
        return Ok(());
    }

    println!("{}", describe(&vertex));

    let graph = engine.graph();
    let depends_on = graph.out_edges(key)?.len();
    let depended_by = graph.in_edges(key)?.len();

    println!("  {} {}", "Depends on:".dimmed(), depends_on);
    println!("  {} {}", "Depended on by:".dimmed(), depended_by);

    Ok(())
}

pub fn dependents(topology: &Path, key: &str, all: bool, json_output: bool) -> Result<()> {
    let engine = load(topology)?;
    print_subgraph(&engine.dependents(key, all)?, json_output)
}

pub fn dependencies(topology: &Path, key: &str, all: bool, json_output: bool) -> Result<()> {
    let engine = load(topology)?;
    print_subgraph(&engine.dependencies(key, all)?, json_output)
}

pub fn neighbors(topology: &Path, key: &str, json_output: bool) -> Result<()> {
    let engine = load(topology)?;
    print_subgraph(&engine.neighbors(key)?, json_output)
}

pub fn path(topology: &Path, source: &str, target: &str, json_output: bool) -> Result<()> {
    let engine = load(topology)?;
    let subgraph = engine.path(source, target)?;

    if !json_output && subgraph.vertices.is_empty() {
        println!(
            "No dependency path from {} to {}",
            source.cyan(),
            target.cyan()
        );
        return Ok(());
    }

    print_subgraph(&subgraph, json_output)
}

pub fn lineage(topology: &Path, key: &str, json_output: bool) -> Result<()> {
    let engine = load(topology)?;
    print_subgraph(&engine.lineage(key)?, json_output)
}

/// Start the Topograph server.
pub async fn serve(topology: &Path, port: u16, headless: bool) -> Result<()> {
    let bind_addr = if headless { "0.0.0.0" } else { "127.0.0.1" };

    if headless {
        println!("{}", "Starting Topograph server in headless mode...".cyan());
    } else {
        println!("{}", "Starting Topograph server...".cyan());
    }

    let engine = load(topology)?;
    println!(
        "{} Loaded {} components, {} dependencies",
        "✓".green(),
        engine.graph().vertex_count(),
        engine.graph().edge_count()
    );

    let addr = format!("{}:{}", bind_addr, port).parse()?;
    let config = ServerConfig { addr };
    let server = TopographServer::new(engine, config);

    println!("{} Listening on ws://{}:{}", "✓".green(), bind_addr, port);
    if headless {
        println!("  Headless mode: accepting connections from any host");
    }
    println!("  Press {} to stop", "Ctrl+C".cyan());

    server.run().await.map_err(|e| e.to_string())?;

    Ok(())
}

fn print_subgraph(subgraph: &Subgraph, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(subgraph)?);
        return Ok(());
    }

    println!("{}", subgraph.title.cyan().bold());
    println!("Principal: {}", describe(&subgraph.principal));
    println!();

    if !subgraph.highlights.is_empty() {
        let waypoints: Vec<&str> = subgraph.highlight_keys();
        println!("{} {}", "Path:".yellow(), waypoints.join(" → "));
        println!();
    }

    let scope = if subgraph.all { "transitive" } else { "direct" };
    println!(
        "{} components ({}):",
        subgraph.vertices.len().to_string().bold(),
        scope
    );
    for vertex in subgraph.vertices.iter().take(LIST_LIMIT) {
        println!("  • {}", describe(vertex));
    }
    if subgraph.vertices.len() > LIST_LIMIT {
        println!("  ... and {} more", subgraph.vertices.len() - LIST_LIMIT);
    }

    println!();
    println!("{} dependencies:", subgraph.edges.len().to_string().bold());
    for edge in subgraph.edges.iter().take(LIST_LIMIT) {
        let class = if edge.class.is_empty() {
            String::new()
        } else {
            format!(" ({})", edge.class)
        };
        println!(
            "  {} {} {}{}",
            edge.source,
            "→".dimmed(),
            edge.target,
            class.dimmed()
        );
    }
    if subgraph.edges.len() > LIST_LIMIT {
        println!("  ... and {} more", subgraph.edges.len() - LIST_LIMIT);
    }

    Ok(())
}

fn health_marker(healthy: bool) -> ColoredString {
    if healthy {
        "✓".green()
    } else {
        "✗".red()
    }
}

/// One-line description of a component.
fn describe(vertex: &VertexInfo) -> String {
    let class = if vertex.class.is_empty() {
        String::new()
    } else {
        format!(" [{}]", vertex.class)
    };
    format!(
        "{} {} {}{}",
        health_marker(vertex.healthy),
        vertex.key.cyan(),
        vertex.label,
        class.dimmed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_topology(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("topology.json");
        fs::write(
            &path,
            r#"{
                "vertices": [
                    {"key": "web", "label": "Web", "class": "frontend"},
                    {"key": "api", "label": "API", "class": "service"}
                ],
                "edges": [{"key": "web-api", "source": "web", "target": "api"}]
            }"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_describe_plain() {
        colored::control::set_override(false);
        let vertex = VertexInfo {
            key: "api".into(),
            label: "API".into(),
            class: "service".into(),
            healthy: false,
        };
        assert_eq!(describe(&vertex), "✗ api API [service]");
    }

    #[test]
    fn test_commands_against_file() {
        colored::control::set_override(false);
        let dir = tempfile::tempdir().unwrap();
        let path = write_topology(dir.path());

        check(&path).unwrap();
        summary(&path, true).unwrap();
        dependents(&path, "api", true, false).unwrap();
        super::path(&path, "api", "web", false).unwrap();
        lineage(&path, "web", true).unwrap();
    }

    #[test]
    fn test_unknown_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_topology(dir.path());

        let err = vertex(&path, "nope", false).unwrap_err();
        assert_eq!(err.to_string(), "vertex not found: nope");
    }

    #[test]
    fn test_missing_topology_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check(&dir.path().join("absent.json")).is_err());
    }
}
